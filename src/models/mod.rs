// Re-export all model types from submodules
mod common;
mod filter;
mod params;
mod stats;

// Items from common are imported directly where needed
pub use filter::*;
pub use params::*;
pub use stats::*;
