//! Reporting core for Dataverse repository metrics.
//!
//! Validates date-range request parameters, shapes month-grouped counts into
//! running-total series and turns labelled counts into percentage
//! breakdowns. Query execution sits behind [`source::StatsSource`].

pub mod aggregate;
pub mod calendar;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod source;
pub mod validation;

pub use errors::{AggregateError, FailureKind, SourceError, StatsError, ValidationError};
pub use handlers::StatsMaker;
pub use models::{
    CategoryRecord, DateRangeFilter, MonthRecord, PublicationState, SortOrder, StatsParams,
    StatsPayload, StatsResult,
};
pub use validation::validate;
