use std::env;

/// Runtime settings, read from the environment (after `.env` is loaded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Include query traces in response envelopes
    pub debug: bool,
    /// Insert zero-count months into monthly series
    pub fill_month_gaps: bool,
    /// Indent JSON output
    pub pretty: bool,
    /// `tracing_subscriber` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            fill_month_gaps: false,
            pretty: false,
            log_filter: "miniverse_stats=info,miniverse_report=info,warn".to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        let flag = |key: &str| {
            lookup(key)
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false)
        };

        Self {
            debug: flag("MINIVERSE_DEBUG"),
            fill_month_gaps: flag("MINIVERSE_FILL_GAPS"),
            pretty: flag("MINIVERSE_PRETTY"),
            log_filter: lookup("RUST_LOG")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.log_filter),
        }
    }
}
