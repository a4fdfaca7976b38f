use serde::Serialize;

/// Parameter validation failures. The display strings are returned to API
/// clients verbatim and must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("The year must be digits.")]
    InvalidYear,

    #[error("The year cannot be zero.")]
    ZeroYear,

    #[error("The year cannot be more than 4-digits (YYYY)")]
    YearTooLong,

    #[error("Start date is invalid.  Use YYYY-MM-DD format.")]
    InvalidStartDate,

    #[error("End date is invalid.  Use YYYY-MM-DD format.")]
    InvalidEndDate,

    #[error("The start date cannot be after the end date.")]
    StartAfterEnd,

    #[error("The 'selected_year' ({year})' cannot be before the 'start_date' year ({start_date})")]
    YearBeforeStart { year: i32, start_date: String },

    #[error("The 'selected_year' ({year})' cannot be after the 'end_date' year ({end_date})")]
    YearAfterEnd { year: i32, end_date: String },
}

/// Rows handed to the aggregator that break the query contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    #[error("Unknown month number: {0}")]
    UnknownMonthNumber(u32),

    #[error("Invalid month key '{0}', expected YYYY-MM")]
    InvalidMonthKey(String),

    #[error("Negative count {count} for month {month_key}")]
    NegativeCount { month_key: String, count: i64 },
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Query error: {0}")]
    Query(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// How a failed result should be reported to a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    BadRequest,
    Internal,
}

impl FailureKind {
    pub fn status_code(self) -> u16 {
        match self {
            FailureKind::BadRequest => 400,
            FailureKind::Internal => 500,
        }
    }
}

impl StatsError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            StatsError::Validation(_) => FailureKind::BadRequest,
            StatsError::Aggregate(_) | StatsError::Source(_) => FailureKind::Internal,
        }
    }

    /// Message shown to clients. Internal details stay in the logs.
    pub fn client_message(&self) -> String {
        match self {
            StatsError::Validation(err) => {
                tracing::warn!("Rejected stats parameters: {}", err);
                err.to_string()
            }
            StatsError::Aggregate(err) => {
                tracing::error!("Aggregation error: {}", err);
                "Unknown processing error".to_string()
            }
            StatsError::Source(err) => {
                tracing::error!("Stats source error: {:?}", err);
                "Database error occurred".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;
