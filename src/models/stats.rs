use serde::Serialize;
use serde_json::Value;

use crate::calendar;
use crate::errors::{FailureKind, StatsError};

/// One calendar-month bucket of a time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthRecord {
    #[serde(rename = "yyyy_mm")]
    pub month_key: String,
    #[serde(rename = "cnt")]
    pub count: i64,
    pub running_total: i64,
    #[serde(rename = "month_name")]
    pub month_name_short: String,
    #[serde(rename = "year_num")]
    pub year: i32,
    #[serde(rename = "month_num")]
    pub month: u32,
}

impl MonthRecord {
    pub fn month_name_full(&self) -> Option<&'static str> {
        calendar::month_name(self.month)
    }
}

/// A creation-date month with the publication-date figures for the same month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombinedMonthRecord {
    #[serde(flatten)]
    pub created: MonthRecord,
    pub pub_cnt: i64,
    pub pub_running_total: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRecord {
    pub label: String,
    #[serde(rename = "cnt")]
    pub count: i64,
    pub total_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_number: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub count: usize,
    pub records: Vec<CategoryRecord>,
}

impl From<Vec<CategoryRecord>> for CategoryBreakdown {
    fn from(records: Vec<CategoryRecord>) -> Self {
        Self {
            count: records.len(),
            records,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatsPayload {
    Count(i64),
    Months(Vec<MonthRecord>),
    Combined(Vec<CombinedMonthRecord>),
    Categories(CategoryBreakdown),
}

/// Outcome of a single stats computation.
#[derive(Debug, Clone, PartialEq)]
pub enum StatsResult {
    Success {
        payload: StatsPayload,
        query_trace: Option<String>,
    },
    Failure {
        kind: FailureKind,
        message: String,
    },
}

impl StatsResult {
    pub fn success(payload: StatsPayload, query_trace: Option<String>) -> Self {
        StatsResult::Success {
            payload,
            query_trace,
        }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        StatsResult::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StatsResult::Success { .. })
    }

    pub fn payload(&self) -> Option<&StatsPayload> {
        match self {
            StatsResult::Success { payload, .. } => Some(payload),
            StatsResult::Failure { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            StatsResult::Success { .. } => None,
            StatsResult::Failure { message, .. } => Some(message),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            StatsResult::Success { .. } => 200,
            StatsResult::Failure { kind, .. } => kind.status_code(),
        }
    }

    /// Response body for API clients. The query trace is only included when
    /// `include_debug` is set. Serializes as `status`, `debug`, `data`.
    pub fn envelope(&self, include_debug: bool) -> Envelope<'_> {
        match self {
            StatsResult::Success {
                payload,
                query_trace,
            } => Envelope::Ok {
                status: "OK",
                debug: query_trace
                    .as_deref()
                    .filter(|_| include_debug)
                    .map(|sql_query| DebugInfo { sql_query }),
                data: payload,
            },
            StatsResult::Failure { message, .. } => Envelope::Error {
                status: "ERROR",
                message: message.as_str(),
            },
        }
    }

    /// [`StatsResult::envelope`] as a JSON value, for inspection.
    pub fn to_envelope(&self, include_debug: bool) -> Value {
        serde_json::to_value(self.envelope(include_debug)).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Serialize)]
pub struct DebugInfo<'a> {
    pub sql_query: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Envelope<'a> {
    Ok {
        status: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        debug: Option<DebugInfo<'a>>,
        data: &'a StatsPayload,
    },
    Error {
        status: &'static str,
        message: &'a str,
    },
}

impl From<StatsError> for StatsResult {
    fn from(err: StatsError) -> Self {
        StatsResult::failure(err.failure_kind(), err.client_message())
    }
}
