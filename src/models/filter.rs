use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Order in which monthly rows are produced by a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Parse a `time_sort` request value. Only the descending spellings are
    /// recognised; everything else sorts ascending.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()) {
            Some(v) if matches!(v.as_str(), "d" | "desc" | "descending" | "-") => {
                SortOrder::Descending
            }
            _ => SortOrder::Ascending,
        }
    }
}

/// Validated date window for a stats request.
///
/// Only built by [`crate::validation::validate`] (or `Default` for an open
/// window), so the ordering invariants always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DateRangeFilter {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    selected_year: Option<i32>,
    sort_order: SortOrder,
}

impl DateRangeFilter {
    pub(crate) fn new(
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        selected_year: Option<i32>,
    ) -> Self {
        Self {
            start_date,
            end_date,
            selected_year,
            sort_order: SortOrder::Ascending,
        }
    }

    pub fn with_sort_order(self, sort_order: SortOrder) -> Self {
        Self { sort_order, ..self }
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn selected_year(&self) -> Option<i32> {
        self.selected_year
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Effective inclusive lower bound: the later of `start_date` and
    /// January 1st of `selected_year`.
    pub fn lower_bound(&self) -> Option<NaiveDate> {
        let year_start = self
            .selected_year
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
        match (self.start_date, year_start) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }

    /// Effective inclusive upper bound: the earlier of `end_date` and
    /// December 31st of `selected_year`.
    pub fn upper_bound(&self) -> Option<NaiveDate> {
        let year_end = self
            .selected_year
            .and_then(|year| NaiveDate::from_ymd_opt(year, 12, 31));
        match (self.end_date, year_end) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.lower_bound().map_or(true, |lower| date >= lower)
            && self.upper_bound().map_or(true, |upper| date <= upper)
    }

    /// Entities dated before this day are counted into the opening running
    /// total of a monthly series. `None` means the series starts from zero.
    pub fn running_total_baseline(&self) -> Option<NaiveDate> {
        self.lower_bound()
    }
}

/// Publication-state selector from the `pub_state` request parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationState {
    #[default]
    Published,
    Unpublished,
    All,
}

impl PublicationState {
    /// Unknown values fall back to published.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("unpublished") => PublicationState::Unpublished,
            Some("all") => PublicationState::All,
            _ => PublicationState::Published,
        }
    }

    pub fn matches(self, is_published: bool) -> bool {
        match self {
            PublicationState::Published => is_published,
            PublicationState::Unpublished => !is_published,
            PublicationState::All => true,
        }
    }
}

/// Kinds of repository objects the stats are computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Dataverse,
    Dataset,
    Datafile,
    FileDownload,
}

/// Which date of an entity places it into a month bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    #[default]
    Created,
    Published,
    Modified,
}

/// Labels an entity can be broken down by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Affiliation,
    DataverseType,
    Subject,
    ContentType,
    Extension,
}

/// Everything a source needs to select rows: the date window plus the closed
/// set of extra predicates a metric may add.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatsQuery {
    pub filter: DateRangeFilter,
    pub publication: PublicationState,
    pub date_field: DateField,
    pub content_type: Option<String>,
}

impl StatsQuery {
    pub fn new(filter: DateRangeFilter, publication: PublicationState) -> Self {
        Self {
            filter,
            publication,
            date_field: DateField::Created,
            content_type: None,
        }
    }

    pub fn with_date_field(mut self, date_field: DateField) -> Self {
        self.date_field = date_field;
        self
    }

    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }
}
