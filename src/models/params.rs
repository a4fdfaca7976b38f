use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::models::common::{deserialize_optional_param, optional_param};
use crate::models::{DateRangeFilter, PublicationState, SortOrder};
use crate::validation;

/// Raw stats request parameters, as they arrive from a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsParams {
    #[serde(default, deserialize_with = "deserialize_optional_param")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_param")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_param")]
    pub selected_year: Option<String>,
    /// "a" ascending (default), "d" descending
    #[serde(default, deserialize_with = "deserialize_optional_param")]
    pub time_sort: Option<String>,
    /// "published" (default), "unpublished" or "all"
    #[serde(default, deserialize_with = "deserialize_optional_param")]
    pub pub_state: Option<String>,
    /// Content type, e.g. "text/plain"
    #[serde(default, deserialize_with = "deserialize_optional_param")]
    pub ctype: Option<String>,
}

impl StatsParams {
    pub fn from_query_string(query: &str) -> Result<Self, serde_qs::Error> {
        serde_qs::from_str(query.trim_start_matches('?'))
    }

    /// Apply the query-string rules to values built by hand: trim them and
    /// drop blank ones.
    pub fn normalized(self) -> Self {
        let clean = |value: Option<String>| value.as_deref().and_then(optional_param);
        Self {
            start_date: clean(self.start_date),
            end_date: clean(self.end_date),
            selected_year: clean(self.selected_year),
            time_sort: clean(self.time_sort),
            pub_state: clean(self.pub_state),
            ctype: clean(self.ctype),
        }
    }

    pub fn validate(&self) -> Result<DateRangeFilter, ValidationError> {
        let filter = validation::validate(
            self.start_date.as_deref(),
            self.end_date.as_deref(),
            self.selected_year.as_deref(),
        )?;
        Ok(filter.with_sort_order(SortOrder::from_param(self.time_sort.as_deref())))
    }

    pub fn publication_state(&self) -> PublicationState {
        PublicationState::from_param(self.pub_state.as_deref())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.ctype.as_deref()
    }
}
