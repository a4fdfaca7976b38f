//! Query collaborator boundary.
//!
//! A [`StatsSource`] owns query construction and execution. It hands back rows
//! already filtered by a [`StatsQuery`], grouped, and ordered by the filter's
//! sort order.

mod memory;

pub use memory::{EntityRecord, MemorySource};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::SourceError;
use crate::models::{Category, Entity, StatsQuery};

/// Count of entities in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MonthCountRow {
    /// "YYYY-MM"
    pub yyyy_mm: String,
    pub cnt: i64,
}

/// Count of entities carrying one category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CategoryCountRow {
    pub label: String,
    pub cnt: i64,
}

/// Rows returned by a source, with an optional description of the query that
/// produced them (e.g. the SQL text).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutput<T> {
    pub rows: T,
    pub trace: Option<String>,
}

impl<T> QueryOutput<T> {
    pub fn new(rows: T, trace: Option<String>) -> Self {
        Self { rows, trace }
    }
}

pub trait StatsSource {
    /// Number of entities matching the query.
    fn count(&self, entity: Entity, query: &StatsQuery) -> Result<QueryOutput<i64>, SourceError>;

    /// Number of entities matching the query's predicates whose date field
    /// falls strictly before `cutoff`. The date window itself is ignored.
    fn count_before(
        &self,
        entity: Entity,
        query: &StatsQuery,
        cutoff: NaiveDate,
    ) -> Result<i64, SourceError>;

    /// Entity counts grouped by the month of the query's date field.
    fn counts_by_month(
        &self,
        entity: Entity,
        query: &StatsQuery,
    ) -> Result<QueryOutput<Vec<MonthCountRow>>, SourceError>;

    /// Entity counts grouped by category label, largest first.
    fn counts_by_category(
        &self,
        entity: Entity,
        category: Category,
        query: &StatsQuery,
    ) -> Result<QueryOutput<Vec<CategoryCountRow>>, SourceError>;
}
