use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{CategoryCountRow, MonthCountRow, QueryOutput, StatsSource};
use crate::calendar;
use crate::errors::SourceError;
use crate::models::{Category, DateField, Entity, SortOrder, StatsQuery};

/// One repository object as loaded into a [`MemorySource`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub entity: Entity,
    /// Creation date; for downloads, the download date
    pub created: NaiveDate,
    #[serde(default)]
    pub published: Option<NaiveDate>,
    #[serde(default)]
    pub modified: Option<NaiveDate>,
    #[serde(default)]
    pub affiliation: Option<String>,
    #[serde(default)]
    pub dataverse_type: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
}

impl EntityRecord {
    pub fn new(entity: Entity, created: NaiveDate) -> Self {
        Self {
            entity,
            created,
            published: None,
            modified: None,
            affiliation: None,
            dataverse_type: None,
            subjects: Vec::new(),
            content_type: None,
            extension: None,
        }
    }

    pub fn is_published(&self) -> bool {
        self.published.is_some()
    }

    fn date(&self, field: DateField) -> Option<NaiveDate> {
        match field {
            DateField::Created => Some(self.created),
            DateField::Published => self.published,
            DateField::Modified => self.modified,
        }
    }

    fn labels(&self, category: Category) -> Vec<&str> {
        match category {
            Category::Affiliation => self.affiliation.as_deref().into_iter().collect(),
            Category::DataverseType => self.dataverse_type.as_deref().into_iter().collect(),
            Category::Subject => self.subjects.iter().map(String::as_str).collect(),
            Category::ContentType => self.content_type.as_deref().into_iter().collect(),
            Category::Extension => self.extension.as_deref().into_iter().collect(),
        }
    }
}

/// A [`StatsSource`] over records held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<EntityRecord>,
}

impl MemorySource {
    pub fn new(records: Vec<EntityRecord>) -> Self {
        Self { records }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records passing the entity and predicate checks, paired with the date
    /// of the query's date field. Records without that date are skipped.
    fn matching<'a>(
        &'a self,
        entity: Entity,
        query: &'a StatsQuery,
    ) -> impl Iterator<Item = (&'a EntityRecord, NaiveDate)> + 'a {
        self.records.iter().filter_map(move |record| {
            if record.entity != entity || !query.publication.matches(record.is_published()) {
                return None;
            }
            if let Some(content_type) = &query.content_type {
                if record.content_type.as_deref() != Some(content_type.as_str()) {
                    return None;
                }
            }
            record.date(query.date_field).map(|date| (record, date))
        })
    }

    fn in_window<'a>(
        &'a self,
        entity: Entity,
        query: &'a StatsQuery,
    ) -> impl Iterator<Item = (&'a EntityRecord, NaiveDate)> + 'a {
        self.matching(entity, query)
            .filter(move |(_, date)| query.filter.contains(*date))
    }
}

impl StatsSource for MemorySource {
    fn count(&self, entity: Entity, query: &StatsQuery) -> Result<QueryOutput<i64>, SourceError> {
        let count = self.in_window(entity, query).count() as i64;
        Ok(QueryOutput::new(count, Some(describe(entity, query, "count"))))
    }

    fn count_before(
        &self,
        entity: Entity,
        query: &StatsQuery,
        cutoff: NaiveDate,
    ) -> Result<i64, SourceError> {
        Ok(self
            .matching(entity, query)
            .filter(|(_, date)| *date < cutoff)
            .count() as i64)
    }

    fn counts_by_month(
        &self,
        entity: Entity,
        query: &StatsQuery,
    ) -> Result<QueryOutput<Vec<MonthCountRow>>, SourceError> {
        let mut by_month: BTreeMap<(i32, u32), i64> = BTreeMap::new();
        for (_, date) in self.in_window(entity, query) {
            *by_month.entry((date.year(), date.month())).or_insert(0) += 1;
        }

        let to_row = |((year, month), cnt): ((i32, u32), i64)| MonthCountRow {
            yyyy_mm: calendar::month_key(year, month),
            cnt,
        };
        let rows: Vec<MonthCountRow> = match query.filter.sort_order() {
            SortOrder::Ascending => by_month.into_iter().map(to_row).collect(),
            SortOrder::Descending => by_month.into_iter().rev().map(to_row).collect(),
        };

        Ok(QueryOutput::new(rows, Some(describe(entity, query, "count by month"))))
    }

    fn counts_by_category(
        &self,
        entity: Entity,
        category: Category,
        query: &StatsQuery,
    ) -> Result<QueryOutput<Vec<CategoryCountRow>>, SourceError> {
        let mut by_label: HashMap<&str, i64> = HashMap::new();
        for (record, _) in self.in_window(entity, query) {
            for label in record.labels(category) {
                *by_label.entry(label).or_insert(0) += 1;
            }
        }

        let mut rows: Vec<CategoryCountRow> = by_label
            .into_iter()
            .map(|(label, cnt)| CategoryCountRow {
                label: label.to_string(),
                cnt,
            })
            .collect();
        rows.sort_by(|a, b| b.cnt.cmp(&a.cnt).then_with(|| a.label.cmp(&b.label)));

        let grouping = format!("count by {:?}", category);
        Ok(QueryOutput::new(rows, Some(describe(entity, query, &grouping))))
    }
}

fn describe(entity: Entity, query: &StatsQuery, grouping: &str) -> String {
    let bound = |date: Option<NaiveDate>| {
        date.map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "*".to_string())
    };
    let mut trace = format!(
        "{} {:?} where {:?} in [{}, {}] and pub_state = {:?}",
        grouping,
        entity,
        query.date_field,
        bound(query.filter.lower_bound()),
        bound(query.filter.upper_bound()),
        query.publication,
    );
    if let Some(content_type) = &query.content_type {
        trace.push_str(&format!(" and content_type = {:?}", content_type));
    }
    trace
}
