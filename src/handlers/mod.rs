//! Metric handlers.
//!
//! A [`StatsMaker`] validates request parameters once and then answers any
//! number of metric calls against a [`StatsSource`]. Every call returns its
//! own [`StatsResult`]; nothing is raised to the caller.

mod datasets;
mod dataverses;
mod files;

use std::time::Instant;

use crate::aggregate::{aggregate, aggregate_categorical, fill_month_gaps, MonthSeries};
use crate::errors::{Result, ValidationError};
use crate::models::{
    CategoryBreakdown, Category, DateField, DateRangeFilter, Entity,
    PublicationState, StatsParams, StatsPayload, StatsQuery, StatsResult,
};
use crate::source::StatsSource;

#[derive(Debug, Clone)]
struct StatsRequest {
    filter: DateRangeFilter,
    publication: PublicationState,
    content_type: Option<String>,
}

pub struct StatsMaker<'a, S: StatsSource + ?Sized> {
    source: &'a S,
    request: std::result::Result<StatsRequest, ValidationError>,
    fill_month_gaps: bool,
}

impl<'a, S: StatsSource + ?Sized> StatsMaker<'a, S> {
    pub fn new(source: &'a S, params: &StatsParams) -> Self {
        let request = params.validate().map(|filter| StatsRequest {
            filter,
            publication: params.publication_state(),
            content_type: params.content_type().map(str::to_string),
        });
        if let Err(err) = &request {
            tracing::debug!("Stats parameters rejected: {}", err);
        }

        Self {
            source,
            request,
            fill_month_gaps: false,
        }
    }

    /// Insert zero-count months into monthly series.
    pub fn with_month_gaps(mut self, fill: bool) -> Self {
        self.fill_month_gaps = fill;
        self
    }

    /// Override the publication state taken from the request.
    pub fn with_publication_state(mut self, publication: PublicationState) -> Self {
        if let Ok(request) = &mut self.request {
            request.publication = publication;
        }
        self
    }

    pub fn filter(&self) -> std::result::Result<&DateRangeFilter, &ValidationError> {
        self.request.as_ref().map(|request| &request.filter)
    }

    fn query(&self) -> Result<StatsQuery> {
        let request = self.request.as_ref().map_err(|err| err.clone())?;
        Ok(StatsQuery::new(request.filter, request.publication))
    }

    fn content_type(&self) -> Option<String> {
        self.request
            .as_ref()
            .ok()
            .and_then(|request| request.content_type.clone())
    }

    /// Run one metric, turning any error into a failed result.
    fn run<F>(&self, metric: &str, compute: F) -> StatsResult
    where
        F: FnOnce() -> Result<(StatsPayload, Option<String>)>,
    {
        let started = Instant::now();
        match compute() {
            Ok((payload, trace)) => {
                tracing::info!(
                    "📊 STATS {}: computed in {}ms",
                    metric,
                    started.elapsed().as_millis()
                );
                StatsResult::success(payload, trace)
            }
            Err(err) => StatsResult::from(err),
        }
    }

    fn count_of(&self, metric: &str, entity: Entity) -> StatsResult {
        self.run(metric, || {
            let query = self.query()?;
            let output = self.source.count(entity, &query)?;
            Ok((StatsPayload::Count(output.rows), output.trace))
        })
    }

    fn monthly(&self, metric: &str, entity: Entity, date_field: DateField) -> StatsResult {
        self.run(metric, || {
            let query = self.query()?.with_date_field(date_field);
            let (series, trace) = self.month_series(entity, &query)?;
            Ok((StatsPayload::Months(series.records), trace))
        })
    }

    fn month_series(
        &self,
        entity: Entity,
        query: &StatsQuery,
    ) -> Result<(MonthSeries, Option<String>)> {
        let output = self.source.counts_by_month(entity, query)?;
        let starting_total = match query.filter.running_total_baseline() {
            Some(cutoff) => self.source.count_before(entity, query, cutoff)?,
            None => 0,
        };

        let mut records = aggregate(&output.rows, starting_total)?;
        if self.fill_month_gaps {
            records = fill_month_gaps(records, query.filter.sort_order());
        }
        Ok((
            MonthSeries {
                records,
                starting_total,
            },
            output.trace,
        ))
    }

    fn breakdown(
        &self,
        metric: &str,
        entity: Entity,
        category: Category,
        content_type: Option<String>,
    ) -> StatsResult {
        self.run(metric, || {
            let query = self.query()?.with_content_type(content_type);
            let output = self.source.counts_by_category(entity, category, &query)?;
            let records = aggregate_categorical(&output.rows);
            Ok((StatsPayload::Categories(CategoryBreakdown::from(records)), output.trace))
        })
    }
}
