use super::StatsMaker;
use crate::aggregate::combine_series;
use crate::models::{Category, DateField, Entity, StatsPayload, StatsResult};
use crate::source::StatsSource;

impl<S: StatsSource + ?Sized> StatsMaker<'_, S> {
    pub fn dataset_count(&self) -> StatsResult {
        self.count_of("dataset count", Entity::Dataset)
    }

    /// Datasets created each month
    pub fn dataset_counts_by_month(&self) -> StatsResult {
        self.monthly("dataset count by create date", Entity::Dataset, DateField::Created)
    }

    /// Datasets published each month. Drafts have no publication date and
    /// never appear.
    pub fn dataset_counts_by_publication_date(&self) -> StatsResult {
        self.monthly(
            "dataset count by publication date",
            Entity::Dataset,
            DateField::Published,
        )
    }

    /// Datasets by month of their last modification. Only the latest
    /// modification of each dataset is known.
    pub fn dataset_counts_by_modification_date(&self) -> StatsResult {
        self.monthly(
            "dataset count by modification date",
            Entity::Dataset,
            DateField::Modified,
        )
    }

    pub fn dataset_subject_counts(&self) -> StatsResult {
        self.breakdown("dataset subject counts", Entity::Dataset, Category::Subject, None)
    }

    /// Creation-date series joined with the publication-date series month by
    /// month, covering every month either series touches.
    pub fn dataset_counts_by_create_and_publication_date(&self) -> StatsResult {
        self.run("dataset count by create and publication date", || {
            let query = self.query()?;
            let sort_order = query.filter.sort_order();
            let created_query = query.clone().with_date_field(DateField::Created);
            let published_query = query.with_date_field(DateField::Published);

            let (created, created_trace) = self.month_series(Entity::Dataset, &created_query)?;
            let (published, published_trace) =
                self.month_series(Entity::Dataset, &published_query)?;

            let combined = combine_series(&created, &published, sort_order);
            let trace = match (created_trace, published_trace) {
                (Some(a), Some(b)) => Some(format!("{}\n{}", a, b)),
                (a, b) => a.or(b),
            };
            Ok((StatsPayload::Combined(combined), trace))
        })
    }
}
