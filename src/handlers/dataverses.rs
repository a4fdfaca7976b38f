use super::StatsMaker;
use crate::models::{Category, DateField, Entity, StatsResult};
use crate::source::StatsSource;

impl<S: StatsSource + ?Sized> StatsMaker<'_, S> {
    /// Number of dataverses in the window
    pub fn dataverse_count(&self) -> StatsResult {
        self.count_of("dataverse count", Entity::Dataverse)
    }

    /// Dataverses created each month, with running totals
    pub fn dataverse_counts_by_month(&self) -> StatsResult {
        self.monthly("dataverse count by month", Entity::Dataverse, DateField::Created)
    }

    pub fn dataverse_affiliation_counts(&self) -> StatsResult {
        self.breakdown(
            "dataverse affiliation counts",
            Entity::Dataverse,
            Category::Affiliation,
            None,
        )
    }

    pub fn dataverse_type_counts(&self) -> StatsResult {
        self.breakdown(
            "dataverse type counts",
            Entity::Dataverse,
            Category::DataverseType,
            None,
        )
    }
}
