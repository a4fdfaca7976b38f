use super::StatsMaker;
use crate::models::{Category, DateField, Entity, StatsResult};
use crate::source::StatsSource;

impl<S: StatsSource + ?Sized> StatsMaker<'_, S> {
    pub fn file_count(&self) -> StatsResult {
        self.count_of("file count", Entity::Datafile)
    }

    /// Files created each month
    pub fn file_counts_by_month(&self) -> StatsResult {
        self.monthly("file count by month", Entity::Datafile, DateField::Created)
    }

    /// Downloads each month. The publication state applies to the
    /// downloaded file.
    pub fn file_downloads_by_month(&self) -> StatsResult {
        self.monthly("file downloads by month", Entity::FileDownload, DateField::Created)
    }

    pub fn file_content_type_counts(&self) -> StatsResult {
        self.breakdown(
            "file content type counts",
            Entity::Datafile,
            Category::ContentType,
            None,
        )
    }

    /// File extensions, restricted to the request's `ctype` when given.
    pub fn file_extensions_within_type(&self) -> StatsResult {
        self.breakdown(
            "file extensions within type",
            Entity::Datafile,
            Category::Extension,
            self.content_type(),
        )
    }
}
