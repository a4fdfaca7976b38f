use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use miniverse_stats::config::Settings;
use miniverse_stats::source::MemorySource;
use miniverse_stats::{StatsMaker, StatsParams, StatsResult};

#[derive(Parser)]
#[command(name = "miniverse-report")]
#[command(about = "Compute Dataverse repository metrics from a JSON record file", long_about = None)]
struct Cli {
    /// Metric to compute
    #[arg(value_enum)]
    metric: Metric,

    /// JSON array of entity records
    #[arg(long, short)]
    records: PathBuf,

    /// Inclusive start date (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<String>,

    /// Inclusive end date (YYYY-MM-DD)
    #[arg(long)]
    end_date: Option<String>,

    /// Restrict to one year (YYYY)
    #[arg(long)]
    selected_year: Option<String>,

    /// published, unpublished or all
    #[arg(long)]
    pub_state: Option<String>,

    /// "a" ascending or "d" descending
    #[arg(long)]
    time_sort: Option<String>,

    /// Content type for the file extension breakdown
    #[arg(long)]
    ctype: Option<String>,

    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Metric {
    DataverseCount,
    DataverseMonthly,
    DataverseAffiliation,
    DataverseType,
    DatasetCount,
    DatasetMonthly,
    DatasetPublishedMonthly,
    DatasetModifiedMonthly,
    DatasetCreatedAndPublished,
    DatasetSubject,
    FileCount,
    FileMonthly,
    FileDownloadsMonthly,
    FileContentType,
    FileExtensions,
}

impl Metric {
    fn compute(self, maker: &StatsMaker<'_, MemorySource>) -> StatsResult {
        match self {
            Metric::DataverseCount => maker.dataverse_count(),
            Metric::DataverseMonthly => maker.dataverse_counts_by_month(),
            Metric::DataverseAffiliation => maker.dataverse_affiliation_counts(),
            Metric::DataverseType => maker.dataverse_type_counts(),
            Metric::DatasetCount => maker.dataset_count(),
            Metric::DatasetMonthly => maker.dataset_counts_by_month(),
            Metric::DatasetPublishedMonthly => maker.dataset_counts_by_publication_date(),
            Metric::DatasetModifiedMonthly => maker.dataset_counts_by_modification_date(),
            Metric::DatasetCreatedAndPublished => {
                maker.dataset_counts_by_create_and_publication_date()
            }
            Metric::DatasetSubject => maker.dataset_subject_counts(),
            Metric::FileCount => maker.file_count(),
            Metric::FileMonthly => maker.file_counts_by_month(),
            Metric::FileDownloadsMonthly => maker.file_downloads_by_month(),
            Metric::FileContentType => maker.file_content_type_counts(),
            Metric::FileExtensions => maker.file_extensions_within_type(),
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables
    dotenvy::dotenv().ok();
    let settings = Settings::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let json = fs::read_to_string(&cli.records)
        .with_context(|| format!("Failed to read records from {}", cli.records.display()))?;
    let source = MemorySource::from_json(&json)
        .with_context(|| format!("Invalid record file {}", cli.records.display()))?;
    info!("📂 Loaded {} records from {}", source.len(), cli.records.display());

    let params = StatsParams {
        start_date: cli.start_date,
        end_date: cli.end_date,
        selected_year: cli.selected_year,
        time_sort: cli.time_sort,
        pub_state: cli.pub_state,
        ctype: cli.ctype,
    }
    .normalized();
    let maker = StatsMaker::new(&source, &params).with_month_gaps(settings.fill_month_gaps);
    let result = cli.metric.compute(&maker);

    let envelope = result.envelope(settings.debug);
    let output = if cli.pretty || settings.pretty {
        serde_json::to_string_pretty(&envelope)?
    } else {
        serde_json::to_string(&envelope)?
    };
    println!("{}", output);

    if result.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        warn!("⚠️ {:?} failed with status {}", cli.metric, result.status_code());
        Ok(ExitCode::FAILURE)
    }
}
