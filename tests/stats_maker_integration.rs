//! End-to-end metric tests over an in-memory record set
//!
//! The fixture holds a small repository: dataverses created from 2015-04 to
//! 2016-07, datasets with and without publication dates, files of two content
//! types and a handful of downloads.

use chrono::NaiveDate;
use serde_json::json;

use miniverse_stats::models::{Entity, StatsPayload};
use miniverse_stats::source::{EntityRecord, MemorySource};
use miniverse_stats::{FailureKind, PublicationState, StatsMaker, StatsParams, StatsResult};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn record(entity: Entity, created: NaiveDate, published: Option<NaiveDate>) -> EntityRecord {
    EntityRecord {
        published,
        ..EntityRecord::new(entity, created)
    }
}

fn fixture() -> MemorySource {
    let mut records = Vec::new();

    // Dataverses: 3 published in 2015, then 5 in Jan 2016 and 2 in Mar 2016,
    // plus one draft in Feb 2016.
    for day in 1..=3 {
        let mut dv = record(Entity::Dataverse, date(2015, 4, day), Some(date(2015, 5, 1)));
        dv.affiliation = Some("Harvard University".to_string());
        dv.dataverse_type = Some("RESEARCH_PROJECTS".to_string());
        records.push(dv);
    }
    for day in 1..=5 {
        let mut dv = record(Entity::Dataverse, date(2016, 1, day), Some(date(2016, 1, 20)));
        dv.affiliation = Some(if day <= 3 { "MIT" } else { "Harvard University" }.to_string());
        dv.dataverse_type = Some("RESEARCHERS".to_string());
        records.push(dv);
    }
    for day in 1..=2 {
        records.push(record(Entity::Dataverse, date(2016, 3, day), Some(date(2016, 3, 10))));
    }
    records.push(record(Entity::Dataverse, date(2016, 2, 14), None));

    // Datasets
    let mut ds = record(Entity::Dataset, date(2015, 6, 1), Some(date(2015, 8, 2)));
    ds.subjects = vec!["Social Sciences".to_string(), "Law".to_string()];
    records.push(ds);
    let mut ds = record(Entity::Dataset, date(2015, 6, 9), None);
    ds.subjects = vec!["Social Sciences".to_string()];
    records.push(ds);
    let mut ds = record(Entity::Dataset, date(2015, 9, 1), Some(date(2015, 9, 5)));
    ds.subjects = vec!["Social Sciences".to_string()];
    ds.modified = Some(date(2016, 1, 3));
    records.push(ds);

    // Files: 147 text/plain, 182 image/jpeg
    for i in 0..329 {
        let (content_type, extension) = if i < 147 {
            ("text/plain", if i % 3 == 0 { "csv" } else { "txt" })
        } else {
            ("image/jpeg", "jpg")
        };
        let mut file = record(Entity::Datafile, date(2015, 10, 1 + (i % 28) as u32), Some(date(2015, 12, 1)));
        file.content_type = Some(content_type.to_string());
        file.extension = Some(extension.to_string());
        records.push(file);
    }

    // Downloads
    for (month, count) in [(6, 2), (7, 4), (9, 6), (11, 1)] {
        for _ in 0..count {
            records.push(record(Entity::FileDownload, date(2015, month, 15), Some(date(2015, 5, 1))));
        }
    }

    MemorySource::new(records)
}

fn params(query: &str) -> StatsParams {
    StatsParams::from_query_string(query).unwrap()
}

fn months(result: &StatsResult) -> Vec<serde_json::Value> {
    match result.payload() {
        Some(StatsPayload::Months(records)) => records
            .iter()
            .map(|r| serde_json::to_value(r).unwrap())
            .collect(),
        other => panic!("expected a month series, got {:?}", other),
    }
}

#[test]
fn dataverse_counts_by_publication_state() {
    let source = fixture();

    let published = StatsMaker::new(&source, &params("")).dataverse_count();
    assert_eq!(published.payload(), Some(&StatsPayload::Count(10)));

    let unpublished = StatsMaker::new(&source, &params("pub_state=unpublished")).dataverse_count();
    assert_eq!(unpublished.payload(), Some(&StatsPayload::Count(1)));

    let all = StatsMaker::new(&source, &params("pub_state=all")).dataverse_count();
    assert_eq!(all.payload(), Some(&StatsPayload::Count(11)));

    let overridden = StatsMaker::new(&source, &params("pub_state=all"))
        .with_publication_state(PublicationState::Unpublished)
        .dataverse_count();
    assert_eq!(overridden.payload(), Some(&StatsPayload::Count(1)));
}

#[test]
fn dataverse_monthly_for_selected_year_is_seeded() {
    let source = fixture();
    let result = StatsMaker::new(&source, &params("selected_year=2016")).dataverse_counts_by_month();
    let series = months(&result);

    assert_eq!(series.len(), 2);
    assert_eq!(
        series[0],
        json!({
            "cnt": 5,
            "month_name": "Jan",
            "month_num": 1,
            "running_total": 8,
            "year_num": 2016,
            "yyyy_mm": "2016-01"
        })
    );
    assert_eq!(series[1]["yyyy_mm"], "2016-03");
    assert_eq!(series[1]["running_total"], 10);
}

#[test]
fn dataverse_monthly_all_states_from_zero() {
    let source = fixture();
    let result = StatsMaker::new(&source, &params("pub_state=all")).dataverse_counts_by_month();
    let series = months(&result);

    let keys: Vec<&str> = series.iter().map(|m| m["yyyy_mm"].as_str().unwrap()).collect();
    assert_eq!(keys, vec!["2015-04", "2016-01", "2016-02", "2016-03"]);
    assert_eq!(series[0]["running_total"], 3);
    assert_eq!(series[3]["running_total"], 11);
}

#[test]
fn descending_sort_walks_latest_first() {
    let source = fixture();
    let result =
        StatsMaker::new(&source, &params("pub_state=all&time_sort=d")).dataverse_counts_by_month();
    let series = months(&result);

    assert_eq!(series[0]["yyyy_mm"], "2016-03");
    assert_eq!(series[0]["running_total"], 2);
    assert_eq!(series[3]["yyyy_mm"], "2015-04");
    assert_eq!(series[3]["running_total"], 11);
}

#[test]
fn gap_filling_inserts_empty_months() {
    let source = fixture();
    let maker = StatsMaker::new(&source, &params("selected_year=2016")).with_month_gaps(true);
    let series = months(&maker.dataverse_counts_by_month());

    let keys: Vec<&str> = series.iter().map(|m| m["yyyy_mm"].as_str().unwrap()).collect();
    assert_eq!(keys, vec!["2016-01", "2016-02", "2016-03"]);
    assert_eq!(series[1]["cnt"], 0);
    assert_eq!(series[1]["running_total"], 8);
}

#[test]
fn downloads_within_date_window() {
    let source = fixture();
    let result = StatsMaker::new(&source, &params("start_date=2015-05-30&end_date=2015-10-01"))
        .file_downloads_by_month();
    let series = months(&result);

    assert_eq!(series.len(), 3);
    let last = series.last().unwrap();
    assert_eq!(last["yyyy_mm"], "2015-09");
    assert_eq!(last["month_name"], "Sep");
    assert_eq!(last["cnt"], 6);
    assert_eq!(last["running_total"], 12);

    let unpublished = StatsMaker::new(
        &source,
        &params("start_date=2015-02-01&end_date=2015-11-01&pub_state=unpublished"),
    )
    .file_downloads_by_month();
    assert!(months(&unpublished).is_empty());
}

#[test]
fn file_content_type_breakdown() {
    let source = fixture();
    let result = StatsMaker::new(&source, &params("")).file_content_type_counts();
    let envelope = result.to_envelope(false);

    assert_eq!(envelope["status"], "OK");
    assert_eq!(envelope["data"]["count"], 2);
    let records = &envelope["data"]["records"];
    assert_eq!(records[0]["label"], "image/jpeg");
    assert_eq!(records[0]["total_count"], 329);
    assert_eq!(records[0]["percent_string"], "55.3%");
    assert_eq!(records[1]["label"], "text/plain");
    assert_eq!(records[1]["cnt"], 147);
}

#[test]
fn file_extensions_restricted_to_content_type() {
    let source = fixture();
    let result = StatsMaker::new(&source, &params("ctype=text/plain")).file_extensions_within_type();
    let Some(StatsPayload::Categories(breakdown)) = result.payload() else {
        panic!("expected a breakdown, got {:?}", result);
    };

    let labels: Vec<&str> = breakdown.records.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["txt", "csv"]);
    assert!(breakdown.records.iter().all(|r| r.total_count == 147));
}

#[test]
fn dataset_subjects_and_affiliations() {
    let source = fixture();
    let subjects = StatsMaker::new(&source, &params("pub_state=all")).dataset_subject_counts();
    let Some(StatsPayload::Categories(breakdown)) = subjects.payload() else {
        panic!("expected a breakdown");
    };
    assert_eq!(breakdown.records[0].label, "Social Sciences");
    assert_eq!(breakdown.records[0].count, 3);
    assert_eq!(breakdown.records[0].percent_string.as_deref(), Some("75.0%"));

    let affiliations = StatsMaker::new(&source, &params("")).dataverse_affiliation_counts();
    let Some(StatsPayload::Categories(breakdown)) = affiliations.payload() else {
        panic!("expected a breakdown");
    };
    assert_eq!(breakdown.records[0].label, "Harvard University");
    assert_eq!(breakdown.records[0].count, 5);
    assert_eq!(breakdown.records[1].label, "MIT");
}

#[test]
fn dataset_created_and_published_series() {
    let source = fixture();
    let result = StatsMaker::new(&source, &params("")).dataset_counts_by_create_and_publication_date();
    let Some(StatsPayload::Combined(series)) = result.payload() else {
        panic!("expected a combined series, got {:?}", result);
    };

    let keys: Vec<&str> = series.iter().map(|r| r.created.month_key.as_str()).collect();
    assert_eq!(keys, vec!["2015-06", "2015-07", "2015-08", "2015-09"]);
    assert_eq!(series[0].created.count, 1);
    assert_eq!(series[1].created.count, 0);
    assert_eq!(series[1].created.running_total, 1);
    assert_eq!((series[2].pub_cnt, series[2].pub_running_total), (1, 1));
    assert_eq!((series[3].pub_cnt, series[3].pub_running_total), (1, 2));
    assert_eq!(series[3].created.running_total, 2);
}

#[test]
fn created_and_published_series_carries_history() {
    let mut records: Vec<EntityRecord> = (0..100)
        .map(|_| record(Entity::Dataset, date(2015, 3, 1), Some(date(2015, 4, 1))))
        .collect();
    records.push(record(Entity::Dataset, date(2015, 12, 10), Some(date(2016, 1, 5))));
    records.push(record(Entity::Dataset, date(2016, 2, 3), Some(date(2016, 2, 3))));
    let source = MemorySource::new(records);

    for query in ["start_date=2016-01-01", "selected_year=2016"] {
        let result =
            StatsMaker::new(&source, &params(query)).dataset_counts_by_create_and_publication_date();
        let Some(StatsPayload::Combined(series)) = result.payload() else {
            panic!("expected a combined series, got {:?}", result);
        };

        assert_eq!(series.len(), 2, "{}", query);
        assert_eq!(series[0].created.month_key, "2016-01");
        assert_eq!(series[0].created.count, 0);
        assert_eq!(series[0].created.running_total, 101, "{}", query);
        assert_eq!((series[0].pub_cnt, series[0].pub_running_total), (1, 101));
        assert_eq!(series[1].created.running_total, 102);
        assert_eq!((series[1].pub_cnt, series[1].pub_running_total), (1, 102));
    }
}

#[test]
fn modification_date_series() {
    let source = fixture();
    let result = StatsMaker::new(&source, &params("")).dataset_counts_by_modification_date();
    let series = months(&result);
    assert_eq!(series.len(), 1);
    assert_eq!(series[0]["yyyy_mm"], "2016-01");
}

#[test]
fn invalid_parameters_become_bad_requests() {
    let source = fixture();
    let cases = [
        ("selected_year=0", "The year cannot be zero."),
        ("selected_year=dog", "The year must be digits."),
        ("selected_year=10000", "The year cannot be more than 4-digits (YYYY)"),
        ("start_date=1968-02-31", "Start date is invalid.  Use YYYY-MM-DD format."),
        ("end_date=1968-14-01", "End date is invalid.  Use YYYY-MM-DD format."),
        (
            "start_date=2010-01-02&end_date=2010-01-01",
            "The start date cannot be after the end date.",
        ),
        (
            "start_date=2015-01-02&selected_year=2014",
            "The 'selected_year' (2014)' cannot be before the 'start_date' year (2015-01-02)",
        ),
    ];

    for (query, message) in cases {
        let result = StatsMaker::new(&source, &params(query)).file_count();
        assert_eq!(result, StatsResult::failure(FailureKind::BadRequest, message), "{}", query);
        assert_eq!(
            result.to_envelope(true),
            json!({"status": "ERROR", "message": message})
        );
    }
}

#[test]
fn debug_envelope_carries_query_trace() {
    let source = fixture();
    let result = StatsMaker::new(&source, &params("start_date=2016-01-01")).dataverse_count();

    let envelope = result.to_envelope(true);
    assert_eq!(envelope["data"], 7);
    let trace = envelope["debug"]["sql_query"].as_str().unwrap();
    assert!(trace.contains("Dataverse"));

    assert!(result.to_envelope(false).get("debug").is_none());
}
