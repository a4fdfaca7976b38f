//! Month series and category breakdown aggregation
//!
//! Rows come from a [`crate::source::StatsSource`] already filtered, grouped
//! and sorted; these functions only shape them into records.

use std::collections::BTreeMap;

use crate::calendar::{self, MonthRange};
use crate::errors::AggregateError;
use crate::models::{CategoryRecord, CombinedMonthRecord, MonthRecord, SortOrder};
use crate::source::{CategoryCountRow, MonthCountRow};

/// Build a month series with running totals, seeded with `starting_total`.
///
/// Rows are emitted in the order given. Months without rows are not
/// synthesized; see [`fill_month_gaps`].
pub fn aggregate(
    rows: &[MonthCountRow],
    starting_total: i64,
) -> Result<Vec<MonthRecord>, AggregateError> {
    let mut running_total = starting_total;
    let mut records = Vec::with_capacity(rows.len());

    for row in rows {
        let (year, month) = calendar::parse_month_key(&row.yyyy_mm)
            .ok_or_else(|| AggregateError::InvalidMonthKey(row.yyyy_mm.clone()))?;
        let month_name_short =
            calendar::month_name_short(month).ok_or(AggregateError::UnknownMonthNumber(month))?;
        if row.cnt < 0 {
            return Err(AggregateError::NegativeCount {
                month_key: row.yyyy_mm.clone(),
                count: row.cnt,
            });
        }

        running_total += row.cnt;
        records.push(MonthRecord {
            month_key: calendar::month_key(year, month),
            count: row.cnt,
            running_total,
            month_name_short: month_name_short.to_string(),
            year,
            month,
        });
    }

    Ok(records)
}

/// Build a category breakdown sorted by descending count. Ties keep their
/// input order.
pub fn aggregate_categorical(rows: &[CategoryCountRow]) -> Vec<CategoryRecord> {
    let total_count: i64 = rows.iter().map(|row| row.cnt).sum();

    let mut records: Vec<CategoryRecord> = rows
        .iter()
        .map(|row| {
            let (percent_string, percent_number) = if total_count == 0 {
                (None, None)
            } else {
                let fraction = row.cnt as f64 / total_count as f64;
                (
                    Some(format!("{:.1}%", fraction * 100.0)),
                    format!("{:.3}", fraction).parse::<f64>().ok(),
                )
            };
            CategoryRecord {
                label: row.label.clone(),
                count: row.cnt,
                total_count,
                percent_string,
                percent_number,
            }
        })
        .collect();

    records.sort_by(|a, b| b.count.cmp(&a.count));
    records
}

/// Insert zero-count records for months missing between the first and last
/// month of a series. Inserted months repeat the running total of the month
/// before them in time.
pub fn fill_month_gaps(records: Vec<MonthRecord>, sort_order: SortOrder) -> Vec<MonthRecord> {
    let (Some(first), Some(last)) = (records.first(), records.last()) else {
        return records;
    };
    let (earliest, latest) = match sort_order {
        SortOrder::Ascending => ((first.year, first.month), (last.year, last.month)),
        SortOrder::Descending => ((last.year, last.month), (first.year, first.month)),
    };

    let mut by_month: BTreeMap<(i32, u32), MonthRecord> = records
        .into_iter()
        .map(|record| ((record.year, record.month), record))
        .collect();

    // Running totals accumulate in row order, so a gap month takes the total
    // of its neighbour that was visited first.
    let range = months_in_order(earliest, latest, sort_order);
    let mut filled = Vec::with_capacity(range.len());
    let mut carried = 0;
    for key in range {
        let record = by_month
            .remove(&key)
            .unwrap_or_else(|| empty_month(key.0, key.1, carried));
        carried = record.running_total;
        filled.push(record);
    }
    filled
}

/// Monthly records together with the total they were seeded with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthSeries {
    pub records: Vec<MonthRecord>,
    pub starting_total: i64,
}

/// Merge a creation-date series with a publication-date series over the
/// union of their months, without gaps. Months before a series' first row
/// carry that series' starting total.
pub fn combine_series(
    created: &MonthSeries,
    published: &MonthSeries,
    sort_order: SortOrder,
) -> Vec<CombinedMonthRecord> {
    let created_by_month: BTreeMap<(i32, u32), &MonthRecord> = created
        .records
        .iter()
        .map(|r| ((r.year, r.month), r))
        .collect();
    let published_by_month: BTreeMap<(i32, u32), &MonthRecord> = published
        .records
        .iter()
        .map(|r| ((r.year, r.month), r))
        .collect();

    let earliest = created_by_month
        .keys()
        .next()
        .into_iter()
        .chain(published_by_month.keys().next())
        .min()
        .copied();
    let latest = created_by_month
        .keys()
        .next_back()
        .into_iter()
        .chain(published_by_month.keys().next_back())
        .max()
        .copied();
    let (Some(earliest), Some(latest)) = (earliest, latest) else {
        return Vec::new();
    };

    let range = months_in_order(earliest, latest, sort_order);
    let mut created_total = created.starting_total;
    let mut published_total = published.starting_total;
    let mut combined = Vec::with_capacity(range.len());
    for (year, month) in range {
        let created = match created_by_month.get(&(year, month)) {
            Some(record) => (*record).clone(),
            None => empty_month(year, month, created_total),
        };
        created_total = created.running_total;

        let (pub_cnt, pub_running_total) = match published_by_month.get(&(year, month)) {
            Some(record) => (record.count, record.running_total),
            None => (0, published_total),
        };
        published_total = pub_running_total;

        combined.push(CombinedMonthRecord {
            created,
            pub_cnt,
            pub_running_total,
        });
    }
    combined
}

fn empty_month(year: i32, month: u32, running_total: i64) -> MonthRecord {
    MonthRecord {
        month_key: calendar::month_key(year, month),
        count: 0,
        running_total,
        month_name_short: calendar::month_name_short(month).unwrap_or_default().to_string(),
        year,
        month,
    }
}

fn months_in_order(earliest: (i32, u32), latest: (i32, u32), sort_order: SortOrder) -> Vec<(i32, u32)> {
    let mut months: Vec<(i32, u32)> = MonthRange::new(earliest, latest).collect();
    if sort_order == SortOrder::Descending {
        months.reverse();
    }
    months
}
