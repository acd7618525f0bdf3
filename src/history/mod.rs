// src/history/mod.rs
//
// Historical Aggregator: buckets dated rows and re-runs the Metrics Engine
// per bucket. The practice works Monday–Saturday, so Sundays never appear in
// a series, and an empty or uncomputable bucket is a gap (None), not a zero.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::metrics;
use crate::models::{columns, Granularity, KpiKind, SeriesPoint, SheetTable};

/// Row scope for current card values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Today,
    MonthToDate,
    All,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Today => "today",
            Period::MonthToDate => "mtd",
            Period::All => "all",
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(Period::Today),
            "mtd" => Ok(Period::MonthToDate),
            "all" => Ok(Period::All),
            other => Err(format!("unknown period '{other}'")),
        }
    }
}

/// Sheet dates arrive in ISO or US form depending on who typed them.
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
        .ok()
}

pub fn is_business_day(day: NaiveDate) -> bool {
    day.weekday() != Weekday::Sun
}

/// Monday of the calendar week containing `day`.
fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_monday() as i64)
}

fn bucket_start(day: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::Day => day,
        Granularity::Week => week_start(day),
        Granularity::Month => day.with_day(1).unwrap_or(day),
    }
}

fn bucket_label(start: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Day | Granularity::Week => start.format("%Y-%m-%d").to_string(),
        Granularity::Month => start.format("%Y-%m").to_string(),
    }
}

/// Parsed business-day date of one row, if it has one.
fn row_day(row: &[String], date_col: usize) -> Option<NaiveDate> {
    let day = row.get(date_col).and_then(|cell| parse_day(cell))?;
    is_business_day(day).then_some(day)
}

/// Group rows by bucket start. Rows without a parsable date, and rows dated
/// on a non-business day, stay out of every bucket.
fn bucket_rows(
    table: &SheetTable,
    granularity: Granularity,
) -> BTreeMap<NaiveDate, Vec<Vec<String>>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<Vec<String>>> = BTreeMap::new();
    let Some(date_col) = table.column(columns::DATE) else {
        return buckets;
    };
    for row in &table.rows {
        let Some(day) = row_day(row, date_col) else {
            continue;
        };
        buckets
            .entry(bucket_start(day, granularity))
            .or_default()
            .push(row.clone());
    }
    buckets
}

/// Chart series for one KPI: one point per bucket present in the data, in
/// chronological order. Week and month values are recomputed from the
/// bucket's unioned rows — never an average of daily percentages, which would
/// double-weight slow days.
pub fn build_series(
    table: &SheetTable,
    kind: KpiKind,
    granularity: Granularity,
) -> Vec<SeriesPoint> {
    bucket_rows(table, granularity)
        .into_iter()
        .map(|(start, rows)| SeriesPoint {
            label: bucket_label(start, granularity),
            date: start,
            value: metrics::compute(kind, &table.with_rows(rows)),
        })
        .collect()
}

/// Continuous business-day index from the first to the last point, carrying
/// the previous value into days with no data. For callers that want a
/// line chart without gaps; daily granularity only.
pub fn carry_forward(series: Vec<SeriesPoint>) -> Vec<SeriesPoint> {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return series;
    };
    let (start, end) = (first.date, last.date);
    let by_date: BTreeMap<NaiveDate, Option<f64>> =
        series.iter().map(|p| (p.date, p.value)).collect();

    let mut filled = Vec::new();
    let mut carried: Option<f64> = None;
    let mut day = start;
    while day <= end {
        if is_business_day(day) {
            if let Some(value) = by_date.get(&day).copied().flatten() {
                carried = Some(value);
            }
            filled.push(SeriesPoint {
                label: bucket_label(day, Granularity::Day),
                date: day,
                value: carried,
            });
        }
        day += Duration::days(1);
    }
    filled
}

/// Most recent business day on or before `today` that has at least one row.
pub fn latest_business_day(table: &SheetTable, today: NaiveDate) -> Option<NaiveDate> {
    let date_col = table.column(columns::DATE)?;
    table
        .rows
        .iter()
        .filter_map(|row| row_day(row, date_col))
        .filter(|day| *day <= today)
        .max()
}

/// Narrow a table to the requested card period. `Today` falls back to the
/// most recent business day present when the given day has no rows —
/// Sundays, holidays, or a tab the front desk has not filled in yet.
pub fn scope_rows(table: &SheetTable, period: Period, today: NaiveDate) -> SheetTable {
    if period == Period::All {
        return table.clone();
    }
    let Some(date_col) = table.column(columns::DATE) else {
        return table.with_rows(Vec::new());
    };

    if period == Period::MonthToDate {
        let rows = table
            .rows
            .iter()
            .filter(|row| {
                row_day(row, date_col).is_some_and(|day| {
                    day.year() == today.year() && day.month() == today.month() && day <= today
                })
            })
            .cloned()
            .collect();
        return table.with_rows(rows);
    }

    // Period::Today
    let Some(target) = latest_business_day(table, today) else {
        return table.with_rows(Vec::new());
    };
    let rows = table
        .rows
        .iter()
        .filter(|row| row_day(row, date_col) == Some(target))
        .cloned()
        .collect();
    table.with_rows(rows)
}
