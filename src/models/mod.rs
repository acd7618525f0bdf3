// src/models/mod.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ───────────────────────────────────────
// Raw sheet data
// ───────────────────────────────────────

/// Rectangular table fetched from one sheet range. The first fetched line is
/// the header; `rows` keep the data lines in sheet order. Immutable input to
/// every KPI computation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header lookup, case-insensitive and whitespace-trimmed — the tabs are
    /// hand-edited and drift in capitalization.
    pub fn column(&self, name: &str) -> Option<usize> {
        let want = name.trim().to_lowercase();
        self.headers
            .iter()
            .position(|h| h.trim().to_lowercase() == want)
    }

    /// Same headers, different row set. Used when narrowing to a time bucket
    /// or a card period.
    pub fn with_rows(&self, rows: Vec<Vec<String>>) -> Self {
        Self {
            headers: self.headers.clone(),
            rows,
        }
    }
}

// ───────────────────────────────────────
// Sheet column names (as the tabs label them)
// ───────────────────────────────────────

pub mod columns {
    pub const DATE: &str = "Date";

    // EOD tab
    pub const GROSS_PRODUCTION: &str = "Total Production";
    pub const ADJUSTMENTS: &str = "Adjustments"; // carries negative amounts
    pub const WRITE_OFFS: &str = "Write-Offs"; // carries negative amounts
    pub const COLLECTIONS: &str = "Total Collections";

    // Front-desk tab
    pub const NEW_PATIENTS: &str = "New Patients";
    pub const TREATMENTS_PRESENTED: &str = "Treatments Presented";
    pub const TREATMENTS_ACCEPTED: &str = "Treatments Accepted";
    pub const HYGIENE_TOTAL: &str = "Total Hygiene Appointments";
    pub const NOT_REAPPOINTED: &str = "Patients Not Reappointed";
}

// ───────────────────────────────────────
// KPI identifiers
// ───────────────────────────────────────

/// Which sheet tab a KPI reads its rows from. Each location reports on two
/// tabs, so KPIs with the same source share one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetSource {
    DailyOps,
    FrontDesk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiKind {
    ProductionTotal,
    CollectionRate,
    NewPatients,
    TreatmentAcceptance,
    HygieneReappointment,
}

impl KpiKind {
    pub const ALL: [KpiKind; 5] = [
        KpiKind::ProductionTotal,
        KpiKind::CollectionRate,
        KpiKind::NewPatients,
        KpiKind::TreatmentAcceptance,
        KpiKind::HygieneReappointment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KpiKind::ProductionTotal => "production_total",
            KpiKind::CollectionRate => "collection_rate",
            KpiKind::NewPatients => "new_patients",
            KpiKind::TreatmentAcceptance => "treatment_acceptance",
            KpiKind::HygieneReappointment => "hygiene_reappointment",
        }
    }

    pub fn source(&self) -> SheetSource {
        match self {
            KpiKind::ProductionTotal | KpiKind::CollectionRate => SheetSource::DailyOps,
            KpiKind::NewPatients
            | KpiKind::TreatmentAcceptance
            | KpiKind::HygieneReappointment => SheetSource::FrontDesk,
        }
    }
}

impl FromStr for KpiKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KpiKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown KPI '{s}'"))
    }
}

/// Chart bucket width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        }
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            other => Err(format!("unknown granularity '{other}'")),
        }
    }
}

// ───────────────────────────────────────
// DTOs helpful for endpoints
// ───────────────────────────────────────

/// Current card values for one location. `null` in the JSON means the value
/// could not be computed; the dashboard renders "data unavailable", never 0.
#[derive(Debug, Clone, Serialize)]
pub struct KpiReport {
    pub production_total: Option<f64>,
    pub collection_rate: Option<f64>,       // percent
    pub new_patients: Option<f64>,
    pub treatment_acceptance: Option<f64>,  // percent
    pub hygiene_reappointment: Option<f64>, // percent
}

/// One chart point. `date` is the bucket start; a `None` value is a gap, not
/// a zero dip.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub date: NaiveDate,
    pub value: Option<f64>,
}
