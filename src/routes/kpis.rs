// src/routes/kpis.rs

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Location;
use crate::history::{self, Period};
use crate::metrics;
use crate::models::{KpiReport, SheetSource};
use crate::AppState;

use super::{bad_request, cached_table};

#[derive(Deserialize)]
pub struct KpiQ {
    pub location: Option<String>,
    pub period: Option<String>, // today (default) | mtd | all
    pub on: Option<NaiveDate>,  // override "today" for reproducible cards
}

#[derive(Serialize)]
pub struct LocationCards {
    pub period: &'static str,
    /// Business day the `today` cards resolved to, after weekend/holiday
    /// fallback. Absent for mtd/all.
    pub as_of: Option<NaiveDate>,
    pub kpis: KpiReport,
}

/// GET /api/v1/kpis — current card values, one entry per location, all five
/// KPIs each. One fetch per tab per location; the two money KPIs share the
/// EOD fetch and the three front-desk KPIs share the other.
pub async fn get_kpis(
    State(state): State<AppState>,
    Query(q): Query<KpiQ>,
) -> Result<Json<BTreeMap<String, LocationCards>>, (StatusCode, String)> {
    let period: Period = q
        .period
        .as_deref()
        .unwrap_or("today")
        .parse()
        .map_err(bad_request)?;
    let today = q.on.unwrap_or_else(|| Utc::now().date_naive());

    let targets: Vec<Location> = match &q.location {
        Some(name) => {
            let loc = state.cfg.location(name).ok_or((
                StatusCode::NOT_FOUND,
                format!("unknown location '{name}'"),
            ))?;
            vec![loc.clone()]
        }
        None => state.cfg.locations.clone(),
    };

    let mut cards = BTreeMap::new();
    for loc in targets {
        let eod = cached_table(&state, &loc.range_for(SheetSource::DailyOps)).await;
        let front = cached_table(&state, &loc.range_for(SheetSource::FrontDesk)).await;

        // Each tab falls back to its own most recent business day; the desk
        // sometimes lags the EOD tab by a day.
        let as_of = match period {
            Period::Today => history::latest_business_day(&eod, today)
                .into_iter()
                .chain(history::latest_business_day(&front, today))
                .max(),
            _ => None,
        };

        let eod_scope = history::scope_rows(&eod, period, today);
        let front_scope = history::scope_rows(&front, period, today);

        cards.insert(
            loc.name.clone(),
            LocationCards {
                period: period.as_str(),
                as_of,
                kpis: metrics::card_report(&eod_scope, &front_scope),
            },
        );
    }
    Ok(Json(cards))
}
