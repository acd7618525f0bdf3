// src/routes/history.rs

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::history::{build_series, carry_forward};
use crate::models::{Granularity, KpiKind, SeriesPoint};
use crate::AppState;

use super::{bad_request, cached_table, internal_error};

#[derive(Deserialize)]
pub struct HistoryQ {
    pub location: Option<String>,
    pub granularity: Option<String>, // day (default) | week | month
    pub fill: Option<String>,        // "carry" = continuous business-day index
}

#[derive(Serialize)]
pub struct SeriesResp {
    pub kpi: KpiKind,
    pub location: String,
    pub granularity: &'static str,
    pub points: Vec<SeriesPoint>,
}

/// GET /api/v1/kpis/:kpi/history — chart series for one KPI at the requested
/// granularity. Gaps stay gaps unless the caller asks for fill=carry.
pub async fn get_history(
    State(state): State<AppState>,
    Path(kpi): Path<String>,
    Query(q): Query<HistoryQ>,
) -> Result<Json<SeriesResp>, (StatusCode, String)> {
    let kind: KpiKind = kpi.parse().map_err(bad_request)?;
    let granularity: Granularity = q
        .granularity
        .as_deref()
        .unwrap_or("day")
        .parse()
        .map_err(bad_request)?;

    let loc = match &q.location {
        Some(name) => state.cfg.location(name).ok_or((
            StatusCode::NOT_FOUND,
            format!("unknown location '{name}'"),
        ))?,
        None => state
            .cfg
            .locations
            .first()
            .ok_or_else(|| internal_error("no locations configured"))?,
    };

    let table = cached_table(&state, &loc.range_for(kind.source())).await;
    let mut points = build_series(&table, kind, granularity);

    match q.fill.as_deref() {
        None => {}
        Some("carry") => {
            if granularity != Granularity::Day {
                return Err(bad_request("fill=carry only applies to granularity=day"));
            }
            points = carry_forward(points);
        }
        Some(other) => return Err(bad_request(format!("unknown fill '{other}'"))),
    }

    Ok(Json(SeriesResp {
        kpi: kind,
        location: loc.name.clone(),
        granularity: granularity.as_str(),
        points,
    }))
}
