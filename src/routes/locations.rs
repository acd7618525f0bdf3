// src/routes/locations.rs

use axum::{extract::State, Json};
use serde::Serialize;

use crate::models::SheetSource;
use crate::AppState;

#[derive(Serialize)]
pub struct LocationResp {
    pub name: String,
    pub daily_ops_range: String,
    pub front_desk_range: String,
}

pub async fn list_locations(State(state): State<AppState>) -> Json<Vec<LocationResp>> {
    let locations = state
        .cfg
        .locations
        .iter()
        .map(|loc| LocationResp {
            name: loc.name.clone(),
            daily_ops_range: loc.range_for(SheetSource::DailyOps),
            front_desk_range: loc.range_for(SheetSource::FrontDesk),
        })
        .collect();
    Json(locations)
}
