// src/routes/mod.rs

use axum::http::StatusCode;

use crate::models::SheetTable;
use crate::AppState;

pub mod health;
pub mod history;
pub mod kpis;
pub mod locations;

// Common error mappers
pub fn internal_error<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, format!("internal error: {e}"))
}

pub fn bad_request(msg: impl Into<String>) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, msg.into())
}

/// One fetch per distinct range per cache window. The kpis and history routes
/// both read through here, so KPIs that share a tab share the fetch.
pub async fn cached_table(state: &AppState, range: &str) -> SheetTable {
    if let Some(table) = state.cache.get(range) {
        return table;
    }
    let table = state.sheets.table_or_empty(range).await;
    // A failed fetch has no header; don't pin the outage for a whole TTL.
    if !table.headers.is_empty() {
        state.cache.put(range, table.clone());
    }
    table
}
