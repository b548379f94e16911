//! Baseline table endpoint

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde::Serialize;

use ligtas_core::{LocationCode, BASELINE_FIELDS};

use crate::http::server::AppState;

#[derive(Serialize)]
pub struct LocationEntry {
    pub code: LocationCode,
    /// Values in `fields` order
    pub baseline: [f64; 9],
}

#[derive(Serialize)]
pub struct LocationsResponse {
    pub fields: [&'static str; 9],
    pub locations: Vec<LocationEntry>,
}

/// GET /locations
async fn list_locations() -> Json<LocationsResponse> {
    Json(LocationsResponse {
        fields: BASELINE_FIELDS,
        locations: LocationCode::all()
            .into_iter()
            .map(|code| LocationEntry {
                code,
                baseline: *code.baseline(),
            })
            .collect(),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/locations", get(list_locations))
}
