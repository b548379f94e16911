//! Landing endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use ligtas_core::LocationCode;

use crate::http::server::AppState;

#[derive(Serialize)]
pub struct IndexResponse {
    pub app: &'static str,
    pub version: &'static str,
    pub locations: Vec<&'static str>,
    pub classes: Vec<String>,
}

/// GET /
async fn index(State(state): State<Arc<AppState>>) -> Json<IndexResponse> {
    Json(IndexResponse {
        app: "ligtas-ani",
        version: env!("CARGO_PKG_VERSION"),
        locations: LocationCode::all().iter().map(|c| c.as_str()).collect(),
        classes: state
            .predictor
            .model()
            .class_labels()
            .iter()
            .map(|l| l.name.clone())
            .collect(),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(index))
}
