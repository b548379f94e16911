//! Shared fixtures for route tests

use std::sync::Arc;

use axum::Router;
use ligtas_core::{SoilModel, SoilPredictor};

use super::server::{build_router, AppState, ServerConfig};
use crate::db::{create_memory_pool, migrations};

const FIXTURE_MODEL: &str = include_str!("../../../fixtures/soil_acidity_model.json");

pub(crate) fn predictor() -> SoilPredictor {
    let model = SoilModel::from_json(FIXTURE_MODEL).expect("fixture model parses");
    SoilPredictor::new(model).expect("fixture model has 18 features")
}

/// Fresh in-memory database with the schema applied
pub(crate) async fn state() -> Arc<AppState> {
    let pool = create_memory_pool().await.expect("memory pool");
    migrations::run(&pool).await.expect("migrations");
    AppState::new(pool, predictor())
}

pub(crate) async fn app() -> Router {
    build_router(state().await, &ServerConfig::default())
}

pub(crate) fn app_with(state: Arc<AppState>) -> Router {
    build_router(state, &ServerConfig::default())
}

pub(crate) async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}
