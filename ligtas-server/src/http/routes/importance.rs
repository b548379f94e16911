//! Model feature-importance endpoint

use std::sync::Arc;

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use ligtas_core::{top_features, FeatureImportance, DEFAULT_TOP_FEATURES};

use crate::http::extractors::ValidQuery;
use crate::http::server::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ImportanceParams {
    pub top: Option<usize>,
}

#[derive(Serialize)]
pub struct ImportanceResponse {
    pub model_trees: usize,
    pub features: Vec<FeatureImportance>,
}

/// GET /model/feature-importance?top=N
async fn feature_importance(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<ImportanceParams>,
) -> Json<ImportanceResponse> {
    let model = state.predictor.model();
    let top = params.top.unwrap_or(DEFAULT_TOP_FEATURES);

    Json(ImportanceResponse {
        model_trees: model.n_trees(),
        features: top_features(model, top),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/model/feature-importance", get(feature_importance))
}
