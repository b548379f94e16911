//! Farm registry endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::db::repos::{Farm, FarmRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{ValidFarmId, ValidQuery};
use crate::http::server::AppState;
use crate::models::{Paginated, Pagination, PaginationParams};

/// GET /farms - newest first, paginated
async fn list_farms(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<PaginationParams>,
) -> Result<Json<Paginated<Farm>>, ApiError> {
    let page = Pagination::from(params);
    let result = FarmRepo::new(&state.pool).list(page).await?;
    Ok(Json(result))
}

/// GET /farms/{id}
async fn get_farm(
    State(state): State<Arc<AppState>>,
    ValidFarmId(id): ValidFarmId,
) -> Result<Json<Farm>, ApiError> {
    let farm = FarmRepo::new(&state.pool).get(id).await?;
    Ok(Json(farm))
}

/// DELETE /farms/{id}
async fn delete_farm(
    State(state): State<Arc<AppState>>,
    ValidFarmId(id): ValidFarmId,
) -> Result<StatusCode, ApiError> {
    FarmRepo::new(&state.pool).delete(id).await?;
    tracing::info!(farm_id = id, "farm deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/farms", get(list_farms))
        .route("/farms/{id}", get(get_farm).delete(delete_farm))
}
