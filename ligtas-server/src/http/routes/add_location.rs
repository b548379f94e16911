//! Farm submission with soil-acidity prediction
//!
//! The form posts the farm's identity plus nine soil measurements. Everything
//! is validated before anything is written; a farm at a surveyed location is
//! stored together with its prediction.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use ligtas_core::{LocationCode, Measurements, SoilPrediction};

use crate::db::repos::{Farm, FarmRepo, NewFarm};
use crate::http::error::ApiError;
use crate::http::extractors::ValidForm;
use crate::http::server::AppState;
use crate::models::{City, FarmName, LocationField};

/// Form fields, named as the submission form sends them
#[derive(Debug, Default, Deserialize)]
pub struct AddLocationForm {
    pub farm_name: Option<String>,
    pub city: Option<String>,
    pub location: Option<String>,
    pub rainfall_val: Option<String>,
    #[serde(rename = "H_val")]
    pub h_val: Option<String>,
    #[serde(rename = "Zn_val")]
    pub zn_val: Option<String>,
    #[serde(rename = "Mn_val")]
    pub mn_val: Option<String>,
    #[serde(rename = "Fe_val")]
    pub fe_val: Option<String>,
    #[serde(rename = "Cu_val")]
    pub cu_val: Option<String>,
    #[serde(rename = "P_val")]
    pub p_val: Option<String>,
    #[serde(rename = "Na_val")]
    pub na_val: Option<String>,
    #[serde(rename = "N_val")]
    pub n_val: Option<String>,
}

impl AddLocationForm {
    fn measurement(&self, field: &str) -> Option<&str> {
        let value = match field {
            "rainfall_val" => &self.rainfall_val,
            "H_val" => &self.h_val,
            "Zn_val" => &self.zn_val,
            "Mn_val" => &self.mn_val,
            "Fe_val" => &self.fe_val,
            "Cu_val" => &self.cu_val,
            "P_val" => &self.p_val,
            "Na_val" => &self.na_val,
            "N_val" => &self.n_val,
            _ => return None,
        };
        value.as_deref()
    }
}

/// How the stored prediction was reached
#[derive(Debug, Serialize)]
pub struct PredictionDetail {
    pub location: LocationCode,
    pub class_name: String,
    pub probability: f64,
}

impl From<SoilPrediction> for PredictionDetail {
    fn from(p: SoilPrediction) -> Self {
        Self {
            location: p.location,
            class_name: p.class_name,
            probability: p.probability,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddLocationResponse {
    pub prediction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farm: Option<Farm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<PredictionDetail>,
}

/// GET /add_location - empty form state
async fn add_location_form() -> Json<AddLocationResponse> {
    Json(AddLocationResponse {
        prediction: None,
        farm: None,
        detail: None,
    })
}

/// POST /add_location - record a farm and predict its soil acidity
async fn add_location(
    State(state): State<Arc<AppState>>,
    ValidForm(form): ValidForm<AddLocationForm>,
) -> Result<(StatusCode, Json<AddLocationResponse>), ApiError> {
    let farm_name = FarmName::new(form.farm_name.as_deref().unwrap_or_default())?;
    let city = City::new(form.city.as_deref())?;
    let location = LocationField::new(form.location.as_deref().unwrap_or_default())?;
    let measurements = Measurements::from_fields(|field| form.measurement(field))?;

    let prediction = match location.code() {
        Some(code) => Some(state.predictor.predict(code, &measurements)?),
        None => {
            tracing::warn!(location = %location.as_str(), "no baseline for location, storing without prediction");
            None
        }
    };

    let farm = FarmRepo::new(&state.pool)
        .create(&NewFarm {
            farm_name,
            city,
            location,
            prediction: prediction.as_ref().map(|p| p.label),
        })
        .await?;

    tracing::info!(
        farm_id = farm.id,
        location = %farm.farm_location,
        prediction = ?farm.prediction,
        "farm recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(AddLocationResponse {
            prediction: farm.prediction,
            farm: Some(farm),
            detail: prediction.map(PredictionDetail::from),
        }),
    ))
}

/// Submission routes; both slash forms are accepted
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/add_location", get(add_location_form).post(add_location))
        .route("/add_location/", get(add_location_form).post(add_location))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    #[tokio::test]
    async fn get_returns_empty_prediction() {
        let app = testing::app().await;
        let response = app
            .oneshot(Request::builder().uri("/add_location/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = testing::body_json(response).await;
        assert_eq!(body, serde_json::json!({"prediction": null}));
    }

    #[tokio::test]
    async fn post_predicts_and_stores() {
        let state = testing::state().await;
        let app = testing::app_with(state.clone());

        let response = app
            .oneshot(post(
                "/add_location/",
                "farm_name=Bukid+ni+Lola&city=Iloilo&location=Loc2&rainfall_val=150&H_val=0.3&Zn_val=0.1",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = testing::body_json(response).await;
        assert_eq!(body["prediction"], 1.0);
        assert_eq!(body["farm"]["farm_name"], "Bukid ni Lola");
        assert_eq!(body["farm"]["city"], "Iloilo");
        assert_eq!(body["farm"]["farm_location"], "Loc2");
        assert_eq!(body["detail"]["location"], "Loc2");
        assert_eq!(body["detail"]["class_name"], "1");

        let id = body["farm"]["id"].as_i64().unwrap();
        let stored = FarmRepo::new(&state.pool).get(id).await.unwrap();
        assert_eq!(stored.prediction, Some(1.0));
    }

    #[tokio::test]
    async fn missing_measurements_default_to_zero() {
        let app = testing::app().await;
        let response = app
            .oneshot(post("/add_location", "farm_name=Plot&location=Loc1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = testing::body_json(response).await;
        // all-zero measurements at Loc1: -1.0 - 0.5 - 0.2
        assert_eq!(body["prediction"], 0.0);
        assert!(body["farm"]["city"].is_null());
    }

    #[tokio::test]
    async fn unknown_location_is_stored_without_prediction() {
        let state = testing::state().await;
        let app = testing::app_with(state.clone());

        let response = app
            .oneshot(post("/add_location/", "farm_name=Elsewhere&location=Loc9&H_val=0.3"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = testing::body_json(response).await;
        assert!(body["prediction"].is_null());
        assert!(body.get("detail").is_none());
        assert_eq!(FarmRepo::new(&state.pool).count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn bad_measurement_writes_nothing() {
        let state = testing::state().await;
        let app = testing::app_with(state.clone());

        let response = app
            .oneshot(post("/add_location/", "farm_name=Plot&location=Loc1&Fe_val=rusty"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = testing::body_json(response).await;
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["message"], "Fe_val must be a number, got 'rusty'");
        assert_eq!(FarmRepo::new(&state.pool).count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_name_is_rejected() {
        let app = testing::app().await;
        let response = app
            .oneshot(post("/add_location/", "location=Loc1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = testing::body_json(response).await;
        assert_eq!(body["message"], "farm_name cannot be empty");
    }

    #[tokio::test]
    async fn post_without_form_content_type_is_json_400() {
        let state = testing::state().await;
        let app = testing::app_with(state.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/add_location/")
                    .body(Body::from("farm_name=Plot&location=Loc1"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = testing::body_json(response).await;
        assert_eq!(body["error"], "validation_error");
        assert_eq!(FarmRepo::new(&state.pool).count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn duplicate_measurement_is_rejected() {
        let state = testing::state().await;
        let app = testing::app_with(state.clone());

        let response = app
            .oneshot(post("/add_location/", "farm_name=Plot&location=Loc1&H_val=1&H_val=2"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = testing::body_json(response).await;
        assert_eq!(body["error"], "validation_error");
        assert!(body["message"].as_str().unwrap().contains("H_val"));
        assert_eq!(FarmRepo::new(&state.pool).count().await.unwrap(), 0);
    }
}
