//! Location-aware soil-acidity prediction
//!
//! Joins the baseline table with submitted measurements and runs the model.

use serde::Serialize;

use crate::error::{LigtasError, Result};
use crate::features::{FeatureVector, Measurements, FEATURE_COUNT};
use crate::location::LocationCode;
use crate::model::SoilModel;

#[derive(Debug, Clone, Serialize)]
pub struct SoilPrediction {
    pub location: LocationCode,
    /// Numeric class label, as stored on the farm record
    pub label: f64,
    pub class_name: String,
    pub class_index: usize,
    /// Probability of the predicted class
    pub probability: f64,
    pub features: FeatureVector,
}

/// Loaded once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct SoilPredictor {
    model: SoilModel,
}

impl SoilPredictor {
    /// Wrap a model that reads exactly one baseline row plus one set of measurements.
    pub fn new(model: SoilModel) -> Result<Self> {
        if model.n_features() != FEATURE_COUNT {
            return Err(LigtasError::FeatureCount {
                expected: FEATURE_COUNT,
                actual: model.n_features(),
            });
        }
        Ok(Self { model })
    }

    pub fn model(&self) -> &SoilModel {
        &self.model
    }

    pub fn predict(&self, location: LocationCode, measurements: &Measurements) -> Result<SoilPrediction> {
        let features = FeatureVector::assemble(location, measurements);
        let prediction = self.model.predict(features.as_slice())?;

        tracing::debug!(
            location = %location,
            label = prediction.label.value,
            raw = ?prediction.raw_scores,
            "soil prediction"
        );

        Ok(SoilPrediction {
            location,
            label: prediction.label.value,
            probability: prediction.confidence(),
            class_index: prediction.class_index,
            class_name: prediction.label.name,
            features,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIXTURE: &str = include_str!("../../fixtures/soil_acidity_model.json");

    fn predictor() -> SoilPredictor {
        SoilPredictor::new(SoilModel::from_json(FIXTURE).unwrap()).unwrap()
    }

    #[test]
    fn dry_low_h_plot_is_class_zero() {
        let m = Measurements {
            rainfall: 80.0,
            h: 0.05,
            ..Default::default()
        };
        let p = predictor().predict(LocationCode::Loc1, &m).unwrap();
        assert_eq!(p.label, 0.0);
        assert_eq!(p.class_name, "0");
        assert_eq!(p.location, LocationCode::Loc1);
        assert_eq!(p.features.as_slice()[0], 38.45);
        assert!(p.probability > 0.5);
    }

    #[test]
    fn wet_high_h_plot_is_class_one() {
        let m = Measurements {
            rainfall: 150.0,
            h: 0.3,
            ..Default::default()
        };
        let p = predictor().predict(LocationCode::Loc2, &m).unwrap();
        assert_eq!(p.label, 1.0);
        assert_eq!(p.class_index, 1);
    }

    #[test]
    fn baseline_changes_outcome() {
        // same measurements, different location baseline rainfall
        let m = Measurements {
            rainfall: 150.0,
            h: 0.05,
            ..Default::default()
        };
        let predictor = predictor();
        let dry = predictor.predict(LocationCode::Loc5, &m).unwrap();
        let wet = predictor.predict(LocationCode::Loc2, &m).unwrap();
        // Loc5: -1.0 + 0.5 - 0.2 = -0.7 ; Loc2: -1.0 + 1.0 - 0.2 = -0.2
        assert_eq!(dry.label, 0.0);
        assert_eq!(wet.label, 0.0);
        assert!(wet.probability < dry.probability);
    }

    #[test]
    fn rejects_models_with_other_widths() {
        let doc = json!({
            "features_info": {"float_features": [{"flat_feature_index": 0}, {"flat_feature_index": 15}]},
            "oblivious_trees": [{"splits": [{"float_feature_index": 0, "border": 0.0}], "leaf_values": [0.0, 1.0]}]
        });
        let model = SoilModel::from_json(&doc.to_string()).unwrap();
        let err = SoilPredictor::new(model).unwrap_err();
        assert!(matches!(
            err,
            LigtasError::FeatureCount {
                expected: 18,
                actual: 16
            }
        ));
    }
}
