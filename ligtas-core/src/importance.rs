//! Feature importance from the loaded model's leaves.
//!
//! For every split level of every tree, the two leaves that differ only in
//! that level's bit are merged; the weighted squared deviation of each leaf
//! from the merged value measures how much the split moves the prediction.
//! Totals are attributed to the split's input slot and scaled to sum to 100.

use serde::Serialize;

use crate::model::SoilModel;

/// Number of features reported when no count is requested
pub const DEFAULT_TOP_FEATURES: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: String,
    /// Share of total prediction change, in percent
    pub importance: f64,
}

/// Importance of every input slot, highest first.
pub fn feature_importance(model: &SoilModel) -> Vec<FeatureImportance> {
    let dim = model.dimension();
    let mut totals = vec![0.0f64; model.n_features()];

    for tree in model.trees() {
        let leaves = 1usize << tree.depth();
        let values = tree.leaf_values();
        let weights = effective_weights(tree.leaf_weights(), leaves);

        for (level, split) in tree.splits().iter().enumerate() {
            let bit = 1usize << level;
            let mut change = 0.0;

            for left in (0..leaves).filter(|leaf| leaf & bit == 0) {
                let right = left | bit;
                let (wl, wr) = (weights[left], weights[right]);
                let total = wl + wr;
                if total <= 0.0 {
                    continue;
                }
                for d in 0..dim {
                    let vl = values[left * dim + d];
                    let vr = values[right * dim + d];
                    let merged = (vl * wl + vr * wr) / total;
                    change += wl * (vl - merged).powi(2) + wr * (vr - merged).powi(2);
                }
            }

            totals[split.feature] += change;
        }
    }

    let sum: f64 = totals.iter().sum();
    let mut ranked: Vec<FeatureImportance> = totals
        .into_iter()
        .enumerate()
        .map(|(slot, value)| FeatureImportance {
            feature: model.feature_name(slot),
            importance: if sum > 0.0 { value * 100.0 / sum } else { 0.0 },
        })
        .collect();

    // stable sort keeps input order among ties
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    ranked
}

/// The `n` most important features.
pub fn top_features(model: &SoilModel, n: usize) -> Vec<FeatureImportance> {
    let mut ranked = feature_importance(model);
    ranked.truncate(n);
    ranked
}

fn effective_weights(weights: &[f64], leaves: usize) -> Vec<f64> {
    if weights.len() == leaves && weights.iter().any(|w| *w > 0.0) {
        weights.to_vec()
    } else {
        vec![1.0; leaves]
    }
}
