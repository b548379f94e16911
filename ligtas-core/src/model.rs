//! Frozen soil-acidity classifier.
//!
//! Loads a gradient-boosted ensemble of oblivious (symmetric) trees exported
//! by CatBoost as JSON and evaluates it in pure Rust. Training happens
//! offline; this module only handles inference.
//!
//! # Evaluation
//!
//! Every tree of depth `d` applies the same `d` float splits to a sample and
//! reads one of `2^d` leaves: bit `j` of the leaf index is set when the value
//! at split `j` is strictly greater than its border. Leaf values are summed
//! across trees per output dimension, then scaled and biased.
//!
//! - one dimension: binary log-odds, positive class when the score is > 0
//! - `k` dimensions: one score per class, softmax + argmax
//!
//! ```text
//! let model = SoilModel::load("models/soil_acidity_model_v3.json")?;
//! let prediction = model.predict(features.as_slice())?;
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LigtasError, Result};
use crate::features::FEATURE_NAMES;

/// Deepest tree accepted (2^16 leaves per dimension)
const MAX_TREE_DEPTH: usize = 16;

#[derive(Debug, Deserialize)]
struct RawModel {
    #[serde(default)]
    model_info: Option<RawModelInfo>,
    features_info: RawFeaturesInfo,
    oblivious_trees: Vec<RawTree>,
    #[serde(default)]
    scale_and_bias: Option<(f64, Vec<f64>)>,
}

#[derive(Debug, Deserialize)]
struct RawModelInfo {
    #[serde(default)]
    class_params: Option<RawClassParams>,
}

#[derive(Debug, Deserialize)]
struct RawClassParams {
    #[serde(default)]
    class_names: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawFeaturesInfo {
    #[serde(default)]
    float_features: Vec<RawFloatFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFloatFeature {
    flat_feature_index: usize,
    #[serde(default)]
    feature_index: Option<usize>,
    #[serde(default)]
    feature_id: Option<String>,
    #[serde(default)]
    nan_value_treatment: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTree {
    splits: Vec<RawSplit>,
    leaf_values: Vec<f64>,
    #[serde(default)]
    leaf_weights: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct RawSplit {
    #[serde(default)]
    float_feature_index: Option<usize>,
    #[serde(default)]
    border: Option<f64>,
    #[serde(default)]
    split_type: Option<String>,
}

/// A float feature the model reads.
#[derive(Debug, Clone)]
struct FloatFeature {
    /// Position among float features, as referenced by splits
    index: usize,
    /// Slot in the input vector
    flat_index: usize,
    name: Option<String>,
    nan_as_true: bool,
}

/// One `value > border` test.
#[derive(Debug, Clone)]
pub struct Split {
    /// Slot in the input vector
    pub feature: usize,
    pub border: f64,
    nan_as_true: bool,
}

impl Split {
    fn passes(&self, value: f64) -> bool {
        if value.is_nan() {
            return self.nan_as_true;
        }
        value > self.border
    }
}

/// Symmetric tree: the same split applies at every node of a level.
#[derive(Debug, Clone)]
pub struct ObliviousTree {
    splits: Vec<Split>,
    leaf_values: Vec<f64>,
    leaf_weights: Vec<f64>,
}

impl ObliviousTree {
    pub fn depth(&self) -> usize {
        self.splits.len()
    }

    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    /// Leaf values, `dimension` consecutive entries per leaf
    pub fn leaf_values(&self) -> &[f64] {
        &self.leaf_values
    }

    /// Training weights per leaf (empty when the export omitted them)
    pub fn leaf_weights(&self) -> &[f64] {
        &self.leaf_weights
    }

    fn leaf_index(&self, features: &[f64]) -> usize {
        self.splits
            .iter()
            .enumerate()
            .fold(0usize, |idx, (level, split)| {
                idx | (usize::from(split.passes(features[split.feature])) << level)
            })
    }
}

/// Class name with the numeric value stored for a farm
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassLabel {
    pub name: String,
    pub value: f64,
}

/// Result of evaluating the model on one sample
#[derive(Debug, Clone, Serialize)]
pub struct ClassPrediction {
    pub class_index: usize,
    pub label: ClassLabel,
    /// Per-class probabilities, summing to 1
    pub probabilities: Vec<f64>,
    /// Scaled and biased scores, one per dimension
    pub raw_scores: Vec<f64>,
}

impl ClassPrediction {
    /// Probability of the predicted class
    pub fn confidence(&self) -> f64 {
        self.probabilities
            .get(self.class_index)
            .copied()
            .unwrap_or(0.0)
    }
}

/// Loaded oblivious-tree classifier.
#[derive(Debug, Clone)]
pub struct SoilModel {
    trees: Vec<ObliviousTree>,
    features: Vec<FloatFeature>,
    n_features: usize,
    dimension: usize,
    scale: f64,
    bias: Vec<f64>,
    class_labels: Vec<ClassLabel>,
}

impl SoilModel {
    /// Read and validate a JSON model from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LigtasError::ModelNotFound {
                path: path.to_path_buf(),
            });
        }

        let text = fs::read_to_string(path)?;
        let model = Self::from_json(&text)?;

        tracing::info!(
            path = %path.display(),
            trees = model.n_trees(),
            features = model.n_features(),
            classes = model.n_classes(),
            "model loaded"
        );
        Ok(model)
    }

    /// Parse and validate a JSON model.
    ///
    /// # Errors
    ///
    /// `Json` when the document does not have the expected shape,
    /// `ModelFormat` when it parses but cannot be evaluated.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawModel =
            serde_json::from_str(text).map_err(|e| LigtasError::json("model file", e))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawModel) -> Result<Self> {
        if raw.oblivious_trees.is_empty() {
            return Err(LigtasError::model_format("model has no trees"));
        }

        let features: Vec<FloatFeature> = raw
            .features_info
            .float_features
            .into_iter()
            .enumerate()
            .map(|(pos, f)| -> Result<FloatFeature> {
                let nan_as_true = match f.nan_value_treatment.as_deref() {
                    None | Some("AsIs") | Some("AsFalse") => Ok(false),
                    Some("AsTrue") => Ok(true),
                    Some(other) => Err(LigtasError::model_format(format!(
                        "unsupported nan_value_treatment '{other}'"
                    ))),
                }?;
                Ok(FloatFeature {
                    index: f.feature_index.unwrap_or(pos),
                    flat_index: f.flat_feature_index,
                    name: f.feature_id,
                    nan_as_true,
                })
            })
            .collect::<Result<_>>()?;

        let n_features = features
            .iter()
            .map(|f| f.flat_index + 1)
            .max()
            .unwrap_or(0);

        let mut dimension = None;
        let mut trees = Vec::with_capacity(raw.oblivious_trees.len());

        for (tree_idx, tree) in raw.oblivious_trees.into_iter().enumerate() {
            let depth = tree.splits.len();
            if depth > MAX_TREE_DEPTH {
                return Err(LigtasError::model_format(format!(
                    "tree {tree_idx} has depth {depth}, max is {MAX_TREE_DEPTH}"
                )));
            }

            let leaves = 1usize << depth;
            if tree.leaf_values.is_empty() || tree.leaf_values.len() % leaves != 0 {
                return Err(LigtasError::model_format(format!(
                    "tree {tree_idx} has {} leaf values for {leaves} leaves",
                    tree.leaf_values.len()
                )));
            }

            let tree_dim = tree.leaf_values.len() / leaves;
            match dimension {
                None => dimension = Some(tree_dim),
                Some(d) if d != tree_dim => {
                    return Err(LigtasError::model_format(format!(
                        "tree {tree_idx} has dimension {tree_dim}, expected {d}"
                    )));
                }
                Some(_) => {}
            }

            if !tree.leaf_weights.is_empty() && tree.leaf_weights.len() != leaves {
                return Err(LigtasError::model_format(format!(
                    "tree {tree_idx} has {} leaf weights for {leaves} leaves",
                    tree.leaf_weights.len()
                )));
            }

            let splits = tree
                .splits
                .into_iter()
                .map(|s| resolve_split(&features, tree_idx, s))
                .collect::<Result<Vec<_>>>()?;

            trees.push(ObliviousTree {
                splits,
                leaf_values: tree.leaf_values,
                leaf_weights: tree.leaf_weights,
            });
        }

        let dimension = dimension.unwrap_or(1);

        let (scale, bias) = raw.scale_and_bias.unwrap_or((1.0, Vec::new()));
        let bias = match bias.len() {
            0 => vec![0.0; dimension],
            n if n == dimension => bias,
            n => {
                return Err(LigtasError::model_format(format!(
                    "bias has {n} entries for dimension {dimension}"
                )));
            }
        };

        let n_classes = if dimension == 1 { 2 } else { dimension };
        let class_names = raw
            .model_info
            .and_then(|info| info.class_params)
            .map(|params| params.class_names)
            .unwrap_or_default();
        let class_labels = build_class_labels(class_names, n_classes)?;

        Ok(Self {
            trees,
            features,
            n_features,
            dimension,
            scale,
            bias,
            class_labels,
        })
    }

    /// Scaled and biased scores, one per output dimension.
    pub fn raw_scores(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.n_features {
            return Err(LigtasError::FeatureCount {
                expected: self.n_features,
                actual: features.len(),
            });
        }

        let mut sums = vec![0.0; self.dimension];
        for tree in &self.trees {
            let leaf = tree.leaf_index(features);
            let values = &tree.leaf_values[leaf * self.dimension..(leaf + 1) * self.dimension];
            for (sum, v) in sums.iter_mut().zip(values) {
                *sum += v;
            }
        }

        Ok(sums
            .into_iter()
            .zip(&self.bias)
            .map(|(sum, b)| self.scale * sum + b)
            .collect())
    }

    /// Classify a single sample.
    pub fn predict(&self, features: &[f64]) -> Result<ClassPrediction> {
        let raw_scores = self.raw_scores(features)?;

        let (class_index, probabilities) = if self.dimension == 1 {
            let p = sigmoid(raw_scores[0]);
            (usize::from(raw_scores[0] > 0.0), vec![1.0 - p, p])
        } else {
            let probabilities = softmax(&raw_scores);
            let class_index = probabilities
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.total_cmp(b))
                .map(|(i, _)| i)
                .unwrap_or(0);
            (class_index, probabilities)
        };

        Ok(ClassPrediction {
            class_index,
            label: self.class_labels[class_index].clone(),
            probabilities,
            raw_scores,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Length of the input vector the model reads
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.class_labels.len()
    }

    /// Output dimensions per leaf (1 for binary models)
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn trees(&self) -> &[ObliviousTree] {
        &self.trees
    }

    pub fn class_labels(&self) -> &[ClassLabel] {
        &self.class_labels
    }

    /// Display name for an input slot.
    ///
    /// Prefers the name stored in the model, then the service's own feature
    /// naming, then `f<slot>`.
    pub fn feature_name(&self, flat_index: usize) -> String {
        self.features
            .iter()
            .find(|f| f.flat_index == flat_index)
            .and_then(|f| f.name.clone())
            .filter(|name| !name.is_empty())
            .or_else(|| FEATURE_NAMES.get(flat_index).map(|s| (*s).to_owned()))
            .unwrap_or_else(|| format!("f{flat_index}"))
    }
}

fn resolve_split(features: &[FloatFeature], tree_idx: usize, split: RawSplit) -> Result<Split> {
    if let Some(kind) = split.split_type.as_deref() {
        if kind != "FloatFeature" {
            return Err(LigtasError::model_format(format!(
                "tree {tree_idx} uses unsupported split type '{kind}'"
            )));
        }
    }

    let (Some(index), Some(border)) = (split.float_feature_index, split.border) else {
        return Err(LigtasError::model_format(format!(
            "tree {tree_idx} has a split without float_feature_index/border"
        )));
    };

    let feature = features.iter().find(|f| f.index == index).ok_or_else(|| {
        LigtasError::model_format(format!(
            "tree {tree_idx} splits on unknown float feature {index}"
        ))
    })?;

    Ok(Split {
        feature: feature.flat_index,
        border,
        nan_as_true: feature.nan_as_true,
    })
}

fn build_class_labels(names: Vec<serde_json::Value>, n_classes: usize) -> Result<Vec<ClassLabel>> {
    if names.is_empty() {
        return Ok((0..n_classes)
            .map(|i| ClassLabel {
                name: i.to_string(),
                value: i as f64,
            })
            .collect());
    }

    if names.len() != n_classes {
        return Err(LigtasError::model_format(format!(
            "{} class names for {n_classes} classes",
            names.len()
        )));
    }

    Ok(names
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let (name, numeric) = match name {
                serde_json::Value::Number(n) => (n.to_string(), n.as_f64()),
                serde_json::Value::String(s) => {
                    let numeric = s.trim().parse::<f64>().ok();
                    (s, numeric)
                }
                other => (other.to_string(), None),
            };
            ClassLabel {
                name,
                value: numeric.filter(|v| v.is_finite()).unwrap_or(i as f64),
            }
        })
        .collect())
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exp: Vec<f64> = scores.iter().map(|&s| (s - max).exp()).collect();
    let sum: f64 = exp.iter().sum();
    exp.into_iter().map(|e| e / sum).collect()
}
