//! The scorer collaborator: capability contract and a loadable artifact.
//!
//! The pipeline only ever talks to a [`Scorer`]. A scorer declares its input
//! layout through [`FeatureSchema`]: either an ordered list of feature names
//! (`SchemaAware`) or just a feature count (`Schemaless`). Reconciliation
//! dispatches on that variant; there is no runtime attribute probing.
//!
//! [`ForestModel`] is the bundled implementation. It loads a JSON artifact
//! exported from a trained scikit-learn estimator:
//!
//! ```json
//! {
//!   "feature_names": ["age", "time_in_hospital", "..."],
//!   "n_features": 46,
//!   "estimator": {
//!     "type": "random_forest",
//!     "trees": [{
//!       "children_left":  [1, -1, -1],
//!       "children_right": [2, -1, -1],
//!       "feature":        [0, -2, -2],
//!       "threshold":      [40.5, -2.0, -2.0],
//!       "value":          [[60.0, 40.0], [50.0, 10.0], [10.0, 30.0]]
//!     }]
//!   }
//! }
//! ```
//!
//! Tree arrays follow the `tree_` layout: `-1` children mark a leaf,
//! `x[feature] <= threshold` descends left, and `value` holds per-class
//! weights. `feature_names` is optional; without it the model is schemaless.
//! A `{"type": "logistic", "coefficients": [...], "intercept": b}` estimator
//! is also accepted.

use crate::error::RiskError;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Input layout a scorer declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureSchema {
    /// Ordered feature names; the count is `names.len()`.
    SchemaAware { names: Vec<String> },
    /// Only the required feature count is known.
    Schemaless { n_features: usize },
}

impl FeatureSchema {
    /// Number of values the scorer expects.
    pub fn n_features(&self) -> usize {
        match self {
            FeatureSchema::SchemaAware { names } => names.len(),
            FeatureSchema::Schemaless { n_features } => *n_features,
        }
    }

    pub fn names(&self) -> Option<&[String]> {
        match self {
            FeatureSchema::SchemaAware { names } => Some(names),
            FeatureSchema::Schemaless { .. } => None,
        }
    }
}

/// A pre-trained two-class probability model.
///
/// Implementations must be `Send + Sync`: one instance is shared read-only
/// by every concurrently handled request.
pub trait Scorer: Send + Sync {
    /// The scorer's declared input layout.
    fn schema(&self) -> &FeatureSchema;

    /// Class probabilities `[p(negative), p(positive)]` for one vector.
    ///
    /// Must fail with [`RiskError::ModelInference`] when `features.len()`
    /// differs from [`FeatureSchema::n_features`].
    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], RiskError>;
}

// ── Artifact format ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ModelArtifact {
    #[serde(default)]
    feature_names: Option<Vec<String>>,
    n_features: usize,
    estimator: Estimator,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Estimator {
    RandomForest { trees: Vec<DecisionTree> },
    Logistic { coefficients: Vec<f64>, intercept: f64 },
}

/// One fitted tree in flattened array form.
#[derive(Debug, Clone, Deserialize)]
struct DecisionTree {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<[f64; 2]>,
}

const LEAF: i64 = -1;

impl DecisionTree {
    fn validate(&self, tree_idx: usize, n_features: usize) -> Result<(), RiskError> {
        let n = self.children_left.len();
        let bad = |detail: String| RiskError::InvalidModel(format!("tree {tree_idx}: {detail}"));

        if n == 0 {
            return Err(bad("tree has no nodes".into()));
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err(bad("node arrays have different lengths".into()));
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF || right == LEAF {
                if left != right {
                    return Err(bad(format!("node {node} has exactly one child")));
                }
                let [neg, pos] = self.value[node];
                if neg < 0.0 || pos < 0.0 || !(neg + pos).is_finite() || neg + pos <= 0.0 {
                    return Err(bad(format!("leaf {node} has unusable class weights")));
                }
                continue;
            }
            // Children strictly after their parent keeps traversal acyclic.
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(bad(format!("node {node} has out-of-order child {child}")));
                }
            }
            let f = self.feature[node];
            if f < 0 || f as usize >= n_features {
                return Err(bad(format!("node {node} splits on unknown feature {f}")));
            }
        }
        Ok(())
    }

    /// Normalised class distribution of the leaf `x` lands in.
    fn leaf_distribution(&self, x: &[f64]) -> [f64; 2] {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let f = self.feature[node] as usize;
            node = if x[f] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        let [neg, pos] = self.value[node];
        let total = neg + pos;
        [neg / total, pos / total]
    }
}

/// A scorer loaded from a JSON model artifact.
#[derive(Debug, Clone)]
pub struct ForestModel {
    schema: FeatureSchema,
    estimator: Estimator,
}

impl ForestModel {
    /// Load and validate an artifact from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RiskError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| RiskError::ModelLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::from_json(&raw)?;
        info!(
            "Loaded model from {} ({} features, schema {})",
            path.display(),
            model.schema.n_features(),
            if model.schema.names().is_some() {
                "named"
            } else {
                "unnamed"
            }
        );
        Ok(model)
    }

    /// Parse and validate an artifact from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self, RiskError> {
        let artifact: ModelArtifact =
            serde_json::from_str(raw).map_err(|e| RiskError::InvalidModel(e.to_string()))?;
        Self::from_artifact(artifact)
    }

    fn from_artifact(artifact: ModelArtifact) -> Result<Self, RiskError> {
        let n = artifact.n_features;
        if n == 0 {
            return Err(RiskError::InvalidModel("n_features must be > 0".into()));
        }

        let schema = match artifact.feature_names {
            Some(names) => {
                if names.len() != n {
                    return Err(RiskError::InvalidModel(format!(
                        "{} feature names declared for {} features",
                        names.len(),
                        n
                    )));
                }
                FeatureSchema::SchemaAware { names }
            }
            None => FeatureSchema::Schemaless { n_features: n },
        };

        match &artifact.estimator {
            Estimator::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err(RiskError::InvalidModel("forest has no trees".into()));
                }
                for (i, tree) in trees.iter().enumerate() {
                    tree.validate(i, n)?;
                }
                debug!("Validated forest with {} trees", trees.len());
            }
            Estimator::Logistic { coefficients, .. } => {
                if coefficients.len() != n {
                    return Err(RiskError::InvalidModel(format!(
                        "{} coefficients for {} features",
                        coefficients.len(),
                        n
                    )));
                }
            }
        }

        Ok(Self {
            schema,
            estimator: artifact.estimator,
        })
    }
}

impl Scorer for ForestModel {
    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], RiskError> {
        let expected = self.schema.n_features();
        if features.len() != expected {
            return Err(RiskError::ModelInference(format!(
                "X has {} features, but the model is expecting {} features as input",
                features.len(),
                expected
            )));
        }

        match &self.estimator {
            Estimator::RandomForest { trees } => {
                let mut acc = [0.0f64; 2];
                for tree in trees {
                    let [neg, pos] = tree.leaf_distribution(features);
                    acc[0] += neg;
                    acc[1] += pos;
                }
                let k = trees.len() as f64;
                Ok([acc[0] / k, acc[1] / k])
            }
            Estimator::Logistic {
                coefficients,
                intercept,
            } => {
                let z: f64 = coefficients
                    .iter()
                    .zip(features)
                    .map(|(w, x)| w * x)
                    .sum::<f64>()
                    + intercept;
                let p = 1.0 / (1.0 + (-z).exp());
                Ok([1.0 - p, p])
            }
        }
    }
}
