//! Random-forest classifier loaded from a JSON export.
//!
//! Each tree is a flat node list rooted at index 0. Split nodes send a sample
//! left when `x[feature] <= threshold`; leaf nodes hold per-class weights.
//! The forest averages the normalized leaf distributions and picks the
//! highest-scoring class, lowest index first on ties.

use std::path::Path;

use serde::Deserialize;

use crate::classifier::{SuitabilityClassifier, WeatherClassifier};
use crate::error::{read_json, ClassifierError, ModelLoadError};
use crate::features::{SuitabilityFeatures, WeatherFeatures};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, Deserialize)]
struct Tree {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForestModel {
    n_features: usize,
    n_classes: usize,
    trees: Vec<Tree>,
}

impl ForestModel {
    /// Load and check a forest export
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let model: Self = read_json(path)?;
        model.check().map_err(|reason| ModelLoadError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;

        tracing::info!(
            "Loaded forest from {} ({} trees, {} features, {} classes)",
            path.display(),
            model.trees.len(),
            model.n_features,
            model.n_classes
        );
        Ok(model)
    }

    /// Parse a forest from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        let model: Self =
            serde_json::from_str(json).map_err(|e| ClassifierError::Model(e.to_string()))?;
        model.check().map_err(ClassifierError::Model)?;
        Ok(model)
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Structural checks: non-empty, children point forward, leaves sized
    /// to the class count. Forward-only children rule out cycles.
    fn check(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        if self.n_classes == 0 {
            return Err("forest has no classes".to_string());
        }

        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(format!("tree {} has no nodes", t));
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                match node {
                    Node::Split {
                        feature,
                        left,
                        right,
                        ..
                    } => {
                        if *feature >= self.n_features {
                            return Err(format!(
                                "tree {} node {} splits on feature {} of {}",
                                t, i, feature, self.n_features
                            ));
                        }
                        for child in [*left, *right] {
                            if child <= i || child >= tree.nodes.len() {
                                return Err(format!(
                                    "tree {} node {} has invalid child {}",
                                    t, i, child
                                ));
                            }
                        }
                    }
                    Node::Leaf { value } => {
                        if value.len() != self.n_classes {
                            return Err(format!(
                                "tree {} leaf {} has {} class weights, expected {}",
                                t,
                                i,
                                value.len(),
                                self.n_classes
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Predict a class index for a raw feature slice
    pub fn predict(&self, features: &[f64]) -> Result<usize, ClassifierError> {
        if features.len() != self.n_features {
            return Err(ClassifierError::FeatureCount {
                expected: self.n_features,
                actual: features.len(),
            });
        }

        let mut scores = vec![0.0; self.n_classes];
        for tree in &self.trees {
            let leaf = Self::walk(tree, features)?;
            let total: f64 = leaf.iter().sum();
            if total > 0.0 {
                for (score, weight) in scores.iter_mut().zip(leaf) {
                    *score += weight / total;
                }
            }
        }

        let mut best = 0;
        for (class, score) in scores.iter().enumerate() {
            if *score > scores[best] {
                best = class;
            }
        }
        Ok(best)
    }

    fn walk<'a>(tree: &'a Tree, features: &[f64]) -> Result<&'a [f64], ClassifierError> {
        let mut index = 0;
        // a well-formed tree reaches a leaf in fewer steps than it has nodes
        for _ in 0..tree.nodes.len() {
            match tree.nodes.get(index) {
                Some(Node::Leaf { value }) => return Ok(value),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = features.get(*feature).ok_or_else(|| {
                        ClassifierError::Model(format!("split on missing feature {}", feature))
                    })?;
                    index = if *x <= *threshold { *left } else { *right };
                }
                None => break,
            }
        }
        Err(ClassifierError::Model(format!(
            "tree walk did not reach a leaf (stopped at node {})",
            index
        )))
    }
}

impl WeatherClassifier for ForestModel {
    fn predict_category(&self, features: &WeatherFeatures) -> Result<usize, ClassifierError> {
        self.predict(features.as_slice())
    }
}

impl SuitabilityClassifier for ForestModel {
    fn predict_suitability(&self, features: &SuitabilityFeatures) -> Result<usize, ClassifierError> {
        self.predict(features.as_slice())
    }
}
