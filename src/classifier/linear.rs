//! Shared linear parameter set for both classifier variants.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SentiraError};
use crate::vectorize::FeatureVector;

/// Trained parameters of a linear model: one weight row and bias per class.
///
/// Produced by training, consumed read-only by prediction. This is the
/// "loadable parameter set" that [`save`](LinearParams::save) and
/// [`load`](LinearParams::load) round-trip as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearParams {
    /// Sorted distinct class labels; row `k` of `weights` belongs to
    /// `labels[k]`.
    pub labels: Vec<String>,
    /// Per-class weight vectors, each `n_features` wide.
    pub weights: Vec<Vec<f64>>,
    /// Per-class bias terms.
    pub bias: Vec<f64>,
    /// Feature dimensionality fixed at training time.
    pub n_features: usize,
}

impl LinearParams {
    /// Zero-initialized parameters for the given label set and width.
    pub fn zeros(labels: Vec<String>, n_features: usize) -> Self {
        let n_classes = labels.len();
        Self {
            labels,
            weights: vec![vec![0.0; n_features]; n_classes],
            bias: vec![0.0; n_classes],
            n_features,
        }
    }

    /// Number of classes.
    pub fn n_classes(&self) -> usize {
        self.labels.len()
    }

    /// Per-class decision scores `W x + b` for one feature vector.
    ///
    /// Fails when the input width differs from the training-time width.
    pub fn decision_scores(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        if features.len() != self.n_features {
            return Err(SentiraError::dimension_mismatch(
                self.n_features,
                features.len(),
            ));
        }

        Ok(self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(w, b)| w.iter().zip(features).map(|(wi, xi)| wi * xi).sum::<f64>() + b)
            .collect())
    }

    /// Save the parameter set to disk as JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a parameter set from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let params: LinearParams = serde_json::from_str(&content)?;
        Ok(params)
    }
}

/// Index of the largest score, breaking ties toward the lower index.
pub(crate) fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, &s) in scores.iter().enumerate().skip(1) {
        if s > scores[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_scores() {
        let params = LinearParams {
            labels: vec!["neg".to_string(), "pos".to_string()],
            weights: vec![vec![1.0, -1.0], vec![-1.0, 1.0]],
            bias: vec![0.5, -0.5],
            n_features: 2,
        };

        let scores = params.decision_scores(&vec![2.0, 1.0]).unwrap();
        assert_eq!(scores, vec![1.5, -1.5]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let params = LinearParams::zeros(vec!["a".to_string(), "b".to_string()], 3);
        let result = params.decision_scores(&vec![1.0]);
        assert!(matches!(
            result,
            Err(SentiraError::DimensionMismatch {
                expected: 3,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), 1);
        assert_eq!(argmax(&[0.5, 0.5]), 0);
    }

    #[test]
    fn test_save_load_round_trip() {
        let params = LinearParams {
            labels: vec!["1".to_string(), "5".to_string()],
            weights: vec![vec![0.25, -0.75], vec![-0.25, 0.75]],
            bias: vec![0.1, -0.1],
            n_features: 2,
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        params.save(&path).unwrap();

        let loaded = LinearParams::load(&path).unwrap();
        assert_eq!(loaded.labels, params.labels);
        assert_eq!(loaded.weights, params.weights);
        assert_eq!(loaded.bias, params.bias);
        assert_eq!(loaded.n_features, 2);
    }
}
