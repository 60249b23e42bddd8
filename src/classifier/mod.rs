//! Sentiment classifiers over vectorized text.
//!
//! Two variants sit behind the common [`TextClassifier`] trait:
//!
//! - [`LogisticRegression`]: multinomial softmax regression with native
//!   class probabilities
//! - [`LinearSvm`]: one-vs-rest linear SVM whose margins are squashed into
//!   pseudo-probabilities
//!
//! The evaluator and explainer depend only on the trait, never on a
//! concrete variant.

mod linear;
mod logistic;
mod svm;

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SentiraError};
use crate::vectorize::FeatureVector;

pub use linear::LinearParams;
pub use logistic::LogisticRegression;
pub use svm::LinearSvm;

/// Hyperparameters shared by both classifier variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Gradient step size.
    pub learning_rate: f64,
    /// Maximum number of optimization iterations (epochs for SGD).
    pub max_iterations: usize,
    /// L2 regularization strength.
    pub l2_penalty: f64,
    /// Convergence tolerance on the objective between iterations.
    pub tolerance: f64,
    /// Seed for any stochastic part of training (e.g. SGD shuffling).
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            max_iterations: 100,
            l2_penalty: 1e-3,
            tolerance: 1e-5,
            seed: 42,
        }
    }
}

/// Outcome of a training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Number of iterations actually run.
    pub iterations: usize,
    /// Objective value after the last iteration.
    pub final_loss: f64,
    /// Whether the tolerance was reached before the iteration budget.
    pub converged: bool,
    /// Number of training examples used.
    pub training_examples: usize,
    /// Training timestamp.
    pub trained_at: chrono::DateTime<chrono::Utc>,
}

/// A classifier's output for one feature vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted class label.
    pub label: String,
    /// Probability distribution over all classes, in the classifier's
    /// fixed label order. Sums to 1 within floating-point tolerance.
    pub probabilities: Vec<f64>,
}

/// Trait for trainable sentiment classifiers.
pub trait TextClassifier: Send + Sync {
    /// Train on vectorized, labeled examples.
    ///
    /// Fails with a degenerate-training error when the inputs are empty,
    /// lengths disagree, or fewer than two distinct classes are present.
    fn train(&mut self, features: &[FeatureVector], labels: &[String]) -> Result<TrainingReport>;

    /// Predict the class of a single feature vector.
    fn predict(&self, features: &FeatureVector) -> Result<Prediction>;

    /// Probability distribution over all classes for a single feature vector.
    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>>;

    /// The fixed, sorted class label ordering established at training time.
    fn labels(&self) -> &[String];

    /// Check if the classifier has been trained.
    fn is_trained(&self) -> bool;

    /// Get the name of this classifier variant.
    fn name(&self) -> &'static str;

    /// Save the trained parameter set to disk as JSON.
    fn save(&self, path: &Path) -> Result<()>;

    /// Load a trained parameter set from disk.
    fn load(path: &Path) -> Result<Self>
    where
        Self: Sized;
}

/// Validate training inputs and derive the sorted distinct label set and
/// per-example label indices.
pub(crate) fn prepare_training_labels(
    features: &[FeatureVector],
    labels: &[String],
) -> Result<(Vec<String>, Vec<usize>, usize)> {
    if features.is_empty() {
        return Err(SentiraError::degenerate_training("no training examples"));
    }
    if features.len() != labels.len() {
        return Err(SentiraError::degenerate_training(format!(
            "{} feature vectors but {} labels",
            features.len(),
            labels.len()
        )));
    }

    let classes: Vec<String> = labels
        .iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .cloned()
        .collect();
    if classes.len() < 2 {
        return Err(SentiraError::degenerate_training(format!(
            "need at least 2 distinct classes, got {}",
            classes.len()
        )));
    }

    let n_features = features[0].len();
    for f in features {
        if f.len() != n_features {
            return Err(SentiraError::dimension_mismatch(n_features, f.len()));
        }
    }

    let targets = labels
        .iter()
        .map(|l| classes.binary_search(l).expect("label in distinct set"))
        .collect();

    Ok((classes, targets, n_features))
}
