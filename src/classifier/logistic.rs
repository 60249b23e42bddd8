//! Multinomial logistic regression classifier.
//!
//! The linear-probabilistic variant: minimizes multinomial log-loss with an
//! L2 penalty by batch gradient descent and exposes native class
//! probabilities through the softmax.

use std::path::Path;

use log::debug;

use crate::classifier::linear::{LinearParams, argmax};
use crate::classifier::{Prediction, TextClassifier, TrainConfig, TrainingReport};
use crate::classifier::prepare_training_labels;
use crate::error::{Result, SentiraError};
use crate::vectorize::FeatureVector;

/// Multinomial logistic regression over dense TF-IDF features.
#[derive(Debug, Default)]
pub struct LogisticRegression {
    config: TrainConfig,
    params: Option<LinearParams>,
}

impl LogisticRegression {
    /// Create an untrained classifier with default hyperparameters.
    pub fn new() -> Self {
        Self::with_config(TrainConfig::default())
    }

    /// Create an untrained classifier with custom hyperparameters.
    pub fn with_config(config: TrainConfig) -> Self {
        Self {
            config,
            params: None,
        }
    }

    fn params(&self) -> Result<&LinearParams> {
        self.params.as_ref().ok_or_else(|| {
            SentiraError::not_fitted("LogisticRegression::predict called before train")
        })
    }

    /// Softmax of the decision scores, max-shifted for numerical stability.
    fn softmax(scores: &[f64]) -> Vec<f64> {
        let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
        let sum: f64 = exps.iter().sum();
        exps.into_iter().map(|e| e / sum).collect()
    }
}

impl TextClassifier for LogisticRegression {
    fn train(&mut self, features: &[FeatureVector], labels: &[String]) -> Result<TrainingReport> {
        let (classes, targets, n_features) = prepare_training_labels(features, labels)?;
        let n_classes = classes.len();
        let n_samples = features.len() as f64;

        let mut params = LinearParams::zeros(classes, n_features);
        let lr = self.config.learning_rate;
        let l2 = self.config.l2_penalty;

        let mut prev_loss = f64::INFINITY;
        let mut iterations = 0;
        let mut converged = false;
        let mut loss = 0.0;

        for iteration in 0..self.config.max_iterations {
            iterations = iteration + 1;

            let mut grad_w = vec![vec![0.0; n_features]; n_classes];
            let mut grad_b = vec![0.0; n_classes];
            loss = 0.0;

            for (x, &target) in features.iter().zip(&targets) {
                let scores = params.decision_scores(x)?;
                let probs = Self::softmax(&scores);
                loss -= probs[target].max(f64::MIN_POSITIVE).ln();

                for k in 0..n_classes {
                    let err = probs[k] - if k == target { 1.0 } else { 0.0 };
                    grad_b[k] += err;
                    for (g, xi) in grad_w[k].iter_mut().zip(x) {
                        *g += err * xi;
                    }
                }
            }

            loss /= n_samples;
            for k in 0..n_classes {
                for (w, g) in params.weights[k].iter_mut().zip(&grad_w[k]) {
                    loss += 0.5 * l2 * *w * *w;
                    *w -= lr * (g / n_samples + l2 * *w);
                }
                params.bias[k] -= lr * grad_b[k] / n_samples;
            }

            if iteration % 10 == 0 {
                debug!("logistic iteration {iteration}: loss {loss:.6}");
            }

            if (prev_loss - loss).abs() < self.config.tolerance {
                converged = true;
                break;
            }
            prev_loss = loss;
        }

        self.params = Some(params);

        Ok(TrainingReport {
            iterations,
            final_loss: loss,
            converged,
            training_examples: features.len(),
            trained_at: chrono::Utc::now(),
        })
    }

    fn predict(&self, features: &FeatureVector) -> Result<Prediction> {
        let probabilities = self.predict_proba(features)?;
        let best = argmax(&probabilities);
        Ok(Prediction {
            label: self.params()?.labels[best].clone(),
            probabilities,
        })
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        let scores = self.params()?.decision_scores(features)?;
        Ok(Self::softmax(&scores))
    }

    fn labels(&self) -> &[String] {
        self.params.as_ref().map(|p| p.labels.as_slice()).unwrap_or(&[])
    }

    fn is_trained(&self) -> bool {
        self.params.is_some()
    }

    fn name(&self) -> &'static str {
        "logistic"
    }

    fn save(&self, path: &Path) -> Result<()> {
        self.params()?.save(path)
    }

    fn load(path: &Path) -> Result<Self> {
        Ok(Self {
            config: TrainConfig::default(),
            params: Some(LinearParams::load(path)?),
        })
    }
}
