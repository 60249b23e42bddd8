//! Linear support vector machine classifier.
//!
//! The margin-based variant: one-vs-rest linear SVMs minimizing hinge loss
//! with an L2 penalty via stochastic gradient descent. The SVM has no
//! native probability output, so `predict_proba` squashes each class's
//! signed margin through a logistic sigmoid and renormalizes, giving the
//! explainer a uniform probability interface across variants.

use std::path::Path;

use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::classifier::linear::{LinearParams, argmax};
use crate::classifier::{Prediction, TextClassifier, TrainConfig, TrainingReport};
use crate::classifier::prepare_training_labels;
use crate::error::{Result, SentiraError};
use crate::vectorize::FeatureVector;

/// One-vs-rest linear SVM over dense TF-IDF features.
#[derive(Debug, Default)]
pub struct LinearSvm {
    config: TrainConfig,
    params: Option<LinearParams>,
}

impl LinearSvm {
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
        self.params
            .as_ref()
            .ok_or_else(|| SentiraError::not_fitted("LinearSvm::predict called before train"))
    }

    fn sigmoid(score: f64) -> f64 {
        1.0 / (1.0 + (-score).exp())
    }
}

impl TextClassifier for LinearSvm {
    fn train(&mut self, features: &[FeatureVector], labels: &[String]) -> Result<TrainingReport> {
        let (classes, targets, n_features) = prepare_training_labels(features, labels)?;
        let n_classes = classes.len();
        let n_samples = features.len() as f64;

        let mut params = LinearParams::zeros(classes, n_features);
        let lr = self.config.learning_rate;
        let l2 = self.config.l2_penalty;

        // Explicit seeded rng so repeated training runs are reproducible
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut indices: Vec<usize> = (0..features.len()).collect();

        let mut prev_loss = f64::INFINITY;
        let mut iterations = 0;
        let mut converged = false;
        let mut loss = 0.0;

        for epoch in 0..self.config.max_iterations {
            iterations = epoch + 1;
            indices.shuffle(&mut rng);

            for &i in &indices {
                let x = &features[i];
                for k in 0..n_classes {
                    let y = if targets[i] == k { 1.0 } else { -1.0 };
                    let score: f64 = params.weights[k]
                        .iter()
                        .zip(x)
                        .map(|(w, xi)| w * xi)
                        .sum::<f64>()
                        + params.bias[k];

                    // Hinge subgradient step with L2 shrinkage
                    if y * score < 1.0 {
                        for (w, xi) in params.weights[k].iter_mut().zip(x) {
                            *w -= lr * (l2 * *w - y * xi);
                        }
                        params.bias[k] += lr * y;
                    } else {
                        for w in params.weights[k].iter_mut() {
                            *w -= lr * l2 * *w;
                        }
                    }
                }
            }

            // Epoch objective: mean hinge loss plus the L2 term
            loss = 0.0;
            for (x, &target) in features.iter().zip(&targets) {
                let scores = params.decision_scores(x)?;
                for (k, &score) in scores.iter().enumerate() {
                    let y = if target == k { 1.0 } else { -1.0 };
                    loss += (1.0 - y * score).max(0.0);
                }
            }
            loss /= n_samples;
            for k in 0..n_classes {
                loss += 0.5 * l2 * params.weights[k].iter().map(|w| w * w).sum::<f64>();
            }

            if epoch % 10 == 0 {
                debug!("svm epoch {epoch}: loss {loss:.6}");
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

        // Monotonic squashing of signed margins, renormalized to sum to 1.
        // The sigmoid is strictly positive, so the sum never vanishes.
        let squashed: Vec<f64> = scores.iter().map(|&s| Self::sigmoid(s)).collect();
        let sum: f64 = squashed.iter().sum();
        Ok(squashed.into_iter().map(|p| p / sum).collect())
    }

    fn labels(&self) -> &[String] {
        self.params.as_ref().map(|p| p.labels.as_slice()).unwrap_or(&[])
    }

    fn is_trained(&self) -> bool {
        self.params.is_some()
    }

    fn name(&self) -> &'static str {
        "svm"
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

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_training_data() -> (Vec<FeatureVector>, Vec<String>) {
        let features = vec![
            vec![1.0, 0.0],
            vec![0.9, 0.1],
            vec![0.0, 1.0],
            vec![0.1, 0.9],
        ];
        let labels = vec![
            "1".to_string(),
            "1".to_string(),
            "5".to_string(),
            "5".to_string(),
        ];
        (features, labels)
    }

    #[test]
    fn test_train_and_predict() {
        let (features, labels) = toy_training_data();
        let mut clf = LinearSvm::new();
        let report = clf.train(&features, &labels).unwrap();

        assert!(clf.is_trained());
        assert!(report.iterations > 0);

        let prediction = clf.predict(&vec![0.95, 0.05]).unwrap();
        assert_eq!(prediction.label, "1");
    }

    #[test]
    fn test_pseudo_proba_is_distribution() {
        let (features, labels) = toy_training_data();
        let mut clf = LinearSvm::new();
        clf.train(&features, &labels).unwrap();

        let probs = clf.predict_proba(&vec![0.5, 0.5]).unwrap();
        assert_eq!(probs.len(), 2);
        assert!(probs.iter().all(|&p| p >= 0.0));
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_squashing_is_monotonic_in_margin() {
        let (features, labels) = toy_training_data();
        let mut clf = LinearSvm::new();
        clf.train(&features, &labels).unwrap();

        // The argmax of the squashed distribution matches the raw margins
        let input = vec![0.8, 0.2];
        let scores = clf.params().unwrap().decision_scores(&input).unwrap();
        let probs = clf.predict_proba(&input).unwrap();
        assert_eq!(argmax(&scores), argmax(&probs));
    }

    #[test]
    fn test_training_is_reproducible() {
        let (features, labels) = toy_training_data();

        let mut a = LinearSvm::new();
        a.train(&features, &labels).unwrap();
        let mut b = LinearSvm::new();
        b.train(&features, &labels).unwrap();

        let input = vec![0.4, 0.6];
        assert_eq!(
            a.predict_proba(&input).unwrap(),
            b.predict_proba(&input).unwrap()
        );
    }

    #[test]
    fn test_predict_before_train_fails() {
        let clf = LinearSvm::new();
        let result = clf.predict(&vec![1.0]);
        assert!(matches!(result, Err(SentiraError::NotFitted(_))));
    }
}
