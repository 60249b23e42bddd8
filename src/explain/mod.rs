//! Local surrogate explanations for single predictions.
//!
//! Given one input text and one trained classifier, the [`Explainer`]
//! perturbs the text by masking random token subsets, re-scores every
//! perturbation with the classifier, and fits a locality-weighted sparse
//! linear model of the target-class probability on the token presence
//! vectors. The fitted coefficient for each token position approximates
//! how much that token pushes the prediction toward (positive) or away
//! from (negative) the target class.
//!
//! The explainer never mutates the classifier or the vectorizer, and all
//! randomness flows from an explicit seed, so explanations are
//! reproducible.

pub mod sampling;
pub mod surrogate;

use log::warn;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::tokenizer::{Tokenizer, WhitespaceTokenizer};
use crate::classifier::TextClassifier;
use crate::error::{Result, SentiraError};
use crate::vectorize::TfIdfVectorizer;

pub use sampling::{Perturbation, sample_perturbations};
pub use surrogate::{SurrogateFit, fit_weighted_lasso};

/// Configuration for the explanation algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainerConfig {
    /// Number of perturbations to draw.
    pub num_samples: usize,
    /// Bandwidth of the locality kernel over the masked fraction.
    pub kernel_width: f64,
    /// Number of (token, weight) pairs to keep in the explanation.
    pub top_k: usize,
    /// L1 penalty of the surrogate fit.
    pub l1_penalty: f64,
    /// Iteration budget for the surrogate fit.
    pub surrogate_max_iterations: usize,
    /// Convergence tolerance for the surrogate fit.
    pub surrogate_tolerance: f64,
    /// Seed for perturbation sampling.
    pub seed: u64,
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self {
            num_samples: 2000,
            kernel_width: 0.5,
            top_k: 8,
            l1_penalty: 1e-3,
            surrogate_max_iterations: 1000,
            surrogate_tolerance: 1e-7,
            seed: 42,
        }
    }
}

/// One token's contribution to the explained prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenWeight {
    /// Token text as it appears in the input.
    pub token: String,
    /// Token position in the input (0-based).
    pub position: usize,
    /// Signed surrogate coefficient; positive pushes toward the target
    /// class.
    pub weight: f64,
}

/// Explanation of one (input, classifier) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    /// Class the explanation is relative to. `None` only for empty input.
    pub target_label: Option<String>,
    /// The classifier's predicted class for the unperturbed input.
    pub predicted_label: Option<String>,
    /// Probability of the predicted class for the unperturbed input.
    pub predicted_probability: Option<f64>,
    /// Token contributions, sorted by descending absolute weight and
    /// truncated to the configured top-K.
    pub token_weights: Vec<TokenWeight>,
    /// Intercept of the surrogate fit.
    pub intercept: f64,
    /// True when the surrogate fit hit its iteration budget without
    /// converging and the weights are best-effort.
    pub degraded: bool,
}

impl Explanation {
    fn empty() -> Self {
        Self {
            target_label: None,
            predicted_label: None,
            predicted_probability: None,
            token_weights: Vec::new(),
            intercept: 0.0,
            degraded: false,
        }
    }
}

/// Perturbation-based local explanation engine.
#[derive(Debug, Default)]
pub struct Explainer {
    config: ExplainerConfig,
}

impl Explainer {
    /// Create an explainer with default configuration.
    pub fn new() -> Self {
        Self::with_config(ExplainerConfig::default())
    }

    /// Create an explainer with custom configuration.
    pub fn with_config(config: ExplainerConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ExplainerConfig {
        &self.config
    }

    /// Explain one prediction.
    ///
    /// `target` selects which class's probability the surrogate regresses
    /// on; it defaults to the classifier's predicted class for `text`.
    /// Empty input yields an empty explanation without invoking the
    /// classifier.
    pub fn explain(
        &self,
        classifier: &dyn TextClassifier,
        vectorizer: &TfIdfVectorizer,
        text: &str,
        target: Option<&str>,
    ) -> Result<Explanation> {
        let tokens = WhitespaceTokenizer::new().tokenize(text)?;
        if tokens.is_empty() {
            return Ok(Explanation::empty());
        }

        // Score the unperturbed input once to fix prediction and target
        let full_probs = classifier.predict_proba(&vectorizer.transform(text)?)?;
        let labels = classifier.labels();
        let predicted_idx = argmax(&full_probs);

        let target_idx = match target {
            Some(label) => labels.iter().position(|l| l == label).ok_or_else(|| {
                SentiraError::invalid_argument(format!(
                    "target class `{label}` is not among the classifier's classes"
                ))
            })?,
            None => predicted_idx,
        };

        // Sampling is sequential so a fixed seed reproduces the draw;
        // scoring each perturbation is independent and runs in parallel
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let perturbations = sample_perturbations(&mut rng, &tokens, self.config.num_samples);

        let targets: Vec<f64> = perturbations
            .par_iter()
            .map(|p| -> Result<f64> {
                let features = vectorizer.transform(&p.text)?;
                Ok(classifier.predict_proba(&features)?[target_idx])
            })
            .collect::<Result<Vec<_>>>()?;

        let sample_weights: Vec<f64> = perturbations
            .iter()
            .map(|p| locality_weight(p.masked_fraction(), self.config.kernel_width))
            .collect();

        let designs: Vec<Vec<f64>> = perturbations
            .iter()
            .map(|p| p.presence.iter().map(|&keep| if keep { 1.0 } else { 0.0 }).collect())
            .collect();

        let fit = fit_weighted_lasso(
            &designs,
            &targets,
            &sample_weights,
            self.config.l1_penalty,
            self.config.surrogate_max_iterations,
            self.config.surrogate_tolerance,
        );

        if !fit.converged {
            warn!(
                "surrogate fit for `{text}` did not converge within {} sweeps; \
                 returning best-effort weights",
                self.config.surrogate_max_iterations
            );
        }

        let mut token_weights: Vec<TokenWeight> = tokens
            .iter()
            .zip(&fit.coefficients)
            .map(|(token, &weight)| TokenWeight {
                token: token.text.clone(),
                position: token.position,
                weight,
            })
            .collect();
        token_weights.sort_by(|a, b| {
            b.weight
                .abs()
                .partial_cmp(&a.weight.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        token_weights.truncate(self.config.top_k);

        Ok(Explanation {
            target_label: Some(labels[target_idx].clone()),
            predicted_label: Some(labels[predicted_idx].clone()),
            predicted_probability: Some(full_probs[predicted_idx]),
            token_weights,
            intercept: fit.intercept,
            degraded: !fit.converged,
        })
    }
}

/// Locality kernel over the masked fraction: perturbations close to the
/// original input are trusted more.
fn locality_weight(masked_fraction: f64, kernel_width: f64) -> f64 {
    (-(masked_fraction * masked_fraction) / (kernel_width * kernel_width))
        .exp()
        .sqrt()
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}
