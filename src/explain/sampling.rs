//! Perturbation sampling for local explanations.
//!
//! A perturbation masks a random subset of the input's tokens and records
//! which positions survived as a binary presence vector. Sampling is driven
//! by an explicit rng so a fixed seed reproduces the whole draw.

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::index;

use crate::analysis::token::Token;

/// A text variant derived from the original input by token-level masking.
#[derive(Debug, Clone)]
pub struct Perturbation {
    /// presence[i] is true when original token i survived the masking.
    pub presence: Vec<bool>,
    /// Text reconstructed from the kept tokens.
    pub text: String,
    /// Number of masked positions.
    pub n_masked: usize,
}

impl Perturbation {
    /// Build a perturbation of `tokens` keeping exactly the positions where
    /// `presence` is true.
    pub fn from_presence(tokens: &[Token], presence: Vec<bool>) -> Self {
        let text = tokens
            .iter()
            .zip(&presence)
            .filter(|&(_, &keep)| keep)
            .map(|(t, _)| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let n_masked = presence.iter().filter(|&&keep| !keep).count();
        Self {
            presence,
            text,
            n_masked,
        }
    }

    /// Fraction of positions that differ from the unperturbed input.
    pub fn masked_fraction(&self) -> f64 {
        if self.presence.is_empty() {
            0.0
        } else {
            self.n_masked as f64 / self.presence.len() as f64
        }
    }
}

/// Draw `n_samples` perturbations of `tokens`.
///
/// The first sample always keeps every token, so the surrogate fit anchors
/// on the unperturbed input. Each remaining sample masks a uniformly drawn
/// count in `1..=T` of uniformly chosen positions.
pub fn sample_perturbations(
    rng: &mut StdRng,
    tokens: &[Token],
    n_samples: usize,
) -> Vec<Perturbation> {
    let n_tokens = tokens.len();
    let mut perturbations = Vec::with_capacity(n_samples);

    if n_tokens == 0 || n_samples == 0 {
        return perturbations;
    }

    perturbations.push(Perturbation::from_presence(tokens, vec![true; n_tokens]));

    for _ in 1..n_samples {
        let n_masked = rng.random_range(1..=n_tokens);
        let mut presence = vec![true; n_tokens];
        for idx in index::sample(rng, n_tokens, n_masked) {
            presence[idx] = false;
        }
        perturbations.push(Perturbation::from_presence(tokens, presence));
    }

    perturbations
}
