//! Weighted sparse linear surrogate fitting.
//!
//! Fits an L1-regularized linear regression of the perturbation targets on
//! the binary presence vectors, with per-sample locality weights, by
//! cyclical coordinate descent with soft-thresholding. The intercept is
//! unpenalized. A rank-deficient design (e.g. every perturbation collapsing
//! to the same feature vector) degrades to near-zero coefficients instead
//! of failing.

/// Result of a surrogate fit.
#[derive(Debug, Clone)]
pub struct SurrogateFit {
    /// One coefficient per token position; sign is direction, magnitude is
    /// relative importance.
    pub coefficients: Vec<f64>,
    /// Unpenalized intercept.
    pub intercept: f64,
    /// Whether the tolerance was reached within the iteration budget.
    pub converged: bool,
    /// Number of full coordinate sweeps run.
    pub iterations: usize,
}

/// Soft-thresholding operator for the lasso update.
fn soft_threshold(rho: f64, lambda: f64) -> f64 {
    if rho > lambda {
        rho - lambda
    } else if rho < -lambda {
        rho + lambda
    } else {
        0.0
    }
}

/// Fit a weighted lasso of `targets` on binary `designs`.
///
/// `designs[i][j]` is 1.0 when token j was present in sample i. Sample
/// weights are normalized internally; `l1_penalty` is relative to that
/// normalized scale.
pub fn fit_weighted_lasso(
    designs: &[Vec<f64>],
    targets: &[f64],
    sample_weights: &[f64],
    l1_penalty: f64,
    max_iterations: usize,
    tolerance: f64,
) -> SurrogateFit {
    let n_samples = designs.len();
    let n_features = designs.first().map_or(0, |d| d.len());

    if n_samples == 0 || n_features == 0 {
        return SurrogateFit {
            coefficients: vec![0.0; n_features],
            intercept: 0.0,
            converged: true,
            iterations: 0,
        };
    }

    // Normalize weights so the penalty scale is independent of sample count
    let weight_sum: f64 = sample_weights.iter().sum();
    let weights: Vec<f64> = if weight_sum > 0.0 {
        sample_weights.iter().map(|w| w / weight_sum).collect()
    } else {
        vec![1.0 / n_samples as f64; n_samples]
    };

    // Weighted column norms; binary designs make this the kept-weight mass
    let mut norms = vec![0.0; n_features];
    for (row, &w) in designs.iter().zip(&weights) {
        for (norm, &x) in norms.iter_mut().zip(row) {
            *norm += w * x * x;
        }
    }

    let mut beta = vec![0.0; n_features];
    let mut intercept: f64 = weights
        .iter()
        .zip(targets)
        .map(|(w, y)| w * y)
        .sum();

    // Residuals under the current fit
    let mut residuals: Vec<f64> = targets.iter().map(|y| y - intercept).collect();

    let mut converged = false;
    let mut iterations = 0;

    for _ in 0..max_iterations {
        iterations += 1;
        let mut max_delta: f64 = 0.0;

        for j in 0..n_features {
            if norms[j] == 0.0 {
                // Column never varies under the weights; leave it at zero
                continue;
            }

            let mut rho = 0.0;
            for i in 0..n_samples {
                let x = designs[i][j];
                if x != 0.0 {
                    rho += weights[i] * x * (residuals[i] + beta[j] * x);
                }
            }

            let updated = soft_threshold(rho, l1_penalty) / norms[j];
            let delta = updated - beta[j];
            if delta != 0.0 {
                for i in 0..n_samples {
                    let x = designs[i][j];
                    if x != 0.0 {
                        residuals[i] -= delta * x;
                    }
                }
                beta[j] = updated;
                max_delta = max_delta.max(delta.abs());
            }
        }

        // Re-center the unpenalized intercept on the weighted mean residual
        let shift: f64 = weights.iter().zip(&residuals).map(|(w, r)| w * r).sum();
        if shift != 0.0 {
            intercept += shift;
            for r in residuals.iter_mut() {
                *r -= shift;
            }
            max_delta = max_delta.max(shift.abs());
        }

        if max_delta < tolerance {
            converged = true;
            break;
        }
    }

    SurrogateFit {
        coefficients: beta,
        intercept,
        converged,
        iterations,
    }
}
