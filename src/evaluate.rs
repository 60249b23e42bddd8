//! Evaluation pipeline: accuracy, per-class F1, and confusion matrix.
//!
//! Runs a trained classifier over a held-out labeled set. Class ordering in
//! every reported structure is the classifier's fixed sorted label order, so
//! results from different variants are directly comparable. Rendering the
//! confusion matrix is a pure data-to-string function, decoupled from the
//! computation.

use std::fmt;

use log::info;
use serde::{Deserialize, Serialize};

use crate::classifier::TextClassifier;
use crate::error::{Result, SentiraError};
use crate::vectorize::FeatureVector;

/// Square table of (true class, predicted class) counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// Class labels, fixing both row (true) and column (predicted) order.
    labels: Vec<String>,
    /// counts[t][p] = examples with true class t predicted as p.
    counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Create an all-zero matrix over the given class ordering.
    pub fn new(labels: Vec<String>) -> Self {
        let n = labels.len();
        Self {
            labels,
            counts: vec![vec![0; n]; n],
        }
    }

    /// The class ordering shared by rows and columns.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Increment the cell at (true label, predicted label).
    ///
    /// Fails when either label is outside the matrix's class set.
    pub fn increment(&mut self, true_label: &str, predicted_label: &str) -> Result<()> {
        let t = self.index_of(true_label)?;
        let p = self.index_of(predicted_label)?;
        self.counts[t][p] += 1;
        Ok(())
    }

    fn index_of(&self, label: &str) -> Result<usize> {
        self.labels
            .iter()
            .position(|l| l == label)
            .ok_or_else(|| {
                SentiraError::invalid_argument(format!(
                    "label `{label}` is not among the classifier's classes"
                ))
            })
    }

    /// Count at (true index, predicted index).
    pub fn count(&self, true_idx: usize, predicted_idx: usize) -> usize {
        self.counts[true_idx][predicted_idx]
    }

    /// Sum of all cells.
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Sum of the diagonal (correct predictions).
    pub fn trace(&self) -> usize {
        (0..self.labels.len()).map(|i| self.counts[i][i]).sum()
    }

    /// Accuracy computed from the matrix: trace / total.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.trace() as f64 / total as f64
        }
    }

    /// True-instance count for a class (its row sum).
    pub fn support(&self, class_idx: usize) -> usize {
        self.counts[class_idx].iter().sum()
    }

    /// Predicted-instance count for a class (its column sum).
    pub fn predicted(&self, class_idx: usize) -> usize {
        self.counts.iter().map(|row| row[class_idx]).sum()
    }

    /// Render the matrix as an aligned text table.
    ///
    /// Pure function of the matrix data; how (or whether) the result is
    /// displayed is the caller's concern.
    pub fn render(&self) -> String {
        let width = self
            .labels
            .iter()
            .map(|l| l.len())
            .chain(self.counts.iter().flatten().map(|c| c.to_string().len()))
            .max()
            .unwrap_or(1)
            .max(4);

        let mut out = String::new();
        out.push_str(&format!("{:>w$} |", "t\\p", w = width));
        for label in &self.labels {
            out.push_str(&format!(" {label:>width$}"));
        }
        out.push('\n');
        out.push_str(&"-".repeat((width + 2) + (width + 1) * self.labels.len()));
        out.push('\n');
        for (t, label) in self.labels.iter().enumerate() {
            out.push_str(&format!("{label:>width$} |"));
            for p in 0..self.labels.len() {
                out.push_str(&format!(" {:>w$}", self.counts[t][p], w = width));
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Precision, recall, and F1 for one class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassMetrics {
    /// Class label.
    pub label: String,
    /// Precision: correct / predicted, 0.0 when nothing was predicted.
    pub precision: f64,
    /// Recall: correct / true instances, 0.0 when the class has no support.
    pub recall: f64,
    /// Harmonic mean of precision and recall, 0.0 when both are 0.
    pub f1: f64,
    /// Number of true instances of this class.
    pub support: usize,
}

/// Results of one evaluation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// Fraction of examples predicted correctly.
    pub accuracy: f64,
    /// Unweighted mean of per-class F1.
    pub macro_f1: f64,
    /// Per-class metrics in the matrix's class order.
    pub per_class: Vec<ClassMetrics>,
    /// The full confusion matrix.
    pub matrix: ConfusionMatrix,
}

/// Run a trained classifier over a held-out labeled set.
///
/// For each example the predicted label increments the confusion matrix
/// cell at (true label, predicted label); all summary metrics derive from
/// the matrix. Fails when the inputs are empty or their lengths disagree,
/// or when the classifier is untrained.
pub fn evaluate(
    classifier: &dyn TextClassifier,
    features: &[FeatureVector],
    labels: &[String],
) -> Result<Evaluation> {
    if features.is_empty() {
        return Err(SentiraError::invalid_argument(
            "cannot evaluate on an empty set",
        ));
    }
    if features.len() != labels.len() {
        return Err(SentiraError::invalid_argument(format!(
            "{} feature vectors but {} labels",
            features.len(),
            labels.len()
        )));
    }

    let mut matrix = ConfusionMatrix::new(classifier.labels().to_vec());

    for (x, gold) in features.iter().zip(labels) {
        let prediction = classifier.predict(x)?;
        matrix.increment(gold, &prediction.label)?;
    }

    let per_class: Vec<ClassMetrics> = matrix
        .labels()
        .iter()
        .enumerate()
        .map(|(k, label)| {
            let correct = matrix.count(k, k) as f64;
            let predicted = matrix.predicted(k);
            let support = matrix.support(k);

            // Division-by-zero guards: an absent class scores 0, not an error
            let precision = if predicted == 0 {
                0.0
            } else {
                correct / predicted as f64
            };
            let recall = if support == 0 {
                0.0
            } else {
                correct / support as f64
            };
            let f1 = if precision + recall == 0.0 {
                0.0
            } else {
                2.0 * precision * recall / (precision + recall)
            };

            ClassMetrics {
                label: label.clone(),
                precision,
                recall,
                f1,
                support,
            }
        })
        .collect();

    let macro_f1 = per_class.iter().map(|m| m.f1).sum::<f64>() / per_class.len() as f64;
    let accuracy = matrix.accuracy();

    info!(
        "evaluated {} examples with {}: accuracy {:.4}, macro-F1 {:.4}",
        features.len(),
        classifier.name(),
        accuracy,
        macro_f1
    );

    Ok(Evaluation {
        accuracy,
        macro_f1,
        per_class,
        matrix,
    })
}
