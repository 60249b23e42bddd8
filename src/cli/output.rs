//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::classifier::TrainingReport;
use crate::error::Result;
use crate::evaluate::Evaluation;
use crate::explain::Explanation;

/// Result structure for one evaluated classifier variant.
#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluationOutput {
    pub method: String,
    pub training: TrainingReport,
    pub evaluation: Evaluation,
}

/// Result structure for one explanation request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExplanationOutput {
    pub method: String,
    pub text: String,
    pub explanation: Explanation,
}

/// Render an evaluation result in the requested format.
pub fn format_evaluation(output: &EvaluationOutput, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(output)?),
        OutputFormat::Human => {
            let mut s = String::new();
            s.push_str(&format!("Method: {}\n", output.method));
            s.push_str(&format!(
                "Trained in {} iterations (converged: {}), final loss {:.6}\n",
                output.training.iterations, output.training.converged, output.training.final_loss
            ));
            s.push_str(&format!(
                "Accuracy: {:.4}\nMacro-F1: {:.4}\n",
                output.evaluation.accuracy, output.evaluation.macro_f1
            ));
            s.push_str("\nPer-class metrics:\n");
            s.push_str("class  precision  recall     f1        support\n");
            for m in &output.evaluation.per_class {
                s.push_str(&format!(
                    "{:<6} {:<10.4} {:<10.4} {:<9.4} {}\n",
                    m.label, m.precision, m.recall, m.f1, m.support
                ));
            }
            s.push_str("\nConfusion matrix (rows: true, columns: predicted):\n");
            s.push_str(&output.evaluation.matrix.render());
            Ok(s)
        }
    }
}

/// Render an explanation result in the requested format.
pub fn format_explanation(output: &ExplanationOutput, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(output)?),
        OutputFormat::Human => {
            let mut s = String::new();
            s.push_str(&format!("Method: {}\n", output.method));
            s.push_str(&format!("Text: {}\n", output.text));

            let explanation = &output.explanation;
            match (&explanation.predicted_label, explanation.predicted_probability) {
                (Some(label), Some(probability)) => {
                    s.push_str(&format!(
                        "Predicted class: {label} (probability {probability:.4})\n"
                    ));
                }
                _ => {
                    s.push_str("Predicted class: n/a (empty input)\n");
                }
            }
            if let Some(target) = &explanation.target_label {
                s.push_str(&format!("Explained class: {target}\n"));
            }
            if explanation.degraded {
                s.push_str("Note: surrogate fit did not converge; weights are best-effort\n");
            }

            s.push_str("\nToken weights (positive pushes toward the explained class):\n");
            if explanation.token_weights.is_empty() {
                s.push_str("  (none)\n");
            }
            for tw in &explanation.token_weights {
                s.push_str(&format!(
                    "  {:>+10.5}  {} [{}]\n",
                    tw.weight, tw.token, tw.position
                ));
            }
            Ok(s)
        }
    }
}
