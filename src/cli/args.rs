//! Command line argument parsing for the Sentira CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sentira - fine-grained sentiment classification and explanation
#[derive(Parser, Debug, Clone)]
#[command(name = "sentira")]
#[command(about = "Fine-grained sentiment classification with local explanations")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SentiraArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SentiraArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train the selected classifier variants and report held-out metrics
    Evaluate(EvaluateArgs),

    /// Explain one prediction as signed per-token weights
    Explain(ExplainArgs),
}

/// Classifier variants selectable from the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Multinomial logistic regression
    Logistic,
    /// One-vs-rest linear SVM
    Svm,
}

impl Method {
    /// Stable lowercase name, matching the ValueEnum spelling.
    pub fn name(&self) -> &'static str {
        match self {
            Method::Logistic => "logistic",
            Method::Svm => "svm",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Arguments for the evaluate command
#[derive(Parser, Debug, Clone)]
pub struct EvaluateArgs {
    /// Path to the training corpus (label<TAB>text records)
    #[arg(long, value_name = "TRAIN_FILE")]
    pub train: PathBuf,

    /// Path to the held-out corpus to evaluate on
    #[arg(long, value_name = "TEST_FILE")]
    pub test: PathBuf,

    /// Classifier variant(s) to run
    #[arg(short = 'm', long = "method", value_delimiter = ',',
          default_values_t = [Method::Logistic, Method::Svm])]
    pub methods: Vec<Method>,

    /// Maximum training iterations
    #[arg(long, default_value = "100")]
    pub max_iterations: usize,

    /// Training seed (SGD shuffling)
    #[arg(long, default_value = "42")]
    pub seed: u64,
}

/// Arguments for the explain command
#[derive(Parser, Debug, Clone)]
pub struct ExplainArgs {
    /// Path to the training corpus (label<TAB>text records)
    #[arg(long, value_name = "TRAIN_FILE")]
    pub train: PathBuf,

    /// Sentence to explain
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Classifier variant to explain against
    #[arg(short = 'm', long = "method", default_value = "logistic")]
    pub method: Method,

    /// Explain relative to this class instead of the predicted one
    #[arg(long, value_name = "CLASS")]
    pub target: Option<String>,

    /// Number of perturbation samples
    #[arg(long, default_value = "2000")]
    pub num_samples: usize,

    /// Number of token weights to report
    #[arg(long, default_value = "8")]
    pub top_k: usize,

    /// Locality kernel bandwidth over the masked fraction
    #[arg(long, default_value = "0.5")]
    pub kernel_width: f64,

    /// Sampling seed
    #[arg(long, default_value = "42")]
    pub seed: u64,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_evaluate_command() {
        let args = SentiraArgs::try_parse_from([
            "sentira",
            "evaluate",
            "--train",
            "data/sst_train.txt",
            "--test",
            "data/sst_test.txt",
            "--method",
            "logistic",
        ])
        .unwrap();

        if let Command::Evaluate(eval_args) = args.command {
            assert_eq!(eval_args.train, PathBuf::from("data/sst_train.txt"));
            assert_eq!(eval_args.methods, vec![Method::Logistic]);
            assert_eq!(eval_args.max_iterations, 100);
        } else {
            panic!("Expected Evaluate command");
        }
    }

    #[test]
    fn test_evaluate_defaults_to_both_methods() {
        let args = SentiraArgs::try_parse_from([
            "sentira", "evaluate", "--train", "a.txt", "--test", "b.txt",
        ])
        .unwrap();

        if let Command::Evaluate(eval_args) = args.command {
            assert_eq!(eval_args.methods, vec![Method::Logistic, Method::Svm]);
        } else {
            panic!("Expected Evaluate command");
        }
    }

    #[test]
    fn test_explain_command() {
        let args = SentiraArgs::try_parse_from([
            "sentira",
            "explain",
            "--train",
            "data/sst_train.txt",
            "--method",
            "svm",
            "--num-samples",
            "500",
            "It 's not horrible , just horribly mediocre .",
        ])
        .unwrap();

        if let Command::Explain(explain_args) = args.command {
            assert_eq!(explain_args.method, Method::Svm);
            assert_eq!(explain_args.num_samples, 500);
            assert!(explain_args.text.contains("mediocre"));
        } else {
            panic!("Expected Explain command");
        }
    }

    #[test]
    fn test_verbosity_levels() {
        let base = ["sentira", "evaluate", "--train", "a", "--test", "b"];

        let args = SentiraArgs::try_parse_from(base).unwrap();
        assert_eq!(args.verbosity(), 1);

        let mut verbose = vec!["sentira", "-vv"];
        verbose.extend(&base[1..]);
        let args = SentiraArgs::try_parse_from(verbose).unwrap();
        assert_eq!(args.verbosity(), 2);

        let mut quiet = vec!["sentira", "--quiet"];
        quiet.extend(&base[1..]);
        let args = SentiraArgs::try_parse_from(quiet).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args = SentiraArgs::try_parse_from([
            "sentira", "--format", "json", "evaluate", "--train", "a", "--test", "b",
        ])
        .unwrap();
        assert!(matches!(args.output_format, OutputFormat::Json));
    }
}
