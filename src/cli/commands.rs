//! Command execution logic for the Sentira CLI.

use log::{info, warn};

use crate::classifier::{LinearSvm, LogisticRegression, TextClassifier, TrainConfig};
use crate::cli::args::{Command, EvaluateArgs, ExplainArgs, Method, SentiraArgs};
use crate::cli::output::{
    EvaluationOutput, ExplanationOutput, format_evaluation, format_explanation,
};
use crate::corpus::Corpus;
use crate::error::{Result, SentiraError};
use crate::evaluate::evaluate;
use crate::explain::{Explainer, ExplainerConfig};
use crate::vectorize::{FeatureVector, TfIdfVectorizer};

/// Execute the parsed command.
pub fn execute_command(args: SentiraArgs) -> Result<()> {
    match &args.command {
        Command::Evaluate(eval_args) => execute_evaluate(&args, eval_args),
        Command::Explain(explain_args) => execute_explain(&args, explain_args),
    }
}

/// Instantiate an untrained classifier for the selected variant.
fn build_classifier(method: Method, config: TrainConfig) -> Box<dyn TextClassifier> {
    match method {
        Method::Logistic => Box::new(LogisticRegression::with_config(config)),
        Method::Svm => Box::new(LinearSvm::with_config(config)),
    }
}

/// Fit the vectorizer on the training corpus and train one variant on it.
fn train_on_corpus(
    method: Method,
    corpus: &Corpus,
    config: TrainConfig,
) -> Result<(TfIdfVectorizer, Box<dyn TextClassifier>, crate::classifier::TrainingReport)> {
    let mut vectorizer = TfIdfVectorizer::new();
    vectorizer.fit(&corpus.texts())?;

    let features: Vec<FeatureVector> = corpus
        .texts()
        .iter()
        .map(|t| vectorizer.transform(t))
        .collect::<Result<_>>()?;

    let mut classifier = build_classifier(method, config);
    info!(
        "training {} on {} examples ({} features)",
        classifier.name(),
        corpus.len(),
        vectorizer.vocabulary_size()
    );
    let report = classifier.train(&features, &corpus.labels())?;

    Ok((vectorizer, classifier, report))
}

fn execute_evaluate(args: &SentiraArgs, eval_args: &EvaluateArgs) -> Result<()> {
    let train_corpus = Corpus::load(&eval_args.train)?;
    let test_corpus = Corpus::load(&eval_args.test)?;

    let config = TrainConfig {
        max_iterations: eval_args.max_iterations,
        seed: eval_args.seed,
        ..TrainConfig::default()
    };

    // Success requires at least one variant running to completion
    let mut completed = 0;
    let mut last_error = None;

    for &method in &eval_args.methods {
        let outcome = (|| -> Result<()> {
            let (vectorizer, classifier, training) =
                train_on_corpus(method, &train_corpus, config.clone())?;

            let test_features: Vec<FeatureVector> = test_corpus
                .texts()
                .iter()
                .map(|t| vectorizer.transform(t))
                .collect::<Result<_>>()?;

            let evaluation = evaluate(classifier.as_ref(), &test_features, &test_corpus.labels())?;

            let output = EvaluationOutput {
                method: method.name().to_string(),
                training,
                evaluation,
            };
            println!("{}", format_evaluation(&output, &args.output_format)?);
            Ok(())
        })();

        match outcome {
            Ok(()) => completed += 1,
            Err(e) => {
                warn!("method {} failed: {e}", method.name());
                last_error = Some(e);
            }
        }
    }

    if completed == 0 {
        return Err(last_error
            .unwrap_or_else(|| SentiraError::invalid_argument("no classifier variant selected")));
    }
    Ok(())
}

fn execute_explain(args: &SentiraArgs, explain_args: &ExplainArgs) -> Result<()> {
    let train_corpus = Corpus::load(&explain_args.train)?;
    let (vectorizer, classifier, _training) =
        train_on_corpus(explain_args.method, &train_corpus, TrainConfig::default())?;

    let explainer = Explainer::with_config(ExplainerConfig {
        num_samples: explain_args.num_samples,
        top_k: explain_args.top_k,
        kernel_width: explain_args.kernel_width,
        seed: explain_args.seed,
        ..ExplainerConfig::default()
    });

    let explanation = explainer.explain(
        classifier.as_ref(),
        &vectorizer,
        &explain_args.text,
        explain_args.target.as_deref(),
    )?;

    let output = ExplanationOutput {
        method: explain_args.method.name().to_string(),
        text: explain_args.text.clone(),
        explanation,
    };
    println!("{}", format_explanation(&output, &args.output_format)?);
    Ok(())
}
