//! End-to-end tests for the train / evaluate pipeline.

use std::path::Path;

use sentira::classifier::{
    LinearSvm, LogisticRegression, Prediction, TextClassifier, TrainingReport,
};
use sentira::corpus::Corpus;
use sentira::error::{Result, SentiraError};
use sentira::evaluate::evaluate;
use sentira::vectorize::{FeatureVector, TfIdfVectorizer};

const TRAIN: &str = "__label__1\tterrible awful boring mess\n\
                     __label__1\tawful terrible waste of time\n\
                     __label__2\tdull and mostly forgettable\n\
                     __label__4\tcharming and quite watchable\n\
                     __label__5\twonderful excellent delightful film\n\
                     __label__5\texcellent wonderful uniformly charming\n";

fn fitted_pipeline() -> (Corpus, TfIdfVectorizer, Vec<FeatureVector>) {
    let corpus = Corpus::parse(TRAIN).unwrap();
    let mut vectorizer = TfIdfVectorizer::new();
    vectorizer.fit(&corpus.texts()).unwrap();
    let features = corpus
        .texts()
        .iter()
        .map(|t| vectorizer.transform(t).unwrap())
        .collect();
    (corpus, vectorizer, features)
}

/// Classifier with scripted outputs, for exercising the evaluator in
/// isolation: predicts "1" when the first feature dominates, else "5".
struct ScriptedClassifier {
    labels: Vec<String>,
}

impl ScriptedClassifier {
    fn new() -> Self {
        Self {
            labels: vec!["1".to_string(), "5".to_string()],
        }
    }
}

impl TextClassifier for ScriptedClassifier {
    fn train(&mut self, _: &[FeatureVector], _: &[String]) -> Result<TrainingReport> {
        unreachable!("scripted classifier is never trained")
    }

    fn predict(&self, features: &FeatureVector) -> Result<Prediction> {
        let probabilities = self.predict_proba(features)?;
        let label = if probabilities[0] > probabilities[1] {
            "1"
        } else {
            "5"
        };
        Ok(Prediction {
            label: label.to_string(),
            probabilities,
        })
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        if features[0] > features[1] {
            Ok(vec![0.9, 0.1])
        } else {
            Ok(vec![0.1, 0.9])
        }
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn is_trained(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "scripted"
    }

    fn save(&self, _: &Path) -> Result<()> {
        unreachable!("scripted classifier is never saved")
    }

    fn load(_: &Path) -> Result<Self> {
        unreachable!("scripted classifier is never loaded")
    }
}

#[test]
fn perfect_predictions_give_diagonal_matrix() {
    let classifier = ScriptedClassifier::new();
    // Features crafted so every prediction matches the gold label
    let features = vec![
        vec![1.0, 0.0],
        vec![0.8, 0.2],
        vec![0.0, 1.0],
        vec![0.3, 0.7],
    ];
    let labels = vec![
        "1".to_string(),
        "1".to_string(),
        "5".to_string(),
        "5".to_string(),
    ];

    let result = evaluate(&classifier, &features, &labels).unwrap();
    assert_eq!(result.accuracy, 1.0);
    assert_eq!(result.macro_f1, 1.0);

    let matrix = &result.matrix;
    assert_eq!(matrix.total(), 4);
    assert_eq!(matrix.trace(), 4);
    assert_eq!(matrix.count(0, 1), 0);
    assert_eq!(matrix.count(1, 0), 0);
}

#[test]
fn matrix_total_and_accuracy_match_direct_comparison() {
    let classifier = ScriptedClassifier::new();
    // Second example is deliberately misclassified
    let features = vec![vec![1.0, 0.0], vec![0.2, 0.8], vec![0.0, 1.0]];
    let labels = vec!["1".to_string(), "1".to_string(), "5".to_string()];

    let result = evaluate(&classifier, &features, &labels).unwrap();
    assert_eq!(result.matrix.total(), 3);

    // Accuracy from the matrix equals accuracy from direct comparison
    let direct: f64 = features
        .iter()
        .zip(&labels)
        .filter(|(x, gold)| classifier.predict(x).unwrap().label == **gold)
        .count() as f64
        / labels.len() as f64;
    assert!((result.accuracy - direct).abs() < 1e-12);
}

#[test]
fn absent_class_scores_zero_f1_without_failing() {
    let classifier = ScriptedClassifier::new();
    // Gold never contains "5" and the classifier never predicts it
    let features = vec![vec![1.0, 0.0], vec![0.9, 0.1]];
    let labels = vec!["1".to_string(), "1".to_string()];

    let result = evaluate(&classifier, &features, &labels).unwrap();
    let class5 = result.per_class.iter().find(|m| m.label == "5").unwrap();
    assert_eq!(class5.f1, 0.0);
    assert_eq!(class5.support, 0);
}

#[test]
fn both_variants_train_and_emit_valid_distributions() {
    let (corpus, vectorizer, features) = fitted_pipeline();
    let labels = corpus.labels();

    let classifiers: Vec<Box<dyn TextClassifier>> = vec![
        Box::new(LogisticRegression::new()),
        Box::new(LinearSvm::new()),
    ];

    for mut classifier in classifiers {
        classifier.train(&features, &labels).unwrap();

        let probe = vectorizer.transform("a wonderful but terrible film").unwrap();
        let probs = classifier.predict_proba(&probe).unwrap();
        assert_eq!(probs.len(), classifier.labels().len());
        assert!(probs.iter().all(|&p| p >= 0.0));
        let sum: f64 = probs.iter().sum();
        assert!(
            (sum - 1.0).abs() < 1e-6,
            "{} probabilities sum to {sum}",
            classifier.name()
        );
    }
}

#[test]
fn class_ordering_is_identical_across_variants() {
    let (corpus, _vectorizer, features) = fitted_pipeline();
    let labels = corpus.labels();

    let mut logistic = LogisticRegression::new();
    logistic.train(&features, &labels).unwrap();
    let mut svm = LinearSvm::new();
    svm.train(&features, &labels).unwrap();

    assert_eq!(logistic.labels(), svm.labels());
    assert_eq!(logistic.labels(), &["1", "2", "4", "5"]);
}

#[test]
fn two_examples_two_classes_scenario() {
    let corpus =
        Corpus::parse("__label__1\tterrible mess\n__label__5\twonderful film\n").unwrap();
    let mut vectorizer = TfIdfVectorizer::new();
    vectorizer.fit(&corpus.texts()).unwrap();
    let features: Vec<FeatureVector> = corpus
        .texts()
        .iter()
        .map(|t| vectorizer.transform(t).unwrap())
        .collect();

    let mut classifier = LogisticRegression::new();
    classifier.train(&features, &corpus.labels()).unwrap();

    let prediction = classifier.predict(&features[0]).unwrap();
    assert_eq!(prediction.label, "1");
    let idx = classifier.labels().iter().position(|l| l == "1").unwrap();
    assert!(prediction.probabilities[idx] >= 0.5);
}

#[test]
fn degenerate_training_is_rejected_end_to_end() {
    let corpus = Corpus::parse("__label__3\tfine\n__label__3\talso fine\n").unwrap();
    let mut vectorizer = TfIdfVectorizer::new();
    vectorizer.fit(&corpus.texts()).unwrap();
    let features: Vec<FeatureVector> = corpus
        .texts()
        .iter()
        .map(|t| vectorizer.transform(t).unwrap())
        .collect();

    let mut classifier = LinearSvm::new();
    let result = classifier.train(&features, &corpus.labels());
    assert!(matches!(result, Err(SentiraError::DegenerateTraining(_))));
}

#[test]
fn trained_parameters_round_trip_through_disk() {
    let (corpus, vectorizer, features) = fitted_pipeline();
    let mut classifier = LogisticRegression::new();
    classifier.train(&features, &corpus.labels()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logistic.json");
    classifier.save(&path).unwrap();

    let loaded = LogisticRegression::load(&path).unwrap();
    assert!(loaded.is_trained());

    let probe = vectorizer.transform("uniformly excellent").unwrap();
    assert_eq!(
        classifier.predict_proba(&probe).unwrap(),
        loaded.predict_proba(&probe).unwrap()
    );
}

#[test]
fn prediction_is_idempotent_for_both_variants() {
    let (corpus, vectorizer, features) = fitted_pipeline();
    let labels = corpus.labels();

    let mut svm = LinearSvm::new();
    svm.train(&features, &labels).unwrap();

    let probe = vectorizer.transform("boring but charming").unwrap();
    let first = svm.predict(&probe).unwrap();
    let second = svm.predict(&probe).unwrap();
    assert_eq!(first.label, second.label);
    assert_eq!(first.probabilities, second.probabilities);
}
