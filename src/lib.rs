//! # Sentira
//!
//! Fine-grained sentiment classification with local surrogate explanations.
//!
//! ## Features
//!
//! - Pure Rust implementation
//! - Pluggable tokenizers and TF-IDF vectorization
//! - Two classifier variants behind a common trait: multinomial logistic
//!   regression and a one-vs-rest linear SVM
//! - Evaluation pipeline with accuracy, per-class F1, and confusion matrix
//! - LIME-style perturbation-based explanations for single predictions

pub mod analysis;
pub mod classifier;
pub mod cli;
pub mod corpus;
pub mod error;
pub mod evaluate;
pub mod explain;
pub mod vectorize;

pub mod prelude {}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
