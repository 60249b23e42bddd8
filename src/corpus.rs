//! Labeled sentiment corpus loading.
//!
//! The corpus format is one record per line: an ordinal class label wrapped
//! in a `__label__` prefix, a tab, then the sentence text:
//!
//! ```text
//! __label__4	The cast is uniformly excellent .
//! __label__1	It 's not horrible , just horribly mediocre .
//! ```
//!
//! Train, dev, and test partitions are separate files loaded independently.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SentiraError};

/// Prefix carried by every class label in the on-disk format.
const LABEL_PREFIX: &str = "__label__";

/// A single labeled example: raw text plus its gold class label.
///
/// Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledExample {
    /// Raw sentence text.
    pub text: String,
    /// Gold class label (one of a fixed ordinal set, e.g. "1".."5").
    pub label: String,
}

/// A loaded corpus partition.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    /// Examples in file order.
    pub examples: Vec<LabeledExample>,
}

impl Corpus {
    /// Load a corpus partition from a delimited text file.
    ///
    /// Blank lines are skipped. A line without a tab separator or without
    /// the label prefix is a malformed record and fails the whole load; an
    /// empty corpus is also an error, since nothing downstream can train or
    /// evaluate on it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SentiraError::corpus(format!("cannot read {}: {e}", path.display())))?;
        Self::parse(&content)
    }

    /// Parse corpus records from already-loaded text.
    pub fn parse(content: &str) -> Result<Self> {
        let mut examples = Vec::new();

        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let (raw_label, text) = line.split_once('\t').ok_or_else(|| {
                SentiraError::corpus(format!("line {}: missing tab separator", line_no + 1))
            })?;

            let label = raw_label.strip_prefix(LABEL_PREFIX).ok_or_else(|| {
                SentiraError::corpus(format!(
                    "line {}: label `{raw_label}` lacks the `{LABEL_PREFIX}` prefix",
                    line_no + 1
                ))
            })?;

            examples.push(LabeledExample {
                text: text.trim().to_string(),
                label: label.trim().to_string(),
            });
        }

        if examples.is_empty() {
            return Err(SentiraError::corpus("corpus contains no records"));
        }

        Ok(Corpus { examples })
    }

    /// Number of examples in this partition.
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Check if the partition is empty.
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// All texts, in file order.
    pub fn texts(&self) -> Vec<String> {
        self.examples.iter().map(|e| e.text.clone()).collect()
    }

    /// All gold labels, in file order.
    pub fn labels(&self) -> Vec<String> {
        self.examples.iter().map(|e| e.label.clone()).collect()
    }

    /// The sorted distinct label set of this partition.
    pub fn distinct_labels(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.examples.iter().map(|e| e.label.as_str()).collect();
        set.into_iter().map(String::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "__label__4\tThe cast is uniformly excellent .\n\
                          __label__1\tIt 's not horrible , just horribly mediocre .\n\
                          \n\
                          __label__3\tA slight but charming film .\n";

    #[test]
    fn test_parse_records() {
        let corpus = Corpus::parse(SAMPLE).unwrap();
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.examples[0].label, "4");
        assert_eq!(corpus.examples[0].text, "The cast is uniformly excellent .");
        assert_eq!(corpus.examples[1].label, "1");
    }

    #[test]
    fn test_distinct_labels_sorted() {
        let corpus = Corpus::parse(SAMPLE).unwrap();
        assert_eq!(corpus.distinct_labels(), vec!["1", "3", "4"]);
    }

    #[test]
    fn test_empty_corpus_is_error() {
        let result = Corpus::parse("\n\n");
        assert!(matches!(result, Err(SentiraError::Corpus(_))));
    }

    #[test]
    fn test_missing_separator_is_error() {
        let result = Corpus::parse("__label__2 no tab here");
        assert!(matches!(result, Err(SentiraError::Corpus(_))));
    }

    #[test]
    fn test_missing_prefix_is_error() {
        let result = Corpus::parse("2\tsome text");
        assert!(matches!(result, Err(SentiraError::Corpus(_))));
    }

    #[test]
    fn test_load_missing_file_is_corpus_error() {
        let result = Corpus::load("/nonexistent/sst_train.txt");
        assert!(matches!(result, Err(SentiraError::Corpus(_))));
    }
}
