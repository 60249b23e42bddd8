//! Unicode word tokenizer implementation.
//!
//! This module provides a tokenizer that splits text using Unicode word
//! boundary rules (UAX #29). It properly handles international text and
//! filters out non-word segments like punctuation and whitespace, which
//! makes it the right unit for building a vocabulary.
//!
//! # Examples
//!
//! ```
//! use sentira::analysis::tokenizer::Tokenizer;
//! use sentira::analysis::tokenizer::unicode_word::UnicodeWordTokenizer;
//!
//! let tokenizer = UnicodeWordTokenizer::new();
//! let tokens = tokenizer.tokenize("Hello, world!").unwrap();
//!
//! // Punctuation and whitespace are automatically filtered out
//! assert_eq!(tokens[0].text, "hello");
//! assert_eq!(tokens[1].text, "world");
//! ```

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::token::Token;
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// A tokenizer that splits text on Unicode word boundaries.
///
/// Uses the Unicode Text Segmentation algorithm (UAX #29) to identify word
/// boundaries, keeps only segments containing alphanumeric characters, and
/// lowercases them so that vocabulary lookups are case-insensitive.
#[derive(Clone, Debug, Default)]
pub struct UnicodeWordTokenizer;

impl UnicodeWordTokenizer {
    /// Create a new Unicode word tokenizer.
    pub fn new() -> Self {
        UnicodeWordTokenizer
    }
}

impl Tokenizer for UnicodeWordTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        let tokens: Vec<Token> = text
            .split_word_bound_indices()
            .filter(|(_, word)| word.chars().any(|c| c.is_alphanumeric()))
            .enumerate()
            .map(|(position, (start_offset, word))| {
                let end_offset = start_offset + word.len();
                Token::with_offsets(word.to_lowercase(), position, start_offset, end_offset)
            })
            .collect();

        Ok(tokens)
    }

    fn name(&self) -> &'static str {
        "unicode_word"
    }
}
