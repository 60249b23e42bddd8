//! Whitespace tokenizer implementation.
//!
//! Splits text on runs of whitespace and keeps everything else verbatim,
//! including punctuation attached to words. This is the split unit used by
//! the explainer: perturbations mask whole whitespace-delimited tokens, and
//! the reconstructed variants must round-trip through the same split.

use super::Tokenizer;

use crate::analysis::token::Token;
use crate::error::Result;

/// A tokenizer that splits text on whitespace.
#[derive(Clone, Debug, Default)]
pub struct WhitespaceTokenizer;

impl WhitespaceTokenizer {
    /// Create a new whitespace tokenizer.
    pub fn new() -> Self {
        WhitespaceTokenizer
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut position = 0;
        let mut offset = 0;
        let bytes = text.as_bytes();

        while offset < bytes.len() {
            // Skip whitespace to the start of the next word
            while offset < bytes.len() && text[offset..].starts_with(char::is_whitespace) {
                offset += text[offset..].chars().next().map_or(1, char::len_utf8);
            }
            if offset >= bytes.len() {
                break;
            }

            let start = offset;
            while offset < bytes.len() && !text[offset..].starts_with(char::is_whitespace) {
                offset += text[offset..].chars().next().map_or(1, char::len_utf8);
            }

            tokens.push(Token::with_offsets(&text[start..offset], position, start, offset));
            position += 1;
        }

        Ok(tokens)
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}
