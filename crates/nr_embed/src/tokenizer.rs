//! Token counting and truncation ahead of the embedding call.
//!
//! Providers cap input by tokens, not characters, so over-budget content is
//! cut to exactly the budget in token space and decoded back to text.

use nr_core::{Error, Result};
use tiktoken_rs::{cl100k_base, CoreBPE};

/// Outcome of applying the token budget to a piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct Truncation {
    pub text: String,
    pub original_tokens: usize,
    pub final_tokens: usize,
    pub was_truncated: bool,
}

/// A `cl100k_base` tokenizer. Construction loads the encoding tables, so
/// build one per process and share it; it is safe for concurrent read-only
/// use.
pub struct Tokenizer {
    bpe: CoreBPE,
}

impl Tokenizer {
    pub fn new() -> Result<Self> {
        let bpe = cl100k_base()
            .map_err(|e| Error::Embedding(format!("failed to load cl100k_base: {e}")))?;
        Ok(Self { bpe })
    }

    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    /// Truncate `text` to at most `budget` tokens.
    ///
    /// Under-budget input is returned unchanged with `was_truncated` false;
    /// over-budget input comes back with exactly `budget` tokens.
    pub fn truncate(&self, text: &str, budget: usize) -> Result<Truncation> {
        let tokens = self.bpe.encode_ordinary(text);
        let original_tokens = tokens.len();

        if original_tokens <= budget {
            return Ok(Truncation {
                text: text.to_string(),
                original_tokens,
                final_tokens: original_tokens,
                was_truncated: false,
            });
        }

        let truncated = self
            .bpe
            .decode(tokens[..budget].to_vec())
            .map_err(|e| Error::Embedding(format!("failed to decode truncated tokens: {e}")))?;

        Ok(Truncation {
            text: truncated,
            original_tokens,
            final_tokens: budget,
            was_truncated: true,
        })
    }
}
