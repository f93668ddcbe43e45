//! Tokenization via the `tokenizers` crate
//!
//! The miner's contract is fixed-shape: every input is right-padded and
//! truncated to the same length, so batches always form rectangular
//! [batch, max_length] tensors.

use std::path::Path;

use anyhow::{anyhow, Result};
use tokenizers::{PaddingParams, PaddingStrategy, TruncationParams};

/// One tokenized input, exactly `max_length` entries per field.
#[derive(Debug, Clone)]
pub struct Encoded {
    pub ids: Vec<u32>,
    pub attention_mask: Vec<u32>,
}

/// A tokenizer configured for fixed-length masked-LM batches.
pub struct Tokenizer {
    inner: tokenizers::Tokenizer,
    max_length: usize,
}

impl Tokenizer {
    /// Load `tokenizer.json` and pin padding/truncation to `max_length`.
    pub fn from_file(path: &Path, max_length: usize) -> Result<Self> {
        let inner = tokenizers::Tokenizer::from_file(path)
            .map_err(|e| anyhow!("failed to load tokenizer from {}: {}", path.display(), e))?;
        Self::new(inner, max_length)
    }

    pub fn new(mut inner: tokenizers::Tokenizer, max_length: usize) -> Result<Self> {
        let pad_id = inner.token_to_id("[PAD]").unwrap_or(0);
        inner.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::Fixed(max_length),
            pad_id,
            pad_token: "[PAD]".to_string(),
            ..PaddingParams::default()
        }));
        inner
            .with_truncation(Some(TruncationParams {
                max_length,
                ..TruncationParams::default()
            }))
            .map_err(|e| anyhow!("failed to configure truncation: {}", e))?;
        Ok(Self { inner, max_length })
    }

    /// Tokenize a task, preserving input order.
    pub fn encode_batch(&self, inputs: &[String]) -> Result<Vec<Encoded>> {
        let encodings = self
            .inner
            .encode_batch(inputs.to_vec(), true)
            .map_err(|e| anyhow!("tokenization failed: {}", e))?;
        Ok(encodings
            .into_iter()
            .map(|encoding| Encoded {
                ids: encoding.get_ids().to_vec(),
                attention_mask: encoding.get_attention_mask().to_vec(),
            })
            .collect())
    }

    /// Vocabulary size, added tokens included.
    pub fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(true)
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn token_id(&self, token: &str) -> Option<u32> {
        self.inner.token_to_id(token)
    }
}
