//! Masked language model abstraction.
//!
//! This module contains the model interface the engine runs against and
//! its DistilBERT implementation.

use anyhow::Result;
use candle_core::Tensor;

mod config;
mod distilbert;

pub use config::ModelConfig;
pub use distilbert::DistilBert;

/// Interface the engine needs from a masked language model.
///
/// Implementations take token ids and an attention mask, both of shape
/// `[batch, seq]`, and produce raw logits of shape `[batch, seq, vocab]`.
pub trait MaskedLm: Send + Sync {
    /// Forward pass over one batch.
    fn forward(&self, input_ids: &Tensor, attention_mask: &Tensor) -> Result<Tensor>;

    /// Size of the vocabulary the logits range over.
    fn vocab_size(&self) -> usize;
}

/// Boxed model type for use in executors
pub type BoxedModel = Box<dyn MaskedLm>;
