//! DistilBERT masked-LM backend via candle

use std::path::PathBuf;

use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::distilbert::{Config, DistilBertForMaskedLM};

use super::{MaskedLm, ModelConfig};

/// `DistilBertForMaskedLM` loaded from safetensors weights.
pub struct DistilBert {
    model: DistilBertForMaskedLM,
    vocab_size: usize,
}

impl DistilBert {
    /// Load weights onto `device`.
    ///
    /// Weights are memory-mapped and materialized as f32, the dtype
    /// DistilBERT checkpoints ship in. `config_json` is the raw content of
    /// the model's `config.json`.
    pub fn load(
        weights: &[PathBuf],
        config_json: &str,
        info: &ModelConfig,
        device: &Device,
    ) -> Result<Self> {
        let config: Config =
            serde_json::from_str(config_json).context("failed to parse model configuration")?;
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(weights, DType::F32, device)? };
        let model =
            DistilBertForMaskedLM::load(vb, &config).context("failed to load model weights")?;
        Ok(Self {
            model,
            vocab_size: info.vocab_size,
        })
    }
}

impl MaskedLm for DistilBert {
    fn forward(&self, input_ids: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
        // candle's DistilBERT fills attention scores with -inf wherever the
        // mask is nonzero, the inverse of the tokenizer's 1-for-real-token
        // convention. Flip it and shape it to broadcast over the score matrix.
        let (batch, seq) = attention_mask.dims2()?;
        let fill = attention_mask
            .ones_like()?
            .sub(attention_mask)?
            .reshape((batch, 1, 1, seq))?;
        Ok(self.model.forward(input_ids, &fill)?)
    }

    fn vocab_size(&self) -> usize {
        self.vocab_size
    }
}
