//! Model loading utilities
//!
//! Resolves a model id or local directory to config, tokenizer and weight
//! files, then builds the candle model and tokenizer the engine runs.

mod detect;
mod fetch;

pub use detect::{detect_model_source, local_model_files, ModelFiles, ModelSource};
pub use fetch::{fetch_model, HUB_FILES};

use anyhow::{Context, Result};
use candle_core::Device;

use crate::model::{BoxedModel, DistilBert, ModelConfig};
use crate::tokenizer::Tokenizer;

/// Load the model and tokenizer a miner serves.
///
/// `max_length` is clamped to the model's position-embedding limit, since
/// padding past it would index positions the model does not have.
pub fn load_model(
    files: &ModelFiles,
    max_length: usize,
    device: &Device,
) -> Result<(BoxedModel, Tokenizer, ModelConfig)> {
    let config_json = std::fs::read_to_string(&files.config)
        .with_context(|| format!("failed to read {}", files.config.display()))?;
    let info: ModelConfig = serde_json::from_str(&config_json)
        .with_context(|| format!("failed to parse {}", files.config.display()))?;

    tracing::info!(
        "Loading {} model: vocab {}, max positions {}",
        info.model_type.as_deref().unwrap_or("masked-lm"),
        info.vocab_size,
        info.max_position_embeddings,
    );

    let fixed_length = if max_length > info.max_position_embeddings {
        tracing::warn!(
            "max length {} exceeds the model's {} positions, clamping",
            max_length,
            info.max_position_embeddings
        );
        info.max_position_embeddings
    } else {
        max_length
    };

    let tokenizer = Tokenizer::from_file(&files.tokenizer, fixed_length)?;
    let model = DistilBert::load(&files.weights, &config_json, &info, device)?;

    Ok((Box::new(model), tokenizer, info))
}
