//! Model source detection

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

/// Where model files come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Hugging Face hub repository, e.g. `distilbert/distilbert-base-uncased`
    HubRepo { id: String, revision: String },
    /// Local directory containing config, tokenizer and weights
    LocalDir(PathBuf),
}

/// Resolved locations of the files a masked-LM miner loads
#[derive(Debug, Clone)]
pub struct ModelFiles {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: Vec<PathBuf>,
}

/// Interpret a `--model` value.
///
/// An existing directory wins over a hub id; bare names are also looked up
/// under the model directory (`MINR_MODEL_DIR`, default `./models`).
pub fn detect_model_source(model: &str, revision: &str) -> ModelSource {
    let direct = PathBuf::from(model);
    if direct.is_dir() {
        return ModelSource::LocalDir(direct);
    }

    let model_dir = std::env::var("MINR_MODEL_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./models"));
    let in_dir = model_dir.join(model);
    if in_dir.is_dir() {
        return ModelSource::LocalDir(in_dir);
    }

    ModelSource::HubRepo {
        id: model.to_string(),
        revision: revision.to_string(),
    }
}

/// Locate model files inside a local directory.
pub fn local_model_files(dir: &Path) -> Result<ModelFiles> {
    let config = dir.join("config.json");
    if !config.exists() {
        return Err(anyhow!("no config.json in {}", dir.display()));
    }
    let tokenizer = dir.join("tokenizer.json");
    if !tokenizer.exists() {
        return Err(anyhow!("no tokenizer.json in {}", dir.display()));
    }
    let weights = find_safetensors(dir)?;
    Ok(ModelFiles {
        config,
        tokenizer,
        weights,
    })
}

/// Find safetensors weight files, preferring the single-file layout.
fn find_safetensors(dir: &Path) -> Result<Vec<PathBuf>> {
    let single = dir.join("model.safetensors");
    if single.exists() {
        return Ok(vec![single]);
    }

    let pattern = dir.join("*.safetensors");
    let mut shards: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())?
        .filter_map(|entry| entry.ok())
        .collect();
    shards.sort();

    if shards.is_empty() {
        return Err(anyhow!("no safetensors weights in {}", dir.display()));
    }
    Ok(shards)
}
