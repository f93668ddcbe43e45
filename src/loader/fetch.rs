//! Model file retrieval from the Hugging Face hub

use anyhow::{Context, Result};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};

use super::{local_model_files, ModelFiles, ModelSource};

/// Files a masked-LM miner needs from a hub repository.
pub const HUB_FILES: [&str; 3] = ["config.json", "tokenizer.json", "model.safetensors"];

/// Resolve a model source to concrete files, downloading when needed.
///
/// Hub files land in the shared hf-hub cache, so repeated starts reuse
/// them without network access.
pub fn fetch_model(source: &ModelSource) -> Result<ModelFiles> {
    match source {
        ModelSource::LocalDir(dir) => local_model_files(dir),
        ModelSource::HubRepo { id, revision } => {
            tracing::info!("Fetching {} (revision {}) from the hub", id, revision);
            let api = Api::new().context("failed to initialize hub client")?;
            let repo = api.repo(Repo::with_revision(
                id.clone(),
                RepoType::Model,
                revision.clone(),
            ));
            let config = repo
                .get("config.json")
                .with_context(|| format!("failed to fetch config.json for {}", id))?;
            let tokenizer = repo
                .get("tokenizer.json")
                .with_context(|| format!("failed to fetch tokenizer.json for {}", id))?;
            let weights = repo
                .get("model.safetensors")
                .with_context(|| format!("failed to fetch model.safetensors for {}", id))?;
            Ok(ModelFiles {
                config,
                tokenizer,
                weights: vec![weights],
            })
        }
    }
}
