//! Pull model files from the Hugging Face hub

use std::path::PathBuf;

use anyhow::{Context, Result};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};

use crate::loader::HUB_FILES;

/// Download the files a miner serves into the model directory
pub async fn pull(model: String, revision: String, output: Option<PathBuf>) -> Result<()> {
    let output_dir = output.unwrap_or_else(|| {
        std::env::var("MINR_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./models"))
    });

    let model_name = model.split('/').last().unwrap_or(&model);
    let model_dir = output_dir.join(model_name);
    std::fs::create_dir_all(&model_dir)
        .with_context(|| format!("failed to create {}", model_dir.display()))?;

    println!("Downloading {} (revision {})", model, revision);
    println!("Destination: {}", model_dir.display());

    let api = Api::new()?;
    let repo = api.repo(Repo::with_revision(model.clone(), RepoType::Model, revision));

    for filename in HUB_FILES {
        let cached = repo
            .get(filename)
            .with_context(|| format!("failed to fetch {} for {}", filename, model))?;
        let dest = model_dir.join(filename);
        std::fs::copy(&cached, &dest)?;
        println!("  Downloaded: {}", filename);
    }

    println!("\nModel ready at: {}", model_dir.display());

    Ok(())
}
