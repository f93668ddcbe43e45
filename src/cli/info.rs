//! Model info command

use anyhow::Result;

use crate::key::{self, Keypair};
use crate::loader::{detect_model_source, fetch_model, ModelSource};
use crate::model::ModelConfig;

/// Show model information and, optionally, a key summary
pub async fn info(model: String, keyfile: Option<String>) -> Result<()> {
    let source = detect_model_source(&model, "main");
    match &source {
        ModelSource::LocalDir(dir) => {
            println!("Model: {}", model);
            println!("Path: {}\n", dir.display());
        }
        ModelSource::HubRepo { id, revision } => {
            println!("Model: {} (revision {})\n", id, revision);
        }
    }

    let files = fetch_model(&source)?;
    let config = ModelConfig::from_json(&files.config)?;

    println!("Configuration:");
    if let Some(model_type) = &config.model_type {
        println!("  Architecture: {}", model_type);
    }
    println!("  Vocab size: {}", config.vocab_size);
    println!("  Max positions: {}", config.max_position_embeddings);
    if let Some(dim) = config.dim {
        println!("  Hidden size: {}", dim);
    }
    if let Some(n_layers) = config.n_layers {
        println!("  Layers: {}", n_layers);
    }
    if let Some(n_heads) = config.n_heads {
        println!("  Attention heads: {}", n_heads);
    }

    let total: u64 = files
        .weights
        .iter()
        .filter_map(|path| std::fs::metadata(path).ok())
        .map(|meta| meta.len())
        .sum();
    let size_mb = total as f64 / (1024.0 * 1024.0);
    if size_mb >= 1024.0 {
        println!("\nWeights size: {:.2} GB", size_mb / 1024.0);
    } else {
        println!("\nWeights size: {:.2} MB", size_mb);
    }

    if let Some(keyfile) = keyfile {
        let path = key::resolve_key_path(&keyfile);
        let keypair = Keypair::load(&path)?;
        println!("\nKey: {}", keypair.name());
        println!("  Path: {}", path.display());
        println!("  Public key: {}", keypair.public_hex());
    }

    Ok(())
}
