//! Key generation command

use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::key::{self, Keypair};

/// Generate a miner key file
pub async fn keygen(name: String, output: Option<PathBuf>, force: bool) -> Result<()> {
    let path = output.unwrap_or_else(|| key::resolve_key_path(&name));
    if path.exists() && !force {
        return Err(anyhow!(
            "key file {} already exists (pass --force to overwrite)",
            path.display()
        ));
    }

    let keypair = Keypair::generate(&name);
    keypair.save(&path)?;

    println!("Generated key '{}'", name);
    println!("  Path: {}", path.display());
    println!("  Public key: {}", keypair.public_hex());

    Ok(())
}
