//! Miner identity keys
//!
//! Ed25519 key files stored as JSON (name, hex public key, hex secret key).
//! The serve command refuses to start without one; `minr keygen` creates
//! them.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

/// On-disk key file format.
#[derive(Debug, Serialize, Deserialize)]
struct KeyFile {
    name: String,
    public_key: String,
    secret_key: String,
    created_at: DateTime<Utc>,
}

/// A miner's signing identity.
pub struct Keypair {
    name: String,
    signing: SigningKey,
}

impl Keypair {
    /// Generate a fresh random keypair.
    pub fn generate(name: &str) -> Self {
        let signing = SigningKey::generate(&mut OsRng);
        Self {
            name: name.to_string(),
            signing,
        }
    }

    /// Load a key file, failing when it is missing or malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read key file {}", path.display()))?;
        let file: KeyFile = serde_json::from_str(&content)
            .with_context(|| format!("invalid key file {}", path.display()))?;
        let bytes = hex::decode(&file.secret_key).context("invalid secret key encoding")?;
        let bytes: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| anyhow!("secret key must be 32 bytes"))?;
        Ok(Self {
            name: file.name,
            signing: SigningKey::from_bytes(&bytes),
        })
    }

    /// Write the key file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        let file = KeyFile {
            name: self.name.clone(),
            public_key: self.public_hex(),
            secret_key: hex::encode(self.signing.to_bytes()),
            created_at: Utc::now(),
        };
        let content = serde_json::to_string_pretty(&file)?;
        fs::write(path, content)
            .with_context(|| format!("failed to write key file {}", path.display()))?;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sign a message, returning the raw 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing.sign(message).to_bytes()
    }

    /// Hex-encoded public key.
    pub fn public_hex(&self) -> String {
        hex::encode(self.signing.verifying_key().to_bytes())
    }

    /// Short form of the public key for logs.
    pub fn fingerprint(&self) -> String {
        let hex = self.public_hex();
        format!("{}..{}", &hex[..8], &hex[hex.len() - 8..])
    }
}

/// Verify an ed25519 signature given hex-encoded key and signature.
pub fn verify_signature(public_hex: &str, message: &[u8], signature_hex: &str) -> Result<()> {
    let key_bytes = hex::decode(public_hex).context("invalid public key encoding")?;
    let key_bytes: [u8; 32] = key_bytes
        .as_slice()
        .try_into()
        .map_err(|_| anyhow!("public key must be 32 bytes"))?;
    let key = VerifyingKey::from_bytes(&key_bytes).context("invalid public key")?;

    let sig_bytes = hex::decode(signature_hex).context("invalid signature encoding")?;
    let sig_bytes: [u8; 64] = sig_bytes
        .as_slice()
        .try_into()
        .map_err(|_| anyhow!("signature must be 64 bytes"))?;
    let signature = Signature::from_bytes(&sig_bytes);

    key.verify(message, &signature)
        .map_err(|_| anyhow!("signature verification failed"))
}

/// Resolve a `--keyfile` value to a path.
///
/// Bare names land in the key directory (`MINR_KEY_DIR`, default `./keys`)
/// with a `.json` extension; values containing a separator or extension are
/// used as-is.
pub fn resolve_key_path(keyfile: &str) -> PathBuf {
    if keyfile.contains(std::path::MAIN_SEPARATOR) || keyfile.ends_with(".json") {
        return PathBuf::from(keyfile);
    }
    let key_dir = std::env::var("MINR_KEY_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./keys"));
    key_dir.join(format!("{}.json", keyfile))
}
