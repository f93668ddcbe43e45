//! Miner configuration settings

use anyhow::{anyhow, Result};
use candle_core::Device;
use serde::{Deserialize, Serialize};

/// Model and batching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinerConfig {
    /// Display name announced in logs
    #[serde(default = "default_name")]
    pub name: String,

    /// Model id on the hub, or a local directory
    #[serde(default = "default_model")]
    pub model: String,

    /// Hub revision
    #[serde(default = "default_revision")]
    pub revision: String,

    /// Device request: "cuda", "cpu" or "auto"
    #[serde(default = "default_device")]
    pub device: String,

    /// Inputs per forward pass
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Fixed padded/truncated sequence length
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_name() -> String {
    "nya compute miner".to_string()
}

fn default_model() -> String {
    "distilbert/distilbert-base-uncased".to_string()
}

fn default_revision() -> String {
    "main".to_string()
}

fn default_device() -> String {
    "cuda".to_string()
}

fn default_batch_size() -> usize {
    64
}

fn default_max_length() -> usize {
    512
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            model: default_model(),
            revision: default_revision(),
            device: default_device(),
            batch_size: default_batch_size(),
            max_length: default_max_length(),
        }
    }
}

/// Resolve a device request.
///
/// "cuda" is strict: when no accelerator is usable the process refuses to
/// start. "auto" takes CUDA when present and falls back to CPU.
pub fn parse_device(device: &str) -> Result<Device> {
    match device {
        "cpu" => Ok(Device::Cpu),
        "cuda" => Device::new_cuda(0).map_err(|e| anyhow!("CUDA is not available: {}", e)),
        "auto" => Ok(Device::cuda_if_available(0)?),
        other => Err(anyhow!(
            "Unknown device: {} (expected cuda, cpu or auto)",
            other
        )),
    }
}
