//! Configuration system for minr
//!
//! Settings come from an optional YAML/JSON file; the serve command's
//! flags override whatever the file provides.

mod miner;
mod server;

pub use miner::{parse_device, MinerConfig};
pub use server::{ServerConfig, TESTNET_SUBNET_UID};

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// Root configuration for `minr serve --config`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinrConfig {
    /// Model and batching settings
    #[serde(default)]
    pub miner: MinerConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
}

impl MinrConfig {
    /// Load configuration from a file, dispatching on the extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(path),
            Some("json") => Self::from_json(path),
            _ => Err(anyhow!(
                "unsupported config format: {} (expected .yaml, .yml or .json)",
                path.display()
            )),
        }
    }

    /// Load configuration from a YAML file
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read {}", path.as_ref().display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.as_ref().display()))?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read {}", path.as_ref().display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.as_ref().display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minr_config_yaml() {
        let yaml = r#"
miner:
  model: distilbert/distilbert-base-uncased
  device: cpu
  batch_size: 8

server:
  port: 9911
  rate_limit_burst: 10
  whitelist:
    - aabbccdd
"#;
        let config: MinrConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.miner.device, "cpu");
        assert_eq!(config.miner.batch_size, 8);
        // Unset fields fall back to defaults
        assert_eq!(config.miner.max_length, 512);
        assert_eq!(config.server.port, 9911);
        assert_eq!(config.server.rate_limit_burst, 10);
        assert_eq!(config.server.whitelist, vec!["aabbccdd".to_string()]);
        assert_eq!(config.server.max_request_age_secs, 60);
    }

    #[test]
    fn test_empty_config_is_all_defaults() {
        let config: MinrConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.server.addr(), "0.0.0.0:9910");
        assert_eq!(config.miner.batch_size, 64);
    }

    #[test]
    fn test_unsupported_extension_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "x = 1").unwrap();
        assert!(MinrConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"server": {"port": 8000}}"#).unwrap();

        let config = MinrConfig::from_file(&path).unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.host, "0.0.0.0");
    }
}
