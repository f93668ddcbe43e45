//! Server configuration settings

use serde::{Deserialize, Serialize};

/// Subnet uid that selects test-network mode.
pub const TESTNET_SUBNET_UID: u16 = 23;

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum concurrent requests
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,

    /// Maximum request body size in bytes
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Token-bucket capacity per caller key
    #[serde(default = "default_rate_limit_burst")]
    pub rate_limit_burst: u32,

    /// Token-bucket refill per second
    #[serde(default = "default_rate_limit_refill")]
    pub rate_limit_refill: u32,

    /// Reject requests whose timestamp differs from now by more than this
    #[serde(default = "default_max_request_age")]
    pub max_request_age_secs: u64,

    /// Allowed caller public keys, hex encoded (empty = open)
    #[serde(default)]
    pub whitelist: Vec<String>,

    /// Subnet this miner serves
    #[serde(default = "default_subnet_uid")]
    pub subnet_uid: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9910
}

fn default_max_concurrent() -> usize {
    16
}

fn default_max_body_size() -> usize {
    8 * 1024 * 1024 // 8 MB
}

fn default_rate_limit_burst() -> u32 {
    30
}

fn default_rate_limit_refill() -> u32 {
    1
}

fn default_max_request_age() -> u64 {
    60
}

fn default_subnet_uid() -> u16 {
    TESTNET_SUBNET_UID
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_concurrent_requests: default_max_concurrent(),
            max_body_size: default_max_body_size(),
            rate_limit_burst: default_rate_limit_burst(),
            rate_limit_refill: default_rate_limit_refill(),
            max_request_age_secs: default_max_request_age(),
            whitelist: Vec::new(),
            subnet_uid: default_subnet_uid(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_testnet(&self) -> bool {
        self.subnet_uid == TESTNET_SUBNET_UID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:9910");
        assert_eq!(config.rate_limit_burst, 30);
        assert_eq!(config.rate_limit_refill, 1);
        assert!(config.whitelist.is_empty());
        assert!(config.is_testnet());
    }

    #[test]
    fn test_mainnet_subnet() {
        let config = ServerConfig {
            subnet_uid: 5,
            ..Default::default()
        };
        assert!(!config.is_testnet());
    }
}
