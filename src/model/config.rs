use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Model configuration read from `config.json`.
///
/// Only the fields the service validates and reports on; the full
/// configuration is consumed separately by the candle model loader.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub vocab_size: usize,

    #[serde(default = "default_max_position_embeddings", alias = "n_positions")]
    pub max_position_embeddings: usize,

    #[serde(default)]
    pub model_type: Option<String>,

    // DistilBERT dimension names, with the BERT-style aliases
    #[serde(default, alias = "hidden_size")]
    pub dim: Option<usize>,
    #[serde(default, alias = "num_hidden_layers")]
    pub n_layers: Option<usize>,
    #[serde(default, alias = "num_attention_heads")]
    pub n_heads: Option<usize>,
}

fn default_max_position_embeddings() -> usize {
    512
}

impl ModelConfig {
    pub fn from_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_distilbert_config() {
        let json = r#"{
            "model_type": "distilbert",
            "vocab_size": 30522,
            "max_position_embeddings": 512,
            "dim": 768,
            "n_layers": 6,
            "n_heads": 12,
            "hidden_dim": 3072,
            "dropout": 0.1,
            "activation": "gelu"
        }"#;

        let config: ModelConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.vocab_size, 30522);
        assert_eq!(config.max_position_embeddings, 512);
        assert_eq!(config.model_type.as_deref(), Some("distilbert"));
        assert_eq!(config.dim, Some(768));
        assert_eq!(config.n_layers, Some(6));
    }

    #[test]
    fn test_parse_bert_style_aliases() {
        let json = r#"{
            "vocab_size": 30522,
            "hidden_size": 768,
            "num_hidden_layers": 12,
            "num_attention_heads": 12
        }"#;

        let config: ModelConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.dim, Some(768));
        assert_eq!(config.n_layers, Some(12));
        assert_eq!(config.n_heads, Some(12));
        assert_eq!(config.max_position_embeddings, 512);
    }

    #[test]
    fn test_missing_vocab_size_fails() {
        let result: std::result::Result<ModelConfig, _> = serde_json::from_str(r#"{"dim": 768}"#);
        assert!(result.is_err());
    }
}
