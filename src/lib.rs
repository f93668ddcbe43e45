//! minr - authenticated HTTP miner serving masked-LM top-k logits
//!
//! minr is a thin service layer around candle's model infrastructure:
//! it loads a masked language model once, then scores batches of prompts
//! over an authenticated JSON API.
//!
//! # Architecture
//!
//! - **candle / tokenizers**: model weights, forward passes, tokenization
//! - **minr**: CLI, HTTP server, identity keys, batching, rate limiting
//!
//! # Example
//!
//! ```bash
//! # Create an identity key
//! minr keygen
//!
//! # Fetch the model ahead of time (optional, serve also does this)
//! minr pull distilbert/distilbert-base-uncased
//!
//! # Start the miner
//! minr serve --device cpu --port 9910
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod key;
pub mod loader;
pub mod model;
pub mod server;
pub mod store;
pub mod tokenizer;

#[cfg(test)]
mod testing;

// Re-export key types
pub use config::{MinerConfig, MinrConfig, ServerConfig};
pub use engine::{ComputeResult, Executor};
pub use loader::{fetch_model, load_model, ModelSource};
