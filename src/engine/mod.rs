//! Scoring engine
//!
//! Owns the loaded model and turns prompt batches into top-k logit tables.

mod executor;

pub use executor::{ComputeResult, Executor, MAX_VOCAB, TOP_K};
