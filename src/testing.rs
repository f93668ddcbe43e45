//! Shared test fixtures
//!
//! A tiny WordLevel tokenizer plus a deterministic stand-in model, so unit
//! tests run without weights or network access.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use candle_core::{Device, Tensor};

use crate::config::ServerConfig;
use crate::engine::Executor;
use crate::model::MaskedLm;
use crate::server::auth::AuthState;
use crate::server::AppState;
use crate::tokenizer::Tokenizer;

/// Minimal WordLevel tokenizer, 16-entry vocabulary.
pub(crate) const TOKENIZER_JSON: &str = r#"{
    "version": "1.0",
    "truncation": null,
    "padding": null,
    "added_tokens": [],
    "normalizer": {"type": "Lowercase"},
    "pre_tokenizer": {"type": "Whitespace"},
    "post_processor": null,
    "decoder": null,
    "model": {
        "type": "WordLevel",
        "vocab": {
            "[PAD]": 0, "[UNK]": 1, "[MASK]": 2, "the": 3,
            "cat": 4, "sat": 5, "on": 6, "mat": 7,
            "i": 8, "like": 9, "to": 10, "eat": 11,
            "for": 12, "breakfast": 13, "dog": 14, "ran": 15
        },
        "unk_token": "[UNK]"
    }
}"#;

/// Fixture tokenizer pinned to `max_length`.
pub(crate) fn tokenizer(max_length: usize) -> Tokenizer {
    let inner = tokenizers::Tokenizer::from_bytes(TOKENIZER_JSON.as_bytes()).unwrap();
    Tokenizer::new(inner, max_length).unwrap()
}

/// Emits `arange(0, vocab) * scale` at every position, so the top-k of any
/// input is known in advance.
pub(crate) struct StubLm {
    pub(crate) vocab: usize,
    pub(crate) scale: f64,
}

impl MaskedLm for StubLm {
    fn forward(&self, input_ids: &Tensor, _attention_mask: &Tensor) -> Result<Tensor> {
        let (batch, seq) = input_ids.dims2()?;
        let row = Tensor::arange(0f32, self.vocab as f32, input_ids.device())?
            .affine(self.scale, 0.0)?
            .reshape((1, 1, self.vocab))?;
        Ok(row.broadcast_as((batch, seq, self.vocab))?.contiguous()?)
    }

    fn vocab_size(&self) -> usize {
        self.vocab
    }
}

/// Stub that sleeps `delay` on every forward call, for timing assertions.
pub(crate) struct SlowLm {
    pub(crate) inner: StubLm,
    pub(crate) delay: Duration,
}

impl MaskedLm for SlowLm {
    fn forward(&self, input_ids: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
        std::thread::sleep(self.delay);
        self.inner.forward(input_ids, attention_mask)
    }

    fn vocab_size(&self) -> usize {
        self.inner.vocab_size()
    }
}

/// Executor over the stub model, fixture tokenizer at length 8.
pub(crate) fn stub_executor(vocab: usize, scale: f64, batch_size: usize) -> Result<Executor> {
    Executor::new(
        Box::new(StubLm { vocab, scale }),
        tokenizer(8),
        Device::Cpu,
        batch_size,
    )
}

/// Executor over the slow stub, fixture tokenizer at length 8.
pub(crate) fn slow_executor(delay: Duration, batch_size: usize) -> Result<Executor> {
    Executor::new(
        Box::new(SlowLm {
            inner: StubLm {
                vocab: 32,
                scale: 1.0,
            },
            delay,
        }),
        tokenizer(8),
        Device::Cpu,
        batch_size,
    )
}

/// Application state over the stub model, for router tests.
pub(crate) fn stub_state(config: ServerConfig) -> Arc<AppState> {
    Arc::new(AppState {
        executor: Arc::new(stub_executor(32, 1.0, 64).unwrap()),
        auth: AuthState::new(&config).unwrap(),
        config,
        miner_name: "test miner".to_string(),
        public_key: "00".repeat(32),
        model: "stub".to_string(),
        device: "cpu".to_string(),
        store: None,
        started_at: Instant::now(),
    })
}
