//! Batched masked-LM scoring
//!
//! Turns a list of prompts into fixed-shape top-k logit tables. Inputs are
//! tokenized to a fixed length, scored in chunks of `batch_size`, and the
//! per-position logits reduced to the `TOP_K` highest entries.

use std::time::Instant;

use anyhow::{bail, Result};
use candle_core::{DType, Device, Tensor, D};

use crate::model::BoxedModel;
use crate::tokenizer::{Encoded, Tokenizer};

/// Number of logits kept per token position.
pub const TOP_K: usize = 16;

/// Largest vocabulary whose indices fit the signed 16-bit wire format.
pub const MAX_VOCAB: usize = i16::MAX as usize + 1;

/// Top-k scores for one task.
///
/// `logit` and `logit_index` are both shaped `[prompt][position][TOP_K]`,
/// ordered by descending logit within each position. Logits are rounded to
/// f16 precision before leaving the executor.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ComputeResult {
    /// Wall-clock seconds spent on tokenization and scoring.
    pub elapsed_time: f64,
    /// Top-k logits per token position.
    pub logit: Vec<Vec<Vec<f32>>>,
    /// Vocabulary indices matching `logit` entry for entry.
    pub logit_index: Vec<Vec<Vec<i16>>>,
}

/// Runs masked-LM scoring over fixed-length prompt batches.
pub struct Executor {
    model: BoxedModel,
    tokenizer: Tokenizer,
    device: Device,
    batch_size: usize,
}

impl Executor {
    /// Wrap a loaded model and its tokenizer.
    ///
    /// Rejects vocabularies the wire format cannot carry: fewer than `TOP_K`
    /// entries leaves nothing to select, more than `MAX_VOCAB` overflows the
    /// i16 index column.
    pub fn new(
        model: BoxedModel,
        tokenizer: Tokenizer,
        device: Device,
        batch_size: usize,
    ) -> Result<Self> {
        let vocab = model.vocab_size();
        if vocab < TOP_K {
            bail!("model vocabulary ({vocab} tokens) is smaller than the top-{TOP_K} output");
        }
        if vocab > MAX_VOCAB {
            bail!("model vocabulary ({vocab} tokens) exceeds the 16-bit index range");
        }
        if batch_size == 0 {
            bail!("batch size must be at least 1");
        }
        Ok(Self {
            model,
            tokenizer,
            device,
            batch_size,
        })
    }

    /// Score every prompt in `task`.
    ///
    /// Prompts are processed `batch_size` at a time; output rows keep the
    /// order of the input. The same task always produces the same logits.
    pub fn compute(&self, task: &[String]) -> Result<ComputeResult> {
        if task.is_empty() {
            bail!("task must contain at least one prompt");
        }
        let start = Instant::now();

        let encodings = self.tokenizer.encode_batch(task)?;

        let mut values = Vec::new();
        let mut indices = Vec::new();
        for chunk in encodings.chunks(self.batch_size) {
            let (input_ids, attention_mask) = self.to_tensors(chunk)?;
            let logits = self.model.forward(&input_ids, &attention_mask)?;
            // sort_last_dim needs a contiguous layout
            let (sorted, sorted_idx) = logits.contiguous()?.sort_last_dim(false)?;
            values.push(sorted.narrow(D::Minus1, 0, TOP_K)?);
            indices.push(sorted_idx.narrow(D::Minus1, 0, TOP_K)?);
        }
        let values = Tensor::cat(&values, 0)?;
        let indices = Tensor::cat(&indices, 0)?;

        // Round through f16, the precision the wire format carries.
        let logit = values
            .to_dtype(DType::F16)?
            .to_dtype(DType::F32)?
            .to_vec3::<f32>()?;
        let logit_index = indices
            .to_vec3::<u32>()?
            .into_iter()
            .map(|positions| {
                positions
                    .into_iter()
                    .map(|row| row.into_iter().map(|i| i as i16).collect())
                    .collect()
            })
            .collect();

        Ok(ComputeResult {
            elapsed_time: start.elapsed().as_secs_f64(),
            logit,
            logit_index,
        })
    }

    /// Stack one chunk of encodings into [chunk, max_length] id and mask
    /// tensors on the executor's device.
    fn to_tensors(&self, chunk: &[Encoded]) -> Result<(Tensor, Tensor)> {
        let mut id_rows = Vec::with_capacity(chunk.len());
        let mut mask_rows = Vec::with_capacity(chunk.len());
        for encoding in chunk {
            id_rows.push(Tensor::new(encoding.ids.as_slice(), &self.device)?);
            mask_rows.push(Tensor::new(encoding.attention_mask.as_slice(), &self.device)?);
        }
        Ok((Tensor::stack(&id_rows, 0)?, Tensor::stack(&mask_rows, 0)?))
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn max_length(&self) -> usize {
        self.tokenizer.max_length()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::{slow_executor, stub_executor as executor};

    fn prompts(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_compute_shapes() {
        let executor = executor(32, 1.0, 64).unwrap();
        let result = executor
            .compute(&prompts(&["the cat sat", "i like to eat"]))
            .unwrap();

        assert_eq!(result.logit.len(), 2);
        assert_eq!(result.logit_index.len(), 2);
        for (logits, indices) in result.logit.iter().zip(&result.logit_index) {
            assert_eq!(logits.len(), 8);
            assert_eq!(indices.len(), 8);
            for (row, idx_row) in logits.iter().zip(indices) {
                assert_eq!(row.len(), TOP_K);
                assert_eq!(idx_row.len(), TOP_K);
            }
        }
    }

    #[test]
    fn test_empty_task_rejected() {
        let executor = executor(32, 1.0, 64).unwrap();
        assert!(executor.compute(&[]).is_err());
    }

    #[test]
    fn test_indices_stay_within_vocabulary() {
        let executor = executor(32, 1.0, 64).unwrap();
        let result = executor
            .compute(&prompts(&["the cat sat on the mat"]))
            .unwrap();

        for positions in &result.logit_index {
            for row in positions {
                for &index in row {
                    assert!(index >= 0);
                    assert!((index as usize) < 32);
                }
            }
        }
    }

    #[test]
    fn test_top_k_is_descending_and_deterministic() {
        let executor = executor(32, 1.0, 64).unwrap();
        let first = executor.compute(&prompts(&["the cat sat"])).unwrap();

        let row = &first.logit[0][0];
        let idx = &first.logit_index[0][0];
        assert_eq!(idx[0], 31);
        assert_eq!(idx[TOP_K - 1], 16);
        assert_eq!(row[0], 31.0);
        for pair in row.windows(2) {
            assert!(pair[0] > pair[1]);
        }

        let second = executor.compute(&prompts(&["the cat sat"])).unwrap();
        assert_eq!(first.logit, second.logit);
        assert_eq!(first.logit_index, second.logit_index);
    }

    #[test]
    fn test_chunking_preserves_order_and_rows() {
        let task = prompts(&[
            "the cat sat",
            "i like to eat",
            "the dog ran",
            "breakfast for the cat",
            "the mat",
        ]);
        let chunked = executor(32, 1.0, 2).unwrap().compute(&task).unwrap();
        let single = executor(32, 1.0, 64).unwrap().compute(&task).unwrap();

        assert_eq!(chunked.logit.len(), 5);
        assert_eq!(chunked.logit, single.logit);
        assert_eq!(chunked.logit_index, single.logit_index);
    }

    #[test]
    fn test_logits_are_rounded_to_f16() {
        let executor = executor(32, 0.1, 64).unwrap();
        let result = executor.compute(&prompts(&["the cat"])).unwrap();

        let expected = Tensor::arange(0f32, 32f32, &Device::Cpu)
            .unwrap()
            .affine(0.1, 0.0)
            .unwrap()
            .to_dtype(DType::F16)
            .unwrap()
            .to_dtype(DType::F32)
            .unwrap()
            .to_vec1::<f32>()
            .unwrap();

        assert_eq!(result.logit[0][0][0], expected[31]);
        assert_ne!(result.logit[0][0][0], 31.0f32 * 0.1f32);
    }

    #[test]
    fn test_elapsed_time_is_positive() {
        let executor = executor(32, 1.0, 64).unwrap();
        let result = executor.compute(&prompts(&["the cat"])).unwrap();
        assert!(result.elapsed_time > 0.0);
    }

    #[test]
    fn test_elapsed_time_covers_all_chunks() {
        let delay = Duration::from_millis(20);
        let task = prompts(&["the cat", "the dog", "the mat"]);

        // Three sequential forward passes against one.
        let chunked = slow_executor(delay, 1).unwrap().compute(&task).unwrap();
        let single = slow_executor(delay, 64).unwrap().compute(&task).unwrap();

        assert!(chunked.elapsed_time >= (delay * 3).as_secs_f64());
        assert!(chunked.elapsed_time > single.elapsed_time);
    }

    #[test]
    fn test_vocabulary_smaller_than_top_k_rejected() {
        assert!(executor(8, 1.0, 64).is_err());
    }

    #[test]
    fn test_vocabulary_exceeding_index_range_rejected() {
        assert!(executor(40_000, 1.0, 64).is_err());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        assert!(executor(32, 1.0, 0).is_err());
    }
}
