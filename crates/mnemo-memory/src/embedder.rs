// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local sentence embeddings with all-MiniLM-L6-v2.
//!
//! Produces 384-dimensional embeddings on CPU with zero external API calls.
//! Used by the centroid topic model to place texts next to topic centroids.

use std::path::Path;

use mnemo_core::MnemoError;

use crate::onnx::BertSession;

/// Embedding dimensions for all-MiniLM-L6-v2.
pub const EMBEDDING_DIM: usize = 384;

/// Turns a text into one fixed-size, L2-normalized vector.
pub trait SentenceEmbedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, MnemoError>;
}

/// ONNX sentence embedder.
///
/// Loads the quantized INT8 model and tokenizer from one directory.
/// All inference runs on CPU with a single thread.
pub struct OnnxEmbedder {
    bert: BertSession,
}

impl OnnxEmbedder {
    /// Loads `model.onnx` and `tokenizer.json` from `model_dir`.
    pub fn new(model_dir: &Path) -> Result<Self, MnemoError> {
        let bert = BertSession::load(
            &model_dir.join("model.onnx"),
            &model_dir.join("tokenizer.json"),
        )?;
        Ok(Self { bert })
    }

    pub fn is_healthy(&self) -> bool {
        self.bert.is_healthy()
    }
}

impl SentenceEmbedder for OnnxEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, MnemoError> {
        let output = self.bert.run(text)?;
        let seq_len = output.encoding.get_ids().len();
        let hidden_size = output.shape.last().copied().unwrap_or(0);
        if hidden_size == 0 || output.data.len() < seq_len * hidden_size {
            return Err(MnemoError::Model(format!(
                "unexpected embedding output shape {:?}",
                output.shape
            )));
        }

        let pooled = mean_pool_with_attention(
            &output.data,
            output.encoding.get_attention_mask(),
            seq_len,
            hidden_size,
        );
        Ok(l2_normalize(&pooled))
    }
}

/// Attention-masked mean pooling over token embeddings.
fn mean_pool_with_attention(
    embeddings: &[f32],
    attention_mask: &[u32],
    seq_len: usize,
    hidden_size: usize,
) -> Vec<f32> {
    let mut sum = vec![0.0f32; hidden_size];
    let mut count = 0.0f32;

    for (token, &mask) in attention_mask.iter().enumerate().take(seq_len) {
        if mask == 0 {
            continue;
        }
        let row = &embeddings[token * hidden_size..(token + 1) * hidden_size];
        for (acc, value) in sum.iter_mut().zip(row) {
            *acc += value;
        }
        count += 1.0;
    }

    if count > 0.0 {
        for val in &mut sum {
            *val /= count;
        }
    }

    sum
}

pub(crate) fn l2_normalize(vec: &[f32]) -> Vec<f32> {
    let norm: f32 = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        vec.iter().map(|v| v / norm).collect()
    } else {
        vec.to_vec()
    }
}
