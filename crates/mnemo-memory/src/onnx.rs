// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared ONNX Runtime session for BERT-style encoders.
//!
//! Both the sentence embedder and the token classifier feed the same three
//! inputs (`input_ids`, `attention_mask`, `token_type_ids`) and read the
//! first output tensor.

use std::path::Path;
use std::sync::Mutex;

use mnemo_core::MnemoError;
use ndarray::Array2;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::TensorRef;
use tokenizers::{Encoding, Tokenizer};

/// Output of one forward pass.
pub(crate) struct EncoderOutput {
    pub encoding: Encoding,
    /// Shape of the first output tensor, e.g. `[1, seq_len, hidden]`.
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

/// A tokenizer paired with an ONNX session.
pub(crate) struct BertSession {
    /// ONNX Runtime session (not Send, wrapped in Mutex for safety).
    session: Mutex<Session>,
    tokenizer: Tokenizer,
}

impl BertSession {
    pub(crate) fn load(model_path: &Path, tokenizer_path: &Path) -> Result<Self, MnemoError> {
        let tokenizer = Tokenizer::from_file(tokenizer_path).map_err(|e| {
            MnemoError::Model(format!(
                "failed to load tokenizer from {}: {e}",
                tokenizer_path.display()
            ))
        })?;

        let session = Session::builder()
            .map_err(|e| MnemoError::Model(format!("failed to create ONNX session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| MnemoError::Model(format!("failed to set optimization level: {e}")))?
            .with_intra_threads(1)
            .map_err(|e| MnemoError::Model(format!("failed to set thread count: {e}")))?
            .commit_from_file(model_path)
            .map_err(|e| {
                MnemoError::Model(format!(
                    "failed to load ONNX model from {}: {e}",
                    model_path.display()
                ))
            })?;

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
        })
    }

    /// Tokenizes `text` (with special tokens) and runs the model.
    pub(crate) fn run(&self, text: &str) -> Result<EncoderOutput, MnemoError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| MnemoError::Model(format!("tokenization failed: {e}")))?;

        let seq_len = encoding.get_ids().len();
        let input_ids = to_row(encoding.get_ids(), seq_len, "input_ids")?;
        let attention_mask = to_row(encoding.get_attention_mask(), seq_len, "attention_mask")?;
        let token_type_ids = to_row(encoding.get_type_ids(), seq_len, "token_type_ids")?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| MnemoError::Internal(format!("failed to lock ONNX session: {e}")))?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => tensor(&input_ids)?,
                "attention_mask" => tensor(&attention_mask)?,
                "token_type_ids" => tensor(&token_type_ids)?
            ])
            .map_err(|e| MnemoError::Model(format!("ONNX inference failed: {e}")))?;

        let (shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| MnemoError::Model(format!("failed to extract output tensor: {e}")))?;

        Ok(EncoderOutput {
            shape: shape.iter().map(|&d| d as usize).collect(),
            data: data.to_vec(),
            encoding,
        })
    }

    /// Whether the session mutex is still usable.
    pub(crate) fn is_healthy(&self) -> bool {
        self.session.lock().is_ok()
    }
}

// Safety: Session is accessed through Mutex which provides synchronization.
// The tokenizer is thread-safe for encoding operations.
unsafe impl Send for BertSession {}
unsafe impl Sync for BertSession {}

fn to_row(values: &[u32], seq_len: usize, name: &str) -> Result<Array2<i64>, MnemoError> {
    let values: Vec<i64> = values.iter().map(|&v| i64::from(v)).collect();
    Array2::from_shape_vec((1, seq_len), values)
        .map_err(|e| MnemoError::Model(format!("failed to create {name} tensor: {e}")))
}

fn tensor(array: &Array2<i64>) -> Result<TensorRef<'_, i64>, MnemoError> {
    TensorRef::from_array_view(array)
        .map_err(|e| MnemoError::Model(format!("failed to create input tensor: {e}")))
}
