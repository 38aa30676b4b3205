// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! BERT token-classification model for named entity recognition.
//!
//! Expects a model directory with `model.onnx`, `tokenizer.json` and a
//! HuggingFace `config.json` carrying `id2label`. Output mirrors an
//! un-aggregated NER pipeline: one entry per sub-word token whose label is
//! not `O`, special tokens excluded.

use std::collections::HashMap;
use std::path::Path;

use mnemo_core::types::TokenEntity;
use mnemo_core::{MnemoError, TokenClassifier};
use serde::Deserialize;

use crate::onnx::BertSession;

const OUTSIDE_LABEL: &str = "O";

#[derive(Debug, Deserialize)]
struct ModelConfigFile {
    id2label: HashMap<String, String>,
}

/// Parses `id2label` from a HuggingFace `config.json` into a dense table.
pub fn parse_id2label(config_json: &str) -> Result<Vec<String>, MnemoError> {
    let config: ModelConfigFile = serde_json::from_str(config_json)
        .map_err(|e| MnemoError::Model(format!("invalid model config: {e}")))?;

    let mut labels = vec![None; config.id2label.len()];
    for (id, label) in config.id2label {
        let index: usize = id
            .parse()
            .map_err(|_| MnemoError::Model(format!("non-numeric label id `{id}`")))?;
        let slot = labels
            .get_mut(index)
            .ok_or_else(|| MnemoError::Model(format!("label id {index} out of range")))?;
        *slot = Some(label);
    }

    labels
        .into_iter()
        .enumerate()
        .map(|(i, label)| label.ok_or_else(|| MnemoError::Model(format!("missing label id {i}"))))
        .collect()
}

pub struct OnnxTokenClassifier {
    bert: BertSession,
    labels: Vec<String>,
}

impl OnnxTokenClassifier {
    pub fn new(model_dir: &Path) -> Result<Self, MnemoError> {
        let config_path = model_dir.join("config.json");
        let config = std::fs::read_to_string(&config_path).map_err(|e| {
            MnemoError::Model(format!("failed to read {}: {e}", config_path.display()))
        })?;
        let labels = parse_id2label(&config)?;
        let bert = BertSession::load(
            &model_dir.join("model.onnx"),
            &model_dir.join("tokenizer.json"),
        )?;
        Ok(Self { bert, labels })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl TokenClassifier for OnnxTokenClassifier {
    fn classify(&self, text: &str) -> Result<Vec<TokenEntity>, MnemoError> {
        let output = self.bert.run(text)?;
        let num_labels = output.shape.last().copied().unwrap_or(0);
        if num_labels != self.labels.len() {
            return Err(MnemoError::Model(format!(
                "model emits {num_labels} labels but config lists {}",
                self.labels.len()
            )));
        }
        decode_token_labels(
            output.encoding.get_tokens(),
            output.encoding.get_special_tokens_mask(),
            &output.data,
            &self.labels,
        )
    }
}

/// Turns per-token logits into tagged tokens.
///
/// `logits` is row-major `[tokens, labels]`.
pub(crate) fn decode_token_labels(
    tokens: &[String],
    special_tokens_mask: &[u32],
    logits: &[f32],
    labels: &[String],
) -> Result<Vec<TokenEntity>, MnemoError> {
    let num_labels = labels.len();
    if num_labels == 0 || logits.len() < tokens.len() * num_labels {
        return Err(MnemoError::Model(format!(
            "expected {} logits, got {}",
            tokens.len() * num_labels,
            logits.len()
        )));
    }

    let mut entities = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        if special_tokens_mask.get(i).copied().unwrap_or(0) == 1 {
            continue;
        }
        let row = &logits[i * num_labels..(i + 1) * num_labels];
        let (best, score) = softmax_argmax(row);
        let label = &labels[best];
        if label == OUTSIDE_LABEL {
            continue;
        }
        entities.push(TokenEntity {
            word: token.clone(),
            label: label.clone(),
            score,
        });
    }
    Ok(entities)
}

/// Index and probability of the largest logit.
fn softmax_argmax(logits: &[f32]) -> (usize, f32) {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let total: f32 = logits.iter().map(|l| (l - max).exp()).sum();
    let (best, _) = logits
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |acc, (i, &l)| if l > acc.1 { (i, l) } else { acc });
    (best, 1.0 / total)
}
