// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Mnemo extraction pipeline.

use thiserror::Error;

/// The primary error type used across all Mnemo adapter traits and pipeline operations.
#[derive(Debug, Error)]
pub enum MnemoError {
    /// Configuration errors (missing credentials, invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The provider cannot serve the requested operation at all.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// LLM provider errors (network failure, HTTP error status, unparseable payload).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The model answered, but not in the structured shape that was asked for.
    #[error("malformed model response: {message}")]
    MalformedResponse { message: String },

    /// Storage adapter errors, propagated unmodified.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Local model loading or inference failures (ONNX, tokenizer, topic table).
    #[error("model error: {0}")]
    Model(String),

    /// Input rejected before any work was done.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MnemoError {
    /// Shorthand for a provider error without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        MnemoError::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a malformed structured response.
    pub fn malformed(message: impl Into<String>) -> Self {
        MnemoError::MalformedResponse {
            message: message.into(),
        }
    }

    /// Whether a retry of the same call can reasonably succeed.
    ///
    /// Network failures and malformed model output are transient; configuration,
    /// unsupported operations, and storage failures are not.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            MnemoError::Provider { .. } | MnemoError::MalformedResponse { .. }
        )
    }
}
