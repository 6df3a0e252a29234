// ============================================================
// Layer 3 — Model Error Taxonomy
// ============================================================
// Every failure the model core can report. Three kinds:
//
//   Configuration    — rejected at construction, never recoverable
//   InputValidation  — a bad token id in one forward call
//   ShapeMismatch    — a tensor whose dims break the (B, S, *) contract
//
// The core performs no I/O, so there is nothing transient to retry.
// Outer layers wrap these with anyhow context.
//
// Reference: Rust Book §9 (Recoverable Errors with Result)

use thiserror::Error;

/// Coarse classification of a [`ModelError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    InputValidation,
    ShapeMismatch,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("configuration error: `{name}` must be >= 1, got {value}")]
    InvalidDimension { name: &'static str, value: usize },

    #[error("configuration error: layer count `{name}` must be >= 1, got {value}")]
    InvalidLayerCount { name: &'static str, value: usize },

    #[error("configuration error: dropout `{name}` must be within [0.0, 1.0], got {value}")]
    InvalidDropout { name: &'static str, value: f64 },

    #[error("configuration error: unknown cell variant '{0}' (expected 'basic' or 'gated')")]
    UnknownCellVariant(String),

    #[error(
        "configuration error: tied output weights need embedding_dim == hidden_dim \
         ({embedding_dim} != {hidden_dim})"
    )]
    TiedDimensionMismatch { embedding_dim: usize, hidden_dim: usize },

    #[error("configuration error: padding id {padding_id} is outside a vocabulary of {vocab_size}")]
    PaddingIdOutOfRange { padding_id: usize, vocab_size: usize },

    #[error("token id {token_id} is outside the vocabulary range [0, {vocab_size})")]
    TokenOutOfRange { token_id: i64, vocab_size: usize },

    #[error("shape mismatch in {context}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        context:  &'static str,
        expected: Vec<usize>,
        actual:   Vec<usize>,
    },
}

impl ModelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ModelError::InvalidDimension { .. }
            | ModelError::InvalidLayerCount { .. }
            | ModelError::InvalidDropout { .. }
            | ModelError::UnknownCellVariant(_)
            | ModelError::TiedDimensionMismatch { .. }
            | ModelError::PaddingIdOutOfRange { .. } => ErrorKind::Configuration,
            ModelError::TokenOutOfRange { .. } => ErrorKind::InputValidation,
            ModelError::ShapeMismatch { .. } => ErrorKind::ShapeMismatch,
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}

/// Result alias used by the model core.
pub type ModelResult<T> = Result<T, ModelError>;
