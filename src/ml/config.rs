// ============================================================
// Layer 5 — Model Configuration
// ============================================================
// One immutable record fixes the whole architecture:
//
//   embedding_dim / hidden_dim        — feature sizes
//   n_pre / n_recurrent / n_post      — layer counts (all >= 1)
//   embedding_dropout / hidden_dropout — probabilities in [0, 1]
//   cell_variant                      — basic or gated recurrence
//   tie_output_weights                — share the embedding table
//                                       with the output layer
//
// vocab_size and padding_id are read once from the Vocabulary
// collaborator and copied in; nothing re-queries it later.
//
// Reference: Burn Book §3 (Config)

use std::{fmt, str::FromStr};

use burn::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::error::{ModelError, ModelResult};
use crate::domain::traits::Vocabulary;

// ─── CellVariant ──────────────────────────────────────────────────────────────
/// Which state-update rule every recurrent layer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellVariant {
    /// `h' = tanh(W_ih x + W_hh h + b)`
    Basic,
    /// Update / reset / candidate gates.
    Gated,
}

impl CellVariant {
    pub fn name(&self) -> &'static str {
        match self {
            CellVariant::Basic => "basic",
            CellVariant::Gated => "gated",
        }
    }
}

impl fmt::Display for CellVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CellVariant {
    type Err = ModelError;

    /// Accepts the short names and the historical model names
    /// (`res-RNN`, `res-GRU`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" | "rnn" | "res-rnn" => Ok(CellVariant::Basic),
            "gated" | "gru" | "res-gru" => Ok(CellVariant::Gated),
            _ => Err(ModelError::UnknownCellVariant(s.to_string())),
        }
    }
}

// ─── ModelConfig ──────────────────────────────────────────────────────────────
// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct ModelConfig {
    pub vocab_size: usize,
    pub padding_id: usize,
    #[config(default = 100)]
    pub embedding_dim: usize,
    #[config(default = 300)]
    pub hidden_dim: usize,
    /// Extra H→H layers after the E→H layer of the pre-projection stack.
    #[config(default = 1)]
    pub n_pre_layers: usize,
    #[config(default = 1)]
    pub n_recurrent_layers: usize,
    /// H→H layers before the final H→H layer of the post-projection stack.
    #[config(default = 1)]
    pub n_post_layers: usize,
    #[config(default = 0.1)]
    pub embedding_dropout: f64,
    #[config(default = 0.1)]
    pub hidden_dropout: f64,
    #[config(default = "CellVariant::Gated")]
    pub cell_variant: CellVariant,
    #[config(default = false)]
    pub tie_output_weights: bool,
}

impl ModelConfig {
    /// Start a configuration from the collaborator's vocabulary.
    pub fn for_vocabulary(vocab: &dyn Vocabulary) -> Self {
        Self::new(vocab.vocab_size(), vocab.padding_id())
    }

    /// Check every construction-time invariant.
    pub fn validate(&self) -> ModelResult<()> {
        if self.vocab_size == 0 {
            return Err(ModelError::InvalidDimension { name: "vocab_size", value: 0 });
        }
        if self.padding_id >= self.vocab_size {
            return Err(ModelError::PaddingIdOutOfRange {
                padding_id: self.padding_id,
                vocab_size: self.vocab_size,
            });
        }

        for (name, value) in [
            ("embedding_dim", self.embedding_dim),
            ("hidden_dim",    self.hidden_dim),
        ] {
            if value < 1 {
                return Err(ModelError::InvalidDimension { name, value });
            }
        }

        for (name, value) in [
            ("n_pre_layers",       self.n_pre_layers),
            ("n_recurrent_layers", self.n_recurrent_layers),
            ("n_post_layers",      self.n_post_layers),
        ] {
            if value < 1 {
                return Err(ModelError::InvalidLayerCount { name, value });
            }
        }

        for (name, value) in [
            ("embedding_dropout", self.embedding_dropout),
            ("hidden_dropout",    self.hidden_dropout),
        ] {
            // NaN fails `contains` as well
            if !(0.0..=1.0).contains(&value) {
                return Err(ModelError::InvalidDropout { name, value });
            }
        }

        if self.tie_output_weights && self.embedding_dim != self.hidden_dim {
            return Err(ModelError::TiedDimensionMismatch {
                embedding_dim: self.embedding_dim,
                hidden_dim:    self.hidden_dim,
            });
        }

        Ok(())
    }

    /// Parse a cell variant name and set it.
    pub fn with_cell_variant_name(self, name: &str) -> ModelResult<Self> {
        Ok(self.with_cell_variant(name.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;
    use crate::domain::vocabulary::FixedVocabulary;

    fn small() -> ModelConfig {
        ModelConfig::new(10, 0)
            .with_embedding_dim(4)
            .with_hidden_dim(4)
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(ModelConfig::new(50, 2).validate().is_ok());
    }

    #[test]
    fn test_rejects_dropout_above_one() {
        let err = small().with_hidden_dropout(1.5).validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(matches!(err, ModelError::InvalidDropout { name: "hidden_dropout", .. }));
    }

    #[test]
    fn test_rejects_negative_and_nan_dropout() {
        assert!(small().with_embedding_dropout(-0.1).validate().is_err());
        assert!(small().with_embedding_dropout(f64::NAN).validate().is_err());
        assert!(small().with_hidden_dropout(1.0).validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_layers() {
        let err = small().with_n_recurrent_layers(0).validate().unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidLayerCount { name: "n_recurrent_layers", value: 0 }
        ));
        assert!(small().with_n_pre_layers(0).validate().is_err());
        assert!(small().with_n_post_layers(0).validate().is_err());
    }

    #[test]
    fn test_rejects_zero_dims() {
        assert!(small().with_embedding_dim(0).validate().is_err());
        assert!(small().with_hidden_dim(0).validate().is_err());
    }

    #[test]
    fn test_tied_needs_equal_dims() {
        let err = small()
            .with_hidden_dim(8)
            .with_tie_output_weights(true)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ModelError::TiedDimensionMismatch { .. }));
        assert!(small().with_tie_output_weights(true).validate().is_ok());
    }

    #[test]
    fn test_padding_must_fit() {
        let err = ModelConfig::new(10, 10).validate().unwrap_err();
        assert!(matches!(err, ModelError::PaddingIdOutOfRange { .. }));
    }

    #[test]
    fn test_cell_variant_names() {
        assert_eq!("basic".parse::<CellVariant>().unwrap(), CellVariant::Basic);
        assert_eq!("res-GRU".parse::<CellVariant>().unwrap(), CellVariant::Gated);
        assert_eq!(" Gated ".parse::<CellVariant>().unwrap(), CellVariant::Gated);

        let err = small().with_cell_variant_name("lstm").unwrap_err();
        assert_eq!(err, ModelError::UnknownCellVariant("lstm".to_string()));
    }

    #[test]
    fn test_reads_vocabulary_once() {
        let vocab = FixedVocabulary::with_padding(32, 0).unwrap();
        let cfg = ModelConfig::for_vocabulary(&vocab);
        assert_eq!(cfg.vocab_size, 32);
        assert_eq!(cfg.padding_id, 0);
    }

    #[test]
    fn test_json_round_trip_keeps_variant() {
        let cfg = small().with_cell_variant(CellVariant::Basic);
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"basic\""));
        let back: ModelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.cell_variant, CellVariant::Basic);
        assert_eq!(back.hidden_dim, 4);
    }
}
