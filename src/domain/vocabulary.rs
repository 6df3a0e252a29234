// ============================================================
// Layer 3 — Vocabulary Domain Types
// ============================================================
// Reserved tokens are carried per vocabulary instance, so two
// tokenizers with different layouts never interfere.
//
// Default layout (ids):
//   [bos] = 0   begin of sequence
//   [eos] = 1   end of sequence
//   [pad] = 2   padding
//   [unk] = 3   unknown
//
// Reference: Rust Book §5 (Structs)

use serde::{Deserialize, Serialize};

use crate::domain::error::{ModelError, ModelResult};
use crate::domain::traits::Vocabulary;

pub const BOS_TOKEN: &str = "[bos]";
pub const EOS_TOKEN: &str = "[eos]";
pub const PAD_TOKEN: &str = "[pad]";
pub const UNK_TOKEN: &str = "[unk]";

/// Ids of the four reserved tokens of one vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialTokens {
    pub bos: u32,
    pub eos: u32,
    pub pad: u32,
    pub unk: u32,
}

impl Default for SpecialTokens {
    fn default() -> Self {
        Self { bos: 0, eos: 1, pad: 2, unk: 3 }
    }
}

impl SpecialTokens {
    pub fn contains(&self, id: u32) -> bool {
        id == self.bos || id == self.eos || id == self.pad || id == self.unk
    }
}

/// A vocabulary known only by its size and reserved ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedVocabulary {
    vocab_size: usize,
    special:    SpecialTokens,
}

impl FixedVocabulary {
    /// Fails when a reserved id does not fit in `vocab_size`.
    pub fn new(vocab_size: usize, special: SpecialTokens) -> ModelResult<Self> {
        if vocab_size == 0 {
            return Err(ModelError::InvalidDimension { name: "vocab_size", value: 0 });
        }
        let largest = special.bos.max(special.eos).max(special.pad).max(special.unk) as usize;
        if largest >= vocab_size {
            return Err(ModelError::PaddingIdOutOfRange {
                padding_id: largest,
                vocab_size,
            });
        }
        Ok(Self { vocab_size, special })
    }

    /// Vocabulary with the given padding id; the other reserved ids
    /// keep their defaults only where they fit.
    pub fn with_padding(vocab_size: usize, padding_id: u32) -> ModelResult<Self> {
        let special = SpecialTokens {
            pad: padding_id,
            ..SpecialTokens::default()
        };
        let special = SpecialTokens {
            bos: special.bos.min(padding_id),
            eos: special.eos.min(padding_id),
            unk: special.unk.min(padding_id),
            ..special
        };
        Self::new(vocab_size, special)
    }

    pub fn special_tokens(&self) -> SpecialTokens {
        self.special
    }
}

impl Vocabulary for FixedVocabulary {
    fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    fn padding_id(&self) -> usize {
        self.special.pad as usize
    }
}
