// ============================================================
// Layer 3 — Collaborator Traits
// ============================================================
// The model talks to the tokenizer only through these traits.
//
//   Vocabulary → what the model needs at construction time
//                (vocabulary size and the padding id)
//   TextCodec  → what the application layer needs to turn
//                text into ids and back
//
// Implementations:
//   - FixedVocabulary     (domain::vocabulary) → in-memory, tests
//   - TokenizerVocabulary (infra::tokenizer_store) → tokenizer.json
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

// ─── Vocabulary ───────────────────────────────────────────────────────────────
/// Read-only view of a vocabulary.
///
/// The model reads both values once when its configuration is built
/// and never queries the collaborator again.
pub trait Vocabulary {
    /// Number of ids; valid ids are `0..vocab_size()`.
    fn vocab_size(&self) -> usize;

    /// Id used to right-pad sequences to a common batch width.
    fn padding_id(&self) -> usize;
}

// ─── TextCodec ────────────────────────────────────────────────────────────────
/// Text ⇄ token id conversion.
pub trait TextCodec: Vocabulary {
    /// Encode one text. When `max_seq_len` is set the result is truncated to it.
    fn encode(&self, text: &str, max_seq_len: Option<usize>) -> Result<Vec<u32>>;

    /// Decode ids back into text, optionally dropping special tokens.
    fn decode(&self, ids: &[u32], skip_special: bool) -> Result<String>;

    /// Encode several texts, one id sequence each.
    fn encode_batch(&self, texts: &[String], max_seq_len: Option<usize>) -> Result<Vec<Vec<u32>>> {
        texts
            .iter()
            .map(|t| self.encode(t, max_seq_len))
            .collect()
    }
}
