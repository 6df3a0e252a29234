// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// From id sequences to model-ready tensors:
//
//   text
//     │  TextCodec (tokenizer collaborator)
//     ▼
//   Vec<Vec<u32>>     variable-length id sequences
//     │  TokenBatcher
//     ▼
//   TokenBatch        [batch, seq_len] Int tensor, right-padded
//
// Dataset ingestion and text normalisation live outside this crate.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Right-padding Batcher for token id sequences
pub mod batcher;
