// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// Every piece of the residual recurrent language model lives here.
//
//   token ids (B, S)
//     │  embedding.rs   — lookup table, padding row held at zero
//     │  dropout(embedding_dropout)
//     ▼
//   (B, S, E)
//     │  projection.rs  — pre stack: E→H, then H→H, ReLU each
//     ▼
//   (B, S, H)
//     │  recurrent.rs   — residual recurrent block: y = RNN(x) + x
//     │  projection.rs  — post stack: dropout → H→H
//     ▼
//   (B, S, H)
//     │  output.rs      — H→V, optionally tied to the embedding
//     ▼
//   logits (B, S, V)
//
//   config.rs     — ModelConfig and cell variant selection
//   model.rs      — LanguageModel facade wiring the stages above
//   update.rs     — one optimiser step that leaves the padding row alone
//   inferencer.rs — next-token prediction for a padded batch
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Cho et al. (2014) GRU

/// ModelConfig and CellVariant
pub mod config;

/// Token embedding with a reserved padding row
pub mod embedding;

/// Pre- and post-projection stacks
pub mod projection;

/// Recurrent cells and the residual recurrent block
pub mod recurrent;

/// Vocabulary projection, optionally weight-tied
pub mod output;

/// The full language model
pub mod model;

/// Padding-aware optimiser step
pub mod update;

/// Next-token predictor
pub mod inferencer;
