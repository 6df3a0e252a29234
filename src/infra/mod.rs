// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File-backed collaborators used by the application layer:
//
//   model_store.rs     — Model bundle persistence
//                        ModelConfig as JSON plus every parameter
//                        as a full-precision Burn record, so a
//                        model can be rebuilt without its original
//                        configuration object.
//
//   tokenizer_store.rs — Tokenizer loading
//                        Reads a HuggingFace tokenizer.json and
//                        adapts it to the Vocabulary / TextCodec
//                        traits the model depends on.
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Records)

/// Model config + weights saving and loading
pub mod model_store;

/// Tokenizer loading and the Vocabulary adapter
pub mod tokenizer_store;
