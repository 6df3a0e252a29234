// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits shared by every other layer.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Error taxonomy of the model core
pub mod error;

// Reserved token layout and an in-memory vocabulary
pub mod vocabulary;

// Collaborator abstractions (vocabulary, text codec)
pub mod traits;
