// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Each use case wires the infra stores to the model layer for
// one user-facing goal. No tensor math and no printing here.
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Build and save a fresh model bundle
pub mod init_use_case;

// Next-token prediction for raw text
pub mod predict_use_case;

// Report what a saved bundle contains
pub mod inspect_use_case;
