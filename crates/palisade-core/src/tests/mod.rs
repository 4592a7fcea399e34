//! Crate-level tests for the game loop.
//!
//! - **Determinism tests**: same seed and commands give identical runs
//! - **Integration tests**: whole games driven through the public surface
//! - **Helper functions**: field and game builders
//!
//! # Test Structure
//!
//! - `determinism.rs`: Tests that verify deterministic execution
//! - `integration.rs`: End-to-end tests of the simulation
//! - `helpers.rs`: Test setup utilities and factory functions

mod determinism;
mod helpers;

// Re-export for convenience
pub use helpers::*;
