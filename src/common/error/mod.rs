//! Unified error types for the OFD library.
//!
//! Every fallible operation in the crate reports one of these variants. The
//! variants carry the member path, element, attribute or id that failed so a
//! caller can present the failure without re-deriving the context.

// Submodule declarations
pub mod types;
pub mod conversions;

// Re-exports
pub use types::{Error, ResourceKind, Result};
