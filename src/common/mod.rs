//! Common types, traits, and utilities shared across the object model.
//!
//! This module provides the error taxonomy, document-unique ids and the
//! textual codecs (numbers and XML) used by every container member.

// Submodule declarations
pub mod error;
pub mod id;
pub mod number;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, ResourceKind, Result};
pub use id::{Id, IdAllocator};
