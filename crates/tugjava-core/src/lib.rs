//! Core infrastructure for tugjava.
//!
//! This crate provides the language-level building blocks shared by the model
//! and generator crates:
//! - Source ranges for declarations, bodies and Javadoc
//! - Java modifier flags
//! - Qualified-name and type-erasure utilities
//! - The model error type

pub mod error;
pub mod modifiers;
pub mod names;
pub mod range;

pub use error::{ModelError, ModelResult};
pub use modifiers::Modifiers;
pub use range::SourceRange;
