// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Error type for working-copy conversion and source emission.
//!
//! Structural errors (a generator missing its name or type) and transformer
//! failures are fatal to the call that hit them. Resolution misses are never
//! errors; they surface as `Option` in the model crate.

use std::error::Error as StdError;

use thiserror::Error;

use tugjava_core::ModelError;
use tugjava_model::ElementKind;

/// Boxed error raised by user transformer code.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum GenError {
    /// A generator reached `generate` without an element name.
    #[error("{kind} generator has no name")]
    MissingName { kind: ElementKind },

    /// A return, field or parameter type yielded no value.
    #[error("{kind} '{name}' has no type")]
    MissingType { kind: ElementKind, name: String },

    /// A transformer callback failed. The conversion is abandoned.
    #[error("{kind} transformer failed: {source}")]
    Transformer {
        kind: ElementKind,
        #[source]
        source: BoxError,
    },

    /// An element was handed to the transformer twice in one conversion.
    #[error("element {key} was transformed more than once")]
    DuplicateTransform { key: String },

    /// `Transform::Flatten` in a position that holds exactly one element.
    #[error("{kind} working copy cannot be flattened here")]
    NotFlattenable { kind: ElementKind },

    /// The transformer removed the element a conversion was started from.
    #[error("root {kind} was removed by the transformer")]
    RootRemoved { kind: ElementKind },

    /// Codegen options could not be parsed.
    #[error("invalid codegen options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type for generator operations.
pub type GenResult<T> = Result<T, GenError>;

impl GenError {
    /// Wrap a user error raised while transforming an element of `kind`.
    pub fn transformer(kind: ElementKind, source: impl Into<BoxError>) -> Self {
        GenError::Transformer {
            kind,
            source: source.into(),
        }
    }

    pub fn missing_name(kind: ElementKind) -> Self {
        GenError::MissingName { kind }
    }

    pub fn missing_type(kind: ElementKind, name: impl Into<String>) -> Self {
        GenError::MissingType {
            kind,
            name: name.into(),
        }
    }
}
