// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Java source model.
//!
//! The model has two layers:
//! - **Spi**: immutable [`Snapshot`] arenas built from the compiler
//!   collaborator ([`ElementSource`]); a [`Spi`] is a handle to one node.
//! - **Api**: façades ([`Type`], [`Method`], ...) bound to their Spi through
//!   the weak [`ElementCache`]; equal façades share identity.
//!
//! A [`JavaEnvironment`] owns the current snapshot and can `reload()`; stale
//! elements re-resolve by logical key with `resolve_replacement`.
//!
//! The [`visitor`] module walks the Api tree in pre-order, post-order or
//! breadth-first order.

pub mod api;
pub mod cache;
pub mod decl;
pub mod environment;
pub mod reader;
pub mod snapshot;
pub mod source;
pub mod spi;
pub mod visitor;

pub use api::{
    unwrap, wrap, Annotation, AnnotationElement, ApiElement, CompilationUnit, Field, Import,
    JavaElement, Method, MethodParameter, Package, Type, TypeParameter,
};
pub use cache::{ApiCell, ElementCache};
pub use decl::{write_annotation, AnnotationValue, TypeKind, UnitDecl};
pub use environment::JavaEnvironment;
pub use reader::read_unit;
pub use snapshot::{ElementId, ElementKey, ElementKind, Snapshot, SpiNode};
pub use source::{ElementSource, SourceSet, UnitRead};
pub use spi::{Spi, SpiKey};
pub use tugjava_core::{ModelError, ModelResult, Modifiers, SourceRange};
