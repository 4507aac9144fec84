// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Working copies and Java source emission.
//!
//! - [`generator`]: mutable generator trees, one generator per element kind,
//!   and the [`Generate`] trait that emits them as source text.
//! - [`transform`]: the [`WorkingCopyTransformer`] protocol with the
//!   [`DefaultTransformer`] and the closure-based [`ComposedTransformer`].
//! - [`convert`]: turns model elements into generators through a transformer
//!   ([`ToWorkingCopy`]).
//! - [`context`] and [`options`]: what emission needs besides the generators
//!   (imports, enclosing types, [`CodegenOptions`]).
//!
//! ```ignore
//! use tugjava_gen::{Generate, ToWorkingCopy};
//!
//! let ty = env.find_type("shapes.Circle").unwrap();
//! let copy = ty.to_working_copy()?;
//! let text = copy.to_source(&env)?;
//! ```

pub mod context;
pub mod convert;
pub mod error;
pub mod generator;
pub mod options;
pub mod output;
pub mod override_check;
pub mod transform;

pub use context::{BuilderContext, ImportResolver, TypeFrame};
pub use convert::{ConversionStats, ToWorkingCopy, WorkingCopyConverter};
pub use error::{BoxError, GenError, GenResult};
pub use generator::{
    AnnotationElementGenerator, AnnotationGenerator, BodyBuilder, CompilationUnitGenerator,
    FieldGenerator, Generate, ImportGenerator, MemberGenerator, MethodBody, MethodGenerator,
    MethodParameterGenerator, PackageGenerator, TypeGenerator, TypeParameterGenerator, TypeRef,
};
pub use options::CodegenOptions;
pub use output::SourceBuilder;
pub use override_check::{effective_annotations, overrides_super_method};
pub use transform::{
    ComposedTransformer, ComposedTransformerBuilder, DefaultTransformer, Transform,
    TransformInput, WorkingCopyTransformer,
};
