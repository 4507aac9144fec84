// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Generators: mutable, tree-shaped builders that emit Java source.
//!
//! There is one generator per element kind. Generators are created from
//! scratch with their `new` constructors and `with_*` mutators, or derived
//! from model elements by the working-copy conversion in [`crate::convert`].
//! They hold no reference back to the model.
//!
//! Every generator implements [`Generate`]; [`Generate::to_source`] renders
//! one generator against an environment.

mod annotation;
mod field;
mod import;
mod method;
mod package;
mod parameter;
mod type_decl;
mod type_param;
mod unit;

use std::fmt;
use std::sync::Arc;

pub use annotation::{AnnotationElementGenerator, AnnotationGenerator};
pub use field::FieldGenerator;
pub use import::ImportGenerator;
pub use method::{BodyBuilder, MethodBody, MethodGenerator};
pub use package::PackageGenerator;
pub use parameter::MethodParameterGenerator;
pub use type_decl::{MemberGenerator, TypeGenerator};
pub use type_param::TypeParameterGenerator;
pub use unit::CompilationUnitGenerator;

use tugjava_model::JavaEnvironment;

use crate::context::BuilderContext;
use crate::error::GenResult;
use crate::output::{split_lines, SourceBuilder};

/// Emit source text for a generator.
pub trait Generate {
    /// Append this generator's source to `out`.
    fn generate(&self, out: &mut SourceBuilder, ctx: &mut BuilderContext) -> GenResult<()>;

    /// Render with an explicit context.
    fn to_source_with(&self, ctx: &mut BuilderContext) -> GenResult<String> {
        let mut out = SourceBuilder::new(ctx.options());
        self.generate(&mut out, ctx)?;
        Ok(out.into_string())
    }

    /// Render against `env`, with options derived from it.
    fn to_source(&self, env: &JavaEnvironment) -> GenResult<String> {
        self.to_source_with(&mut BuilderContext::for_environment(env))
    }
}

/// Produces a type name from the build context; `None` means "no type".
pub type ComputedType = Arc<dyn Fn(&BuilderContext) -> Option<String> + Send + Sync>;

/// A type reference held by a generator.
#[derive(Clone)]
pub enum TypeRef {
    /// Emitted exactly as written.
    Source(String),
    /// Fully-qualified; qualified names inside are emitted through the
    /// unit's import resolver, adding imports where needed.
    Qualified(String),
    /// Computed at build time.
    Computed(ComputedType),
}

impl TypeRef {
    pub fn source(text: impl Into<String>) -> Self {
        TypeRef::Source(text.into())
    }

    pub fn qualified(fqn: impl Into<String>) -> Self {
        TypeRef::Qualified(fqn.into())
    }

    pub fn computed(f: impl Fn(&BuilderContext) -> Option<String> + Send + Sync + 'static) -> Self {
        TypeRef::Computed(Arc::new(f))
    }

    /// The text to emit, or `None` if the reference yields no type.
    pub fn resolve(&self, ctx: &mut BuilderContext) -> Option<String> {
        let text = match self {
            TypeRef::Source(text) => text.trim().to_string(),
            TypeRef::Qualified(fqn) => ctx.imports_mut().reference_type(fqn.trim()),
            TypeRef::Computed(f) => f(&*ctx)?,
        };
        (!text.is_empty()).then_some(text)
    }

    /// The type as written or qualified, without touching imports.
    ///
    /// Used for signatures, where the emitted simple name does not matter.
    pub fn peek(&self, ctx: &BuilderContext) -> Option<String> {
        let text = match self {
            TypeRef::Source(text) | TypeRef::Qualified(text) => text.trim().to_string(),
            TypeRef::Computed(f) => f(ctx)?,
        };
        (!text.is_empty()).then_some(text)
    }

    /// Fully-qualified name of the referenced type, as far as it can be known.
    pub(crate) fn qualified_name(&self, ctx: &BuilderContext) -> Option<String> {
        match self {
            TypeRef::Qualified(fqn) => Some(strip_arguments(fqn).to_string()),
            TypeRef::Source(text) => Some(ctx.qualify(text)),
            TypeRef::Computed(f) => f(ctx).map(|text| ctx.qualify(&text)),
        }
    }

    /// The text of a `Source` or `Qualified` reference.
    pub fn as_written(&self) -> Option<&str> {
        match self {
            TypeRef::Source(text) | TypeRef::Qualified(text) => Some(text),
            TypeRef::Computed(_) => None,
        }
    }
}

fn strip_arguments(text: &str) -> &str {
    text.split('<').next().unwrap_or(text).trim()
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Source(text) => f.debug_tuple("Source").field(text).finish(),
            TypeRef::Qualified(fqn) => f.debug_tuple("Qualified").field(fqn).finish(),
            TypeRef::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for TypeRef {
    fn from(text: &str) -> Self {
        TypeRef::source(text)
    }
}

impl From<String> for TypeRef {
    fn from(text: String) -> Self {
        TypeRef::Source(text)
    }
}

/// Write a Javadoc comment, re-indented to the current level.
pub(crate) fn emit_javadoc(out: &mut SourceBuilder, ctx: &BuilderContext, javadoc: Option<&str>) {
    let Some(javadoc) = javadoc else { return };
    if !ctx.options().emit_javadoc {
        return;
    }
    for line in split_lines(javadoc.trim()) {
        let line = line.trim();
        if line.starts_with('*') {
            out.add_line(&format!(" {}", line));
        } else {
            out.add_line(line);
        }
    }
}

/// Join non-empty parts with single spaces.
pub(crate) fn join_words<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
