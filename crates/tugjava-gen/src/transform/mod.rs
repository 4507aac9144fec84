// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Working-copy transformer protocol.
//!
//! A [`WorkingCopyTransformer`] has one `transform_*` method per element kind.
//! Each receives a [`TransformInput`] holding the model element and returns a
//! [`Transform`]:
//! - `Keep(g)`: the element is represented by `g` (the default working copy,
//!   an edited version of it, or a new generator)
//! - `Remove`: the element and its subtree are omitted
//! - `Flatten(gs)`: the element is replaced by several generators
//!
//! The default working copy is built lazily, on request. Building it converts
//! the element's children, which fires their callbacks; an element whose
//! parent never builds its default copy is never transformed.
//!
//! Imports and packages are transformed as text: the default copy of an
//! import is its written name (`static a.b.C.m`, `a.b.*`), that of a package
//! is its name.
//!
//! Methods take `&self`. A transformer with state uses interior mutability,
//! since nested default-copy construction re-enters the same transformer.

mod composed;
mod default;
mod input;

pub use composed::{ComposedTransformer, ComposedTransformerBuilder};
pub use default::DefaultTransformer;
pub use input::TransformInput;

use tugjava_model::{
    Annotation, AnnotationElement, CompilationUnit, Field, Import, Method, MethodParameter,
    Package, Type, TypeParameter,
};

use crate::error::GenResult;
use crate::generator::{
    AnnotationElementGenerator, AnnotationGenerator, CompilationUnitGenerator, FieldGenerator,
    MethodGenerator, MethodParameterGenerator, TypeGenerator, TypeParameterGenerator,
};

/// Result of transforming one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform<T> {
    /// Keep the element, represented by this working copy.
    Keep(T),
    /// Remove the element from its parent.
    Remove,
    /// Replace the element with several working copies.
    Flatten(Vec<T>),
}

impl<T> Transform<T> {
    /// Returns true if this is a `Keep` variant.
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep(_))
    }

    /// Returns true if this is a `Remove` variant.
    pub fn is_remove(&self) -> bool {
        matches!(self, Self::Remove)
    }

    /// Returns true if this is a `Flatten` variant.
    pub fn is_flatten(&self) -> bool {
        matches!(self, Self::Flatten(_))
    }

    /// Map the working copies.
    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> Transform<U> {
        match self {
            Transform::Keep(t) => Transform::Keep(f(t)),
            Transform::Remove => Transform::Remove,
            Transform::Flatten(v) => Transform::Flatten(v.into_iter().map(f).collect()),
        }
    }

    /// The working copies this transform contributes to a list.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Transform::Keep(t) => vec![t],
            Transform::Remove => Vec::new(),
            Transform::Flatten(v) => v,
        }
    }
}

impl<T> From<T> for Transform<T> {
    fn from(value: T) -> Self {
        Transform::Keep(value)
    }
}

pub type UnitInput<'c> = TransformInput<'c, CompilationUnit, CompilationUnitGenerator>;
pub type PackageInput<'c> = TransformInput<'c, Package, String>;
pub type ImportInput<'c> = TransformInput<'c, Import, String>;
pub type TypeInput<'c> = TransformInput<'c, Type, TypeGenerator>;
pub type FieldInput<'c> = TransformInput<'c, Field, FieldGenerator>;
pub type MethodInput<'c> = TransformInput<'c, Method, MethodGenerator>;
pub type ParameterInput<'c> = TransformInput<'c, MethodParameter, MethodParameterGenerator>;
pub type TypeParameterInput<'c> = TransformInput<'c, TypeParameter, TypeParameterGenerator>;
pub type AnnotationInput<'c> = TransformInput<'c, Annotation, AnnotationGenerator>;
pub type AnnotationElementInput<'c> =
    TransformInput<'c, AnnotationElement, AnnotationElementGenerator>;

/// Macro to generate the per-kind transformer methods.
///
/// Every generated method keeps the default working copy.
macro_rules! transformer_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $input:ident => $generator:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!(
                    "Transform one element into a `",
                    stringify!($generator),
                    "` working copy."
                )]
                #[doc = ""]
                #[doc = "Keeps the default working copy by default."]
                fn [<transform_ $base_name>](
                    &self,
                    input: $input<'_>,
                ) -> GenResult<Transform<$generator>> {
                    input.keep()
                }
            )*
        }
    };
}

/// Intercepts the conversion of model elements into generators.
pub trait WorkingCopyTransformer {
    transformer_methods! {
        compilation_unit: UnitInput => CompilationUnitGenerator,
        /// The working copy is the package name; keeping a different name
        /// renames the unit's package.
        package: PackageInput => String,
        /// The working copy is the text after `import`.
        import: ImportInput => String,
        type: TypeInput => TypeGenerator,
        field: FieldInput => FieldGenerator,
        method: MethodInput => MethodGenerator,
        method_parameter: ParameterInput => MethodParameterGenerator,
        type_parameter: TypeParameterInput => TypeParameterGenerator,
        annotation: AnnotationInput => AnnotationGenerator,
        annotation_element: AnnotationElementInput => AnnotationElementGenerator,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_map_and_vec() {
        let keep: Transform<i32> = 2.into();
        assert_eq!(keep.clone().map(|v| v * 10), Transform::Keep(20));
        assert_eq!(Transform::Flatten(vec![1, 2]).map(|v| v + 1).into_vec(), vec![2, 3]);
        assert!(Transform::<i32>::Remove.into_vec().is_empty());
        assert!(keep.is_keep() && !keep.is_flatten() && !keep.is_remove());
    }
}
