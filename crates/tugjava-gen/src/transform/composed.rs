// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! A transformer assembled from per-kind closures.
//!
//! ```
//! use tugjava_gen::ComposedTransformer;
//!
//! let transformer = ComposedTransformer::builder()
//!     .on_import(|input| {
//!         if input.model().imported_name().starts_with("java.awt") {
//!             input.remove()
//!         } else {
//!             input.keep()
//!         }
//!     })
//!     .build();
//! assert!(transformer.handles_import());
//! assert!(!transformer.handles_method());
//! ```

use std::fmt;
use std::sync::Arc;

use super::*;

macro_rules! composed_transformer {
    (
        $(
            $base_name:ident : $input:ident => $generator:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            /// A [`WorkingCopyTransformer`] whose methods delegate to closures.
            ///
            /// Kinds without a closure keep their default working copy.
            #[derive(Clone, Default)]
            pub struct ComposedTransformer {
                $(
                    [<$base_name _fn>]: Option<
                        Arc<dyn Fn($input<'_>) -> GenResult<Transform<$generator>> + Send + Sync>,
                    >,
                )*
            }

            /// Builder for [`ComposedTransformer`].
            #[derive(Clone, Default)]
            pub struct ComposedTransformerBuilder {
                inner: ComposedTransformer,
            }

            impl ComposedTransformer {
                pub fn builder() -> ComposedTransformerBuilder {
                    ComposedTransformerBuilder::default()
                }

                $(
                    #[doc = concat!(
                        "Check if a closure was supplied for `transform_",
                        stringify!($base_name),
                        "`."
                    )]
                    pub fn [<handles_ $base_name>](&self) -> bool {
                        self.[<$base_name _fn>].is_some()
                    }
                )*

                fn handled(&self) -> Vec<&'static str> {
                    let mut kinds = Vec::new();
                    $(
                        if self.[<$base_name _fn>].is_some() {
                            kinds.push(stringify!($base_name));
                        }
                    )*
                    kinds
                }
            }

            impl ComposedTransformerBuilder {
                $(
                    #[doc = concat!("Use `f` for `transform_", stringify!($base_name), "`.")]
                    #[must_use]
                    pub fn [<on_ $base_name>](
                        mut self,
                        f: impl Fn($input<'_>) -> GenResult<Transform<$generator>>
                            + Send
                            + Sync
                            + 'static,
                    ) -> Self {
                        self.inner.[<$base_name _fn>] = Some(Arc::new(f));
                        self
                    }
                )*

                pub fn build(self) -> ComposedTransformer {
                    self.inner
                }
            }

            impl WorkingCopyTransformer for ComposedTransformer {
                $(
                    fn [<transform_ $base_name>](
                        &self,
                        input: $input<'_>,
                    ) -> GenResult<Transform<$generator>> {
                        match &self.[<$base_name _fn>] {
                            Some(f) => f(input),
                            None => input.keep(),
                        }
                    }
                )*
            }
        }
    };
}

composed_transformer! {
    compilation_unit: UnitInput => CompilationUnitGenerator,
    package: PackageInput => String,
    import: ImportInput => String,
    type: TypeInput => TypeGenerator,
    field: FieldInput => FieldGenerator,
    method: MethodInput => MethodGenerator,
    method_parameter: ParameterInput => MethodParameterGenerator,
    type_parameter: TypeParameterInput => TypeParameterGenerator,
    annotation: AnnotationInput => AnnotationGenerator,
    annotation_element: AnnotationElementInput => AnnotationElementGenerator,
}

impl fmt::Debug for ComposedTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposedTransformer")
            .field("handles", &self.handled())
            .finish()
    }
}

impl fmt::Debug for ComposedTransformerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposedTransformerBuilder")
            .field("handles", &self.inner.handled())
            .finish()
    }
}
