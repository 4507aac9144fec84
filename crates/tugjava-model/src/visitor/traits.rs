// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor trait definitions for element traversal.

use crate::api::{
    Annotation, AnnotationElement, CompilationUnit, Field, Import, JavaElement, Method,
    MethodParameter, Package, Type, TypeParameter,
};

/// Result of visiting an element - controls traversal behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TreeVisitResult {
    /// Continue traversal (into children for pre-order and breadth-first).
    #[default]
    Continue,

    /// Skip this element's children.
    ///
    /// In post-order the children have already been visited, so the result
    /// instead aborts the remaining siblings of this element.
    SkipSubtree,

    /// Stop traversal entirely. No further callbacks are made.
    Terminate,
}

/// Order in which [`walk`](super::walk) visits elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TraversalOrder {
    /// Element, then its children left to right.
    #[default]
    PreOrder,
    /// Children left to right, then the element.
    PostOrder,
    /// Level by level, left to right within a level.
    BreadthFirst,
}

/// Macro to generate visitor trait method signatures.
///
/// Generates one `visit_*` method per element kind with a default
/// implementation that returns `TreeVisitResult::Continue`.
macro_rules! element_visitor_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Visit a [`", stringify!($node_type), "`] element.")]
                #[doc = ""]
                #[doc = "`level` is the depth below the walk root, `index` the position among"]
                #[doc = "siblings."]
                #[allow(unused_variables)]
                fn [<visit_ $base_name>](
                    &mut self,
                    node: &$node_type,
                    level: usize,
                    index: usize,
                ) -> TreeVisitResult {
                    TreeVisitResult::Continue
                }
            )*
        }
    };
}

/// Visitor over the Api element tree.
///
/// Implement the `visit_*` methods for the kinds of interest, or override
/// [`ElementVisitor::visit_element`] to see every element in one place.
///
/// # Example
///
/// ```ignore
/// use tugjava_model::visitor::{ElementVisitor, TreeVisitResult};
/// use tugjava_model::{ApiElement, Method};
///
/// struct MethodNames(Vec<String>);
///
/// impl ElementVisitor for MethodNames {
///     fn visit_method(&mut self, node: &Method, _level: usize, _index: usize) -> TreeVisitResult {
///         self.0.push(node.name().to_string());
///         TreeVisitResult::SkipSubtree
///     }
/// }
/// ```
pub trait ElementVisitor {
    element_visitor_methods! {
        compilation_unit: CompilationUnit,
        package: Package,
        import: Import,
        type: Type,
        field: Field,
        method: Method,
        method_parameter: MethodParameter,
        type_parameter: TypeParameter,
        annotation: Annotation,
        annotation_element: AnnotationElement,
    }

    /// Dispatch an element to its kind-specific callback.
    fn visit_element(
        &mut self,
        element: &JavaElement,
        level: usize,
        index: usize,
    ) -> TreeVisitResult {
        match element {
            JavaElement::CompilationUnit(e) => self.visit_compilation_unit(e, level, index),
            JavaElement::Package(e) => self.visit_package(e, level, index),
            JavaElement::Import(e) => self.visit_import(e, level, index),
            JavaElement::Type(e) => self.visit_type(e, level, index),
            JavaElement::Field(e) => self.visit_field(e, level, index),
            JavaElement::Method(e) => self.visit_method(e, level, index),
            JavaElement::MethodParameter(e) => self.visit_method_parameter(e, level, index),
            JavaElement::TypeParameter(e) => self.visit_type_parameter(e, level, index),
            JavaElement::Annotation(e) => self.visit_annotation(e, level, index),
            JavaElement::AnnotationElement(e) => self.visit_annotation_element(e, level, index),
        }
    }
}
