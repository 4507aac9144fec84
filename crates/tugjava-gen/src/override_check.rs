// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Override detection for method generators.
//!
//! A method generator with `override_if_necessary` set gets an `@Override`
//! annotation at emission time when a supertype of the type it is emitted into
//! declares a method with the same erased signature. Detection needs an
//! environment in the [`BuilderContext`]; without one nothing is added. The
//! generator itself is never modified.

use std::borrow::Cow;
use std::collections::{HashSet, VecDeque};

use tracing::trace;

use tugjava_core::names::{
    erased_signature, erasure, strip_type_arguments, substitute_type_variables, type_arguments,
};
use tugjava_core::Modifiers;
use tugjava_model::{ApiElement, ElementId, Method, Type};

use crate::context::BuilderContext;
use crate::generator::{AnnotationGenerator, MethodGenerator};

/// The annotations to emit for `method`, with `@Override` prepended when it
/// is needed and missing.
pub fn effective_annotations<'m>(
    method: &'m MethodGenerator,
    ctx: &BuilderContext,
) -> Cow<'m, [AnnotationGenerator]> {
    let annotations = method.annotations();
    if !method.override_if_necessary()
        || !ctx.options().add_override_annotations
        || method.is_constructor()
        || method.modifiers().intersects(Modifiers::STATIC | Modifiers::PRIVATE)
        || annotations.iter().any(AnnotationGenerator::is_override)
        || !overrides_super_method(method, ctx)
    {
        return Cow::Borrowed(annotations);
    }
    let mut with_override = Vec::with_capacity(annotations.len() + 1);
    with_override.push(AnnotationGenerator::override_marker());
    with_override.extend(annotations.iter().cloned());
    Cow::Owned(with_override)
}

/// Check if a supertype declares an overridable method with the same erased
/// signature as `method`.
///
/// Supertypes come from the method's declaring type when it names a type of
/// the environment, otherwise from the enclosing type frame. Type arguments
/// written for a supertype (`extends Base<String>`) are substituted into its
/// methods' parameter types before erasure.
pub fn overrides_super_method(method: &MethodGenerator, ctx: &BuilderContext) -> bool {
    let Some(signature) = method.erased_signature(ctx) else {
        return false;
    };
    let mut scope_vars = ctx.type_variables();
    let declaring = method.declaring_type().and_then(|fqn| ctx.find_type(fqn));
    if let Some(declaring) = &declaring {
        scope_vars.extend(declaring.type_variables());
    }
    let found = bound_super_types(declaring.as_ref(), ctx).iter().any(|bound| {
        bound.ty.methods().iter().any(|candidate| {
            !candidate.is_constructor()
                && !candidate
                    .modifiers()
                    .intersects(Modifiers::STATIC | Modifiers::PRIVATE)
                && bound.erased_signature(candidate, &scope_vars) == signature
        })
    });
    trace!(signature = %signature, found, "override check");
    found
}

/// A supertype with its type variables bound to the arguments written for
/// it, in terms of the type being emitted.
struct BoundSuper {
    ty: Type,
    bindings: Vec<(String, String)>,
}

impl BoundSuper {
    /// `written` refers to `ty`; its arguments are read through `outer`.
    fn new(ty: Type, written: &str, outer: &[(String, String)]) -> Self {
        let arguments = type_arguments(written);
        let parameters = ty.type_parameters();
        let bindings = if arguments.len() == parameters.len() {
            parameters
                .iter()
                .zip(arguments)
                .map(|(param, arg)| {
                    (
                        param.name().to_string(),
                        substitute_type_variables(arg, outer),
                    )
                })
                .collect()
        } else {
            Vec::new()
        };
        BoundSuper { ty, bindings }
    }

    /// Erased signature of `candidate` as seen from the emitted type.
    fn erased_signature(
        &self,
        candidate: &Method,
        scope_vars: &[(String, Option<String>)],
    ) -> String {
        if self.bindings.is_empty() {
            return candidate.erased_signature().to_string();
        }
        let mut vars: Vec<(String, Option<String>)> = candidate
            .type_parameters()
            .iter()
            .map(|p| (p.name().to_string(), p.bounds().first().cloned()))
            .collect();
        // Method type parameters shadow the type's.
        let bindings: Vec<(String, String)> = self
            .bindings
            .iter()
            .filter(|(name, _)| !vars.iter().any(|(own, _)| own == name))
            .cloned()
            .collect();
        vars.extend(scope_vars.iter().cloned());
        vars.extend(self.ty.type_variables());
        let erased: Vec<String> = candidate
            .parameters()
            .iter()
            .map(|param| {
                let written = substitute_type_variables(param.data_type(), &bindings);
                let mut erased = erasure(&written, &vars);
                if param.is_varargs() {
                    erased.push_str("[]");
                }
                erased
            })
            .collect();
        erased_signature(candidate.name(), erased.iter().map(String::as_str))
    }
}

/// All supertypes, breadth-first, each with its type-variable bindings.
fn bound_super_types(declaring: Option<&Type>, ctx: &BuilderContext) -> Vec<BoundSuper> {
    let mut queue: VecDeque<BoundSuper> = match declaring {
        Some(declaring) => direct_supers(declaring, &[]),
        None => match ctx.enclosing_type() {
            Some(frame) => frame
                .super_types
                .iter()
                .filter_map(|written| {
                    let ty = ctx.find_type(&strip_type_arguments(written))?;
                    Some(BoundSuper::new(ty, written, &[]))
                })
                .collect(),
            None => VecDeque::new(),
        },
    };
    let mut seen: HashSet<ElementId> = declaring.iter().map(|ty| ty.spi().id()).collect();
    let mut out = Vec::new();
    while let Some(bound) = queue.pop_front() {
        if !seen.insert(bound.ty.spi().id()) {
            continue;
        }
        queue.extend(direct_supers(&bound.ty, &bound.bindings));
        out.push(bound);
    }
    out
}

fn direct_supers(ty: &Type, bindings: &[(String, String)]) -> VecDeque<BoundSuper> {
    ty.super_class()
        .into_iter()
        .chain(ty.super_interfaces().iter().map(String::as_str))
        .filter_map(|written| {
            let super_type = ty.resolve_type(written)?;
            Some(BoundSuper::new(super_type, written, bindings))
        })
        .collect()
}
