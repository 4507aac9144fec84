// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use tugjava_model::ElementKind;

use super::{Generate, TypeRef};
use crate::context::BuilderContext;
use crate::error::{GenError, GenResult};
use crate::output::SourceBuilder;

/// A type parameter: `T`, `T extends A & B`.
#[derive(Debug, Clone)]
pub struct TypeParameterGenerator {
    name: String,
    bounds: Vec<TypeRef>,
}

impl TypeParameterGenerator {
    pub fn new(name: impl Into<String>) -> Self {
        TypeParameterGenerator {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> &[TypeRef] {
        &self.bounds
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_bound(mut self, bound: impl Into<TypeRef>) -> Self {
        self.bounds.push(bound.into());
        self
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: Vec<TypeRef>) -> Self {
        self.bounds = bounds;
        self
    }

    /// Name and first bound as written, for erasure.
    pub(crate) fn variable(&self, ctx: &BuilderContext) -> (String, Option<String>) {
        let bound = self.bounds.first().and_then(|b| b.peek(ctx));
        (self.name.clone(), bound)
    }

    pub fn render(&self, ctx: &mut BuilderContext) -> GenResult<String> {
        if self.name.is_empty() {
            return Err(GenError::missing_name(ElementKind::TypeParameter));
        }
        let bounds: Vec<String> = self.bounds.iter().filter_map(|b| b.resolve(ctx)).collect();
        if bounds.is_empty() {
            Ok(self.name.clone())
        } else {
            Ok(format!("{} extends {}", self.name, bounds.join(" & ")))
        }
    }
}

impl Generate for TypeParameterGenerator {
    fn generate(&self, out: &mut SourceBuilder, ctx: &mut BuilderContext) -> GenResult<()> {
        let text = self.render(ctx)?;
        out.add_token(&text);
        Ok(())
    }
}

/// `<A, B extends C>`, or `""` when there are none.
pub(crate) fn render_type_parameters(
    params: &[TypeParameterGenerator],
    ctx: &mut BuilderContext,
) -> GenResult<String> {
    if params.is_empty() {
        return Ok(String::new());
    }
    let rendered = params
        .iter()
        .map(|p| p.render(ctx))
        .collect::<GenResult<Vec<_>>>()?;
    Ok(format!("<{}>", rendered.join(", ")))
}
