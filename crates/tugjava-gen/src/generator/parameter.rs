// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use tugjava_core::Modifiers;
use tugjava_model::ElementKind;

use super::annotation::render_inline;
use super::{join_words, AnnotationGenerator, Generate, TypeRef};
use crate::context::BuilderContext;
use crate::error::{GenError, GenResult};
use crate::output::SourceBuilder;

/// A formal parameter: `@A final Type... name`.
#[derive(Debug, Clone, Default)]
pub struct MethodParameterGenerator {
    name: Option<String>,
    data_type: Option<TypeRef>,
    modifiers: Modifiers,
    annotations: Vec<AnnotationGenerator>,
    varargs: bool,
}

impl MethodParameterGenerator {
    pub fn new(data_type: impl Into<TypeRef>, name: impl Into<String>) -> Self {
        MethodParameterGenerator {
            name: Some(name.into()),
            data_type: Some(data_type.into()),
            ..Default::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn data_type(&self) -> Option<&TypeRef> {
        self.data_type.as_ref()
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn annotations(&self) -> &[AnnotationGenerator] {
        &self.annotations
    }

    pub fn annotations_mut(&mut self) -> &mut Vec<AnnotationGenerator> {
        &mut self.annotations
    }

    pub fn is_varargs(&self) -> bool {
        self.varargs
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_type(mut self, data_type: impl Into<TypeRef>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: AnnotationGenerator) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[must_use]
    pub fn with_annotations(mut self, annotations: Vec<AnnotationGenerator>) -> Self {
        self.annotations = annotations;
        self
    }

    #[must_use]
    pub fn with_varargs(mut self, varargs: bool) -> Self {
        self.varargs = varargs;
        self
    }

    /// The declared type as written, for signatures.
    pub(crate) fn peek_type(&self, ctx: &BuilderContext) -> Option<String> {
        self.data_type.as_ref()?.peek(ctx)
    }

    /// The parameter as it appears in a parameter list.
    ///
    /// `force_varargs` is set for the last parameter of a varargs method.
    pub fn render(&self, ctx: &mut BuilderContext, force_varargs: bool) -> GenResult<String> {
        let name = self
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or(GenError::missing_name(ElementKind::MethodParameter))?;
        let mut data_type = self
            .data_type
            .as_ref()
            .and_then(|ty| ty.resolve(ctx))
            .ok_or_else(|| GenError::missing_type(ElementKind::MethodParameter, name))?;
        if (self.varargs || force_varargs) && !data_type.ends_with("...") {
            data_type.push_str("...");
        }
        let annotations = render_inline(&self.annotations, ctx)?;
        let modifiers = self.modifiers.to_string();
        Ok(format!(
            "{}{}",
            annotations,
            join_words([modifiers.as_str(), data_type.as_str(), name])
        ))
    }
}

impl Generate for MethodParameterGenerator {
    fn generate(&self, out: &mut SourceBuilder, ctx: &mut BuilderContext) -> GenResult<()> {
        let text = self.render(ctx, false)?;
        out.add_token(&text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CodegenOptions;

    fn ctx() -> BuilderContext {
        BuilderContext::new(CodegenOptions::default())
    }

    #[test]
    fn test_plain() {
        let param = MethodParameterGenerator::new("int", "count");
        assert_eq!(param.render(&mut ctx(), false).unwrap(), "int count");
    }

    #[test]
    fn test_annotations_and_final() {
        let param = MethodParameterGenerator::new("String", "name")
            .with_modifiers(Modifiers::FINAL)
            .with_annotation(AnnotationGenerator::new("Nonnull"));
        assert_eq!(
            param.render(&mut ctx(), false).unwrap(),
            "@Nonnull final String name"
        );
    }

    #[test]
    fn test_varargs() {
        let param = MethodParameterGenerator::new("Object", "args").with_varargs(true);
        assert_eq!(param.render(&mut ctx(), false).unwrap(), "Object... args");
        let plain = MethodParameterGenerator::new("Object", "args");
        assert_eq!(plain.render(&mut ctx(), true).unwrap(), "Object... args");
    }

    #[test]
    fn test_missing_type() {
        let param = MethodParameterGenerator::default().with_name("x");
        let err = param.render(&mut ctx(), false).unwrap_err();
        assert_eq!(err.to_string(), "method parameter 'x' has no type");
    }

    #[test]
    fn test_missing_name() {
        let param = MethodParameterGenerator::default().with_type("int");
        assert!(matches!(
            param.render(&mut ctx(), false),
            Err(GenError::MissingName { .. })
        ));
    }
}
