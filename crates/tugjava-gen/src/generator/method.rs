// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::sync::Arc;

use tugjava_core::names::{erased_signature, erasure};
use tugjava_core::Modifiers;
use tugjava_model::ElementKind;

use super::type_param::render_type_parameters;
use super::{
    emit_javadoc, join_words, AnnotationGenerator, Generate, MethodParameterGenerator,
    TypeParameterGenerator, TypeRef,
};
use crate::context::BuilderContext;
use crate::error::{GenError, GenResult};
use crate::output::{normalize_block, SourceBuilder};
use crate::override_check::effective_annotations;

/// Computes a method body at emission time.
pub type BodyBuilder =
    Arc<dyn Fn(&MethodGenerator, &BuilderContext) -> GenResult<String> + Send + Sync>;

/// The statements of a method body, without the braces.
#[derive(Clone)]
pub enum MethodBody {
    Source(String),
    Computed(BodyBuilder),
}

impl MethodBody {
    pub fn computed(
        f: impl Fn(&MethodGenerator, &BuilderContext) -> GenResult<String> + Send + Sync + 'static,
    ) -> Self {
        MethodBody::Computed(Arc::new(f))
    }
}

impl fmt::Debug for MethodBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodBody::Source(text) => f.debug_tuple("Source").field(text).finish(),
            MethodBody::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for MethodBody {
    fn from(text: &str) -> Self {
        MethodBody::Source(text.to_string())
    }
}

impl From<String> for MethodBody {
    fn from(text: String) -> Self {
        MethodBody::Source(text)
    }
}

/// A method or constructor declaration.
#[derive(Debug, Clone, Default)]
pub struct MethodGenerator {
    name: Option<String>,
    modifiers: Modifiers,
    is_constructor: bool,
    return_type: Option<TypeRef>,
    type_parameters: Vec<TypeParameterGenerator>,
    parameters: Vec<MethodParameterGenerator>,
    exceptions: Vec<TypeRef>,
    annotations: Vec<AnnotationGenerator>,
    varargs: bool,
    override_if_necessary: bool,
    declaring_type: Option<String>,
    body: Option<MethodBody>,
    default_value: Option<String>,
    javadoc: Option<String>,
}

impl MethodGenerator {
    /// A method returning `return_type`.
    pub fn new(return_type: impl Into<TypeRef>, name: impl Into<String>) -> Self {
        MethodGenerator {
            name: Some(name.into()),
            return_type: Some(return_type.into()),
            ..Default::default()
        }
    }

    /// A constructor of the type named `name`.
    pub fn constructor(name: impl Into<String>) -> Self {
        MethodGenerator {
            name: Some(name.into()),
            is_constructor: true,
            ..Default::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn is_constructor(&self) -> bool {
        self.is_constructor
    }

    pub fn return_type(&self) -> Option<&TypeRef> {
        self.return_type.as_ref()
    }

    pub fn type_parameters(&self) -> &[TypeParameterGenerator] {
        &self.type_parameters
    }

    pub fn parameters(&self) -> &[MethodParameterGenerator] {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut Vec<MethodParameterGenerator> {
        &mut self.parameters
    }

    pub fn exceptions(&self) -> &[TypeRef] {
        &self.exceptions
    }

    pub fn annotations(&self) -> &[AnnotationGenerator] {
        &self.annotations
    }

    pub fn annotations_mut(&mut self) -> &mut Vec<AnnotationGenerator> {
        &mut self.annotations
    }

    /// Check if the last parameter is emitted as varargs regardless of its
    /// own flag.
    pub fn is_varargs(&self) -> bool {
        self.varargs
    }

    pub fn override_if_necessary(&self) -> bool {
        self.override_if_necessary
    }

    /// Fully-qualified name of the type this method is declared in, used
    /// for override detection.
    pub fn declaring_type(&self) -> Option<&str> {
        self.declaring_type.as_deref()
    }

    pub fn body(&self) -> Option<&MethodBody> {
        self.body.as_ref()
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn javadoc(&self) -> Option<&str> {
        self.javadoc.as_deref()
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn with_constructor(mut self, is_constructor: bool) -> Self {
        self.is_constructor = is_constructor;
        self
    }

    #[must_use]
    pub fn with_return_type(mut self, return_type: Option<TypeRef>) -> Self {
        self.return_type = return_type;
        self
    }

    #[must_use]
    pub fn with_type_parameter(mut self, param: TypeParameterGenerator) -> Self {
        self.type_parameters.push(param);
        self
    }

    #[must_use]
    pub fn with_type_parameters(mut self, params: Vec<TypeParameterGenerator>) -> Self {
        self.type_parameters = params;
        self
    }

    #[must_use]
    pub fn with_parameter(mut self, param: MethodParameterGenerator) -> Self {
        self.parameters.push(param);
        self
    }

    #[must_use]
    pub fn with_parameters(mut self, params: Vec<MethodParameterGenerator>) -> Self {
        self.parameters = params;
        self
    }

    #[must_use]
    pub fn with_exception(mut self, exception: impl Into<TypeRef>) -> Self {
        self.exceptions.push(exception.into());
        self
    }

    #[must_use]
    pub fn with_exceptions(mut self, exceptions: Vec<TypeRef>) -> Self {
        self.exceptions = exceptions;
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

    #[must_use]
    pub fn with_override_if_necessary(mut self, enabled: bool) -> Self {
        self.override_if_necessary = enabled;
        self
    }

    #[must_use]
    pub fn with_declaring_type(mut self, fqn: Option<String>) -> Self {
        self.declaring_type = fqn;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<MethodBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn without_body(mut self) -> Self {
        self.body = None;
        self
    }

    #[must_use]
    pub fn with_default_value(mut self, value: Option<String>) -> Self {
        self.default_value = value;
        self
    }

    #[must_use]
    pub fn with_javadoc(mut self, javadoc: Option<String>) -> Self {
        self.javadoc = javadoc;
        self
    }

    /// Erased signature `name(T1,T2)` as seen from the current context.
    ///
    /// `None` if the name or a parameter type is missing.
    pub fn erased_signature(&self, ctx: &BuilderContext) -> Option<String> {
        let name = self.name.as_deref()?;
        let mut vars: Vec<(String, Option<String>)> =
            self.type_parameters.iter().map(|p| p.variable(ctx)).collect();
        vars.extend(ctx.type_variables());
        let last = self.parameters.len().saturating_sub(1);
        let erased = self
            .parameters
            .iter()
            .enumerate()
            .map(|(i, param)| {
                let mut written = param.peek_type(ctx)?;
                if (param.is_varargs() || (self.varargs && i == last)) && !written.ends_with("...")
                {
                    written.push_str("...");
                }
                Some(erasure(&written, &vars))
            })
            .collect::<Option<Vec<_>>>()?;
        Some(erased_signature(name, erased.iter().map(String::as_str)))
    }

    fn is_bodiless(&self, ctx: &BuilderContext) -> bool {
        if self.modifiers.intersects(Modifiers::ABSTRACT | Modifiers::NATIVE) {
            return true;
        }
        let in_interface = ctx
            .enclosing_type()
            .is_some_and(|frame| frame.kind.is_interface_like());
        in_interface
            && self.body.is_none()
            && !self
                .modifiers
                .intersects(Modifiers::DEFAULT | Modifiers::STATIC | Modifiers::PRIVATE)
    }

    fn render_header(&self, name: &str, ctx: &mut BuilderContext) -> GenResult<String> {
        let return_type = if self.is_constructor {
            String::new()
        } else {
            self.return_type
                .as_ref()
                .and_then(|ty| ty.resolve(ctx))
                .ok_or_else(|| GenError::missing_type(ElementKind::Method, name))?
        };
        let type_params = render_type_parameters(&self.type_parameters, ctx)?;
        let last = self.parameters.len().saturating_sub(1);
        let params = self
            .parameters
            .iter()
            .enumerate()
            .map(|(i, p)| p.render(ctx, self.varargs && i == last))
            .collect::<GenResult<Vec<_>>>()?;

        let modifiers = self.modifiers.to_string();
        let mut header =
            join_words([modifiers.as_str(), type_params.as_str(), return_type.as_str()]);
        if !header.is_empty() {
            header.push(' ');
        }
        header.push_str(name);
        header.push('(');
        header.push_str(&params.join(", "));
        header.push(')');

        let mut throws: Vec<String> = Vec::new();
        for exception in &self.exceptions {
            if let Some(text) = exception.resolve(ctx) {
                if !throws.contains(&text) {
                    throws.push(text);
                }
            }
        }
        if !throws.is_empty() {
            header.push_str(" throws ");
            header.push_str(&throws.join(", "));
        }
        Ok(header)
    }
}

impl Generate for MethodGenerator {
    fn generate(&self, out: &mut SourceBuilder, ctx: &mut BuilderContext) -> GenResult<()> {
        let name = self
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or(GenError::missing_name(ElementKind::Method))?;

        emit_javadoc(out, ctx, self.javadoc.as_deref());
        let annotations = effective_annotations(self, ctx);
        for annotation in annotations.iter() {
            annotation.generate(out, ctx)?;
        }
        let header = self.render_header(name, ctx)?;

        if let Some(value) = self.default_value.as_deref().map(str::trim) {
            out.add_line(&format!("{} default {};", header, value));
            return Ok(());
        }
        if self.is_bodiless(ctx) {
            out.add_line(&format!("{};", header));
            return Ok(());
        }
        let body = match &self.body {
            Some(MethodBody::Source(text)) => text.clone(),
            Some(MethodBody::Computed(f)) => f(self, &*ctx)?,
            None => String::new(),
        };
        out.add_line(&format!("{} {{", header));
        out.indent();
        for line in normalize_block(&body) {
            if line.is_empty() {
                out.add_newline();
            } else {
                out.add_line(line);
            }
        }
        out.dedent();
        out.add_line("}");
        Ok(())
    }
}
