// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use tracing::trace;

use tugjava_core::names::qualify;
use tugjava_core::Modifiers;
use tugjava_model::{ElementKind, TypeKind};

use super::type_param::render_type_parameters;
use super::{
    emit_javadoc, join_words, AnnotationGenerator, FieldGenerator, Generate, MethodGenerator,
    TypeParameterGenerator, TypeRef,
};
use crate::context::{with_type_arguments, BuilderContext, TypeFrame};
use crate::error::{GenError, GenResult};
use crate::output::{normalize_block, SourceBuilder};

/// A member of a type body, in declaration order.
#[derive(Debug, Clone)]
pub enum MemberGenerator {
    Field(FieldGenerator),
    Method(MethodGenerator),
    Type(TypeGenerator),
}

impl MemberGenerator {
    pub fn name(&self) -> Option<&str> {
        match self {
            MemberGenerator::Field(field) => field.name(),
            MemberGenerator::Method(method) => method.name(),
            MemberGenerator::Type(ty) => Some(ty.name()),
        }
    }

    pub fn as_field(&self) -> Option<&FieldGenerator> {
        match self {
            MemberGenerator::Field(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&MethodGenerator> {
        match self {
            MemberGenerator::Method(method) => Some(method),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<&TypeGenerator> {
        match self {
            MemberGenerator::Type(ty) => Some(ty),
            _ => None,
        }
    }
}

impl From<FieldGenerator> for MemberGenerator {
    fn from(field: FieldGenerator) -> Self {
        MemberGenerator::Field(field)
    }
}

impl From<MethodGenerator> for MemberGenerator {
    fn from(method: MethodGenerator) -> Self {
        MemberGenerator::Method(method)
    }
}

impl From<TypeGenerator> for MemberGenerator {
    fn from(ty: TypeGenerator) -> Self {
        MemberGenerator::Type(ty)
    }
}

impl Generate for MemberGenerator {
    fn generate(&self, out: &mut SourceBuilder, ctx: &mut BuilderContext) -> GenResult<()> {
        match self {
            MemberGenerator::Field(field) => field.generate(out, ctx),
            MemberGenerator::Method(method) => method.generate(out, ctx),
            MemberGenerator::Type(ty) => ty.generate(out, ctx),
        }
    }
}

/// A class, interface, enum or annotation type declaration.
#[derive(Debug, Clone, Default)]
pub struct TypeGenerator {
    name: String,
    kind: TypeKind,
    modifiers: Modifiers,
    type_parameters: Vec<TypeParameterGenerator>,
    super_class: Option<TypeRef>,
    interfaces: Vec<TypeRef>,
    annotations: Vec<AnnotationGenerator>,
    members: Vec<MemberGenerator>,
    enum_constants: Option<String>,
    javadoc: Option<String>,
}

impl TypeGenerator {
    pub fn new(kind: TypeKind, name: impl Into<String>) -> Self {
        TypeGenerator {
            name: name.into(),
            kind,
            ..Default::default()
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        TypeGenerator::new(TypeKind::Class, name)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        TypeGenerator::new(TypeKind::Interface, name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn type_parameters(&self) -> &[TypeParameterGenerator] {
        &self.type_parameters
    }

    pub fn super_class(&self) -> Option<&TypeRef> {
        self.super_class.as_ref()
    }

    pub fn interfaces(&self) -> &[TypeRef] {
        &self.interfaces
    }

    pub fn annotations(&self) -> &[AnnotationGenerator] {
        &self.annotations
    }

    pub fn annotations_mut(&mut self) -> &mut Vec<AnnotationGenerator> {
        &mut self.annotations
    }

    pub fn members(&self) -> &[MemberGenerator] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut Vec<MemberGenerator> {
        &mut self.members
    }

    pub fn enum_constants(&self) -> Option<&str> {
        self.enum_constants.as_deref()
    }

    pub fn javadoc(&self) -> Option<&str> {
        self.javadoc.as_deref()
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldGenerator> {
        self.members.iter().filter_map(MemberGenerator::as_field)
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodGenerator> {
        self.members.iter().filter_map(MemberGenerator::as_method)
    }

    /// First method named `name`.
    pub fn find_method(&self, name: &str) -> Option<&MethodGenerator> {
        self.methods().find(|m| m.name() == Some(name))
    }

    pub fn find_member_type(&self, name: &str) -> Option<&TypeGenerator> {
        self.members
            .iter()
            .filter_map(MemberGenerator::as_type)
            .find(|t| t.name == name)
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: TypeKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn with_type_parameters(mut self, params: Vec<TypeParameterGenerator>) -> Self {
        self.type_parameters = params;
        self
    }

    #[must_use]
    pub fn with_super_class(mut self, super_class: Option<TypeRef>) -> Self {
        self.super_class = super_class;
        self
    }

    #[must_use]
    pub fn with_interface(mut self, interface: impl Into<TypeRef>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    #[must_use]
    pub fn with_interfaces(mut self, interfaces: Vec<TypeRef>) -> Self {
        self.interfaces = interfaces;
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
    pub fn with_member(mut self, member: impl Into<MemberGenerator>) -> Self {
        self.members.push(member.into());
        self
    }

    #[must_use]
    pub fn with_members(mut self, members: Vec<MemberGenerator>) -> Self {
        self.members = members;
        self
    }

    #[must_use]
    pub fn with_enum_constants(mut self, constants: Option<String>) -> Self {
        self.enum_constants = constants;
        self
    }

    #[must_use]
    pub fn with_javadoc(mut self, javadoc: Option<String>) -> Self {
        self.javadoc = javadoc;
        self
    }

    /// Frame for this type, nested in the current frame or the unit's package.
    fn frame(&self, ctx: &BuilderContext) -> TypeFrame {
        let fqn = match ctx.enclosing_type() {
            Some(outer) => format!("{}.{}", outer.fully_qualified_name, self.name),
            None => qualify(ctx.imports().package(), &self.name),
        };
        let mut frame = TypeFrame::new(fqn, self.kind);
        frame.type_variables = self.type_parameters.iter().map(|p| p.variable(ctx)).collect();
        frame.super_types = self
            .super_class
            .iter()
            .chain(&self.interfaces)
            .filter_map(|ty| {
                let fqn = ty.qualified_name(ctx)?;
                let written = ty.peek(ctx).unwrap_or_default();
                Some(with_type_arguments(fqn, &written))
            })
            .collect();
        frame
    }

    fn render_header(&self, ctx: &mut BuilderContext) -> GenResult<String> {
        let type_params = render_type_parameters(&self.type_parameters, ctx)?;
        let super_class = match &self.super_class {
            Some(ty) => ty.resolve(ctx),
            None => None,
        };
        let interfaces: Vec<String> = self
            .interfaces
            .iter()
            .filter_map(|ty| ty.resolve(ctx))
            .collect();

        let modifiers = self.modifiers.to_string();
        let mut header = join_words([modifiers.as_str(), self.kind.keyword()]);
        header.push(' ');
        header.push_str(&self.name);
        header.push_str(&type_params);

        let (extends, implements): (Vec<String>, Vec<String>) = match self.kind {
            TypeKind::Class => (super_class.into_iter().collect(), interfaces),
            TypeKind::Interface => (interfaces, Vec::new()),
            TypeKind::Enum => (Vec::new(), interfaces),
            TypeKind::Annotation => (Vec::new(), Vec::new()),
        };
        if !extends.is_empty() {
            header.push_str(" extends ");
            header.push_str(&extends.join(", "));
        }
        if !implements.is_empty() {
            header.push_str(" implements ");
            header.push_str(&implements.join(", "));
        }
        header.push_str(" {");
        Ok(header)
    }

    fn generate_body(&self, out: &mut SourceBuilder, ctx: &mut BuilderContext) -> GenResult<()> {
        if let Some(constants) = self.enum_constants.as_deref() {
            let lines = normalize_block(constants);
            let last = lines.len().saturating_sub(1);
            for (i, line) in lines.iter().enumerate() {
                if i == last && !self.members.is_empty() {
                    out.add_line(&format!("{};", line));
                } else if line.is_empty() {
                    out.add_newline();
                } else {
                    out.add_line(line);
                }
            }
            if !lines.is_empty() && !self.members.is_empty() {
                out.add_newline();
            }
        }
        let mut previous: Option<&MemberGenerator> = None;
        for member in &self.members {
            let both_fields = matches!(
                (previous, member),
                (Some(MemberGenerator::Field(_)), MemberGenerator::Field(_))
            );
            if previous.is_some() && !both_fields {
                out.add_newline();
            }
            member.generate(out, ctx)?;
            previous = Some(member);
        }
        Ok(())
    }
}

impl Generate for TypeGenerator {
    fn generate(&self, out: &mut SourceBuilder, ctx: &mut BuilderContext) -> GenResult<()> {
        if self.name.is_empty() {
            return Err(GenError::missing_name(ElementKind::Type));
        }
        emit_javadoc(out, ctx, self.javadoc.as_deref());
        for annotation in &self.annotations {
            annotation.generate(out, ctx)?;
        }
        let header = self.render_header(ctx)?;
        out.add_line(&header);

        let frame = self.frame(ctx);
        trace!(fqn = %frame.fully_qualified_name, supers = ?frame.super_types, "emitting type");
        ctx.push_frame(frame);
        out.indent();
        let result = self.generate_body(out, ctx);
        out.dedent();
        ctx.pop_frame();
        result?;

        out.add_line("}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::MethodParameterGenerator;
    use crate::options::CodegenOptions;
    use pretty_assertions::assert_eq;

    fn render(ty: &TypeGenerator) -> String {
        ty.to_source_with(&mut BuilderContext::new(CodegenOptions::default()))
            .unwrap()
    }

    #[test]
    fn test_class_layout() {
        let ty = TypeGenerator::class("Point")
            .with_modifiers(Modifiers::PUBLIC | Modifiers::FINAL)
            .with_interface("Comparable<Point>")
            .with_member(FieldGenerator::new("int", "x").with_modifiers(Modifiers::PRIVATE))
            .with_member(FieldGenerator::new("int", "y").with_modifiers(Modifiers::PRIVATE))
            .with_member(
                MethodGenerator::new("int", "compareTo")
                    .with_modifiers(Modifiers::PUBLIC)
                    .with_parameter(MethodParameterGenerator::new("Point", "other"))
                    .with_body("return Integer.compare(x, other.x);"),
            )
            .with_member(TypeGenerator::class("Builder").with_modifiers(Modifiers::STATIC));
        assert_eq!(
            render(&ty),
            "public final class Point implements Comparable<Point> {\n    private int x;\n    private int y;\n\n    public int compareTo(Point other) {\n        return Integer.compare(x, other.x);\n    }\n\n    static class Builder {\n    }\n}\n"
        );
    }

    #[test]
    fn test_interface_extends() {
        let ty = TypeGenerator::interface("Shape")
            .with_interface("Comparable<Shape>")
            .with_interface("java.io.Serializable")
            .with_member(MethodGenerator::new("double", "area"));
        assert_eq!(
            render(&ty),
            "interface Shape extends Comparable<Shape>, java.io.Serializable {\n    double area();\n}\n"
        );
    }

    #[test]
    fn test_enum_constants() {
        let ty = TypeGenerator::new(TypeKind::Enum, "Mode")
            .with_enum_constants(Some("\n        FAST,\n        SLOW\n    ".to_string()))
            .with_member(
                MethodGenerator::new("boolean", "isFast").with_body("return this == FAST;"),
            );
        assert_eq!(
            render(&ty),
            "enum Mode {\n    FAST,\n    SLOW;\n\n    boolean isFast() {\n        return this == FAST;\n    }\n}\n"
        );
        let bare = TypeGenerator::new(TypeKind::Enum, "Bare")
            .with_enum_constants(Some("A, B".to_string()));
        assert_eq!(render(&bare), "enum Bare {\n    A, B\n}\n");
    }

    #[test]
    fn test_nested_frames() {
        let mut ctx = BuilderContext::new(CodegenOptions::default())
            .with_imports(crate::context::ImportResolver::new("a.b"));
        let inner = TypeGenerator::class("Inner").with_member(MethodGenerator::new(
            TypeRef::computed(|ctx| ctx.enclosing_type().map(|f| f.fully_qualified_name.clone())),
            "self",
        ));
        let outer = TypeGenerator::class("Outer").with_member(inner);
        let text = outer.to_source_with(&mut ctx).unwrap();
        assert!(text.contains("a.b.Outer.Inner self() {"));
        assert!(ctx.enclosing_type().is_none());
    }

    #[test]
    fn test_member_error_pops_frame() {
        let mut ctx = BuilderContext::new(CodegenOptions::default());
        let ty = TypeGenerator::class("Bad").with_member(FieldGenerator::default());
        assert!(ty.to_source_with(&mut ctx).is_err());
        assert!(ctx.enclosing_type().is_none());
    }
}
