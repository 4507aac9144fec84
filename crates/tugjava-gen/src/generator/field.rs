// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use tugjava_core::Modifiers;
use tugjava_model::ElementKind;

use super::{emit_javadoc, join_words, AnnotationGenerator, Generate, TypeRef};
use crate::context::BuilderContext;
use crate::error::{GenError, GenResult};
use crate::output::SourceBuilder;

/// A field declaration: `mods Type name[ = init];`.
#[derive(Debug, Clone, Default)]
pub struct FieldGenerator {
    name: Option<String>,
    data_type: Option<TypeRef>,
    modifiers: Modifiers,
    annotations: Vec<AnnotationGenerator>,
    initializer: Option<String>,
    javadoc: Option<String>,
}

impl FieldGenerator {
    pub fn new(data_type: impl Into<TypeRef>, name: impl Into<String>) -> Self {
        FieldGenerator {
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

    pub fn initializer(&self) -> Option<&str> {
        self.initializer.as_deref()
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
    pub fn with_initializer(mut self, initializer: Option<String>) -> Self {
        self.initializer = initializer;
        self
    }

    #[must_use]
    pub fn with_javadoc(mut self, javadoc: Option<String>) -> Self {
        self.javadoc = javadoc;
        self
    }
}

impl Generate for FieldGenerator {
    fn generate(&self, out: &mut SourceBuilder, ctx: &mut BuilderContext) -> GenResult<()> {
        let name = self
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or(GenError::missing_name(ElementKind::Field))?;
        let data_type = self
            .data_type
            .as_ref()
            .and_then(|ty| ty.resolve(ctx))
            .ok_or_else(|| GenError::missing_type(ElementKind::Field, name))?;

        emit_javadoc(out, ctx, self.javadoc.as_deref());
        for annotation in &self.annotations {
            annotation.generate(out, ctx)?;
        }
        let modifiers = self.modifiers.to_string();
        let mut line = join_words([modifiers.as_str(), data_type.as_str(), name]);
        if let Some(init) = self.initializer.as_deref().map(str::trim).filter(|i| !i.is_empty()) {
            line.push_str(" = ");
            line.push_str(init);
        }
        line.push(';');
        out.add_line(&line);
        Ok(())
    }
}
