// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use tugjava_model::ElementKind;

use super::{AnnotationGenerator, Generate};
use crate::context::BuilderContext;
use crate::error::{GenError, GenResult};
use crate::output::SourceBuilder;

/// A package declaration with its annotations.
#[derive(Debug, Clone)]
pub struct PackageGenerator {
    name: String,
    annotations: Vec<AnnotationGenerator>,
}

impl PackageGenerator {
    pub fn new(name: impl Into<String>) -> Self {
        PackageGenerator {
            name: name.into(),
            annotations: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn annotations(&self) -> &[AnnotationGenerator] {
        &self.annotations
    }

    pub fn annotations_mut(&mut self) -> &mut Vec<AnnotationGenerator> {
        &mut self.annotations
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
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
}

impl Generate for PackageGenerator {
    fn generate(&self, out: &mut SourceBuilder, ctx: &mut BuilderContext) -> GenResult<()> {
        if self.name.is_empty() {
            return Err(GenError::missing_name(ElementKind::Package));
        }
        for annotation in &self.annotations {
            annotation.generate(out, ctx)?;
        }
        out.add_line(&format!("package {};", self.name));
        Ok(())
    }
}
