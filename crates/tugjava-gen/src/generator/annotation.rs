// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Annotation and annotation element generators.

use tugjava_model::{AnnotationValue, ElementKind};

use super::{Generate, TypeRef};
use crate::context::BuilderContext;
use crate::error::{GenError, GenResult};
use crate::output::SourceBuilder;

/// One `name = value` pair of an annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationElementGenerator {
    name: String,
    value: AnnotationValue,
}

impl AnnotationElementGenerator {
    pub fn new(name: impl Into<String>, value: AnnotationValue) -> Self {
        AnnotationElementGenerator {
            name: name.into(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &AnnotationValue {
        &self.value
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: AnnotationValue) -> Self {
        self.value = value;
        self
    }

    /// Number of values, treating a single value as a one-element array.
    pub fn array_len(&self) -> usize {
        match &self.value {
            AnnotationValue::Array(items) => items.len(),
            _ => 1,
        }
    }

    /// Append a value, turning a single value into an array.
    #[must_use]
    pub fn with_array_value(mut self, value: AnnotationValue) -> Self {
        match &mut self.value {
            AnnotationValue::Array(items) => items.push(value),
            single => {
                let first = std::mem::replace(single, AnnotationValue::Array(Vec::new()));
                *single = AnnotationValue::Array(vec![first, value]);
            }
        }
        self
    }

    /// Remove the value at `index` of an array value.
    ///
    /// A single value counts as a one-element array. Removing the last value
    /// leaves an empty array `{}`; the element itself stays. Returns the removed
    /// value, or `None` if `index` is out of range.
    pub fn remove_array_value(&mut self, index: usize) -> Option<AnnotationValue> {
        match &mut self.value {
            AnnotationValue::Array(items) => (index < items.len()).then(|| items.remove(index)),
            single if index == 0 => {
                Some(std::mem::replace(single, AnnotationValue::Array(Vec::new())))
            }
            _ => None,
        }
    }

    /// Builder form of [`Self::remove_array_value`].
    #[must_use]
    pub fn without_array_value(mut self, index: usize) -> Self {
        self.remove_array_value(index);
        self
    }
}

/// An annotation use: `@Name`, `@Name(value)` or `@Name(a = 1, b = 2)`.
#[derive(Debug, Clone)]
pub struct AnnotationGenerator {
    name: TypeRef,
    elements: Vec<AnnotationElementGenerator>,
}

impl AnnotationGenerator {
    pub fn new(name: impl Into<TypeRef>) -> Self {
        AnnotationGenerator {
            name: name.into(),
            elements: Vec::new(),
        }
    }

    /// `@Override`.
    pub fn override_marker() -> Self {
        AnnotationGenerator::new("Override")
    }

    pub fn name(&self) -> &TypeRef {
        &self.name
    }

    pub fn elements(&self) -> &[AnnotationElementGenerator] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut Vec<AnnotationElementGenerator> {
        &mut self.elements
    }

    pub fn element(&self, name: &str) -> Option<&AnnotationElementGenerator> {
        self.elements.iter().find(|e| e.name == name)
    }

    pub fn element_mut(&mut self, name: &str) -> Option<&mut AnnotationElementGenerator> {
        self.elements.iter_mut().find(|e| e.name == name)
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<TypeRef>) -> Self {
        self.name = name.into();
        self
    }

    /// Add an element, replacing one of the same name.
    #[must_use]
    pub fn with_element(mut self, element: AnnotationElementGenerator) -> Self {
        match self.element_mut(&element.name) {
            Some(existing) => *existing = element,
            None => self.elements.push(element),
        }
        self
    }

    #[must_use]
    pub fn with_elements(mut self, elements: Vec<AnnotationElementGenerator>) -> Self {
        self.elements = elements;
        self
    }

    #[must_use]
    pub fn without_element(mut self, name: &str) -> Self {
        self.elements.retain(|e| e.name != name);
        self
    }

    /// Check if this is `@Override` (simple or qualified).
    pub fn is_override(&self) -> bool {
        matches!(
            self.name.as_written().map(str::trim),
            Some("Override" | "java.lang.Override")
        )
    }

    /// The annotation as one line of source.
    pub fn render(&self, ctx: &mut BuilderContext) -> GenResult<String> {
        let name = self
            .name
            .resolve(ctx)
            .ok_or(GenError::missing_name(ElementKind::Annotation))?;
        let elements = self
            .elements
            .iter()
            .map(|e| (e.name.clone(), e.value.clone()))
            .collect();
        Ok(AnnotationValue::Annotation { name, elements }.to_string())
    }
}

impl Generate for AnnotationGenerator {
    fn generate(&self, out: &mut SourceBuilder, ctx: &mut BuilderContext) -> GenResult<()> {
        let line = self.render(ctx)?;
        out.add_line(&line);
        Ok(())
    }
}

/// Render annotations inline, each followed by a space.
pub(crate) fn render_inline(
    annotations: &[AnnotationGenerator],
    ctx: &mut BuilderContext,
) -> GenResult<String> {
    let mut text = String::new();
    for annotation in annotations {
        text.push_str(&annotation.render(ctx)?);
        text.push(' ');
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CodegenOptions;

    fn ctx() -> BuilderContext {
        BuilderContext::new(CodegenOptions::default())
    }

    fn strings(values: &[&str]) -> AnnotationValue {
        AnnotationValue::Array(values.iter().map(|v| AnnotationValue::expr(*v)).collect())
    }

    mod rendering {
        use super::*;

        #[test]
        fn test_marker() {
            assert_eq!(
                AnnotationGenerator::override_marker().render(&mut ctx()).unwrap(),
                "@Override"
            );
        }

        #[test]
        fn test_single_value_shorthand() {
            let annotation = AnnotationGenerator::new("SuppressWarnings").with_element(
                AnnotationElementGenerator::new("value", AnnotationValue::expr("\"unchecked\"")),
            );
            assert_eq!(
                annotation.render(&mut ctx()).unwrap(),
                "@SuppressWarnings(\"unchecked\")"
            );
        }

        #[test]
        fn test_named_pairs() {
            let annotation = AnnotationGenerator::new("Deprecated")
                .with_element(AnnotationElementGenerator::new(
                    "since",
                    AnnotationValue::expr("\"2.0\""),
                ))
                .with_element(AnnotationElementGenerator::new(
                    "forRemoval",
                    AnnotationValue::expr("true"),
                ));
            assert_eq!(
                annotation.render(&mut ctx()).unwrap(),
                "@Deprecated(since = \"2.0\", forRemoval = true)"
            );
        }

        #[test]
        fn test_qualified_name_is_imported() {
            let mut ctx = ctx();
            let annotation =
                AnnotationGenerator::new(TypeRef::qualified("javax.annotation.Nonnull"));
            assert_eq!(annotation.render(&mut ctx).unwrap(), "@Nonnull");
            assert_eq!(ctx.imports().added_imports(true), vec!["javax.annotation.Nonnull"]);
        }

        #[test]
        fn test_missing_name() {
            let annotation = AnnotationGenerator::new(TypeRef::computed(|_| None));
            assert!(matches!(
                annotation.render(&mut ctx()),
                Err(GenError::MissingName { kind: ElementKind::Annotation })
            ));
        }

        #[test]
        fn test_is_override() {
            assert!(AnnotationGenerator::new("java.lang.Override").is_override());
            assert!(!AnnotationGenerator::new("Overrides").is_override());
        }
    }

    mod array_values {
        use super::*;

        #[test]
        fn test_remove_middle_value() {
            let element =
                AnnotationElementGenerator::new("value", strings(&["\"a\"", "\"b\"", "\"c\""]))
                    .without_array_value(1);
            assert_eq!(element.value(), &strings(&["\"a\"", "\"c\""]));
        }

        #[test]
        fn test_remove_last_value_leaves_empty_array() {
            let mut element = AnnotationElementGenerator::new("value", strings(&["\"a\""]));
            assert_eq!(element.remove_array_value(0), Some(AnnotationValue::expr("\"a\"")));
            assert_eq!(element.value(), &AnnotationValue::Array(Vec::new()));
            assert_eq!(element.value().to_string(), "{}");
        }

        #[test]
        fn test_single_value_counts_as_array() {
            let mut element =
                AnnotationElementGenerator::new("value", AnnotationValue::expr("\"x\""));
            assert_eq!(element.array_len(), 1);
            assert_eq!(element.remove_array_value(1), None);
            assert_eq!(element.remove_array_value(0), Some(AnnotationValue::expr("\"x\"")));
            assert_eq!(element.array_len(), 0);
        }

        #[test]
        fn test_append_turns_single_into_array() {
            let element = AnnotationElementGenerator::new("value", AnnotationValue::expr("\"x\""))
                .with_array_value(AnnotationValue::expr("\"y\""));
            assert_eq!(element.value(), &strings(&["\"x\"", "\"y\""]));
        }
    }
}
