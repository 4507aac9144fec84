// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use tracing::debug;

use super::{Generate, ImportGenerator, PackageGenerator, TypeGenerator};
use crate::context::{BuilderContext, ImportResolver};
use crate::error::GenResult;
use crate::output::SourceBuilder;

/// A whole `.java` file.
///
/// Emission installs an [`ImportResolver`] for the unit, renders the package
/// annotations and types, and then writes the package line and the imports
/// (existing ones first, in order, followed by the ones the rendered types
/// required).
#[derive(Debug, Clone, Default)]
pub struct CompilationUnitGenerator {
    path: String,
    package: Option<PackageGenerator>,
    imports: Vec<ImportGenerator>,
    types: Vec<TypeGenerator>,
}

impl CompilationUnitGenerator {
    pub fn new(path: impl Into<String>) -> Self {
        CompilationUnitGenerator {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn package(&self) -> Option<&PackageGenerator> {
        self.package.as_ref()
    }

    pub fn package_mut(&mut self) -> Option<&mut PackageGenerator> {
        self.package.as_mut()
    }

    /// Package name, or `""` for the default package.
    pub fn package_name(&self) -> &str {
        self.package.as_ref().map(PackageGenerator::name).unwrap_or("")
    }

    pub fn imports(&self) -> &[ImportGenerator] {
        &self.imports
    }

    pub fn imports_mut(&mut self) -> &mut Vec<ImportGenerator> {
        &mut self.imports
    }

    pub fn types(&self) -> &[TypeGenerator] {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut Vec<TypeGenerator> {
        &mut self.types
    }

    pub fn find_type(&self, name: &str) -> Option<&TypeGenerator> {
        self.types.iter().find(|t| t.name() == name)
    }

    pub fn find_type_mut(&mut self, name: &str) -> Option<&mut TypeGenerator> {
        self.types.iter_mut().find(|t| t.name() == name)
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the package name, keeping existing package annotations.
    #[must_use]
    pub fn with_package(mut self, name: impl Into<String>) -> Self {
        self.package = Some(match self.package.take() {
            Some(package) => package.with_name(name),
            None => PackageGenerator::new(name),
        });
        self
    }

    #[must_use]
    pub fn with_package_generator(mut self, package: Option<PackageGenerator>) -> Self {
        self.package = package;
        self
    }

    #[must_use]
    pub fn without_package(mut self) -> Self {
        self.package = None;
        self
    }

    /// Add an import unless an equal one is present.
    #[must_use]
    pub fn with_import(mut self, import: ImportGenerator) -> Self {
        if !self.imports.contains(&import) {
            self.imports.push(import);
        }
        self
    }

    #[must_use]
    pub fn with_imports(mut self, imports: Vec<ImportGenerator>) -> Self {
        self.imports = imports;
        self
    }

    /// Remove imports of `name` (static or not, on demand or not).
    #[must_use]
    pub fn without_import(mut self, name: &str) -> Self {
        self.imports.retain(|i| i.name() != name);
        self
    }

    #[must_use]
    pub fn with_type(mut self, ty: TypeGenerator) -> Self {
        self.types.push(ty);
        self
    }

    #[must_use]
    pub fn with_types(mut self, types: Vec<TypeGenerator>) -> Self {
        self.types = types;
        self
    }

    fn resolver(&self) -> ImportResolver {
        let written: Vec<String> = self.imports.iter().map(ToString::to_string).collect();
        let mut resolver =
            ImportResolver::for_unit(self.package_name(), written.iter().map(String::as_str));
        for ty in &self.types {
            resolver.declare_type(ty.name());
        }
        resolver
    }

    fn generate_parts(
        &self,
        head: &mut SourceBuilder,
        body: &mut SourceBuilder,
        ctx: &mut BuilderContext,
    ) -> GenResult<()> {
        if let Some(package) = &self.package {
            package.generate(head, ctx)?;
        }
        for (i, ty) in self.types.iter().enumerate() {
            if i > 0 {
                body.add_newline();
            }
            ty.generate(body, ctx)?;
        }
        Ok(())
    }
}

impl Generate for CompilationUnitGenerator {
    fn generate(&self, out: &mut SourceBuilder, ctx: &mut BuilderContext) -> GenResult<()> {
        let saved = ctx.replace_imports(self.resolver());
        let mut head = out.fork();
        let mut body = out.fork();
        let result = self.generate_parts(&mut head, &mut body, ctx);
        let resolver = ctx.replace_imports(saved);
        result?;

        let mut imports: Vec<String> = Vec::new();
        for import in &self.imports {
            let text = import.to_string();
            if !imports.contains(&text) {
                imports.push(text);
            }
        }
        let added = resolver.added_imports(ctx.options().sort_new_imports);
        debug!(path = %self.path, added = added.len(), "emitting compilation unit");
        for fqn in added {
            if !imports.contains(&fqn) {
                imports.push(fqn);
            }
        }

        if !head.is_empty() {
            out.add_token(&head.into_string());
            out.add_newline();
        }
        if !imports.is_empty() {
            for import in &imports {
                out.add_line(&format!("import {};", import));
            }
            out.add_newline();
        }
        out.add_token(&body.into_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{AnnotationGenerator, FieldGenerator, TypeRef};
    use crate::options::CodegenOptions;
    use pretty_assertions::assert_eq;

    fn render(unit: &CompilationUnitGenerator, options: CodegenOptions) -> String {
        unit.to_source_with(&mut BuilderContext::new(options)).unwrap()
    }

    fn unit() -> CompilationUnitGenerator {
        CompilationUnitGenerator::new("a/Holder.java")
            .with_package("a")
            .with_import(ImportGenerator::parse("java.util.Map"))
            .with_type(
                TypeGenerator::class("Holder")
                    .with_member(FieldGenerator::new(
                        TypeRef::qualified("java.util.Set<a.Holder>"),
                        "set",
                    ))
                    .with_member(FieldGenerator::new(TypeRef::qualified("java.util.Map"), "map"))
                    .with_member(FieldGenerator::new(TypeRef::qualified("java.io.File"), "file"))
                    .with_member(FieldGenerator::new(
                        TypeRef::qualified("java.lang.String"),
                        "name",
                    )),
            )
    }

    #[test]
    fn test_added_imports_are_sorted_after_existing() {
        assert_eq!(
            render(&unit(), CodegenOptions::default()),
            "package a;\n\nimport java.util.Map;\nimport java.io.File;\nimport java.util.Set;\n\n\
             class Holder {\n    Set<Holder> set;\n    \
             Map map;\n    File file;\n    String name;\n}\n"
        );
    }

    #[test]
    fn test_added_imports_in_first_use_order() {
        let options = CodegenOptions {
            sort_new_imports: false,
            ..Default::default()
        };
        assert!(render(&unit(), options)
            .contains("import java.util.Map;\nimport java.util.Set;\nimport java.io.File;\n"));
    }

    #[test]
    fn test_conflicting_simple_name_stays_qualified() {
        let unit = CompilationUnitGenerator::new("a/List.java")
            .with_package("a")
            .with_type(
                TypeGenerator::class("List")
                    .with_member(FieldGenerator::new(
                        TypeRef::qualified("java.util.List<String>"),
                        "items",
                    )),
            );
        let text = render(&unit, CodegenOptions::default());
        assert!(text.contains("    java.util.List<String> items;"));
        assert!(!text.contains("import"));
    }

    #[test]
    fn test_package_rename_keeps_annotations() {
        let unit = CompilationUnitGenerator::new("package-info.java")
            .with_package_generator(Some(
                PackageGenerator::new("old.name")
                    .with_annotation(AnnotationGenerator::new("Deprecated")),
            ))
            .with_package("new.name");
        assert_eq!(render(&unit, CodegenOptions::default()), "@Deprecated\npackage new.name;\n\n");
    }

    #[test]
    fn test_error_restores_outer_resolver() {
        let mut ctx = BuilderContext::new(CodegenOptions::default())
            .with_imports(ImportResolver::new("outer"));
        let unit = CompilationUnitGenerator::new("a/Bad.java")
            .with_package("a")
            .with_type(
                TypeGenerator::class("Bad").with_member(FieldGenerator::default().with_name("x")),
            );
        assert!(unit.to_source_with(&mut ctx).is_err());
        assert_eq!(ctx.imports().package(), "outer");
    }

    #[test]
    fn test_default_package_without_imports() {
        let unit = CompilationUnitGenerator::new("Main.java")
            .with_type(TypeGenerator::class("Main"))
            .with_type(TypeGenerator::class("Helper"));
        assert_eq!(
            render(&unit, CodegenOptions::default()),
            "class Main {\n}\n\nclass Helper {\n}\n"
        );
    }
}
