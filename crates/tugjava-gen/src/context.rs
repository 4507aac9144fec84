// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Build context for source emission.
//!
//! A [`BuilderContext`] carries what generators need besides their own data:
//! - the environment used for override detection and name resolution
//! - the [`CodegenOptions`]
//! - the [`ImportResolver`] of the unit being emitted
//! - a stack of enclosing-type frames

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::trace;

use tugjava_core::names::{is_java_lang, qualifier, simple_name};
use tugjava_model::{ApiElement, JavaEnvironment, Type, TypeKind};

use crate::options::CodegenOptions;

// ============================================================================
// Import resolution
// ============================================================================

/// Maps fully-qualified type names to the names emitted in source.
///
/// Seeded with the unit's package and existing imports. Referencing a type
/// that is neither imported, in `java.lang`, nor in the unit's package adds a
/// new import unless its simple name is already taken, in which case the
/// fully-qualified name is emitted instead.
#[derive(Debug, Clone, Default)]
pub struct ImportResolver {
    package: String,
    /// Simple name to the fully-qualified name it denotes in this unit.
    simple_names: HashMap<String, String>,
    /// Packages (or types) imported on demand.
    on_demand: HashSet<String>,
    /// Imports required by emitted references, in first-use order.
    added: Vec<String>,
}

impl ImportResolver {
    pub fn new(package: impl Into<String>) -> Self {
        ImportResolver {
            package: package.into(),
            ..Default::default()
        }
    }

    /// Resolver for a unit with the given package and written imports
    /// (`a.b.C`, `a.b.*`, `static a.b.C.m`).
    pub fn for_unit<'i>(package: &str, imports: impl IntoIterator<Item = &'i str>) -> Self {
        let mut resolver = ImportResolver::new(package);
        for import in imports {
            resolver.add_existing(import);
        }
        resolver
    }

    /// Register an import already present in the unit.
    pub fn add_existing(&mut self, import: &str) {
        if import.starts_with("static ") {
            return;
        }
        match import.strip_suffix(".*") {
            Some(container) => {
                self.on_demand.insert(container.to_string());
            }
            None => {
                self.simple_names
                    .entry(simple_name(import).to_string())
                    .or_insert_with(|| import.to_string());
            }
        }
    }

    /// Reserve a simple name for a type declared in the unit itself.
    pub fn declare_type(&mut self, simple: &str) {
        let fqn = if self.package.is_empty() {
            simple.to_string()
        } else {
            format!("{}.{}", self.package, simple)
        };
        self.simple_names.entry(simple.to_string()).or_insert(fqn);
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// The name to emit for `fqn`, importing it if needed.
    pub fn reference(&mut self, fqn: &str) -> String {
        let container = qualifier(fqn);
        if container.is_empty() {
            return fqn.to_string();
        }
        let simple = simple_name(fqn);
        match self.simple_names.get(simple) {
            Some(known) if known == fqn => return simple.to_string(),
            Some(_) => {
                trace!(fqn, "simple name taken, emitting qualified");
                return fqn.to_string();
            }
            None => {}
        }
        if container == self.package || is_java_lang(fqn) || self.on_demand.contains(container) {
            self.simple_names.insert(simple.to_string(), fqn.to_string());
            return simple.to_string();
        }
        self.simple_names.insert(simple.to_string(), fqn.to_string());
        self.added.push(fqn.to_string());
        simple.to_string()
    }

    /// Rewrite every qualified name in a type expression
    /// (`java.util.Map<java.lang.String, a.B[]>`) through [`Self::reference`].
    pub fn reference_type(&mut self, type_text: &str) -> String {
        let mut out = String::with_capacity(type_text.len());
        let mut token = String::new();
        for c in type_text.chars() {
            if c.is_alphanumeric() || c == '_' || c == '$' || c == '.' {
                token.push(c);
            } else {
                self.flush_token(&mut token, &mut out);
                out.push(c);
            }
        }
        self.flush_token(&mut token, &mut out);
        out
    }

    fn flush_token(&mut self, token: &mut String, out: &mut String) {
        if token.is_empty() {
            return;
        }
        // `...` of a varargs type is punctuation, not a name.
        let (name, dots) = match token.find("...") {
            Some(idx) => token.split_at(idx),
            None => (token.as_str(), ""),
        };
        if name.contains('.') {
            let emitted = self.reference(name);
            out.push_str(&emitted);
        } else {
            out.push_str(name);
        }
        out.push_str(dots);
        token.clear();
    }

    /// Imports required by emitted references that the unit does not have.
    pub fn added_imports(&self, sorted: bool) -> Vec<String> {
        if sorted {
            self.added
                .iter()
                .cloned()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        } else {
            self.added.clone()
        }
    }
}

// ============================================================================
// Enclosing-type frames
// ============================================================================

/// What a member generator can see of the type it is emitted into.
#[derive(Debug, Clone)]
pub struct TypeFrame {
    pub fully_qualified_name: String,
    pub kind: TypeKind,
    /// Type variables in scope with their first bound.
    pub type_variables: Vec<(String, Option<String>)>,
    /// Direct supertypes with their type arguments as written
    /// (`a.Base<String>`), fully qualified where they could be resolved.
    pub super_types: Vec<String>,
}

impl TypeFrame {
    pub fn new(fully_qualified_name: impl Into<String>, kind: TypeKind) -> Self {
        TypeFrame {
            fully_qualified_name: fully_qualified_name.into(),
            kind,
            type_variables: Vec::new(),
            super_types: Vec::new(),
        }
    }
}

/// `base` followed by the type arguments of `written`: `a.Base` and
/// `Base<String>` give `a.Base<String>`.
pub(crate) fn with_type_arguments(mut base: String, written: &str) -> String {
    if let Some(open) = written.find('<') {
        base.push_str(written[open..].trim_end());
    }
    base
}

// ============================================================================
// Builder context
// ============================================================================

/// State threaded through one emission pass.
#[derive(Debug, Clone, Default)]
pub struct BuilderContext {
    env: Option<JavaEnvironment>,
    options: CodegenOptions,
    imports: ImportResolver,
    frames: Vec<TypeFrame>,
}

impl BuilderContext {
    /// Context without an environment: no override detection, no resolution.
    pub fn new(options: CodegenOptions) -> Self {
        BuilderContext {
            options,
            ..Default::default()
        }
    }

    /// Context over `env` with options derived from it.
    pub fn for_environment(env: &JavaEnvironment) -> Self {
        BuilderContext {
            env: Some(env.clone()),
            options: CodegenOptions::for_environment(env),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: CodegenOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_imports(mut self, imports: ImportResolver) -> Self {
        self.imports = imports;
        self
    }

    pub fn environment(&self) -> Option<&JavaEnvironment> {
        self.env.as_ref()
    }

    pub fn options(&self) -> &CodegenOptions {
        &self.options
    }

    pub fn imports(&self) -> &ImportResolver {
        &self.imports
    }

    pub fn imports_mut(&mut self) -> &mut ImportResolver {
        &mut self.imports
    }

    /// Replace the import resolver, returning the previous one.
    pub fn replace_imports(&mut self, imports: ImportResolver) -> ImportResolver {
        std::mem::replace(&mut self.imports, imports)
    }

    pub fn push_frame(&mut self, frame: TypeFrame) {
        self.frames.push(frame);
    }

    pub fn pop_frame(&mut self) -> Option<TypeFrame> {
        self.frames.pop()
    }

    /// The innermost enclosing type.
    pub fn enclosing_type(&self) -> Option<&TypeFrame> {
        self.frames.last()
    }

    /// Type variables visible at the current position, innermost first.
    pub fn type_variables(&self) -> Vec<(String, Option<String>)> {
        self.frames
            .iter()
            .rev()
            .flat_map(|frame| frame.type_variables.iter().cloned())
            .collect()
    }

    /// Find a type of the environment by fully-qualified name.
    pub fn find_type(&self, fqn: &str) -> Option<Type> {
        self.env.as_ref()?.find_type(fqn)
    }

    /// Best-effort qualification of a type name written in the current unit.
    ///
    /// Tries, in order: the name as fully qualified, the unit's imports and
    /// package, the enclosing type's own resolution when it exists in the
    /// environment, and `java.lang`.
    pub fn qualify(&self, written: &str) -> String {
        let base = written.split('<').next().unwrap_or(written).trim();
        if self.find_type(base).is_some() {
            return base.to_string();
        }
        let simple = base.split('.').next().unwrap_or(base);
        if let Some(fqn) = self.imports.simple_names.get(simple) {
            let rest = &base[simple.len()..];
            return format!("{}{}", fqn, rest);
        }
        if let Some(frame) = self.enclosing_type() {
            if let Some(fqn) = self
                .find_type(&frame.fully_qualified_name)
                .and_then(|ty| ty.qualify_reference(base))
            {
                return fqn;
            }
        }
        let same_package = if self.imports.package.is_empty() {
            base.to_string()
        } else {
            format!("{}.{}", self.imports.package, base)
        };
        if self.find_type(&same_package).is_some() {
            return same_package;
        }
        for container in &self.imports.on_demand {
            let candidate = format!("{}.{}", container, base);
            if self.find_type(&candidate).is_some() {
                return candidate;
            }
        }
        base.to_string()
    }

    /// Push a frame for an existing type of the environment.
    pub fn push_type(&mut self, ty: &Type) {
        let mut frame = TypeFrame::new(ty.fully_qualified_name(), ty.type_kind());
        frame.type_variables = ty.type_variables();
        frame.super_types = ty
            .super_class()
            .into_iter()
            .chain(ty.super_interfaces().iter().map(String::as_str))
            .map(|written| match ty.qualify_reference(written) {
                Some(fqn) => with_type_arguments(fqn, written),
                None => written.to_string(),
            })
            .collect();
        trace!(ty = ty.name(), supers = ?frame.super_types, "pushed type frame");
        self.frames.push(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod imports {
        use super::*;

        #[test]
        fn test_existing_import_is_used() {
            let mut resolver = ImportResolver::for_unit("a", ["java.util.List"]);
            assert_eq!(resolver.reference("java.util.List"), "List");
            assert!(resolver.added_imports(true).is_empty());
        }

        #[test]
        fn test_java_lang_and_same_package_need_no_import() {
            let mut resolver = ImportResolver::new("com.acme");
            assert_eq!(resolver.reference("java.lang.String"), "String");
            assert_eq!(resolver.reference("com.acme.Widget"), "Widget");
            assert!(resolver.added_imports(true).is_empty());
        }

        #[test]
        fn test_new_import_is_added_once() {
            let mut resolver = ImportResolver::new("a");
            assert_eq!(resolver.reference("java.util.Set"), "Set");
            assert_eq!(resolver.reference("java.util.Set"), "Set");
            assert_eq!(resolver.reference("java.io.File"), "File");
            assert_eq!(resolver.added_imports(false), vec!["java.util.Set", "java.io.File"]);
            assert_eq!(resolver.added_imports(true), vec!["java.io.File", "java.util.Set"]);
        }

        #[test]
        fn test_conflicting_simple_name_stays_qualified() {
            let mut resolver = ImportResolver::for_unit("a", ["java.util.List"]);
            assert_eq!(resolver.reference("java.awt.List"), "java.awt.List");
            resolver.declare_type("Widget");
            assert_eq!(resolver.reference("b.Widget"), "b.Widget");
        }

        #[test]
        fn test_on_demand_and_static_imports() {
            let mut resolver =
                ImportResolver::for_unit("a", ["java.util.*", "static java.util.Objects.equals"]);
            assert_eq!(resolver.reference("java.util.Map"), "Map");
            assert!(resolver.added_imports(true).is_empty());
        }

        #[test]
        fn test_reference_type_rewrites_nested_names() {
            let mut resolver = ImportResolver::new("a");
            assert_eq!(
                resolver.reference_type("java.util.Map<java.lang.String, b.c.D[]>"),
                "Map<String, D[]>"
            );
            assert_eq!(resolver.reference_type("b.c.D..."), "D...");
            assert_eq!(resolver.reference_type("int"), "int");
            assert_eq!(resolver.added_imports(true), vec!["b.c.D", "java.util.Map"]);
        }
    }

    mod frames {
        use super::*;

        #[test]
        fn test_type_variables_innermost_first() {
            let mut ctx = BuilderContext::new(CodegenOptions::default());
            let mut outer = TypeFrame::new("a.Outer", TypeKind::Class);
            outer.type_variables = vec![("K".to_string(), None)];
            let mut inner = TypeFrame::new("a.Outer.Inner", TypeKind::Class);
            inner.type_variables = vec![("V".to_string(), Some("Number".to_string()))];
            ctx.push_frame(outer);
            ctx.push_frame(inner);
            let names: Vec<String> = ctx.type_variables().into_iter().map(|(n, _)| n).collect();
            assert_eq!(names, vec!["V", "K"]);
            assert_eq!(
                ctx.pop_frame().map(|f| f.fully_qualified_name),
                Some("a.Outer.Inner".to_string())
            );
            assert_eq!(ctx.enclosing_type().map(|f| f.kind), Some(TypeKind::Class));
        }

        #[test]
        fn test_qualify_without_environment() {
            let ctx = BuilderContext::new(CodegenOptions::default())
                .with_imports(ImportResolver::for_unit("a", ["java.util.Map"]));
            assert_eq!(ctx.qualify("Map<K, V>"), "java.util.Map");
            assert_eq!(ctx.qualify("Map.Entry"), "java.util.Map.Entry");
            assert_eq!(ctx.qualify("Unknown"), "Unknown");
        }
    }
}
