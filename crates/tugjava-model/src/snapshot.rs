// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Immutable element snapshots.
//!
//! A [`Snapshot`] is the Spi layer: an arena of [`SpiNode`]s built from one
//! read of the compiler collaborator. Nodes are addressed by [`ElementId`].
//!
//! ## ElementId
//!
//! ElementIds are assigned in pre-order while the arena is built, so for any
//! unit:
//!
//! ```text
//! ElementId(0) -> CompilationUnit a/A.java
//! ElementId(1) -> Package a
//! ElementId(2) -> Import java.util.List
//! ElementId(3) -> Type a.A
//! ElementId(4) -> Annotation @Deprecated
//! ElementId(5) -> Field a.A.count
//! ```
//!
//! Parents always have lower ids than their children and left siblings lower
//! ids than right siblings.
//!
//! ## Logical keys
//!
//! Every node also carries an [`ElementKey`] that names the same logical
//! element across reloads (by name and erased signature, not by position).
//! Re-resolution looks a key up in a newer snapshot.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Weak};

use tugjava_core::names::{binary_to_source, erasure, erased_signature, qualify, simple_name};
use tugjava_core::{ModelError, Modifiers, SourceRange};

use crate::cache::ElementCache;
use crate::decl::{
    AnnotationDecl, AnnotationValue, FieldDecl, MemberDecl, MethodDecl, TypeDecl, TypeKind,
    TypeParameterDecl, UnitDecl,
};
use crate::environment::EnvShared;
use crate::source::UnitRead;

// ============================================================================
// Kinds and identifiers
// ============================================================================

/// The kind of a Java element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    CompilationUnit,
    Package,
    Import,
    Type,
    Field,
    Method,
    MethodParameter,
    TypeParameter,
    Annotation,
    AnnotationElement,
}

impl ElementKind {
    pub const ALL: [ElementKind; 10] = [
        ElementKind::CompilationUnit,
        ElementKind::Package,
        ElementKind::Import,
        ElementKind::Type,
        ElementKind::Field,
        ElementKind::Method,
        ElementKind::MethodParameter,
        ElementKind::TypeParameter,
        ElementKind::Annotation,
        ElementKind::AnnotationElement,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::CompilationUnit => "compilation unit",
            ElementKind::Package => "package",
            ElementKind::Import => "import",
            ElementKind::Type => "type",
            ElementKind::Field => "field",
            ElementKind::Method => "method",
            ElementKind::MethodParameter => "method parameter",
            ElementKind::TypeParameter => "type parameter",
            ElementKind::Annotation => "annotation",
            ElementKind::AnnotationElement => "annotation element",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Arena index of a node within one [`Snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl ElementId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({})", self.0)
    }
}

/// Name of a logical element, stable across reloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementKey {
    pub kind: ElementKind,
    pub key: String,
}

impl ElementKey {
    pub fn new(kind: ElementKind, key: impl Into<String>) -> Self {
        ElementKey {
            kind,
            key: key.into(),
        }
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.key)
    }
}

// ============================================================================
// Nodes
// ============================================================================

/// Kind-specific data of a node. Structure lives in `SpiNode::children`.
#[derive(Debug, Clone)]
pub(crate) enum NodeData {
    Unit(UnitData),
    Package(PackageData),
    Import(ImportData),
    Type(TypeData),
    Field(FieldData),
    Method(MethodData),
    Parameter(ParameterData),
    TypeParameter(TypeParameterData),
    Annotation(AnnotationData),
    AnnotationElement(AnnotationElementData),
}

#[derive(Debug, Clone)]
pub(crate) struct UnitData {
    pub(crate) path: String,
}

#[derive(Debug, Clone)]
pub(crate) struct PackageData {
    pub(crate) name: String,
    pub(crate) range: Option<SourceRange>,
}

#[derive(Debug, Clone)]
pub(crate) struct ImportData {
    pub(crate) name: String,
    pub(crate) is_static: bool,
    pub(crate) on_demand: bool,
    pub(crate) range: Option<SourceRange>,
}

#[derive(Debug, Clone)]
pub(crate) struct TypeData {
    pub(crate) name: String,
    pub(crate) binary_name: String,
    pub(crate) kind: TypeKind,
    pub(crate) modifiers: Modifiers,
    pub(crate) super_class: Option<String>,
    pub(crate) super_interfaces: Vec<String>,
    pub(crate) enum_constants: Option<String>,
    pub(crate) range: Option<SourceRange>,
    pub(crate) javadoc: Option<SourceRange>,
}

#[derive(Debug, Clone)]
pub(crate) struct FieldData {
    pub(crate) name: String,
    pub(crate) data_type: String,
    pub(crate) modifiers: Modifiers,
    pub(crate) initializer: Option<SourceRange>,
    pub(crate) range: Option<SourceRange>,
    pub(crate) javadoc: Option<SourceRange>,
}

#[derive(Debug, Clone)]
pub(crate) struct MethodData {
    pub(crate) name: String,
    pub(crate) return_type: Option<String>,
    pub(crate) is_constructor: bool,
    pub(crate) is_varargs: bool,
    pub(crate) modifiers: Modifiers,
    pub(crate) exceptions: Vec<String>,
    /// Erased signature, `name(T1,T2)`.
    pub(crate) signature: String,
    pub(crate) body: Option<SourceRange>,
    pub(crate) default_value: Option<SourceRange>,
    pub(crate) range: Option<SourceRange>,
    pub(crate) javadoc: Option<SourceRange>,
}

#[derive(Debug, Clone)]
pub(crate) struct ParameterData {
    pub(crate) name: String,
    pub(crate) data_type: String,
    pub(crate) modifiers: Modifiers,
    pub(crate) is_varargs: bool,
    pub(crate) range: Option<SourceRange>,
}

#[derive(Debug, Clone)]
pub(crate) struct TypeParameterData {
    pub(crate) name: String,
    pub(crate) bounds: Vec<String>,
    pub(crate) range: Option<SourceRange>,
}

#[derive(Debug, Clone)]
pub(crate) struct AnnotationData {
    pub(crate) name: String,
    pub(crate) range: Option<SourceRange>,
}

#[derive(Debug, Clone)]
pub(crate) struct AnnotationElementData {
    pub(crate) name: String,
    pub(crate) value: AnnotationValue,
    pub(crate) value_range: Option<SourceRange>,
    pub(crate) range: Option<SourceRange>,
}

/// One element of a snapshot.
#[derive(Debug, Clone)]
pub struct SpiNode {
    pub(crate) kind: ElementKind,
    pub(crate) key: String,
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
    pub(crate) unit: usize,
    pub(crate) data: NodeData,
}

impl SpiNode {
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    /// Simple name of the element (path for units).
    pub fn name(&self) -> &str {
        match &self.data {
            NodeData::Unit(d) => &d.path,
            NodeData::Package(d) => &d.name,
            NodeData::Import(d) => &d.name,
            NodeData::Type(d) => &d.name,
            NodeData::Field(d) => &d.name,
            NodeData::Method(d) => &d.name,
            NodeData::Parameter(d) => &d.name,
            NodeData::TypeParameter(d) => &d.name,
            NodeData::Annotation(d) => &d.name,
            NodeData::AnnotationElement(d) => &d.name,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match &self.data {
            NodeData::Type(d) => d.modifiers,
            NodeData::Field(d) => d.modifiers,
            NodeData::Method(d) => d.modifiers,
            NodeData::Parameter(d) => d.modifiers,
            _ => Modifiers::empty(),
        }
    }

    /// Declaration range.
    pub fn range(&self) -> Option<SourceRange> {
        match &self.data {
            NodeData::Unit(_) => None,
            NodeData::Package(d) => d.range,
            NodeData::Import(d) => d.range,
            NodeData::Type(d) => d.range,
            NodeData::Field(d) => d.range,
            NodeData::Method(d) => d.range,
            NodeData::Parameter(d) => d.range,
            NodeData::TypeParameter(d) => d.range,
            NodeData::Annotation(d) => d.range,
            NodeData::AnnotationElement(d) => d.range,
        }
    }

    pub fn javadoc_range(&self) -> Option<SourceRange> {
        match &self.data {
            NodeData::Type(d) => d.javadoc,
            NodeData::Field(d) => d.javadoc,
            NodeData::Method(d) => d.javadoc,
            _ => None,
        }
    }

    /// Method body range including braces.
    pub fn body_range(&self) -> Option<SourceRange> {
        match &self.data {
            NodeData::Method(d) => d.body,
            _ => None,
        }
    }
}

/// Per-unit bookkeeping.
#[derive(Debug, Clone)]
pub(crate) struct UnitInfo {
    pub(crate) path: String,
    pub(crate) package: String,
    pub(crate) source: Option<Arc<str>>,
    pub(crate) root: ElementId,
}

// ============================================================================
// Snapshot
// ============================================================================

/// One immutable generation of the element model.
pub struct Snapshot {
    generation: u64,
    env: Weak<EnvShared>,
    cache: Arc<ElementCache>,
    nodes: Vec<SpiNode>,
    units: Vec<UnitInfo>,
    index: HashMap<ElementKey, ElementId>,
    types: HashMap<String, ElementId>,
    errors: BTreeMap<String, Vec<ModelError>>,
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("generation", &self.generation)
            .field("units", &self.units.len())
            .field("nodes", &self.nodes.len())
            .field("errors", &self.errors.len())
            .finish()
    }
}

impl Snapshot {
    pub(crate) fn build(
        generation: u64,
        env: Weak<EnvShared>,
        cache: Arc<ElementCache>,
        reads: Vec<UnitRead>,
    ) -> Snapshot {
        let mut builder = SnapshotBuilder::default();
        let mut errors: BTreeMap<String, Vec<ModelError>> = BTreeMap::new();
        for read in reads {
            match read {
                UnitRead::Parsed(unit) => builder.add_unit(unit),
                UnitRead::Failed { path, errors: errs } => {
                    errors.entry(path).or_default().extend(errs);
                }
            }
        }
        Snapshot {
            generation,
            env,
            cache,
            nodes: builder.nodes,
            units: builder.units,
            index: builder.index,
            types: builder.types,
            errors,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node for `id`.
    ///
    /// Ids are only created by this snapshot, so an out-of-range id is a
    /// programming error.
    pub fn node(&self, id: ElementId) -> &SpiNode {
        debug_assert!(id.index() < self.nodes.len(), "{} out of range", id);
        &self.nodes[id.index()]
    }

    pub(crate) fn contains(&self, id: ElementId) -> bool {
        id.index() < self.nodes.len()
    }

    pub(crate) fn data(&self, id: ElementId) -> &NodeData {
        &self.node(id).data
    }

    pub(crate) fn env(&self) -> &Weak<EnvShared> {
        &self.env
    }

    pub(crate) fn cache(&self) -> &Arc<ElementCache> {
        &self.cache
    }

    /// Root ids of all units, in path order.
    pub fn unit_roots(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.units.iter().map(|u| u.root)
    }

    pub fn unit_root(&self, path: &str) -> Option<ElementId> {
        self.lookup(&ElementKey::new(ElementKind::CompilationUnit, path))
    }

    pub(crate) fn unit_info(&self, id: ElementId) -> &UnitInfo {
        &self.units[self.node(id).unit]
    }

    /// Source text of the unit containing `id` (`None` for library units).
    pub fn unit_source(&self, id: ElementId) -> Option<&str> {
        self.unit_info(id).source.as_deref()
    }

    pub fn lookup(&self, key: &ElementKey) -> Option<ElementId> {
        self.index.get(key).copied()
    }

    /// Find a type by fully-qualified source name (`a.Outer.Inner`) or binary
    /// name (`a.Outer$Inner`).
    pub fn find_type(&self, name: &str) -> Option<ElementId> {
        self.types.get(&binary_to_source(name)).copied()
    }

    /// Errors reported for the unit at `path`.
    pub fn errors_for(&self, path: &str) -> &[ModelError] {
        self.errors.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn all_errors(&self) -> impl Iterator<Item = &ModelError> {
        self.errors.values().flatten()
    }

    /// `"\r\n"` if the first unit with source text uses CRLF, else `"\n"`.
    pub fn line_delimiter(&self) -> &'static str {
        match self.units.iter().find_map(|u| u.source.as_deref()) {
            Some(text) if text.contains("\r\n") => "\r\n",
            _ => "\n",
        }
    }

    /// Number of nodes of each kind.
    pub fn kind_counts(&self) -> BTreeMap<ElementKind, usize> {
        let mut counts = BTreeMap::new();
        for node in &self.nodes {
            *counts.entry(node.kind).or_insert(0) += 1;
        }
        counts
    }
}

// ============================================================================
// Builder
// ============================================================================

/// A type variable in scope: name and first bound as written.
type TypeVar = (String, Option<String>);

#[derive(Default)]
struct SnapshotBuilder {
    nodes: Vec<SpiNode>,
    units: Vec<UnitInfo>,
    index: HashMap<ElementKey, ElementId>,
    types: HashMap<String, ElementId>,
}

impl SnapshotBuilder {
    fn push(
        &mut self,
        kind: ElementKind,
        key: String,
        parent: Option<ElementId>,
        data: NodeData,
    ) -> ElementId {
        let id = ElementId(self.nodes.len() as u32);
        let key = self.unique_key(kind, key);
        self.index.insert(ElementKey::new(kind, key.clone()), id);
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }
        self.nodes.push(SpiNode {
            kind,
            key,
            parent,
            children: Vec::new(),
            unit: self.units.len().saturating_sub(1),
            data,
        });
        id
    }

    /// Disambiguate repeated keys (`owner@Tag`, `owner@Tag#2`, ...).
    fn unique_key(&self, kind: ElementKind, base: String) -> String {
        if !self.index.contains_key(&ElementKey::new(kind, base.as_str())) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}#{}", base, n);
            if !self.index.contains_key(&ElementKey::new(kind, candidate.as_str())) {
                return candidate;
            }
            n += 1;
        }
    }

    fn key_of(&self, id: ElementId) -> &str {
        &self.nodes[id.index()].key
    }

    fn add_unit(&mut self, unit: UnitDecl) {
        let package = unit.package_name().to_string();
        self.units.push(UnitInfo {
            path: unit.path.clone(),
            package: package.clone(),
            source: unit.source.clone(),
            root: ElementId(self.nodes.len() as u32),
        });
        let path = unit.path.clone();
        let root = self.push(
            ElementKind::CompilationUnit,
            path.clone(),
            None,
            NodeData::Unit(UnitData { path: path.clone() }),
        );

        if let Some(decl) = unit.package {
            let id = self.push(
                ElementKind::Package,
                format!("{}::package", path),
                Some(root),
                NodeData::Package(PackageData {
                    name: decl.name,
                    range: decl.range,
                }),
            );
            self.add_annotations(id, decl.annotations);
        }

        for import in unit.imports {
            let key = format!(
                "{}::import:{}{}",
                path,
                if import.is_static { "static " } else { "" },
                import.display_name()
            );
            self.push(
                ElementKind::Import,
                key,
                Some(root),
                NodeData::Import(ImportData {
                    name: import.name,
                    is_static: import.is_static,
                    on_demand: import.on_demand,
                    range: import.range,
                }),
            );
        }

        for ty in unit.types {
            self.add_type(root, &package, None, &[], ty);
        }
    }

    fn add_type(
        &mut self,
        parent: ElementId,
        package: &str,
        outer: Option<&str>,
        outer_vars: &[TypeVar],
        decl: TypeDecl,
    ) {
        let binary_name = match outer {
            Some(outer) => format!("{}${}", outer, decl.name),
            None => qualify(package, &decl.name),
        };
        let id = self.push(
            ElementKind::Type,
            binary_name.clone(),
            Some(parent),
            NodeData::Type(TypeData {
                name: decl.name,
                binary_name: binary_name.clone(),
                kind: decl.kind,
                modifiers: decl.modifiers,
                super_class: decl.super_class,
                super_interfaces: decl.super_interfaces,
                enum_constants: decl.enum_constants,
                range: decl.range,
                javadoc: decl.javadoc,
            }),
        );
        self.types.entry(binary_to_source(&binary_name)).or_insert(id);

        // Static member types cannot see the enclosing type's variables, but
        // erasure only needs a superset of the names in scope.
        let mut vars = outer_vars.to_vec();
        vars.extend(type_vars(&decl.type_parameters));

        self.add_annotations(id, decl.annotations);
        self.add_type_parameters(id, decl.type_parameters);
        for member in decl.members {
            match member {
                MemberDecl::Field(field) => self.add_field(id, field),
                MemberDecl::Method(method) => self.add_method(id, &vars, method),
                MemberDecl::Type(inner) => {
                    self.add_type(id, package, Some(binary_name.as_str()), &vars, inner)
                }
            }
        }
    }

    fn add_field(&mut self, owner: ElementId, decl: FieldDecl) {
        let key = format!("{}.{}", self.key_of(owner), decl.name);
        let id = self.push(
            ElementKind::Field,
            key,
            Some(owner),
            NodeData::Field(FieldData {
                name: decl.name,
                data_type: decl.data_type,
                modifiers: decl.modifiers,
                initializer: decl.initializer,
                range: decl.range,
                javadoc: decl.javadoc,
            }),
        );
        self.add_annotations(id, decl.annotations);
    }

    fn add_method(&mut self, owner: ElementId, owner_vars: &[TypeVar], decl: MethodDecl) {
        let mut vars = type_vars(&decl.type_parameters);
        vars.extend(owner_vars.iter().cloned());
        let erased: Vec<String> = decl
            .parameters
            .iter()
            .map(|p| {
                let mut erased = erasure(&p.data_type, &vars);
                if p.is_varargs {
                    erased.push_str("[]");
                }
                erased
            })
            .collect();
        let signature = erased_signature(&decl.name, erased.iter().map(String::as_str));
        let is_varargs = decl.is_varargs();

        let key = format!("{}#{}", self.key_of(owner), signature);
        let id = self.push(
            ElementKind::Method,
            key,
            Some(owner),
            NodeData::Method(MethodData {
                name: decl.name,
                return_type: decl.return_type,
                is_constructor: decl.is_constructor,
                is_varargs,
                modifiers: decl.modifiers,
                exceptions: decl.exceptions,
                signature,
                body: decl.body,
                default_value: decl.default_value,
                range: decl.range,
                javadoc: decl.javadoc,
            }),
        );
        self.add_annotations(id, decl.annotations);
        self.add_type_parameters(id, decl.type_parameters);
        for param in decl.parameters {
            let key = format!("{}/{}", self.key_of(id), param.name);
            let param_id = self.push(
                ElementKind::MethodParameter,
                key,
                Some(id),
                NodeData::Parameter(ParameterData {
                    name: param.name,
                    data_type: param.data_type,
                    modifiers: param.modifiers,
                    is_varargs: param.is_varargs,
                    range: param.range,
                }),
            );
            self.add_annotations(param_id, param.annotations);
        }
    }

    fn add_type_parameters(&mut self, owner: ElementId, params: Vec<TypeParameterDecl>) {
        for param in params {
            let key = format!("{}<{}", self.key_of(owner), param.name);
            self.push(
                ElementKind::TypeParameter,
                key,
                Some(owner),
                NodeData::TypeParameter(TypeParameterData {
                    name: param.name,
                    bounds: param.bounds,
                    range: param.range,
                }),
            );
        }
    }

    fn add_annotations(&mut self, owner: ElementId, annotations: Vec<AnnotationDecl>) {
        for annotation in annotations {
            let key = format!("{}@{}", self.key_of(owner), simple_name(&annotation.name));
            let id = self.push(
                ElementKind::Annotation,
                key,
                Some(owner),
                NodeData::Annotation(AnnotationData {
                    name: annotation.name,
                    range: annotation.range,
                }),
            );
            for element in annotation.elements {
                let key = format!("{}={}", self.key_of(id), element.name);
                self.push(
                    ElementKind::AnnotationElement,
                    key,
                    Some(id),
                    NodeData::AnnotationElement(AnnotationElementData {
                        name: element.name,
                        value: element.value,
                        value_range: element.value_range,
                        range: element.range,
                    }),
                );
            }
        }
    }
}

fn type_vars(params: &[TypeParameterDecl]) -> Vec<TypeVar> {
    params
        .iter()
        .map(|p| (p.name.clone(), p.bounds.first().cloned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_unit;

    fn snapshot(sources: &[(&str, &str)]) -> Snapshot {
        let reads = sources
            .iter()
            .map(|(path, text)| match read_unit(path, text) {
                Ok(unit) => UnitRead::Parsed(unit),
                Err(err) => UnitRead::Failed {
                    path: path.to_string(),
                    errors: vec![err],
                },
            })
            .collect();
        Snapshot::build(0, Weak::new(), Arc::new(ElementCache::new()), reads)
    }

    #[test]
    fn test_ids_are_preorder() {
        let snap = snapshot(&[(
            "a/A.java",
            "package a;\nimport java.util.List;\n@Deprecated class A { int count; }",
        )]);
        let kinds: Vec<ElementKind> = (0..snap.len() as u32)
            .map(|i| snap.node(ElementId(i)).kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                ElementKind::CompilationUnit,
                ElementKind::Package,
                ElementKind::Import,
                ElementKind::Type,
                ElementKind::Annotation,
                ElementKind::Field,
            ]
        );
        for i in 1..snap.len() as u32 {
            let parent = snap.node(ElementId(i)).parent().unwrap();
            assert!(parent < ElementId(i));
        }
    }

    #[test]
    fn test_logical_keys() {
        let snap = snapshot(&[(
            "a/A.java",
            "package a;\nclass A<T> { class B { void put(T t, java.util.List<String> xs, int... n) {} } }",
        )]);
        assert!(snap.lookup(&ElementKey::new(ElementKind::Type, "a.A$B")).is_some());
        assert!(snap
            .lookup(&ElementKey::new(
                ElementKind::Method,
                "a.A$B#put(Object,List,int[])"
            ))
            .is_some());
        assert!(snap
            .lookup(&ElementKey::new(
                ElementKind::MethodParameter,
                "a.A$B#put(Object,List,int[])/xs"
            ))
            .is_some());
        assert!(snap
            .lookup(&ElementKey::new(ElementKind::TypeParameter, "a.A<T"))
            .is_some());
    }

    #[test]
    fn test_repeated_annotations_get_distinct_keys() {
        let snap = snapshot(&[("A.java", "@Tag(1) @Tag(2) class A {}")]);
        assert!(snap.lookup(&ElementKey::new(ElementKind::Annotation, "A@Tag")).is_some());
        assert!(snap.lookup(&ElementKey::new(ElementKind::Annotation, "A@Tag#2")).is_some());
        assert!(snap
            .lookup(&ElementKey::new(ElementKind::AnnotationElement, "A@Tag#2=value"))
            .is_some());
    }

    #[test]
    fn test_find_type_source_and_binary_names() {
        let snap = snapshot(&[("p/O.java", "package p; class O { static class I {} }")]);
        assert_eq!(snap.find_type("p.O.I"), snap.find_type("p.O$I"));
        assert!(snap.find_type("p.O.I").is_some());
        assert!(snap.find_type("p.Missing").is_none());
    }

    #[test]
    fn test_failed_units_become_errors() {
        let snap = snapshot(&[("A.java", "class A {}"), ("B.java", "class B {")]);
        assert_eq!(snap.unit_roots().count(), 1);
        assert_eq!(snap.errors_for("B.java").len(), 1);
        assert!(snap.errors_for("A.java").is_empty());
    }

    #[test]
    fn test_line_delimiter_detection() {
        let snap = snapshot(&[("A.java", "class A {\r\n}\r\n")]);
        assert_eq!(snap.line_delimiter(), "\r\n");
        let snap = snapshot(&[("A.java", "class A {\n}\n")]);
        assert_eq!(snap.line_delimiter(), "\n");
    }
}
