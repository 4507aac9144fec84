// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Api façades over Spi elements.
//!
//! Every façade is a handle to a shared [`ApiCell`] obtained from the
//! environment's [`ElementCache`](crate::ElementCache). Two façades are equal
//! when they share a cell, so `wrap(s) == wrap(s)` holds while either handle is
//! alive, and `wrap(s).spi() == s` always holds.
//!
//! Navigation stays inside the snapshot the façade was read from. After a
//! reload, use [`ApiElement::resolve_replacement`] to move to the current
//! snapshot.

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use paste::paste;

use tugjava_core::names::{
    binary_to_source, erased_signature, is_primitive, qualify, simple_name, split_array_dims,
    strip_type_arguments, JAVA_LANG,
};
use tugjava_core::{Modifiers, SourceRange};

use crate::cache::ApiCell;
use crate::decl::{AnnotationValue, TypeKind};
use crate::environment::JavaEnvironment;
use crate::snapshot::{
    AnnotationData, AnnotationElementData, ElementKind, FieldData, ImportData, MethodData,
    NodeData, PackageData, ParameterData, TypeData, TypeParameterData, UnitData,
};
use crate::spi::Spi;

/// Annotation types of `java.lang` that resolve without an import.
const JAVA_LANG_ANNOTATIONS: [&str; 5] = [
    "Override",
    "Deprecated",
    "SuppressWarnings",
    "SafeVarargs",
    "FunctionalInterface",
];

/// Operations shared by every façade kind.
pub trait ApiElement: Clone + fmt::Debug + Sized + Send + Sync {
    const KIND: ElementKind;

    #[doc(hidden)]
    fn from_cell(cell: Arc<ApiCell>) -> Self;

    fn cell(&self) -> &Arc<ApiCell>;

    /// This façade as the closed element sum.
    fn element(&self) -> JavaElement;

    /// The cached façade for `spi`.
    ///
    /// `spi` must be of kind [`Self::KIND`]; use [`ApiElement::try_wrap`] when
    /// that is not known.
    fn wrap(spi: &Spi) -> Self {
        debug_assert_eq!(spi.kind(), Self::KIND, "wrapping {:?}", spi);
        Self::from_cell(spi.snapshot().cache().wrap(spi))
    }

    fn try_wrap(spi: &Spi) -> Option<Self> {
        (spi.kind() == Self::KIND).then(|| Self::wrap(spi))
    }

    /// The Spi this façade stands for.
    fn spi(&self) -> &Spi {
        self.cell().spi()
    }

    fn name(&self) -> &str {
        self.spi().name()
    }

    /// Declaration range in the unit text.
    fn range(&self) -> Option<SourceRange> {
        self.spi().range()
    }

    fn environment(&self) -> Option<JavaEnvironment> {
        self.spi().environment()
    }

    fn is_stale(&self) -> bool {
        self.spi().is_stale()
    }

    /// Apply `f` to the façade of the element that now represents this one.
    ///
    /// `None` means the element no longer exists.
    fn resolve_replacement<R>(&self, f: impl FnOnce(Self) -> R) -> Option<R> {
        self.spi()
            .find_current()
            .and_then(|spi| Self::try_wrap(&spi))
            .map(f)
    }

    fn parent(&self) -> Option<JavaElement> {
        self.spi().parent().map(|spi| JavaElement::wrap(&spi))
    }

    /// Children in declaration order.
    fn children(&self) -> Vec<JavaElement> {
        self.spi().children().map(|spi| JavaElement::wrap(&spi)).collect()
    }

    fn compilation_unit(&self) -> Option<CompilationUnit> {
        self.spi()
            .ancestor(ElementKind::CompilationUnit)
            .map(|spi| CompilationUnit::wrap(&spi))
    }

    /// Install this façade as the cached one for its Spi, returning the previous one.
    fn internal_set_api(&self) -> Option<Self> {
        self.spi()
            .snapshot()
            .cache()
            .internal_set_api(self.cell())
            .map(Self::from_cell)
    }
}

macro_rules! facade {
    ($(#[$meta:meta])* $name:ident => $variant:ident($data:ident)) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            cell: Arc<ApiCell>,
        }

        impl ApiElement for $name {
            const KIND: ElementKind = ElementKind::$name;

            fn from_cell(cell: Arc<ApiCell>) -> Self {
                debug_assert_eq!(cell.spi().kind(), ElementKind::$name);
                $name { cell }
            }

            fn cell(&self) -> &Arc<ApiCell> {
                &self.cell
            }

            fn element(&self) -> JavaElement {
                JavaElement::$name(self.clone())
            }
        }

        impl $name {
            // Package and Annotation read everything through their Spi.
            #[allow(dead_code)]
            fn data(&self) -> &$data {
                match self.spi().data() {
                    NodeData::$variant(data) => data,
                    other => unreachable!(
                        "{} façade over {:?}",
                        stringify!($name),
                        other
                    ),
                }
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.cell, &other.cell)
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                (Arc::as_ptr(&self.cell) as usize).hash(state);
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.spi().logical_key().key)
            }
        }
    };
}

facade!(
    /// A `.java` compilation unit.
    CompilationUnit => Unit(UnitData)
);
facade!(
    /// The package declaration of a unit.
    Package => Package(PackageData)
);
facade!(Import => Import(ImportData));
facade!(
    /// A class, interface, enum or annotation type.
    Type => Type(TypeData)
);
facade!(Field => Field(FieldData));
facade!(
    /// A method or constructor.
    Method => Method(MethodData)
);
facade!(MethodParameter => Parameter(ParameterData));
facade!(TypeParameter => TypeParameter(TypeParameterData));
facade!(Annotation => Annotation(AnnotationData));
facade!(AnnotationElement => AnnotationElement(AnnotationElementData));

macro_rules! java_elements {
    ($($variant:ident : $snake:ident),* $(,)?) => {
        paste! {
            /// Any element, as a closed sum over the façade kinds.
            #[derive(Clone, PartialEq, Eq, Hash, Debug)]
            pub enum JavaElement {
                $($variant($variant),)*
            }

            impl JavaElement {
                /// The cached façade for `spi`, of the matching kind.
                pub fn wrap(spi: &Spi) -> JavaElement {
                    let cell = spi.snapshot().cache().wrap(spi);
                    match spi.kind() {
                        $(ElementKind::$variant => {
                            JavaElement::$variant($variant::from_cell(cell))
                        })*
                    }
                }

                /// The Spi this element stands for.
                pub fn spi(&self) -> &Spi {
                    match self {
                        $(JavaElement::$variant(e) => e.spi(),)*
                    }
                }

                $(
                    pub fn [<as_ $snake>](&self) -> Option<&$variant> {
                        match self {
                            JavaElement::$variant(e) => Some(e),
                            _ => None,
                        }
                    }
                )*
            }

            $(
                impl From<$variant> for JavaElement {
                    fn from(element: $variant) -> Self {
                        JavaElement::$variant(element)
                    }
                }
            )*
        }
    };
}

java_elements! {
    CompilationUnit: compilation_unit,
    Package: package,
    Import: import,
    Type: type,
    Field: field,
    Method: method,
    MethodParameter: method_parameter,
    TypeParameter: type_parameter,
    Annotation: annotation,
    AnnotationElement: annotation_element,
}

impl JavaElement {
    pub fn kind(&self) -> ElementKind {
        self.spi().kind()
    }

    pub fn name(&self) -> &str {
        self.spi().name()
    }

    pub fn parent(&self) -> Option<JavaElement> {
        self.spi().parent().map(|spi| JavaElement::wrap(&spi))
    }

    pub fn children(&self) -> Vec<JavaElement> {
        self.spi().children().map(|spi| JavaElement::wrap(&spi)).collect()
    }

    /// Re-resolve against the current snapshot; `None` if deleted.
    pub fn refreshed(&self) -> Option<JavaElement> {
        self.spi().find_current().map(|spi| JavaElement::wrap(&spi))
    }
}

/// Wrap a Spi in its cached façade.
pub fn wrap(spi: &Spi) -> JavaElement {
    JavaElement::wrap(spi)
}

/// The Spi behind a façade.
pub fn unwrap(element: &JavaElement) -> &Spi {
    element.spi()
}

fn children_of<T: ApiElement>(spi: &Spi) -> Vec<T> {
    spi.children_of(T::KIND).map(|c| T::wrap(&c)).collect()
}

// ============================================================================
// Per-kind navigation
// ============================================================================

impl CompilationUnit {
    /// Workspace-relative path of the unit.
    pub fn path(&self) -> &str {
        &self.data().path
    }

    pub fn package(&self) -> Option<Package> {
        children_of(self.spi()).into_iter().next()
    }

    /// Package name, `""` for the default package.
    pub fn package_name(&self) -> &str {
        self.spi().unit_package()
    }

    pub fn imports(&self) -> Vec<Import> {
        children_of(self.spi())
    }

    /// Top-level types in declaration order.
    pub fn types(&self) -> Vec<Type> {
        children_of(self.spi())
    }

    /// All types of the unit, member types included, in pre-order.
    pub fn all_types(&self) -> Vec<Type> {
        let mut out = Vec::new();
        let mut stack: Vec<Type> = self.types().into_iter().rev().collect();
        while let Some(ty) = stack.pop() {
            stack.extend(ty.member_types().into_iter().rev());
            out.push(ty);
        }
        out
    }

    /// Unit text; `None` for library units.
    pub fn source(&self) -> Option<&str> {
        self.spi().unit_source()
    }

    /// Find a top-level type by simple name.
    pub fn find_type(&self, simple: &str) -> Option<Type> {
        self.types().into_iter().find(|t| t.name() == simple)
    }
}

impl Package {
    pub fn annotations(&self) -> Vec<Annotation> {
        children_of(self.spi())
    }
}

impl Import {
    /// Imported name, without a trailing `.*`.
    pub fn imported_name(&self) -> &str {
        &self.data().name
    }

    pub fn is_static(&self) -> bool {
        self.data().is_static
    }

    pub fn is_on_demand(&self) -> bool {
        self.data().on_demand
    }

    /// The import as written after `import [static]`.
    pub fn display_name(&self) -> String {
        let data = self.data();
        if data.on_demand {
            format!("{}.*", data.name)
        } else {
            data.name.clone()
        }
    }
}

impl Type {
    /// Fully-qualified source name (`a.b.Outer.Inner`).
    pub fn fully_qualified_name(&self) -> String {
        binary_to_source(&self.data().binary_name)
    }

    /// Binary name (`a.b.Outer$Inner`).
    pub fn binary_name(&self) -> &str {
        &self.data().binary_name
    }

    pub fn package_name(&self) -> &str {
        self.spi().unit_package()
    }

    pub fn type_kind(&self) -> TypeKind {
        self.data().kind
    }

    pub fn modifiers(&self) -> Modifiers {
        self.data().modifiers
    }

    pub fn is_interface(&self) -> bool {
        self.data().kind.is_interface_like()
    }

    pub fn is_binary(&self) -> bool {
        self.data().modifiers.contains(Modifiers::BINARY)
    }

    /// Superclass as written.
    pub fn super_class(&self) -> Option<&str> {
        self.data().super_class.as_deref()
    }

    /// Super-interfaces as written (`extends` of an interface, `implements` of a class).
    pub fn super_interfaces(&self) -> &[String] {
        &self.data().super_interfaces
    }

    pub fn type_parameters(&self) -> Vec<TypeParameter> {
        children_of(self.spi())
    }

    pub fn annotations(&self) -> Vec<Annotation> {
        children_of(self.spi())
    }

    /// Fields, methods and member types in declaration order.
    pub fn members(&self) -> Vec<JavaElement> {
        self.spi()
            .children()
            .filter(|c| {
                matches!(
                    c.kind(),
                    ElementKind::Field | ElementKind::Method | ElementKind::Type
                )
            })
            .map(|c| JavaElement::wrap(&c))
            .collect()
    }

    pub fn fields(&self) -> Vec<Field> {
        children_of(self.spi())
    }

    pub fn methods(&self) -> Vec<Method> {
        children_of(self.spi())
    }

    pub fn member_types(&self) -> Vec<Type> {
        children_of(self.spi())
    }

    pub fn find_field(&self, name: &str) -> Option<Field> {
        self.fields().into_iter().find(|f| f.name() == name)
    }

    /// Find a method by name and erased parameter types (`["String", "int[]"]`).
    pub fn find_method(&self, name: &str, erased_parameters: &[&str]) -> Option<Method> {
        let signature = erased_signature(name, erased_parameters.iter().copied());
        self.methods()
            .into_iter()
            .find(|m| m.erased_signature() == signature)
    }

    /// The enclosing type of a member type.
    pub fn declaring_type(&self) -> Option<Type> {
        self.spi().parent().and_then(|spi| Type::try_wrap(&spi))
    }

    /// Enum constant list as written.
    pub fn enum_constants_source(&self) -> Option<&str> {
        self.data().enum_constants.as_deref()
    }

    pub fn javadoc(&self) -> Option<&str> {
        self.spi().slice(self.data().javadoc)
    }

    /// Resolve a type name as written inside this type.
    ///
    /// Looks at enclosing and member types, single-type imports, the unit's
    /// package, on-demand imports, `java.lang`, and finally treats the name as
    /// fully qualified.
    pub fn resolve_type(&self, written: &str) -> Option<Type> {
        resolve_type_name(self.spi(), written).map(|spi| Type::wrap(&spi))
    }

    /// Fully-qualified name a written type name refers to, even when the type
    /// is not part of the environment (imported library types).
    pub fn qualify_reference(&self, written: &str) -> Option<String> {
        qualify_reference(self.spi(), written)
    }

    pub fn find_super_class(&self) -> Option<Type> {
        self.resolve_type(self.super_class()?)
    }

    pub fn find_super_interfaces(&self) -> Vec<Type> {
        self.super_interfaces()
            .iter()
            .filter_map(|written| self.resolve_type(written))
            .collect()
    }

    /// All resolvable supertypes, breadth-first, each listed once.
    pub fn super_types(&self) -> Vec<Type> {
        let mut seen = HashSet::from([self.spi().id()]);
        let mut queue = VecDeque::from([self.clone()]);
        let mut out = Vec::new();
        while let Some(ty) = queue.pop_front() {
            let direct = ty.find_super_class().into_iter().chain(ty.find_super_interfaces());
            for super_type in direct {
                if seen.insert(super_type.spi().id()) {
                    out.push(super_type.clone());
                    queue.push_back(super_type);
                }
            }
        }
        out
    }

    /// Type variables in scope with their first bound: own, then enclosing types'.
    pub fn type_variables(&self) -> Vec<(String, Option<String>)> {
        let mut vars = Vec::new();
        let mut current = Some(self.clone());
        while let Some(ty) = current {
            for param in ty.type_parameters() {
                vars.push((param.name().to_string(), param.bounds().first().cloned()));
            }
            current = ty.declaring_type();
        }
        vars
    }
}

impl Field {
    pub fn data_type(&self) -> &str {
        &self.data().data_type
    }

    pub fn modifiers(&self) -> Modifiers {
        self.data().modifiers
    }

    /// Initializer expression as written.
    pub fn initializer_source(&self) -> Option<&str> {
        self.spi().slice(self.data().initializer)
    }

    pub fn annotations(&self) -> Vec<Annotation> {
        children_of(self.spi())
    }

    pub fn javadoc(&self) -> Option<&str> {
        self.spi().slice(self.data().javadoc)
    }

    pub fn declaring_type(&self) -> Option<Type> {
        self.spi().parent().and_then(|spi| Type::try_wrap(&spi))
    }
}

impl Method {
    /// Return type as written; `None` for constructors.
    pub fn return_type(&self) -> Option<&str> {
        self.data().return_type.as_deref()
    }

    pub fn is_constructor(&self) -> bool {
        self.data().is_constructor
    }

    pub fn is_varargs(&self) -> bool {
        self.data().is_varargs
    }

    pub fn modifiers(&self) -> Modifiers {
        self.data().modifiers
    }

    pub fn parameters(&self) -> Vec<MethodParameter> {
        children_of(self.spi())
    }

    pub fn type_parameters(&self) -> Vec<TypeParameter> {
        children_of(self.spi())
    }

    /// Declared exceptions as written.
    pub fn exceptions(&self) -> &[String] {
        &self.data().exceptions
    }

    pub fn annotations(&self) -> Vec<Annotation> {
        children_of(self.spi())
    }

    /// Body text between the braces, as written. `None` for abstract,
    /// native and library methods.
    pub fn body_source(&self) -> Option<&str> {
        let block = self.spi().slice(self.data().body)?;
        block.strip_prefix('{')?.strip_suffix('}')
    }

    pub fn body_range(&self) -> Option<SourceRange> {
        self.data().body
    }

    /// `default` value of an annotation type member, as written.
    pub fn default_value_source(&self) -> Option<&str> {
        self.spi().slice(self.data().default_value)
    }

    /// Erased signature, `name(T1,T2)`.
    pub fn erased_signature(&self) -> &str {
        &self.data().signature
    }

    pub fn javadoc(&self) -> Option<&str> {
        self.spi().slice(self.data().javadoc)
    }

    pub fn declaring_type(&self) -> Option<Type> {
        self.spi().parent().and_then(|spi| Type::try_wrap(&spi))
    }
}

impl MethodParameter {
    /// Declared type without the varargs ellipsis.
    pub fn data_type(&self) -> &str {
        &self.data().data_type
    }

    pub fn modifiers(&self) -> Modifiers {
        self.data().modifiers
    }

    pub fn is_varargs(&self) -> bool {
        self.data().is_varargs
    }

    pub fn annotations(&self) -> Vec<Annotation> {
        children_of(self.spi())
    }

    pub fn declaring_method(&self) -> Option<Method> {
        self.spi().parent().and_then(|spi| Method::try_wrap(&spi))
    }
}

impl TypeParameter {
    pub fn bounds(&self) -> &[String] {
        &self.data().bounds
    }
}

impl Annotation {
    /// Resolved annotation type name; the written name if it cannot be resolved.
    pub fn fully_qualified_name(&self) -> String {
        let written = self.name();
        if let Some(owner) = self.spi().parent() {
            if let Some(fqn) = qualify_reference(&owner, written) {
                return fqn;
            }
        }
        if !written.contains('.') && JAVA_LANG_ANNOTATIONS.contains(&written) {
            return qualify(JAVA_LANG, written);
        }
        written.to_string()
    }

    /// Check if this annotation names `fqn` (`java.lang.Override` matches `@Override`).
    pub fn is(&self, fqn: &str) -> bool {
        self.name() == fqn || self.fully_qualified_name() == fqn
    }

    pub fn elements(&self) -> Vec<AnnotationElement> {
        children_of(self.spi())
    }

    pub fn element(&self, name: &str) -> Option<AnnotationElement> {
        self.elements().into_iter().find(|e| e.name() == name)
    }

    /// `(name, value)` pairs in source order.
    pub fn values(&self) -> Vec<(String, AnnotationValue)> {
        self.elements()
            .iter()
            .map(|e| (e.name().to_string(), e.value().clone()))
            .collect()
    }
}

impl AnnotationElement {
    pub fn value(&self) -> &AnnotationValue {
        &self.data().value
    }

    /// The value as written.
    pub fn value_source(&self) -> Option<&str> {
        self.spi().slice(self.data().value_range)
    }
}

// ============================================================================
// Type name resolution
// ============================================================================

/// Resolve a written type reference to a type of the same snapshot.
pub(crate) fn resolve_type_name(context: &Spi, written: &str) -> Option<Spi> {
    let snapshot = context.snapshot();
    let stripped = strip_type_arguments(written);
    let (base, _) = split_array_dims(&stripped);
    if base.is_empty() || is_primitive(base) {
        return None;
    }
    let (head, rest) = match base.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (base, None),
    };
    let found = |id| Spi::new(snapshot.clone(), id);
    for candidate in simple_name_candidates(context, head) {
        let fqn = match rest {
            Some(rest) => format!("{}.{}", candidate, rest),
            None => candidate,
        };
        if let Some(id) = snapshot.find_type(&fqn) {
            return Some(found(id));
        }
    }
    snapshot.find_type(base).map(found)
}

/// The fully-qualified name a written reference denotes, resolved or imported.
fn qualify_reference(context: &Spi, written: &str) -> Option<String> {
    if let Some(spi) = resolve_type_name(context, written) {
        return Some(binary_to_source(&Type::wrap(&spi).data().binary_name));
    }
    let stripped = strip_type_arguments(written);
    let (base, _) = split_array_dims(&stripped);
    if base.contains('.') {
        return Some(base.to_string());
    }
    single_type_imports(context)
        .into_iter()
        .find(|name| simple_name(name) == base)
}

/// Candidate fully-qualified names for a simple name, in scope order.
fn simple_name_candidates(context: &Spi, simple: &str) -> Vec<String> {
    let mut candidates = Vec::new();

    // Enclosing types and their member types.
    let mut scope = context.ancestor(ElementKind::Type);
    while let Some(spi) = scope {
        let ty = Type::wrap(&spi);
        if ty.name() == simple {
            candidates.push(ty.fully_qualified_name());
        }
        for member in ty.member_types() {
            if member.name() == simple {
                candidates.push(member.fully_qualified_name());
            }
        }
        scope = spi.parent().and_then(|p| p.ancestor(ElementKind::Type));
    }

    for name in single_type_imports(context) {
        if simple_name(&name) == simple {
            candidates.push(name);
        }
    }

    candidates.push(qualify(context.unit_package(), simple));

    if let Some(unit) = context.ancestor(ElementKind::CompilationUnit) {
        for import in children_of::<Import>(&unit) {
            if import.is_on_demand() && !import.is_static() {
                candidates.push(format!("{}.{}", import.imported_name(), simple));
            }
        }
    }

    candidates.push(qualify(JAVA_LANG, simple));
    candidates
}

fn single_type_imports(context: &Spi) -> Vec<String> {
    let Some(unit) = context.ancestor(ElementKind::CompilationUnit) else {
        return Vec::new();
    };
    children_of::<Import>(&unit)
        .into_iter()
        .filter(|i| !i.is_on_demand() && !i.is_static())
        .map(|i| i.imported_name().to_string())
        .collect()
}
