// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Working-copy conversion: model elements to generators.
//!
//! A [`WorkingCopyConverter`] drives one top-level conversion. For every
//! element it reaches it calls the transformer exactly once, handing it a
//! [`TransformInput`] whose default working copy is built by the functions in
//! this module. Those functions convert the element's children first, in
//! declaration order, and then assemble the parent's generator from what the
//! children's transforms kept.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};

use tracing::{debug, trace};

use tugjava_core::Modifiers;
use tugjava_model::{
    Annotation, AnnotationElement, ApiElement, CompilationUnit, ElementKind, Field, Import,
    JavaElement, Method, MethodParameter, Package, SpiKey, Type, TypeParameter,
};

use crate::error::{GenError, GenResult};
use crate::generator::{
    AnnotationElementGenerator, AnnotationGenerator, CompilationUnitGenerator, FieldGenerator,
    ImportGenerator, MemberGenerator, MethodBody, MethodGenerator, MethodParameterGenerator,
    PackageGenerator, TypeGenerator, TypeParameterGenerator, TypeRef,
};
use crate::output::detach_block;
use crate::transform::{DefaultTransformer, Transform, TransformInput, WorkingCopyTransformer};

// ============================================================================
// Statistics
// ============================================================================

/// Counts of transformer callbacks and default copies, per element kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionStats {
    callbacks: BTreeMap<ElementKind, usize>,
    default_copies: BTreeMap<ElementKind, usize>,
}

impl ConversionStats {
    /// Transformer callbacks invoked for `kind`.
    pub fn callbacks(&self, kind: ElementKind) -> usize {
        self.callbacks.get(&kind).copied().unwrap_or(0)
    }

    /// Default working copies built for `kind`.
    pub fn default_copies(&self, kind: ElementKind) -> usize {
        self.default_copies.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_callbacks(&self) -> usize {
        self.callbacks.values().sum()
    }

    pub fn total_default_copies(&self) -> usize {
        self.default_copies.values().sum()
    }
}

// ============================================================================
// Converter
// ============================================================================

/// State of one top-level conversion.
pub struct WorkingCopyConverter<'t> {
    transformer: &'t dyn WorkingCopyTransformer,
    transformed: RefCell<HashSet<SpiKey>>,
    stats: RefCell<ConversionStats>,
}

impl std::fmt::Debug for WorkingCopyConverter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkingCopyConverter")
            .field("transformed", &self.transformed.borrow().len())
            .field("stats", &self.stats.borrow())
            .finish_non_exhaustive()
    }
}

macro_rules! convert_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $model:ty => $generator:ty, $build:ident
        );* $(;)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Transform one `", stringify!($model), "`.")]
                pub fn [<convert_ $base_name>](
                    &self,
                    model: &$model,
                ) -> GenResult<Transform<$generator>> {
                    self.begin(model)?;
                    let input = TransformInput::new(model.clone(), self, $build);
                    self.transformer.[<transform_ $base_name>](input)
                }
            )*
        }
    };
}

impl<'t> WorkingCopyConverter<'t> {
    pub fn new(transformer: &'t dyn WorkingCopyTransformer) -> Self {
        WorkingCopyConverter {
            transformer,
            transformed: RefCell::new(HashSet::new()),
            stats: RefCell::new(ConversionStats::default()),
        }
    }

    /// Counts so far.
    pub fn stats(&self) -> ConversionStats {
        self.stats.borrow().clone()
    }

    /// Convert the element a conversion starts from.
    ///
    /// `None` if the transformer removed it.
    pub fn convert_root<E: ToWorkingCopy>(&self, element: &E) -> GenResult<Option<E::WorkingCopy>> {
        let result = element.convert_in(self);
        let stats = self.stats.borrow();
        debug!(
            root = %E::KIND,
            callbacks = stats.total_callbacks(),
            default_copies = stats.total_default_copies(),
            ok = result.is_ok(),
            "working-copy conversion"
        );
        single(E::KIND, result?)
    }

    convert_methods! {
        compilation_unit: CompilationUnit => CompilationUnitGenerator, build_unit;
        type: Type => TypeGenerator, build_type;
        field: Field => FieldGenerator, build_field;
        method: Method => MethodGenerator, build_method;
        method_parameter: MethodParameter => MethodParameterGenerator, build_parameter;
        type_parameter: TypeParameter => TypeParameterGenerator, build_type_parameter;
        annotation: Annotation => AnnotationGenerator, build_annotation;
        annotation_element: AnnotationElement => AnnotationElementGenerator,
            build_annotation_element;
    }

    /// Transform one import; the transformer works on its text.
    pub fn convert_import(&self, import: &Import) -> GenResult<Transform<ImportGenerator>> {
        self.begin(import)?;
        let input = TransformInput::new(import.clone(), self, build_import_text);
        let text = self.transformer.transform_import(input)?;
        Ok(text.map(|text| ImportGenerator::parse(&text)))
    }

    /// Transform a package; the transformer works on its name.
    ///
    /// The package annotations are converted after the package callback, and
    /// only if the package is kept.
    pub fn convert_package(&self, package: &Package) -> GenResult<Transform<PackageGenerator>> {
        self.begin(package)?;
        let input = TransformInput::new(package.clone(), self, build_package_name);
        match self.transformer.transform_package(input)? {
            Transform::Keep(name) => {
                let annotations =
                    self.convert_all(&package.annotations(), |a| self.convert_annotation(a))?;
                Ok(Transform::Keep(PackageGenerator::new(name).with_annotations(annotations)))
            }
            Transform::Remove => Ok(Transform::Remove),
            Transform::Flatten(_) => Err(GenError::NotFlattenable {
                kind: ElementKind::Package,
            }),
        }
    }

    /// Convert a list of children, splicing in what each transform kept.
    pub fn convert_all<M, G>(
        &self,
        models: &[M],
        convert: impl Fn(&M) -> GenResult<Transform<G>>,
    ) -> GenResult<Vec<G>> {
        let mut out = Vec::with_capacity(models.len());
        for model in models {
            out.extend(convert(model)?.into_vec());
        }
        Ok(out)
    }

    /// Mark `model` as transformed; fails if it already was.
    fn begin<M: ApiElement>(&self, model: &M) -> GenResult<()> {
        let spi = model.spi();
        if !self.transformed.borrow_mut().insert(spi.key()) {
            return Err(GenError::DuplicateTransform {
                key: spi.logical_key().to_string(),
            });
        }
        trace!(kind = %M::KIND, name = model.name(), "transform");
        *self.stats.borrow_mut().callbacks.entry(M::KIND).or_insert(0) += 1;
        Ok(())
    }

    pub(crate) fn record_default_copy(&self, kind: ElementKind) {
        *self.stats.borrow_mut().default_copies.entry(kind).or_insert(0) += 1;
    }
}

/// The one generator a root or single-valued slot holds.
fn single<G>(kind: ElementKind, transform: Transform<G>) -> GenResult<Option<G>> {
    match transform {
        Transform::Keep(g) => Ok(Some(g)),
        Transform::Remove => Ok(None),
        Transform::Flatten(_) => Err(GenError::NotFlattenable { kind }),
    }
}

// ============================================================================
// Default working copies
// ============================================================================

fn source_modifiers(modifiers: Modifiers) -> Modifiers {
    modifiers.without(Modifiers::BINARY)
}

fn type_refs(written: &[String]) -> Vec<TypeRef> {
    written.iter().map(|w| TypeRef::source(w.as_str())).collect()
}

fn build_unit(
    conv: &WorkingCopyConverter<'_>,
    unit: &CompilationUnit,
) -> GenResult<CompilationUnitGenerator> {
    let package = match unit.package() {
        Some(package) => single(ElementKind::Package, conv.convert_package(&package)?)?,
        None => None,
    };
    let imports = conv.convert_all(&unit.imports(), |i| conv.convert_import(i))?;
    let types = conv.convert_all(&unit.types(), |t| conv.convert_type(t))?;
    Ok(CompilationUnitGenerator::new(unit.path())
        .with_package_generator(package)
        .with_imports(imports)
        .with_types(types))
}

fn build_package_name(_conv: &WorkingCopyConverter<'_>, package: &Package) -> GenResult<String> {
    Ok(package.name().to_string())
}

fn build_import_text(_conv: &WorkingCopyConverter<'_>, import: &Import) -> GenResult<String> {
    if import.is_static() {
        Ok(format!("static {}", import.display_name()))
    } else {
        Ok(import.display_name())
    }
}

fn build_type(conv: &WorkingCopyConverter<'_>, ty: &Type) -> GenResult<TypeGenerator> {
    let annotations = conv.convert_all(&ty.annotations(), |a| conv.convert_annotation(a))?;
    let type_parameters =
        conv.convert_all(&ty.type_parameters(), |p| conv.convert_type_parameter(p))?;
    let mut members: Vec<MemberGenerator> = Vec::new();
    for member in ty.members() {
        match member {
            JavaElement::Field(field) => members.extend(
                conv.convert_field(&field)?
                    .into_vec()
                    .into_iter()
                    .map(MemberGenerator::Field),
            ),
            JavaElement::Method(method) => members.extend(
                conv.convert_method(&method)?
                    .into_vec()
                    .into_iter()
                    .map(MemberGenerator::Method),
            ),
            JavaElement::Type(inner) => members.extend(
                conv.convert_type(&inner)?
                    .into_vec()
                    .into_iter()
                    .map(MemberGenerator::Type),
            ),
            _ => {}
        }
    }
    Ok(TypeGenerator::new(ty.type_kind(), ty.name())
        .with_modifiers(source_modifiers(ty.modifiers()))
        .with_annotations(annotations)
        .with_type_parameters(type_parameters)
        .with_super_class(ty.super_class().map(TypeRef::source))
        .with_interfaces(type_refs(ty.super_interfaces()))
        .with_members(members)
        .with_enum_constants(ty.enum_constants_source().map(detach_block))
        .with_javadoc(ty.javadoc().map(str::to_string)))
}

fn build_field(conv: &WorkingCopyConverter<'_>, field: &Field) -> GenResult<FieldGenerator> {
    let annotations = conv.convert_all(&field.annotations(), |a| conv.convert_annotation(a))?;
    Ok(FieldGenerator::new(field.data_type(), field.name())
        .with_modifiers(source_modifiers(field.modifiers()))
        .with_annotations(annotations)
        .with_initializer(field.initializer_source().map(str::to_string))
        .with_javadoc(field.javadoc().map(str::to_string)))
}

fn build_method(conv: &WorkingCopyConverter<'_>, method: &Method) -> GenResult<MethodGenerator> {
    let annotations = conv.convert_all(&method.annotations(), |a| conv.convert_annotation(a))?;
    let type_parameters =
        conv.convert_all(&method.type_parameters(), |p| conv.convert_type_parameter(p))?;
    let parameters = conv.convert_all(&method.parameters(), |p| conv.convert_method_parameter(p))?;
    let mut generator = MethodGenerator::default()
        .with_name(method.name())
        .with_constructor(method.is_constructor())
        .with_return_type(method.return_type().map(TypeRef::source))
        .with_modifiers(source_modifiers(method.modifiers()))
        .with_annotations(annotations)
        .with_type_parameters(type_parameters)
        .with_parameters(parameters)
        .with_exceptions(type_refs(method.exceptions()))
        .with_declaring_type(method.declaring_type().map(|ty| ty.fully_qualified_name()))
        .with_default_value(method.default_value_source().map(str::to_string))
        .with_javadoc(method.javadoc().map(str::to_string));
    if let Some(body) = method.body_source() {
        generator = generator.with_body(MethodBody::Source(detach_block(body)));
    }
    Ok(generator)
}

fn build_parameter(
    conv: &WorkingCopyConverter<'_>,
    param: &MethodParameter,
) -> GenResult<MethodParameterGenerator> {
    let annotations = conv.convert_all(&param.annotations(), |a| conv.convert_annotation(a))?;
    Ok(MethodParameterGenerator::new(param.data_type(), param.name())
        .with_modifiers(source_modifiers(param.modifiers()))
        .with_annotations(annotations)
        .with_varargs(param.is_varargs()))
}

fn build_type_parameter(
    _conv: &WorkingCopyConverter<'_>,
    param: &TypeParameter,
) -> GenResult<TypeParameterGenerator> {
    Ok(TypeParameterGenerator::new(param.name()).with_bounds(type_refs(param.bounds())))
}

fn build_annotation(
    conv: &WorkingCopyConverter<'_>,
    annotation: &Annotation,
) -> GenResult<AnnotationGenerator> {
    let elements =
        conv.convert_all(&annotation.elements(), |e| conv.convert_annotation_element(e))?;
    Ok(AnnotationGenerator::new(annotation.name()).with_elements(elements))
}

fn build_annotation_element(
    _conv: &WorkingCopyConverter<'_>,
    element: &AnnotationElement,
) -> GenResult<AnnotationElementGenerator> {
    Ok(AnnotationElementGenerator::new(element.name(), element.value().clone()))
}

// ============================================================================
// Entry points
// ============================================================================

/// Model elements that convert to a working copy.
pub trait ToWorkingCopy: ApiElement {
    type WorkingCopy;

    /// Convert within an existing conversion.
    fn convert_in(
        &self,
        converter: &WorkingCopyConverter<'_>,
    ) -> GenResult<Transform<Self::WorkingCopy>>;

    /// Convert this element and its subtree through `transformer`.
    ///
    /// `None` if the transformer removed this element.
    fn transform_with(
        &self,
        transformer: &dyn WorkingCopyTransformer,
    ) -> GenResult<Option<Self::WorkingCopy>> {
        WorkingCopyConverter::new(transformer).convert_root(self)
    }

    /// The unmodified generator equivalent of this element.
    fn to_working_copy(&self) -> GenResult<Self::WorkingCopy> {
        self.transform_with(&DefaultTransformer)?
            .ok_or(GenError::RootRemoved { kind: Self::KIND })
    }
}

macro_rules! to_working_copy {
    ($($model:ty => $generator:ty, $convert:ident;)*) => {
        $(
            impl ToWorkingCopy for $model {
                type WorkingCopy = $generator;

                fn convert_in(
                    &self,
                    converter: &WorkingCopyConverter<'_>,
                ) -> GenResult<Transform<Self::WorkingCopy>> {
                    converter.$convert(self)
                }
            }
        )*
    };
}

to_working_copy! {
    CompilationUnit => CompilationUnitGenerator, convert_compilation_unit;
    Package => PackageGenerator, convert_package;
    Import => ImportGenerator, convert_import;
    Type => TypeGenerator, convert_type;
    Field => FieldGenerator, convert_field;
    Method => MethodGenerator, convert_method;
    MethodParameter => MethodParameterGenerator, convert_method_parameter;
    TypeParameter => TypeParameterGenerator, convert_type_parameter;
    Annotation => AnnotationGenerator, convert_annotation;
    AnnotationElement => AnnotationElementGenerator, convert_annotation_element;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single() {
        assert_eq!(single(ElementKind::Type, Transform::Keep(1)).unwrap(), Some(1));
        assert_eq!(single::<i32>(ElementKind::Type, Transform::Remove).unwrap(), None);
        assert!(matches!(
            single(ElementKind::Type, Transform::Flatten(vec![1, 2])),
            Err(GenError::NotFlattenable { kind: ElementKind::Type })
        ));
    }

    #[test]
    fn test_stats_default_to_zero() {
        let stats = ConversionStats::default();
        assert_eq!(stats.callbacks(ElementKind::Method), 0);
        assert_eq!(stats.total_default_copies(), 0);
    }
}
