// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Raw declaration data produced by the compiler collaborator.
//!
//! These plain structs are what an [`ElementSource`](crate::ElementSource)
//! hands to the environment. The environment flattens them into a
//! [`Snapshot`](crate::Snapshot) arena; callers never see them directly except
//! for [`AnnotationValue`], which is shared with the generator crate.

use std::fmt;
use std::sync::Arc;

use tugjava_core::{Modifiers, SourceRange};

/// One compilation unit as read by the collaborator.
#[derive(Debug, Clone, Default)]
pub struct UnitDecl {
    /// Workspace-relative path (`com/acme/Foo.java`).
    pub path: String,
    /// Unit text. `None` for library (binary) units.
    pub source: Option<Arc<str>>,
    pub package: Option<PackageDecl>,
    pub imports: Vec<ImportDecl>,
    pub types: Vec<TypeDecl>,
}

impl UnitDecl {
    /// Package name, or `""` for the default package.
    pub fn package_name(&self) -> &str {
        self.package.as_ref().map(|p| p.name.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Clone, Default)]
pub struct PackageDecl {
    pub name: String,
    pub annotations: Vec<AnnotationDecl>,
    pub range: Option<SourceRange>,
}

#[derive(Debug, Clone, Default)]
pub struct ImportDecl {
    /// Imported name without a trailing `.*`.
    pub name: String,
    pub is_static: bool,
    pub on_demand: bool,
    pub range: Option<SourceRange>,
}

impl ImportDecl {
    /// The import as it appears after `import [static]`.
    pub fn display_name(&self) -> String {
        if self.on_demand {
            format!("{}.*", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Kind of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation,
}

impl TypeKind {
    /// The declaration keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Annotation => "@interface",
        }
    }

    /// Interfaces and annotation types declare abstract members by default.
    pub fn is_interface_like(&self) -> bool {
        matches!(self, TypeKind::Interface | TypeKind::Annotation)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TypeDecl {
    pub name: String,
    pub kind: TypeKind,
    pub modifiers: Modifiers,
    pub type_parameters: Vec<TypeParameterDecl>,
    pub super_class: Option<String>,
    pub super_interfaces: Vec<String>,
    pub annotations: Vec<AnnotationDecl>,
    /// Fields, methods and member types in declaration order.
    pub members: Vec<MemberDecl>,
    /// Enum constant list as written, without the terminating `;`.
    pub enum_constants: Option<String>,
    pub range: Option<SourceRange>,
    pub javadoc: Option<SourceRange>,
}

#[derive(Debug, Clone)]
pub enum MemberDecl {
    Field(FieldDecl),
    Method(MethodDecl),
    Type(TypeDecl),
}

#[derive(Debug, Clone, Default)]
pub struct FieldDecl {
    pub name: String,
    pub data_type: String,
    pub modifiers: Modifiers,
    pub annotations: Vec<AnnotationDecl>,
    /// Range of the initializer expression (after `=`).
    pub initializer: Option<SourceRange>,
    pub range: Option<SourceRange>,
    pub javadoc: Option<SourceRange>,
}

#[derive(Debug, Clone, Default)]
pub struct MethodDecl {
    pub name: String,
    /// `None` for constructors.
    pub return_type: Option<String>,
    pub is_constructor: bool,
    pub modifiers: Modifiers,
    pub type_parameters: Vec<TypeParameterDecl>,
    pub parameters: Vec<ParameterDecl>,
    pub exceptions: Vec<String>,
    pub annotations: Vec<AnnotationDecl>,
    /// Range of the body including its braces.
    pub body: Option<SourceRange>,
    /// Range of the `default` value of an annotation type member.
    pub default_value: Option<SourceRange>,
    pub range: Option<SourceRange>,
    pub javadoc: Option<SourceRange>,
}

impl MethodDecl {
    pub fn is_varargs(&self) -> bool {
        self.parameters.last().is_some_and(|p| p.is_varargs)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParameterDecl {
    pub name: String,
    /// Declared type without the varargs ellipsis.
    pub data_type: String,
    pub modifiers: Modifiers,
    pub annotations: Vec<AnnotationDecl>,
    pub is_varargs: bool,
    pub range: Option<SourceRange>,
}

#[derive(Debug, Clone, Default)]
pub struct TypeParameterDecl {
    pub name: String,
    pub bounds: Vec<String>,
    pub range: Option<SourceRange>,
}

#[derive(Debug, Clone, Default)]
pub struct AnnotationDecl {
    /// Annotation type name as written (`Override`, `javax.annotation.Nonnull`).
    pub name: String,
    pub elements: Vec<AnnotationElementDecl>,
    pub range: Option<SourceRange>,
}

#[derive(Debug, Clone)]
pub struct AnnotationElementDecl {
    /// Element name; `value` for the single-element shorthand.
    pub name: String,
    pub value: AnnotationValue,
    pub value_range: Option<SourceRange>,
    pub range: Option<SourceRange>,
}

/// The value of an annotation element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationValue {
    /// Any expression, kept as written (`"x"`, `42`, `Foo.class`, `Mode.FAST`).
    Expr(String),
    /// An element value array (`{a, b}`).
    Array(Vec<AnnotationValue>),
    /// A nested annotation.
    Annotation {
        name: String,
        elements: Vec<(String, AnnotationValue)>,
    },
}

impl AnnotationValue {
    pub fn expr(text: impl Into<String>) -> Self {
        AnnotationValue::Expr(text.into())
    }

    /// Array items, or `None` if this is not an array.
    pub fn as_array(&self) -> Option<&[AnnotationValue]> {
        match self {
            AnnotationValue::Array(items) => Some(items),
            _ => None,
        }
    }
}

/// Write `@Name`, `@Name(value)` or `@Name(a = 1, b = 2)`.
pub fn write_annotation(
    f: &mut dyn fmt::Write,
    name: &str,
    elements: &[(String, AnnotationValue)],
) -> fmt::Result {
    write!(f, "@{}", name)?;
    match elements {
        [] => Ok(()),
        [(key, value)] if key == "value" => write!(f, "({})", value),
        _ => {
            f.write_char('(')?;
            for (i, (key, value)) in elements.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{} = {}", key, value)?;
            }
            f.write_char(')')
        }
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Expr(text) => f.write_str(text),
            AnnotationValue::Array(items) => {
                f.write_str("{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("}")
            }
            AnnotationValue::Annotation { name, elements } => write_annotation(f, name, elements),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_display_name() {
        let import = ImportDecl {
            name: "java.util".to_string(),
            on_demand: true,
            ..Default::default()
        };
        assert_eq!(import.display_name(), "java.util.*");
    }

    #[test]
    fn test_annotation_value_display() {
        let value = AnnotationValue::Array(vec![
            AnnotationValue::expr("\"a\""),
            AnnotationValue::Annotation {
                name: "Tag".to_string(),
                elements: vec![("value".to_string(), AnnotationValue::expr("1"))],
            },
        ]);
        assert_eq!(value.to_string(), "{\"a\", @Tag(1)}");
    }

    #[test]
    fn test_named_pairs_display() {
        let value = AnnotationValue::Annotation {
            name: "Range".to_string(),
            elements: vec![
                ("min".to_string(), AnnotationValue::expr("0")),
                ("max".to_string(), AnnotationValue::expr("9")),
            ],
        };
        assert_eq!(value.to_string(), "@Range(min = 0, max = 9)");
    }

    #[test]
    fn test_method_varargs() {
        let method = MethodDecl {
            parameters: vec![ParameterDecl {
                name: "args".to_string(),
                data_type: "String".to_string(),
                is_varargs: true,
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(method.is_varargs());
    }
}
