// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The compiler collaborator interface and an in-memory implementation.
//!
//! A [`JavaEnvironment`](crate::JavaEnvironment) never reads files itself. It
//! asks an [`ElementSource`] for the current set of units each time it loads
//! or reloads. [`SourceSet`] is the reference collaborator: a shared,
//! mutable map of unit texts read with the declaration reader.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use tugjava_core::{ModelError, ModelResult, Modifiers};

use crate::decl::{MemberDecl, TypeDecl, UnitDecl};
use crate::reader::read_unit;

/// Outcome of reading one unit.
#[derive(Debug, Clone)]
pub enum UnitRead {
    Parsed(UnitDecl),
    Failed { path: String, errors: Vec<ModelError> },
}

impl UnitRead {
    pub fn path(&self) -> &str {
        match self {
            UnitRead::Parsed(unit) => &unit.path,
            UnitRead::Failed { path, .. } => path,
        }
    }
}

/// The compiler collaborator consumed by the environment.
///
/// Units that fail to read are reported as [`UnitRead::Failed`] and become
/// compile errors of the snapshot; an `Err` aborts the whole load.
pub trait ElementSource: Send + Sync {
    fn read_units(&self) -> ModelResult<Vec<UnitRead>>;
}

impl<F> ElementSource for F
where
    F: Fn() -> ModelResult<Vec<UnitRead>> + Send + Sync,
{
    fn read_units(&self) -> ModelResult<Vec<UnitRead>> {
        self()
    }
}

#[derive(Debug, Clone)]
struct SourceEntry {
    text: Arc<str>,
    library: bool,
}

/// In-memory set of Java units.
///
/// Mutations are observed by environments on their next `reload()`.
#[derive(Debug, Default)]
pub struct SourceSet {
    entries: RwLock<BTreeMap<String, SourceEntry>>,
}

impl SourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience for building a shared set from `(path, text)` pairs.
    pub fn with_sources<'a>(sources: impl IntoIterator<Item = (&'a str, &'a str)>) -> Arc<Self> {
        let set = SourceSet::new();
        for (path, text) in sources {
            set.add_source(path, text);
        }
        Arc::new(set)
    }

    /// Add (or replace) a unit with source text.
    pub fn add_source(&self, path: impl Into<String>, text: impl AsRef<str>) {
        self.insert(path.into(), text.as_ref(), false);
    }

    /// Add a library unit: its declarations are visible but it has no source.
    pub fn add_library(&self, path: impl Into<String>, text: impl AsRef<str>) {
        self.insert(path.into(), text.as_ref(), true);
    }

    /// Replace the text of an existing unit. Returns `false` if `path` is unknown.
    pub fn update(&self, path: &str, text: impl AsRef<str>) -> bool {
        let mut entries = self.entries.write();
        match entries.get_mut(path) {
            Some(entry) => {
                entry.text = Arc::from(text.as_ref());
                true
            }
            None => false,
        }
    }

    /// Remove a unit. Returns `true` if it was present.
    pub fn remove(&self, path: &str) -> bool {
        self.entries.write().remove(path).is_some()
    }

    /// Unit paths in sorted order.
    pub fn paths(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn insert(&self, path: String, text: &str, library: bool) {
        self.entries.write().insert(
            path,
            SourceEntry {
                text: Arc::from(text),
                library,
            },
        );
    }
}

impl ElementSource for SourceSet {
    fn read_units(&self) -> ModelResult<Vec<UnitRead>> {
        let entries: Vec<(String, SourceEntry)> = self
            .entries
            .read()
            .iter()
            .map(|(path, entry)| (path.clone(), entry.clone()))
            .collect();

        let reads = entries
            .into_iter()
            .map(|(path, entry)| match read_unit(&path, &entry.text) {
                Ok(mut unit) => {
                    if entry.library {
                        into_binary(&mut unit);
                    }
                    UnitRead::Parsed(unit)
                }
                Err(err) => {
                    warn!(path = %path, error = %err, "unit failed to read");
                    UnitRead::Failed {
                        path,
                        errors: vec![err],
                    }
                }
            })
            .collect();
        Ok(reads)
    }
}

/// Strip source text and ranges and mark every declaration binary.
fn into_binary(unit: &mut UnitDecl) {
    unit.source = None;
    if let Some(package) = &mut unit.package {
        package.range = None;
    }
    for import in &mut unit.imports {
        import.range = None;
    }
    for ty in &mut unit.types {
        type_into_binary(ty);
    }
}

fn type_into_binary(ty: &mut TypeDecl) {
    ty.modifiers.insert(Modifiers::BINARY);
    ty.range = None;
    ty.javadoc = None;
    for member in &mut ty.members {
        match member {
            MemberDecl::Field(field) => {
                field.modifiers.insert(Modifiers::BINARY);
                field.range = None;
                field.javadoc = None;
                field.initializer = None;
            }
            MemberDecl::Method(method) => {
                method.modifiers.insert(Modifiers::BINARY);
                method.range = None;
                method.javadoc = None;
                method.body = None;
                method.default_value = None;
                for param in &mut method.parameters {
                    param.modifiers.insert(Modifiers::BINARY);
                    param.range = None;
                }
            }
            MemberDecl::Type(inner) => type_into_binary(inner),
        }
    }
}
