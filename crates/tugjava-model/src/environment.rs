// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The compiler environment: current snapshot, reload, and lookups.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use tugjava_core::{ModelError, ModelResult};

use crate::api::{ApiElement, CompilationUnit, Type};
use crate::cache::ElementCache;
use crate::snapshot::{ElementKind, Snapshot};
use crate::source::ElementSource;
use crate::spi::Spi;

pub(crate) struct EnvShared {
    source: Arc<dyn ElementSource>,
    current: RwLock<Arc<Snapshot>>,
    cache: Arc<ElementCache>,
}

/// A loaded set of Java units.
///
/// Cloning is cheap; clones share the snapshot, the façade cache and the
/// collaborator. Dropping the last clone closes the environment: existing
/// façades stay readable but can no longer re-resolve.
#[derive(Clone)]
pub struct JavaEnvironment {
    shared: Arc<EnvShared>,
}

impl std::fmt::Debug for JavaEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JavaEnvironment")
            .field("snapshot", &*self.snapshot())
            .field("cached_facades", &self.shared.cache.len())
            .finish()
    }
}

impl JavaEnvironment {
    /// Load the first snapshot from `source`.
    pub fn new(source: Arc<dyn ElementSource>) -> ModelResult<Self> {
        let reads = source.read_units()?;
        let cache = Arc::new(ElementCache::new());
        let shared = Arc::new_cyclic(|weak| EnvShared {
            current: RwLock::new(Arc::new(Snapshot::build(
                0,
                weak.clone(),
                cache.clone(),
                reads,
            ))),
            source,
            cache,
        });
        let env = JavaEnvironment { shared };
        env.log_loaded("loaded");
        Ok(env)
    }

    pub(crate) fn from_shared(shared: Arc<EnvShared>) -> Self {
        JavaEnvironment { shared }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.shared.current.read().clone()
    }

    pub fn generation(&self) -> u64 {
        self.shared.current.read().generation()
    }

    /// The façade cache shared by every element of this environment.
    pub fn cache(&self) -> &ElementCache {
        &self.shared.cache
    }

    /// Check if two handles refer to the same environment.
    pub fn same_as(&self, other: &JavaEnvironment) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Re-read every unit and install a new snapshot.
    ///
    /// Previously returned elements become stale; use
    /// [`ApiElement::resolve_replacement`] or [`JavaEnvironment::refresh`] to
    /// find their current counterparts.
    pub fn reload(&self) -> ModelResult<()> {
        let mut current = self.shared.current.write();
        let reads = self.shared.source.read_units()?;
        let next = Snapshot::build(
            current.generation() + 1,
            Arc::downgrade(&self.shared),
            self.shared.cache.clone(),
            reads,
        );
        *current = Arc::new(next);
        drop(current);

        let purged = self.shared.cache.purge();
        debug!(purged, "purged dead façade cache entries");
        self.log_loaded("reloaded");
        Ok(())
    }

    fn log_loaded(&self, what: &str) {
        let snapshot = self.snapshot();
        let counts = snapshot.kind_counts();
        debug!(
            generation = snapshot.generation(),
            units = counts.get(&ElementKind::CompilationUnit).copied().unwrap_or(0),
            types = counts.get(&ElementKind::Type).copied().unwrap_or(0),
            elements = snapshot.len(),
            errors = snapshot.all_errors().count(),
            "environment {}",
            what
        );
    }

    /// Find a type by fully-qualified (source or binary) name.
    pub fn find_type(&self, name: &str) -> Option<Type> {
        let snapshot = self.snapshot();
        let id = snapshot.find_type(name)?;
        Some(Type::wrap(&Spi::new(snapshot, id)))
    }

    pub fn compilation_units(&self) -> Vec<CompilationUnit> {
        let snapshot = self.snapshot();
        snapshot
            .unit_roots()
            .map(|id| CompilationUnit::wrap(&Spi::new(snapshot.clone(), id)))
            .collect()
    }

    pub fn compilation_unit(&self, path: &str) -> Option<CompilationUnit> {
        let snapshot = self.snapshot();
        let id = snapshot.unit_root(path)?;
        Some(CompilationUnit::wrap(&Spi::new(snapshot, id)))
    }

    /// Compile errors for a unit path or a type name, as display strings.
    pub fn compile_errors(&self, type_or_path: &str) -> Vec<String> {
        let snapshot = self.snapshot();
        let path = match snapshot.find_type(type_or_path) {
            Some(id) => Spi::new(snapshot.clone(), id).unit_path().to_string(),
            None => type_or_path.to_string(),
        };
        snapshot
            .errors_for(&path)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Every compile error of the current snapshot.
    pub fn all_compile_errors(&self) -> Vec<ModelError> {
        self.snapshot().all_errors().cloned().collect()
    }

    /// Line delimiter used by the sources of this environment.
    pub fn line_delimiter(&self) -> &'static str {
        self.snapshot().line_delimiter()
    }

    /// Re-resolve `elements` against the current snapshot, dropping deleted ones.
    pub fn refresh<T: ApiElement>(&self, elements: &[T]) -> Vec<T> {
        elements
            .iter()
            .filter_map(|element| element.resolve_replacement(|current| current))
            .collect()
    }
}
