// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Handles to snapshot elements.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tugjava_core::{Modifiers, SourceRange};

use crate::environment::JavaEnvironment;
use crate::snapshot::{ElementId, ElementKey, ElementKind, NodeData, Snapshot, SpiNode};

/// The authoritative, compiler-backed view of one element.
///
/// A `Spi` pins the snapshot it was read from. It never changes; after a
/// reload it becomes stale and [`Spi::resolve_replacement`] finds the element
/// that now represents the same logical construct.
#[derive(Clone)]
pub struct Spi {
    snapshot: Arc<Snapshot>,
    id: ElementId,
}

/// Cache key of a [`Spi`] within one environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpiKey {
    pub generation: u64,
    pub id: ElementId,
}

impl Spi {
    pub(crate) fn new(snapshot: Arc<Snapshot>, id: ElementId) -> Self {
        debug_assert!(snapshot.contains(id), "{} not in snapshot", id);
        Spi { snapshot, id }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn snapshot(&self) -> &Arc<Snapshot> {
        &self.snapshot
    }

    pub fn generation(&self) -> u64 {
        self.snapshot.generation()
    }

    pub fn key(&self) -> SpiKey {
        SpiKey {
            generation: self.generation(),
            id: self.id,
        }
    }

    pub fn node(&self) -> &SpiNode {
        self.snapshot.node(self.id)
    }

    pub(crate) fn data(&self) -> &NodeData {
        self.snapshot.data(self.id)
    }

    pub fn kind(&self) -> ElementKind {
        self.node().kind()
    }

    pub fn name(&self) -> &str {
        self.node().name()
    }

    pub fn modifiers(&self) -> Modifiers {
        self.node().modifiers()
    }

    pub fn range(&self) -> Option<SourceRange> {
        self.node().range()
    }

    pub fn logical_key(&self) -> ElementKey {
        let node = self.node();
        ElementKey::new(node.kind, node.key.as_str())
    }

    pub fn parent(&self) -> Option<Spi> {
        self.node()
            .parent()
            .map(|id| Spi::new(self.snapshot.clone(), id))
    }

    /// Children in declaration order.
    pub fn children(&self) -> impl Iterator<Item = Spi> + '_ {
        self.node()
            .children()
            .iter()
            .map(move |id| Spi::new(self.snapshot.clone(), *id))
    }

    /// Children of one kind, in declaration order.
    pub fn children_of(&self, kind: ElementKind) -> impl Iterator<Item = Spi> + '_ {
        self.children().filter(move |c| c.kind() == kind)
    }

    /// Nearest ancestor (or self) of `kind`.
    pub fn ancestor(&self, kind: ElementKind) -> Option<Spi> {
        let mut current = Some(self.clone());
        while let Some(spi) = current {
            if spi.kind() == kind {
                return Some(spi);
            }
            current = spi.parent();
        }
        None
    }

    /// Text of the containing unit, `None` for library units.
    pub fn unit_source(&self) -> Option<&str> {
        self.snapshot.unit_source(self.id)
    }

    pub fn unit_path(&self) -> &str {
        &self.snapshot.unit_info(self.id).path
    }

    pub fn unit_package(&self) -> &str {
        &self.snapshot.unit_info(self.id).package
    }

    /// Slice the containing unit's text.
    pub fn slice(&self, range: Option<SourceRange>) -> Option<&str> {
        range.and_then(|r| r.slice(self.unit_source()?))
    }

    /// The owning environment, if it is still open.
    pub fn environment(&self) -> Option<JavaEnvironment> {
        self.snapshot
            .env()
            .upgrade()
            .map(JavaEnvironment::from_shared)
    }

    /// Check if the environment has moved past this element's snapshot.
    pub fn is_stale(&self) -> bool {
        match self.environment() {
            Some(env) => !Arc::ptr_eq(&env.snapshot(), &self.snapshot),
            None => true,
        }
    }

    /// The element that now represents the same logical construct.
    ///
    /// Returns `self` while the snapshot is current, `None` if the element was
    /// deleted by a reload or the environment is closed.
    pub fn find_current(&self) -> Option<Spi> {
        let env = self.environment()?;
        let current = env.snapshot();
        if Arc::ptr_eq(&current, &self.snapshot) {
            return Some(self.clone());
        }
        let id = current.lookup(&self.logical_key())?;
        Some(Spi::new(current, id))
    }

    /// Apply `f` to the current replacement of this element, if it still exists.
    pub fn resolve_replacement<R>(&self, f: impl FnOnce(Spi) -> R) -> Option<R> {
        self.find_current().map(f)
    }
}

impl PartialEq for Spi {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.snapshot, &other.snapshot) && self.id == other.id
    }
}

impl Eq for Spi {}

impl Hash for Spi {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.snapshot) as usize).hash(state);
        self.id.hash(state);
    }
}

impl fmt::Debug for Spi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Spi({} {} @{})",
            self.kind(),
            self.node().key,
            self.generation()
        )
    }
}
