// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Weak façade cache binding Spi handles to Api façades.
//!
//! The cache maps a [`SpiKey`] to a *weak* reference to the façade's shared
//! cell. While any caller holds a façade, wrapping the same Spi returns a
//! handle to the same cell; once every handle is dropped the cell is freed and
//! the next wrap creates a new one. Dead entries are swept by [`ElementCache::purge`],
//! which the environment runs on every reload.

use std::sync::{Arc, Weak};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::trace;

use crate::spi::{Spi, SpiKey};

/// Shared state of one façade: the Spi it stands for.
#[derive(Debug)]
pub struct ApiCell {
    spi: Spi,
}

impl ApiCell {
    fn new(spi: Spi) -> Self {
        ApiCell { spi }
    }

    /// The Spi this façade stands for. Never fails.
    pub fn spi(&self) -> &Spi {
        &self.spi
    }
}

/// Spi → façade side table with weak ownership.
#[derive(Debug, Default)]
pub struct ElementCache {
    entries: DashMap<SpiKey, Weak<ApiCell>>,
}

impl ElementCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the live façade cell for `spi`, creating it if needed.
    ///
    /// The check-and-set runs under the entry's shard lock, so concurrent
    /// wraps of one Spi never produce two live cells.
    pub fn wrap(&self, spi: &Spi) -> Arc<ApiCell> {
        match self.entries.entry(spi.key()) {
            Entry::Occupied(mut entry) => {
                if let Some(cell) = entry.get().upgrade() {
                    trace!(key = ?spi.key(), "façade cache hit");
                    return cell;
                }
                let cell = Arc::new(ApiCell::new(spi.clone()));
                entry.insert(Arc::downgrade(&cell));
                trace!(key = ?spi.key(), "façade cache entry revived");
                cell
            }
            Entry::Vacant(entry) => {
                let cell = Arc::new(ApiCell::new(spi.clone()));
                entry.insert(Arc::downgrade(&cell));
                trace!(key = ?spi.key(), "façade cache miss");
                cell
            }
        }
    }

    /// The live façade cell for `spi`, without creating one.
    pub fn get(&self, spi: &Spi) -> Option<Arc<ApiCell>> {
        self.entries.get(&spi.key()).and_then(|weak| weak.upgrade())
    }

    /// Install `cell` as the façade of its Spi, returning the previous live cell.
    pub fn internal_set_api(&self, cell: &Arc<ApiCell>) -> Option<Arc<ApiCell>> {
        self.entries
            .insert(cell.spi().key(), Arc::downgrade(cell))
            .and_then(|previous| previous.upgrade())
    }

    /// Create a fresh cell for `spi` without consulting the cache.
    pub fn detached(spi: &Spi) -> Arc<ApiCell> {
        Arc::new(ApiCell::new(spi.clone()))
    }

    /// Remove entries whose façade has been dropped. Returns the number removed.
    pub fn purge(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, weak| weak.strong_count() > 0);
        before.saturating_sub(self.entries.len())
    }

    /// Number of entries, live or not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
