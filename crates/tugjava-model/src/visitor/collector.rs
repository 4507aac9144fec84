// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Ready-made visitors.

use std::collections::BTreeMap;

use super::traits::{ElementVisitor, TraversalOrder, TreeVisitResult};
use super::walk::walk;
use crate::api::JavaElement;
use crate::snapshot::ElementKind;

/// One visited element as recorded by [`ElementCollector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitedElement {
    pub kind: ElementKind,
    pub name: String,
    pub level: usize,
    pub index: usize,
}

/// Records every visited element in visit order.
#[derive(Debug, Default)]
pub struct ElementCollector {
    pub visited: Vec<VisitedElement>,
}

impl ElementCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the tree under `root` in `order`.
    pub fn collect(root: &JavaElement, order: TraversalOrder) -> Vec<VisitedElement> {
        let mut collector = ElementCollector::new();
        walk(root, &mut collector, order);
        collector.visited
    }

    /// Names of the visited elements, in visit order.
    pub fn names(&self) -> Vec<&str> {
        self.visited.iter().map(|v| v.name.as_str()).collect()
    }
}

impl ElementVisitor for ElementCollector {
    fn visit_element(
        &mut self,
        element: &JavaElement,
        level: usize,
        index: usize,
    ) -> TreeVisitResult {
        self.visited.push(VisitedElement {
            kind: element.kind(),
            name: element.name().to_string(),
            level,
            index,
        });
        TreeVisitResult::Continue
    }
}

#[derive(Default)]
struct KindCounter {
    counts: BTreeMap<ElementKind, usize>,
}

impl ElementVisitor for KindCounter {
    fn visit_element(
        &mut self,
        element: &JavaElement,
        _level: usize,
        _index: usize,
    ) -> TreeVisitResult {
        *self.counts.entry(element.kind()).or_insert(0) += 1;
        TreeVisitResult::Continue
    }
}

/// Number of elements of each kind under (and including) `root`.
pub fn count_elements(root: &JavaElement) -> BTreeMap<ElementKind, usize> {
    let mut counter = KindCounter::default();
    walk(root, &mut counter, TraversalOrder::PreOrder);
    counter.counts
}
