// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Traversal drivers.

use std::collections::VecDeque;

use super::traits::{ElementVisitor, TraversalOrder, TreeVisitResult};
use crate::api::{ApiElement, JavaElement};

/// Walk the tree rooted at `root` in the given order.
///
/// The root is visited at level 0, index 0. Returns
/// [`TreeVisitResult::Terminate`] if a callback terminated the walk, else
/// [`TreeVisitResult::Continue`].
pub fn walk<V: ElementVisitor + ?Sized>(
    root: &JavaElement,
    visitor: &mut V,
    order: TraversalOrder,
) -> TreeVisitResult {
    let result = match order {
        TraversalOrder::PreOrder => pre_order(root, visitor, 0, 0),
        TraversalOrder::PostOrder => post_order(root, visitor, 0, 0),
        TraversalOrder::BreadthFirst => breadth_first(root, visitor),
    };
    match result {
        TreeVisitResult::Terminate => TreeVisitResult::Terminate,
        _ => TreeVisitResult::Continue,
    }
}

fn pre_order<V: ElementVisitor + ?Sized>(
    node: &JavaElement,
    visitor: &mut V,
    level: usize,
    index: usize,
) -> TreeVisitResult {
    match visitor.visit_element(node, level, index) {
        TreeVisitResult::Terminate => return TreeVisitResult::Terminate,
        TreeVisitResult::SkipSubtree => return TreeVisitResult::Continue,
        TreeVisitResult::Continue => {}
    }
    for (i, child) in node.children().iter().enumerate() {
        if pre_order(child, visitor, level + 1, i) == TreeVisitResult::Terminate {
            return TreeVisitResult::Terminate;
        }
    }
    TreeVisitResult::Continue
}

/// Children first; a child result other than `Continue` aborts its remaining
/// siblings, and `Terminate` also aborts every ancestor.
fn post_order<V: ElementVisitor + ?Sized>(
    node: &JavaElement,
    visitor: &mut V,
    level: usize,
    index: usize,
) -> TreeVisitResult {
    for (i, child) in node.children().iter().enumerate() {
        match post_order(child, visitor, level + 1, i) {
            TreeVisitResult::Continue => {}
            TreeVisitResult::SkipSubtree => break,
            TreeVisitResult::Terminate => return TreeVisitResult::Terminate,
        }
    }
    visitor.visit_element(node, level, index)
}

fn breadth_first<V: ElementVisitor + ?Sized>(
    root: &JavaElement,
    visitor: &mut V,
) -> TreeVisitResult {
    let mut frontier = VecDeque::from([(root.clone(), 0usize, 0usize)]);
    while let Some((node, level, index)) = frontier.pop_front() {
        match visitor.visit_element(&node, level, index) {
            TreeVisitResult::Terminate => return TreeVisitResult::Terminate,
            TreeVisitResult::SkipSubtree => {}
            TreeVisitResult::Continue => {
                for (i, child) in node.children().into_iter().enumerate() {
                    frontier.push_back((child, level + 1, i));
                }
            }
        }
    }
    TreeVisitResult::Continue
}

impl JavaElement {
    /// Walk the tree rooted at this element.
    pub fn accept<V: ElementVisitor + ?Sized>(
        &self,
        visitor: &mut V,
        order: TraversalOrder,
    ) -> TreeVisitResult {
        walk(self, visitor, order)
    }
}

/// Walk the tree rooted at any façade.
pub fn accept<T: ApiElement, V: ElementVisitor + ?Sized>(
    element: &T,
    visitor: &mut V,
    order: TraversalOrder,
) -> TreeVisitResult {
    walk(&element.element(), visitor, order)
}
