// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor infrastructure for the Api element tree.
//!
//! - [`ElementVisitor`]: one `visit_*` callback per element kind
//! - [`walk`]: pre-order, post-order and breadth-first drivers
//! - [`TreeVisitResult`]: `Continue`, `SkipSubtree` or `Terminate`
//!
//! Children are always visited in declaration order: package, imports and
//! types of a unit; annotations, type parameters and members of a type;
//! annotations, type parameters and parameters of a method.

mod collector;
mod traits;
mod walk;

pub use collector::{count_elements, ElementCollector, VisitedElement};
pub use traits::{ElementVisitor, TraversalOrder, TreeVisitResult};
pub use walk::{accept, walk};
