// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use super::WorkingCopyTransformer;

/// The identity transformer: every element keeps its default working copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTransformer;

impl WorkingCopyTransformer for DefaultTransformer {}
