// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use tugjava_model::ApiElement;

use super::Transform;
use crate::convert::WorkingCopyConverter;
use crate::error::GenResult;

/// Builds the default working copy of a model element.
pub(crate) type DefaultCopyFn<M, G> = fn(&WorkingCopyConverter<'_>, &M) -> GenResult<G>;

/// What a transformer callback receives for one element.
pub struct TransformInput<'c, M, G> {
    model: M,
    converter: &'c WorkingCopyConverter<'c>,
    build: DefaultCopyFn<M, G>,
    default_copy: Option<G>,
}

impl<'c, M: ApiElement, G> TransformInput<'c, M, G> {
    pub(crate) fn new(
        model: M,
        converter: &'c WorkingCopyConverter<'c>,
        build: DefaultCopyFn<M, G>,
    ) -> Self {
        TransformInput {
            model,
            converter,
            build,
            default_copy: None,
        }
    }

    /// The element being transformed.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// The unmodified generator equivalent of the element.
    ///
    /// Built on the first call, converting the element's children through the
    /// transformer; later calls return the same generator.
    pub fn request_default_working_copy(&mut self) -> GenResult<&mut G> {
        let copy = match self.default_copy.take() {
            Some(copy) => copy,
            None => self.build_default()?,
        };
        Ok(self.default_copy.insert(copy))
    }

    /// Take the default working copy, building it if needed.
    pub fn into_default_working_copy(mut self) -> GenResult<G> {
        match self.default_copy.take() {
            Some(copy) => Ok(copy),
            None => self.build_default(),
        }
    }

    /// Keep the element as its default working copy (with any edits made
    /// through [`Self::request_default_working_copy`]).
    pub fn keep(self) -> GenResult<Transform<G>> {
        Ok(Transform::Keep(self.into_default_working_copy()?))
    }

    /// Remove the element without building its default working copy.
    pub fn remove(self) -> GenResult<Transform<G>> {
        Ok(Transform::Remove)
    }

    pub fn has_default_working_copy(&self) -> bool {
        self.default_copy.is_some()
    }

    fn build_default(&self) -> GenResult<G> {
        let copy = (self.build)(self.converter, &self.model)?;
        self.converter.record_default_copy(M::KIND);
        Ok(copy)
    }
}

impl<M: fmt::Debug, G: fmt::Debug> fmt::Debug for TransformInput<'_, M, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformInput")
            .field("model", &self.model)
            .field("default_copy", &self.default_copy)
            .finish_non_exhaustive()
    }
}
