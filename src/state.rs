// Copyright 2026 the Quadplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immutable per-computation parameters plus the mutable node store.

use hashbrown::HashMap;

use crate::error::PlotError;
use crate::geom::Rect;
use crate::node::{Node, NodeKey};
use crate::util::is_power_of_two;

/// The safe magnitude `|c0|` must stay under. Keys are folded into `i64`; we
/// reserve half the range as headroom for the largest key offset a single
/// `compute()` can add (`c_x * domain.width` or `c_y * domain.height`).
pub(crate) const KEY_RANGE_LIMIT: f64 = (i64::MAX / 2) as f64;

/// Per-computation parameters and the node store they key into.
///
/// `State` is created fresh by [`crate::Plot::compute`] for every call; the
/// previous state (if any) is consulted read-only by the sampler's
/// incremental-reuse path (see [`crate::sampler::reuse`]) and then dropped.
pub(crate) struct State<V> {
    pub(crate) nodes: HashMap<NodeKey, Node<V>>,
    pub(crate) domain: Rect,
    pub(crate) sample_spacing: f64,
    pub(crate) pixel_size: f64,
    pub(crate) c_x: f64,
    pub(crate) c_y: f64,
    pub(crate) c_0: f64,
}

impl<V> State<V> {
    /// Build a new, empty state for the given (already-validated) domain and
    /// spacings.
    ///
    /// `pixel_size` is clamped down to `sample_spacing` if it was given
    /// larger (see the `pixel_size` glossary entry); both must already be
    /// positive powers of two and `domain` must have non-negative extent —
    /// callers validate this in [`crate::Plot::compute`] before calling
    /// here.
    pub(crate) fn new(
        raw_domain: Rect,
        sample_spacing: f64,
        pixel_size: f64,
    ) -> Result<Self, PlotError> {
        if !is_power_of_two(sample_spacing) {
            return Err(PlotError::InvalidArgument(format!(
                "sample_spacing {sample_spacing} is not a positive power of two"
            )));
        }
        if !is_power_of_two(pixel_size) {
            return Err(PlotError::InvalidArgument(format!(
                "pixel_size {pixel_size} is not a positive power of two"
            )));
        }
        if !raw_domain.is_valid() {
            return Err(PlotError::InvalidArgument(format!(
                "domain {raw_domain:?} has negative width or height"
            )));
        }

        let pixel_size = pixel_size.min(sample_spacing);
        let domain = raw_domain.aligned_to(sample_spacing);

        let c_x = 2.0 / pixel_size;
        let c_y = c_x * (domain.width / pixel_size);
        let c_0 = -c_x * domain.x - c_y * domain.y;

        if c_0.abs() > KEY_RANGE_LIMIT {
            return Err(PlotError::KeyRange {
                c0: c_0,
                limit: KEY_RANGE_LIMIT,
            });
        }

        Ok(Self {
            nodes: HashMap::new(),
            domain,
            sample_spacing,
            pixel_size,
            c_x,
            c_y,
            c_0,
        })
    }

    /// Fold a center coordinate into this state's integer key space.
    #[must_use]
    pub(crate) fn key(&self, x: f64, y: f64) -> NodeKey {
        (self.c_0 + self.c_x * x + self.c_y * y).floor() as NodeKey
    }

    /// Key a node would occupy, from its `(x, y)` fields.
    #[must_use]
    pub(crate) fn key_of(&self, node: &Node<V>) -> NodeKey
    where
        V: Copy,
    {
        self.key(node.x, node.y)
    }

    /// The center and size of the parent (next-coarser) node containing
    /// `(x, y, size)`.
    #[must_use]
    pub(crate) fn parent_of(x: f64, y: f64, size: f64) -> (f64, f64, f64) {
        let parent_size = size * 2.0;
        let px = ((x / parent_size).floor() + 0.5) * parent_size;
        let py = ((y / parent_size).floor() + 0.5) * parent_size;
        (px, py, parent_size)
    }

    pub(crate) fn get(&self, key: NodeKey) -> Option<&Node<V>> {
        self.nodes.get(&key)
    }

    pub(crate) fn get_mut(&mut self, key: NodeKey) -> Option<&mut Node<V>> {
        self.nodes.get_mut(&key)
    }

    /// Insert a node under its own key, returning that key.
    pub(crate) fn insert(&mut self, node: Node<V>) -> NodeKey
    where
        V: Copy,
    {
        let key = self.key_of(&node);
        self.nodes.insert(key, node);
        key
    }
}
