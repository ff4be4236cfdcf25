// Copyright 2026 the Quadplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The public entry point: [`Plot`].

use std::time::Instant;

use crate::error::PlotError;
use crate::extract::{extract_runs, extract_squares, Run, Square};
use crate::geom::Rect;
use crate::sampler::{reuse, sample_grid, ReuseStats};
use crate::state::State;
use crate::stats::ComputeStats;
use crate::traverser::{refine, RefineStats};

/// An adaptively sampled plane region.
///
/// `Plot` wraps a function `f: (f64, f64) -> V` and lazily builds a
/// balanced quadtree over a rectangular domain, refining wherever adjacent
/// cells disagree until pixel resolution is reached. Call [`Plot::compute`]
/// to (re)build the tree for a domain, then pull results out with
/// [`Plot::squares`] or [`Plot::runs`].
///
/// ```
/// use quadplot::Plot;
///
/// let mut plot = Plot::new_plot(|x: f64, y: f64| x * x + y * y < 4.0);
/// let squares = plot.compute(quadplot::Rect::new(-4.0, -4.0, 8.0, 8.0), 1.0, 0.125)?.squares(false);
/// assert!(!squares.is_empty());
/// # Ok::<(), quadplot::PlotError>(())
/// ```
pub struct Plot<F, V> {
    f: F,
    state: Option<State<V>>,
    stats: ComputeStats,
}

impl<F, V> std::fmt::Debug for Plot<F, V> {
    /// `f` is an opaque closure and is omitted; only the tree's size and the
    /// last `compute()`'s stats are shown.
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt.debug_struct("Plot")
            .field("nodes", &self.state.as_ref().map_or(0, |s| s.nodes.len()))
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<F, V> Plot<F, V>
where
    F: Fn(f64, f64) -> V + Sync,
    V: Copy + PartialEq + Send,
{
    /// Wrap `f` in a new, not-yet-computed plot.
    pub fn new_plot(f: F) -> Self {
        Self {
            f,
            state: None,
            stats: ComputeStats::default(),
        }
    }

    /// (Re)build the tree over `domain`.
    ///
    /// `sample_spacing` is the coarse grid step and `pixel_size` the finest
    /// resolution refinement can reach; both must be positive powers of
    /// two, and `pixel_size` is clamped down to `sample_spacing` if given
    /// larger. `domain` is aligned outward to a multiple of
    /// `sample_spacing` before sampling.
    ///
    /// If a previous successful `compute()` used the same spacings, its
    /// tree is reused where the domains overlap (see
    /// [`crate::sampler::reuse`]); otherwise this starts from a clean
    /// slate.
    ///
    /// Returns `&mut Self` so callers can chain straight into an extractor,
    /// e.g. `plot.compute(domain, 2.0, 1.0)?.squares(false)`.
    pub fn compute(&mut self, domain: Rect, sample_spacing: f64, pixel_size: f64) -> Result<&mut Self, PlotError> {
        let start = Instant::now();
        let mut state = State::new(domain, sample_spacing, pixel_size)?;
        let mut queue = Vec::new();

        let reuse_stats = match &self.state {
            Some(prev) if prev.sample_spacing == state.sample_spacing && prev.pixel_size == state.pixel_size => {
                reuse(&mut state, prev, &self.f, &mut queue)
            }
            Some(_) => {
                log::info!("compute: spacing changed, discarding previous tree");
                ReuseStats::default()
            }
            None => ReuseStats::default(),
        };

        let sample_stats = sample_grid(&mut state, &self.f, &mut queue);

        let refine_stats = if state.pixel_size < state.sample_spacing {
            refine(&mut state, &self.f, &mut queue)
        } else {
            queue.clear();
            RefineStats::default()
        };

        self.stats = ComputeStats {
            size: state.nodes.len(),
            new_calls: sample_stats.new_calls + reuse_stats.coerced + refine_stats.new_calls,
            new_area: sample_stats.new_area + reuse_stats.coerced_area + refine_stats.new_area,
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        };
        self.state = Some(state);

        log::info!(
            "compute: {} node(s), {} new sample(s), {:.3}ms",
            self.stats.size,
            self.stats.new_calls,
            self.stats.elapsed_ms
        );
        Ok(self)
    }

    /// The aligned domain of the most recent successful `compute()`, if
    /// any.
    #[must_use]
    pub fn domain(&self) -> Option<Rect> {
        self.state.as_ref().map(|s| s.domain)
    }

    /// The effective (possibly clamped) `pixel_size` of the most recent
    /// successful `compute()`, if any.
    #[must_use]
    pub fn pixel_size(&self) -> Option<f64> {
        self.state.as_ref().map(|s| s.pixel_size)
    }

    /// Counters from the most recent `compute()` call.
    #[must_use]
    pub fn compute_stats(&self) -> ComputeStats {
        self.stats
    }

    /// Number of leaf nodes currently in the tree.
    #[must_use]
    pub fn leaves(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.nodes.values().filter(|n| n.leaf).count())
    }

    /// Extract the tree as a flat list of squares.
    ///
    /// With `all: true`, returns every leaf. With `all: false`, uniform
    /// subtrees are merged into as few squares as possible first (see
    /// [`crate::extract::squares`]).
    #[must_use]
    pub fn squares(&mut self, all: bool) -> Vec<Square<V>> {
        match &mut self.state {
            Some(state) => extract_squares(state, all),
            None => Vec::new(),
        }
    }

    /// Extract the tree as horizontal pixel-resolution runs, row-major,
    /// left to right.
    #[must_use]
    pub fn runs(&self) -> Vec<Run<V>> {
        match &self.state {
            Some(state) => extract_runs(state),
            None => Vec::new(),
        }
    }
}
