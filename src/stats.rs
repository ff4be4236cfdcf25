// Copyright 2026 the Quadplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-`compute()` bookkeeping surfaced to callers.

/// Counters describing one [`crate::Plot::compute`] call, useful for
/// tuning `sample_spacing`/`pixel_size` or just logging progress.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ComputeStats {
    /// Total number of nodes (leaf and non-leaf) in the resulting tree.
    pub size: usize,
    /// How many times `f` was actually invoked during this call.
    pub new_calls: usize,
    /// Domain area covered by freshly evaluated cells, in domain units
    /// squared.
    pub new_area: f64,
    /// Wall-clock time spent inside `compute()`.
    pub elapsed_ms: f64,
}
