// Copyright 2026 the Quadplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coarse grid pass and incremental reuse from a prior computation.

use crate::node::{Node, NodeKey};
use crate::state::State;

/// Counters recorded while filling the coarse grid, merged into
/// [`crate::ComputeStats`] by [`crate::Plot::compute`].
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct SampleStats {
    pub new_calls: usize,
    pub new_area: f64,
}

/// Evaluate `f` at every coarse grid position not already present in
/// `state` (because [`reuse`] already transplanted it), pushing each freshly
/// created leaf's key onto `queue` for the traverser.
///
/// Row-major order (y outer), per the ordering guarantees in the crate-level
/// docs.
pub(crate) fn sample_grid<F, V>(state: &mut State<V>, f: &F, queue: &mut Vec<NodeKey>) -> SampleStats
where
    F: Fn(f64, f64) -> V + Sync,
    V: Copy + PartialEq + Send,
{
    let s = state.sample_spacing;
    let domain = state.domain;
    let cols = (domain.width / s).round() as i64;
    let rows = (domain.height / s).round() as i64;

    let mut missing: Vec<(NodeKey, f64, f64)> = Vec::new();
    for ky in 0..rows {
        let y = domain.y + (ky as f64 + 0.5) * s;
        for kx in 0..cols {
            let x = domain.x + (kx as f64 + 0.5) * s;
            let key = state.key(x, y);
            if !state.nodes.contains_key(&key) {
                missing.push((key, x, y));
            }
        }
    }

    let evaluated = evaluate(&missing, f);
    let new_calls = evaluated.len();
    let new_area = new_calls as f64 * s * s;

    for (key, x, y, value) in evaluated {
        state.nodes.insert(key, Node::leaf(x, y, s, value));
        queue.push(key);
    }

    log::debug!("sampler: {cols}x{rows} coarse grid, {new_calls} newly evaluated cell(s)");

    SampleStats { new_calls, new_area }
}

#[cfg(not(feature = "parallel"))]
fn evaluate<F, V>(missing: &[(NodeKey, f64, f64)], f: &F) -> Vec<(NodeKey, f64, f64, V)>
where
    F: Fn(f64, f64) -> V,
    V: Copy,
{
    missing.iter().map(|&(key, x, y)| (key, x, y, f(x, y))).collect()
}

#[cfg(feature = "parallel")]
fn evaluate<F, V>(missing: &[(NodeKey, f64, f64)], f: &F) -> Vec<(NodeKey, f64, f64, V)>
where
    F: Fn(f64, f64) -> V + Sync,
    V: Copy + Send,
{
    use rayon::prelude::*;

    missing
        .par_iter()
        .map(|&(key, x, y)| (key, x, y, f(x, y)))
        .collect()
}

/// Counters recorded while reusing a prior computation's tree.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct ReuseStats {
    pub carried: usize,
    pub coerced: usize,
    pub coerced_area: f64,
}

/// Carry nodes from `prev`'s store into `state` when spacings match and
/// domains overlap.
///
/// Every node whose square lies entirely within the new domain is
/// transplanted unchanged (same `leaf` flag and `value`, re-keyed under
/// `state`'s own keying). A node whose square straddles the new domain's
/// edge is coerced to a leaf with a freshly evaluated value and pushed onto
/// `queue` for reconsideration, rather than trying to preserve a refined
/// subtree that the shrunk domain has only partially cut away. A node
/// entirely outside the new domain is dropped.
///
/// After this runs, [`sample_grid`] fills in any coarse position this left
/// uncovered.
pub(crate) fn reuse<F, V>(state: &mut State<V>, prev: &State<V>, f: &F, queue: &mut Vec<NodeKey>) -> ReuseStats
where
    F: Fn(f64, f64) -> V,
    V: Copy + PartialEq,
{
    let domain = state.domain;
    let mut stats = ReuseStats::default();

    for node in prev.nodes.values() {
        let half = node.size / 2.0;
        let left = node.x - domain.x;
        let right = domain.right() - node.x;
        let top = node.y - domain.y;
        let bottom = domain.bottom() - node.y;

        let outside = left + half <= 0.0 || right + half <= 0.0 || top + half <= 0.0 || bottom + half <= 0.0;
        if outside {
            continue;
        }

        let straddles = left - half < 0.0 || right - half < 0.0 || top - half < 0.0 || bottom - half < 0.0;

        let key = state.key(node.x, node.y);
        if straddles {
            let value = f(node.x, node.y);
            state.nodes.insert(key, Node::leaf(node.x, node.y, node.size, value));
            queue.push(key);
            stats.coerced += 1;
            stats.coerced_area += node.size * node.size;
        } else {
            state.nodes.insert(key, *node);
            stats.carried += 1;
        }
    }

    log::debug!("sampler: reused {} node(s), re-sampled {} boundary node(s)", stats.carried, stats.coerced);
    stats
}
