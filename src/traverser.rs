// Copyright 2026 the Quadplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! LIFO refinement queue, neighbor lookup, and balanced subdivision.

use smallvec::SmallVec;

use crate::node::{Node, NodeKey};
use crate::state::State;

#[derive(Copy, Clone, Debug)]
enum Axis {
    X,
    Y,
}

fn shifted(x: f64, y: f64, axis: Axis, delta: f64) -> (f64, f64) {
    match axis {
        Axis::X => (x + delta, y),
        Axis::Y => (x, y + delta),
    }
}

/// Find the same-size neighbor of `(x, y, size)` in direction `sign` along
/// `axis` (`sign` is `+1.0` or `-1.0`), falling back to the parent-size
/// neighbor when no same-size node is present — an absent same-size slot
/// means the neighbor is larger, per the balanced-tree lookup rule.
fn neighbor_key<V>(state: &State<V>, x: f64, y: f64, size: f64, axis: Axis, sign: f64) -> Option<NodeKey>
where
    V: Copy,
{
    let (nx, ny) = shifted(x, y, axis, sign * size);
    let same_key = state.key(nx, ny);
    if state.get(same_key).is_some() {
        return Some(same_key);
    }

    let (px, py, parent_size) = State::parent_of(x, y, size);
    let (pnx, pny) = shifted(px, py, axis, sign * parent_size);
    let parent_key = state.key(pnx, pny);
    state.get(parent_key).is_some().then_some(parent_key)
}

/// The same lookup [`neighbor_key`] performs, specialized to the east (`+x`)
/// direction — the single probe [`crate::extract::runs`]'s row walk needs to
/// step from one leaf to the next without re-descending the tree.
pub(crate) fn east_neighbor_key<V>(state: &State<V>, x: f64, y: f64, size: f64) -> Option<NodeKey>
where
    V: Copy,
{
    neighbor_key(state, x, y, size, Axis::X, 1.0)
}

/// Counters recorded while draining the refinement queue, merged into
/// [`crate::ComputeStats`] by [`crate::Plot::compute`].
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct RefineStats {
    pub new_calls: usize,
    pub new_area: f64,
}

/// Drain `queue`, subdividing leaves adjacent to a value boundary until the
/// tree is locally uniform or pixel resolution is reached.
pub(crate) fn refine<F, V>(state: &mut State<V>, f: &F, queue: &mut Vec<NodeKey>) -> RefineStats
where
    F: Fn(f64, f64) -> V,
    V: Copy + PartialEq,
{
    let mut stats = RefineStats::default();

    while let Some(key) = queue.pop() {
        let Some(node) = state.get(key).copied() else {
            continue;
        };
        if !node.leaf {
            // Subdivided while queued.
            continue;
        }
        let Node { x, y, size, value, .. } = node;

        if size <= state.pixel_size {
            refine_finest(state, f, x, y, size, value, queue, &mut stats);
            continue;
        }

        let mut any_diff = false;
        let mut to_subdivide: SmallVec<[NodeKey; 4]> = SmallVec::new();
        for axis in [Axis::X, Axis::Y] {
            for sign in [-1.0, 1.0] {
                let Some(nb_key) = neighbor_key(state, x, y, size, axis, sign) else {
                    continue;
                };
                let Some(nb) = state.get(nb_key).copied() else {
                    continue;
                };
                if nb.value != value {
                    any_diff = true;
                    if nb.leaf && nb.size > state.pixel_size {
                        to_subdivide.push(nb_key);
                    }
                }
            }
        }

        for nb_key in to_subdivide {
            if state.get(nb_key).is_some_and(|n| n.leaf) {
                subdivide(state, f, nb_key, queue, &mut stats);
            }
        }

        if any_diff && state.get(key).is_some_and(|n| n.leaf) {
            subdivide(state, f, key, queue, &mut stats);
        }
    }

    stats
}

/// At pixel resolution, only a disagreeing *larger* neighbor can still be
/// refined (n itself cannot go finer); same-size disagreement is an
/// accepted value boundary, not a balance problem.
fn refine_finest<F, V>(
    state: &mut State<V>,
    f: &F,
    x: f64,
    y: f64,
    size: f64,
    value: V,
    queue: &mut Vec<NodeKey>,
    stats: &mut RefineStats,
) where
    F: Fn(f64, f64) -> V,
    V: Copy + PartialEq,
{
    for axis in [Axis::X, Axis::Y] {
        for sign in [-1.0, 1.0] {
            let Some(nb_key) = neighbor_key(state, x, y, size, axis, sign) else {
                continue;
            };
            let Some(nb) = state.get(nb_key).copied() else {
                continue;
            };
            if nb.leaf && nb.size > size && nb.value != value {
                subdivide(state, f, nb_key, queue, stats);
            }
        }
    }
}

/// Split a leaf of size `> pixel_size` into four quadrant children,
/// recursively pre-subdividing same-parent siblings that would otherwise
/// end up more than 2x the new children's size (see the crate-level
/// balance-repair design note). Each newly evaluated child is tallied into
/// `stats` so [`refine`]'s caller can fold true evaluation counts into
/// [`crate::ComputeStats`].
pub(crate) fn subdivide<F, V>(state: &mut State<V>, f: &F, key: NodeKey, queue: &mut Vec<NodeKey>, stats: &mut RefineStats)
where
    F: Fn(f64, f64) -> V,
    V: Copy + PartialEq,
{
    let Some(node) = state.get(key).copied() else {
        return;
    };
    debug_assert!(node.leaf, "subdivide called on a non-leaf node");
    if !node.leaf || node.size <= state.pixel_size {
        return;
    }
    let Node { x, y, size, .. } = node;

    if size < state.sample_spacing {
        let (px, py, _) = State::parent_of(x, y, size);
        let sign_x = if x < px { 1.0 } else { -1.0 };
        let sign_y = if y < py { 1.0 } else { -1.0 };
        for (axis, sign) in [(Axis::X, sign_x), (Axis::Y, sign_y)] {
            let Some(sib_key) = neighbor_key(state, x, y, size, axis, sign) else {
                continue;
            };
            let Some(sib) = state.get(sib_key).copied() else {
                continue;
            };
            if sib.leaf && sib.size > size {
                subdivide(state, f, sib_key, queue, stats);
            }
        }
    }

    let half = size / 4.0;
    let child_size = size / 2.0;
    for (dx, dy) in [(-half, -half), (half, -half), (-half, half), (half, half)] {
        let cx = x + dx;
        let cy = y + dy;
        let value = f(cx, cy);
        let child_key = state.insert(Node::leaf(cx, cy, child_size, value));
        queue.push(child_key);
        stats.new_calls += 1;
        stats.new_area += child_size * child_size;
    }

    if let Some(n) = state.get_mut(key) {
        n.leaf = false;
    }

    log::trace!("subdivide: ({x}, {y}) size {size} into 4 children of size {child_size}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Rect;

    fn diagonal(x: f64, y: f64) -> bool {
        x == y && x < 2.0
    }

    #[test]
    fn refine_splits_coarse_grid_near_diagonal() {
        let mut state = State::<bool>::new(Rect::new(0.0, 0.0, 4.0, 4.0), 2.0, 1.0).unwrap();
        let mut queue = Vec::new();
        crate::sampler::sample_grid(&mut state, &diagonal, &mut queue);
        refine(&mut state, &diagonal, &mut queue);

        let leaves: Vec<_> = state.nodes.values().filter(|n| n.leaf).copied().collect();
        assert_eq!(leaves.len(), 13);
    }

    #[test]
    fn uniform_field_never_subdivides() {
        let uniform = |_: f64, _: f64| 0_i32;
        let mut state = State::<i32>::new(Rect::new(0.0, 0.0, 4.0, 4.0), 2.0, 1.0).unwrap();
        let mut queue = Vec::new();
        crate::sampler::sample_grid(&mut state, &uniform, &mut queue);
        refine(&mut state, &uniform, &mut queue);

        assert_eq!(state.nodes.len(), 4);
        assert!(state.nodes.values().all(|n| n.leaf));
    }
}
