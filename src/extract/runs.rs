// Copyright 2026 the Quadplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row-wise run-length extraction at pixel resolution.

use crate::node::Node;
use crate::state::State;
use crate::traverser::east_neighbor_key;

/// One maximal horizontal run of pixels sharing a value, at a single pixel
/// row `y`, spanning `[x0, x1)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Run<V> {
    /// Left edge of the run.
    pub x0: f64,
    /// Right edge of the run (exclusive).
    pub x1: f64,
    /// The pixel row's center y-coordinate.
    pub y: f64,
    /// The value shared by every pixel in the run.
    pub value: V,
}

/// Walk every pixel row of the domain, emitting maximal same-value runs in
/// left-to-right, top-to-bottom order.
///
/// Each row starts by locating the leaf under its left edge via a
/// coarse-to-fine descent (snapping to the sample-spacing grid, then halving
/// down into whichever child covers the target point, until a leaf is
/// found) — this happens once per row. From there the row is walked east one
/// leaf at a time via a single key-arithmetic probe per step (the same
/// same-size/parent-size neighbor lookup the traverser uses), rather than
/// re-descending from the root for every leaf; adjacent leaves of equal
/// value are coalesced into a single run.
pub(crate) fn extract_runs<V>(state: &State<V>) -> Vec<Run<V>>
where
    V: Copy + PartialEq,
{
    let domain = state.domain;
    let rows = (domain.height / state.pixel_size).round() as i64;
    let mut out = Vec::new();

    for row in 0..rows {
        let y = domain.y + (row as f64 + 0.5) * state.pixel_size;
        out.extend(walk_row(state, y));
    }

    out
}

fn walk_row<V>(state: &State<V>, y: f64) -> Vec<Run<V>>
where
    V: Copy + PartialEq,
{
    let domain = state.domain;
    let mut out: Vec<Run<V>> = Vec::new();
    let right_bound = domain.right();

    let Some(mut node) = find_leaf(state, domain.x + state.pixel_size / 2.0, y) else {
        return out;
    };

    loop {
        let x0 = node.x - node.size / 2.0;
        let x1 = node.x + node.size / 2.0;

        match out.last_mut() {
            Some(last) if last.value == node.value && (last.x1 - x0).abs() < 1e-9 => {
                last.x1 = x1;
            }
            _ => out.push(Run { x0: x0.max(domain.x), x1: x1.min(right_bound), y, value: node.value }),
        }

        if x1 + 1e-9 >= right_bound {
            break;
        }

        // The key-arithmetic probe is the fast path; if it ever comes up
        // empty (it shouldn't, given the balanced-tree and coverage
        // invariants), fall back to a fresh descent from the next pixel
        // rather than truncating the rest of the row.
        node = match east_leaf(state, &node, y) {
            Some(next) => next,
            None => match find_leaf(state, x1 + state.pixel_size / 2.0, y) {
                Some(next) => next,
                None => break,
            },
        };
    }

    out
}

/// Find the leaf immediately to the east of `current` on row `y`, using one
/// key-arithmetic probe from `current`'s own position rather than
/// re-descending the whole tree.
fn east_leaf<V>(state: &State<V>, current: &Node<V>, y: f64) -> Option<Node<V>>
where
    V: Copy,
{
    let key = east_neighbor_key(state, current.x, current.y, current.size)?;
    let node = *state.get(key)?;
    if node.leaf {
        return Some(node);
    }

    // The same-size-or-larger slot turned out to be a refined node (it was
    // split further along the axis perpendicular to this row); descend one
    // level into whichever child actually borders row `y` — the balanced-
    // tree invariant guarantees that child is a leaf.
    let half = node.size / 4.0;
    let child_y = if y < node.y { node.y - half } else { node.y + half };
    let child_key = state.key(node.x - half, child_y);
    state.get(child_key).copied()
}

/// Coarse-to-fine descent: start at the sample-spacing grid cell containing
/// `(x, y)` and halve down through whichever child covers the point until a
/// leaf is reached. Used once per row to seed the walk; subsequent steps use
/// [`east_leaf`] instead.
fn find_leaf<V>(state: &State<V>, x: f64, y: f64) -> Option<Node<V>>
where
    V: Copy,
{
    let domain = state.domain;
    let mut size = state.sample_spacing;
    loop {
        let cx = snap(x, domain.x, size);
        let cy = snap(y, domain.y, size);
        let key = state.key(cx, cy);
        match state.get(key) {
            Some(node) if node.leaf => return Some(*node),
            Some(_) => {
                size /= 2.0;
                if size < state.pixel_size {
                    return None;
                }
            }
            None => return None,
        }
    }
}

fn snap(v: f64, origin: f64, size: f64) -> f64 {
    origin + ((v - origin) / size).floor() * size + size / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Rect;
    use crate::sampler::sample_grid;
    use crate::traverser::refine;

    #[test]
    fn uniform_domain_yields_one_run_per_row() {
        let f = |_: f64, _: f64| 3_i32;
        let mut state = State::<i32>::new(Rect::new(0.0, 0.0, 4.0, 2.0), 2.0, 1.0).unwrap();
        let mut queue = Vec::new();
        sample_grid(&mut state, &f, &mut queue);
        refine(&mut state, &f, &mut queue);

        let runs = extract_runs(&state);
        assert_eq!(runs.len(), 2);
        for r in &runs {
            assert_eq!(r.x0, 0.0);
            assert_eq!(r.x1, 4.0);
            assert_eq!(r.value, 3);
        }
    }

    #[test]
    fn split_domain_yields_two_runs_per_row() {
        let f = |x: f64, _: f64| x < 2.0;
        let mut state = State::<bool>::new(Rect::new(0.0, 0.0, 4.0, 2.0), 2.0, 1.0).unwrap();
        let mut queue = Vec::new();
        sample_grid(&mut state, &f, &mut queue);
        refine(&mut state, &f, &mut queue);

        let runs = extract_runs(&state);
        assert_eq!(runs.len(), 4);
        for r in &runs {
            assert_eq!(r.value, r.x0 < 2.0);
        }
    }

    #[test]
    fn runs_cover_the_full_row_without_gaps_or_overlap() {
        let f = |x: f64, y: f64| ((x * 3.0) as i64 + (y * 5.0) as i64) % 2 == 0;
        let mut state = State::<bool>::new(Rect::new(0.0, 0.0, 8.0, 4.0), 2.0, 0.5).unwrap();
        let mut queue = Vec::new();
        sample_grid(&mut state, &f, &mut queue);
        refine(&mut state, &f, &mut queue);

        let rows = (state.domain.height / state.pixel_size).round() as i64;
        for row in 0..rows {
            let y = state.domain.y + (row as f64 + 0.5) * state.pixel_size;
            let mut row_runs: Vec<_> = extract_runs(&state).into_iter().filter(|r| r.y == y).collect();
            row_runs.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap());
            let mut cursor = state.domain.x;
            for r in &row_runs {
                assert_eq!(r.x0, cursor);
                cursor = r.x1;
            }
            assert_eq!(cursor, state.domain.right());
        }
    }
}
