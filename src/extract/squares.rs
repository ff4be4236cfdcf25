// Copyright 2026 the Quadplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bottom-up compression of uniform subtrees into a flat square list.

use crate::node::NodeKey;
use crate::state::State;

/// One output square: a leaf, or a compressed uniform subtree.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Square<V> {
    /// Center x-coordinate.
    pub x: f64,
    /// Center y-coordinate.
    pub y: f64,
    /// Edge length.
    pub size: f64,
    /// The value shared by every pixel inside this square.
    pub value: V,
}

/// Whether a subtree turned out to share a single value, or not.
enum Uniform<V> {
    Value(V),
    Mixed,
}

/// Extract squares. With `all: true`, every stored leaf is returned
/// verbatim — the cheap path used when a caller wants maximum tree detail.
/// With `all: false`, subtrees that share a single value are merged upward
/// into one coarser square apiece, and the unanimous value is cached back
/// onto the non-leaf ancestor so a repeat call doesn't redo the recursion.
pub(crate) fn extract_squares<V>(state: &mut State<V>, all: bool) -> Vec<Square<V>>
where
    V: Copy + PartialEq,
{
    if all {
        return state
            .nodes
            .values()
            .filter(|n| n.leaf)
            .map(|n| Square { x: n.x, y: n.y, size: n.size, value: n.value })
            .collect();
    }

    let roots: Vec<NodeKey> = state
        .nodes
        .values()
        .filter(|n| n.size == state.sample_spacing)
        .map(|n| state.key(n.x, n.y))
        .collect();

    let mut out = Vec::new();
    for root in roots {
        if let Uniform::Value(value) = collect(state, root, &mut out) {
            let node = *state.get(root).expect("root key must resolve");
            out.push(Square { x: node.x, y: node.y, size: node.size, value });
        }
    }
    out
}

/// Recurse into `key`'s subtree, pushing every maximal uniform square found
/// strictly below this level, and reporting whether this level itself is
/// uniform (in which case the caller, not this call, is responsible for
/// emitting it — it might merge further with siblings at a coarser level).
fn collect<V>(state: &mut State<V>, key: NodeKey, out: &mut Vec<Square<V>>) -> Uniform<V>
where
    V: Copy + PartialEq,
{
    let node = *state.get(key).expect("tree key must resolve to a stored node");
    if node.leaf {
        return Uniform::Value(node.value);
    }

    let half = node.size / 4.0;
    let child_size = node.size / 2.0;
    let offsets = [(-half, -half), (half, -half), (-half, half), (half, half)];
    let child_keys: [NodeKey; 4] = offsets.map(|(dx, dy)| state.key(node.x + dx, node.y + dy));

    let mut values: [Option<V>; 4] = [None; 4];
    for (slot, child_key) in values.iter_mut().zip(child_keys) {
        *slot = match collect(state, child_key, out) {
            Uniform::Value(v) => Some(v),
            Uniform::Mixed => None,
        };
    }

    let uniform = match values {
        [Some(a), Some(b), Some(c), Some(d)] if a == b && b == c && c == d => Some(a),
        _ => None,
    };

    match uniform {
        Some(value) => {
            if let Some(n) = state.get_mut(key) {
                n.value = value;
            }
            Uniform::Value(value)
        }
        None => {
            for (slot, child_key) in values.into_iter().zip(child_keys) {
                if let Some(value) = slot {
                    let child = *state.get(child_key).expect("child key must resolve");
                    out.push(Square { x: child.x, y: child.y, size: child.size, value });
                }
            }
            Uniform::Mixed
        }
    }
}
