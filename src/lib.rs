// Copyright 2026 the Quadplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An adaptive quadtree sampling engine for plane-region plotting.
//!
//! [`Plot`] wraps a scalar or boolean function of two coordinates and
//! builds a balanced quadtree over a rectangular domain: a coarse grid is
//! sampled first, then cells whose value disagrees with a neighbor's are
//! recursively subdivided down to a configurable pixel resolution. The
//! resulting tree can be read back as a compressed list of [`Square`]s or
//! as horizontal, pixel-resolution [`Run`]s.
//!
//! Nodes are stored in a single hash map keyed by an integer folded from
//! each node's center coordinates, rather than as a pointer-linked tree —
//! see [`state::State`] for the keying scheme. This keeps the tree flat and
//! cheap to extract from repeatedly, and lets a later [`Plot::compute`]
//! call reuse unaffected parts of a previous tree when only the viewing
//! domain moved.
//!
//! ```
//! use quadplot::{Plot, Rect};
//!
//! let mut plot = Plot::new_plot(|x: f64, y: f64| x * x + y * y < 4.0);
//! let runs = plot.compute(Rect::new(-4.0, -4.0, 8.0, 8.0), 1.0, 0.125)?.runs();
//!
//! for run in runs {
//!     let _ = (run.x0, run.x1, run.y, run.value);
//! }
//! # Ok::<(), quadplot::PlotError>(())
//! ```

mod error;
mod extract;
mod geom;
mod node;
mod plot;
mod sampler;
mod state;
mod stats;
mod traverser;
mod util;

pub use error::PlotError;
pub use extract::{Run, Square};
pub use geom::Rect;
pub use plot::Plot;
pub use stats::ComputeStats;
