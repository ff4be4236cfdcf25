// Copyright 2026 the Quadplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error taxonomy returned from [`crate::Plot::compute`].

use core::fmt;

/// Errors returned from building or recomputing a [`crate::Plot`].
///
/// There are only two kinds: a bad argument caught before any sampling
/// happens, and a keying-coefficient overflow discovered while constructing
/// the new state. Anything raised by the caller's `f` is not wrapped here —
/// it propagates as an ordinary Rust panic.
#[derive(Debug)]
pub enum PlotError {
    /// `sample_spacing`/`pixel_size` were not a positive power of two, or the
    /// domain had a negative width or height.
    InvalidArgument(String),
    /// The folded integer key `c_0 + c_x*x + c_y*y` would overflow the safe
    /// range for the chosen key type at this domain/pixel_size combination
    /// (extreme zoom or translation).
    KeyRange {
        /// The computed additive keying coefficient.
        c0: f64,
        /// The magnitude `c0` was not allowed to exceed.
        limit: f64,
    },
}

impl fmt::Display for PlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlotError::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            PlotError::KeyRange { c0, limit } => {
                write!(
                    f,
                    "keying coefficient overflow: |c0| = {} exceeds the safe range of {limit}",
                    c0.abs()
                )
            }
        }
    }
}

impl std::error::Error for PlotError {}
