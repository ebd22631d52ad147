// Copyright 2026 the Arcwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adaptive flattening of curves into polylines.
//!
//! Every curve type in this crate can be flattened into a sequence of points
//! delivered to a sink of type `impl FnMut(Point, bool)`. The boolean is `true`
//! for the first point of a disjoint subpath (a "move to") and `false` for
//! every other point, each of which implies a line from the point emitted
//! before it.
//!
//! Subdivision runs on an explicit work stack, never on the call stack, and
//! gives up with [`Error::DepthLimit`] once a span has been halved
//! [`MAX_DEPTH`] times.

use alloc::vec;

use log::warn;

use crate::{Error, Point};

/// The maximum number of times a single span may be halved.
///
/// A curve that still misses the tolerance after this many halvings is either
/// enormous compared to the tolerance or not finite.
pub const MAX_DEPTH: usize = 24;

/// Parametric spans are always halved at least this many times.
///
/// An S-shaped span can have its parametric midpoint exactly on its chord.
pub(crate) const MIN_SPLIT_DEPTH: usize = 2;

/// Check that a flattening tolerance is strictly positive and finite.
///
/// ```
/// use arcwise::{flatten::check_tolerance, Error};
///
/// assert!(check_tolerance(0.25).is_ok());
/// assert_eq!(check_tolerance(0.0), Err(Error::InvalidTolerance(0.0)));
/// ```
pub fn check_tolerance(tolerance: f64) -> Result<(), Error> {
    if tolerance > 0.0 && tolerance.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidTolerance(tolerance))
    }
}

pub(crate) fn depth_limit() -> Error {
    warn!("flattening gave up after {MAX_DEPTH} subdivisions");
    Error::DepthLimit(MAX_DEPTH)
}

/// Flatten the curve traced by `eval` over `t0..t1`.
///
/// `eval` must already map into the space the tolerance is measured in. The
/// start point is not emitted; every chord end point is emitted with
/// `is_move_to` false.
///
/// A span is accepted when the curve's midpoint lies within `tolerance` of
/// the midpoint of its chord.
pub(crate) fn flatten_parametric(
    eval: impl Fn(f64) -> Point,
    t0: f64,
    t1: f64,
    tolerance: f64,
    sink: &mut impl FnMut(Point, bool),
) -> Result<(), Error> {
    let tol2 = tolerance * tolerance;
    let mut stack = vec![(t0, eval(t0), t1, eval(t1), 0)];
    while let Some((ta, pa, tb, pb, depth)) = stack.pop() {
        let tm = 0.5 * (ta + tb);
        let pm = eval(tm);
        let err2 = pm.distance_squared(pa.midpoint(pb));
        if depth >= MIN_SPLIT_DEPTH && err2 <= tol2 {
            sink(pb, false);
            continue;
        }
        if depth >= MAX_DEPTH {
            return Err(depth_limit());
        }
        // Right half first, so the left half is popped next.
        stack.push((tm, pm, tb, pb, depth + 1));
        stack.push((ta, pa, tm, pm, depth + 1));
    }
    Ok(())
}

/// The distance from `p` to the nearest segment of `polyline`.
#[cfg(test)]
pub(crate) fn distance_to_polyline(p: Point, polyline: &[Point]) -> f64 {
    polyline
        .windows(2)
        .map(|w| {
            let d = w[1] - w[0];
            let len2 = d.hypot2();
            let t = if len2 == 0.0 {
                0.0
            } else {
                ((p - w[0]).dot(d) / len2).clamp(0.0, 1.0)
            };
            p.distance(w[0].lerp(w[1], t))
        })
        .fold(f64::INFINITY, f64::min)
}
