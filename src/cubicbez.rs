// Copyright 2026 the Arcwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cubic Bézier segments.

use arrayvec::ArrayVec;

use crate::common::{solve_quadratic, DEFAULT_ZERO_TOLERANCE};
use crate::flatten::{check_tolerance, flatten_parametric};
use crate::{Affine, Error, Point, Rect, Transform};

/// The maximum number of parametric extrema of a cubic, two per axis.
pub const MAX_EXTREMA: usize = 4;

/// A single cubic Bézier segment.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub struct CubicBez {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl CubicBez {
    /// Create a new cubic Bézier segment.
    #[inline]
    pub fn new<P: Into<Point>>(p0: P, p1: P, p2: P, p3: P) -> CubicBez {
        CubicBez {
            p0: p0.into(),
            p1: p1.into(),
            p2: p2.into(),
            p3: p3.into(),
        }
    }

    /// Evaluate the curve at parameter `t`, by de Casteljau's algorithm.
    pub fn eval(&self, t: f64) -> Point {
        let p01 = self.p0.lerp(self.p1, t);
        let p12 = self.p1.lerp(self.p2, t);
        let p23 = self.p2.lerp(self.p3, t);
        let p012 = p01.lerp(p12, t);
        let p123 = p12.lerp(p23, t);
        p012.lerp(p123, t)
    }

    /// Split the curve at `t = 0.5`.
    pub fn subdivide(&self) -> (CubicBez, CubicBez) {
        let pm = self.eval(0.5);
        let p01 = self.p0.midpoint(self.p1);
        let p12 = self.p1.midpoint(self.p2);
        let p23 = self.p2.midpoint(self.p3);
        (
            CubicBez::new(self.p0, p01, p01.midpoint(p12), pm),
            CubicBez::new(pm, p12.midpoint(p23), p23, self.p3),
        )
    }

    /// The curve with each control point mapped through `transform`.
    #[must_use]
    pub fn transform(&self, transform: &impl Transform) -> CubicBez {
        CubicBez {
            p0: transform.transform_point(self.p0),
            p1: transform.transform_point(self.p1),
            p2: transform.transform_point(self.p2),
            p3: transform.transform_point(self.p3),
        }
    }

    /// Parameter values in `(0, 1)` where either coordinate has a local
    /// extremum, in increasing order.
    ///
    /// Each coordinate's derivative is a quadratic, solved in closed form.
    pub fn extrema(&self) -> ArrayVec<f64, MAX_EXTREMA> {
        fn one_coord(result: &mut ArrayVec<f64, MAX_EXTREMA>, d0: f64, d1: f64, d2: f64) {
            let a = d0 - 2.0 * d1 + d2;
            let b = 2.0 * (d1 - d0);
            let c = d0;
            for t in solve_quadratic(c, b, a, DEFAULT_ZERO_TOLERANCE) {
                if t > 0.0 && t < 1.0 {
                    result.push(t);
                }
            }
        }
        let mut result = ArrayVec::new();
        let d0 = self.p1 - self.p0;
        let d1 = self.p2 - self.p1;
        let d2 = self.p3 - self.p2;
        one_coord(&mut result, d0.x, d1.x, d2.x);
        one_coord(&mut result, d0.y, d1.y, d2.y);
        result.sort_unstable_by(f64::total_cmp);
        result
    }

    /// The smallest rectangle enclosing the curve.
    pub fn bounding_box(&self) -> Rect {
        self.extrema()
            .into_iter()
            .map(|t| self.eval(t))
            .fold(Rect::from_points(self.p0, self.p3), |bbox, p| {
                bbox.union_pt(p)
            })
    }

    /// Flatten the curve into a polyline within `tolerance`.
    pub fn flatten(&self, tolerance: f64, sink: impl FnMut(Point, bool)) -> Result<(), Error> {
        self.flatten_with(&Affine::IDENTITY, tolerance, sink)
    }

    /// Flatten the curve as drawn through `transform`, with `tolerance`
    /// measured in device space.
    pub fn flatten_with(
        &self,
        transform: &impl Transform,
        tolerance: f64,
        mut sink: impl FnMut(Point, bool),
    ) -> Result<(), Error> {
        check_tolerance(tolerance)?;
        let device = self.transform(transform);
        sink(device.p0, true);
        flatten_parametric(|t| device.eval(t), 0.0, 1.0, tolerance, &mut sink)
    }
}
