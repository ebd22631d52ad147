// Copyright 2026 the Arcwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ellipses and elliptic arcs.
//!
//! Elliptic arcs are parameterized by the *parametric* angle `θ`, not the
//! polar angle of the point: the point at `θ` is
//! `center + R(tilt)·(major·cos θ, minor·sin θ)`. The two agree on circles.

use core::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use smallvec::SmallVec;

use crate::common::{angle_in_sweep, clamp, epsilon_for_value, real_is_equal};
use crate::flatten::{check_tolerance, flatten_parametric};
use crate::{Affine, CubicBez, Error, Point, Rect, Transform, Vec2};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// An ellipse.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ellipse {
    /// The center.
    pub center: Point,
    /// The semi-major radius, along the tilted x axis.
    pub major: f64,
    /// The semi-minor radius.
    pub minor: f64,
    /// The angle of the major axis, in radians from the positive x axis.
    pub tilt: f64,
}

/// A section of an [`Ellipse`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EllipticArc {
    /// The ellipse the arc lies on.
    pub ellipse: Ellipse,
    /// The parametric angle of the start point.
    pub start_angle: f64,
    /// The signed parametric sweep. Positive sweeps are anti-clockwise in a
    /// y-up frame.
    pub sweep_angle: f64,
}

/// The shape of a centered ellipse after an affine map.
///
/// See [`transform_central_ellipse`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformedEllipse {
    /// The new semi-major radius.
    pub major: f64,
    /// The new semi-minor radius.
    pub minor: f64,
    /// The new tilt of the major axis.
    pub tilt: f64,
    /// The sweep, negated when the map mirrors the plane.
    pub sweep_angle: f64,
    /// Whether the two radii are equal within tolerance.
    pub is_circle: bool,
}

/// Map a centered ellipse through the linear part of `transform`.
///
/// The ellipse is represented by its shape matrix `P = M·Mᵀ` with
/// `M = R(tilt)·diag(major, minor)`; a linear map `L` sends it to `L·P·Lᵀ`.
/// The new radii are the square roots of that matrix's eigenvalues and the
/// new tilt is the angle of the eigenvector of the larger one.
///
/// ```
/// use arcwise::{transform_central_ellipse, Affine};
///
/// let t = transform_central_ellipse(1.0, 1.0, 0.0, 1.0, &Affine::scale_non_uniform(2.0, 1.0));
/// assert!((t.major - 2.0).abs() < 1e-12);
/// assert!((t.minor - 1.0).abs() < 1e-12);
/// assert_eq!(t.tilt, 0.0);
/// assert!(!t.is_circle);
/// ```
pub fn transform_central_ellipse(
    major: f64,
    minor: f64,
    tilt: f64,
    sweep: f64,
    transform: &impl Transform,
) -> TransformedEllipse {
    let axis = Vec2::from_angle(tilt);
    let u = transform.transform_vector(major * axis);
    let v = transform.transform_vector(minor * axis.turn_90());
    // The entries of the symmetric matrix [[a, h], [h, c]].
    let a = u.x * u.x + v.x * v.x;
    let c = u.y * u.y + v.y * v.y;
    let h = u.x * u.y + v.x * v.y;

    let half_diff = 0.5 * (a - c);
    let mean = 0.5 * (a + c);
    let radius = (half_diff * half_diff + h * h).sqrt();
    // Round-off can push the smaller eigenvalue of a flat ellipse below zero.
    let lambda_major = (mean + radius).max(0.0);
    let lambda_minor = (mean - radius).max(0.0);

    let eps = epsilon_for_value(a + c);
    let tilt = if h.abs() <= eps {
        if a >= c {
            0.0
        } else {
            FRAC_PI_2
        }
    } else if (a - c).abs() <= eps {
        FRAC_PI_4.copysign(h)
    } else {
        0.5 * (2.0 * h).atan2(a - c)
    };

    let major = lambda_major.sqrt();
    let minor = lambda_minor.sqrt();
    TransformedEllipse {
        major,
        minor,
        tilt,
        sweep_angle: if transform.determinant() < 0.0 {
            -sweep
        } else {
            sweep
        },
        is_circle: real_is_equal(major, minor),
    }
}

impl Ellipse {
    /// Create a new ellipse.
    #[inline]
    pub fn new(center: impl Into<Point>, major: f64, minor: f64, tilt: f64) -> Ellipse {
        Ellipse {
            center: center.into(),
            major,
            minor,
            tilt,
        }
    }

    /// A circle, as an ellipse.
    #[inline]
    pub fn circle(center: impl Into<Point>, radius: f64) -> Ellipse {
        Ellipse::new(center, radius, radius, 0.0)
    }

    /// Whether the two radii are equal within tolerance.
    #[inline]
    pub fn is_circle(&self) -> bool {
        real_is_equal(self.major, self.minor)
    }

    /// The images of the unit x and y vectors, scaled to the radii.
    fn frame(&self) -> (Vec2, Vec2) {
        let axis = Vec2::from_angle(self.tilt);
        (self.major * axis, self.minor * axis.turn_90())
    }

    /// The point at parametric angle `th`.
    pub fn eval(&self, th: f64) -> Point {
        let (u, v) = self.frame();
        let (sin, cos) = th.sin_cos();
        self.center + cos * u + sin * v
    }

    /// The derivative with respect to the parametric angle.
    fn deriv(&self, th: f64) -> Vec2 {
        let (u, v) = self.frame();
        let (sin, cos) = th.sin_cos();
        cos * v - sin * u
    }

    /// The parametric angle of a point on the ellipse, in `(-π, π]`.
    ///
    /// Points off the ellipse get the angle of their projection along the
    /// ray from the center.
    pub fn parameter_of(&self, p: Point) -> f64 {
        let axis = Vec2::from_angle(self.tilt);
        let d = p - self.center;
        let x = d.dot(axis);
        let y = d.dot(axis.turn_90());
        // atan2(y / minor, x / major), scaled through by major·minor.
        (y * self.major).atan2(x * self.minor)
    }

    /// The whole ellipse as an arc starting at parametric angle zero.
    #[inline]
    pub fn to_arc(&self) -> EllipticArc {
        EllipticArc::new(*self, 0.0, TAU)
    }

    /// The smallest rectangle enclosing the ellipse.
    pub fn bounding_box(&self) -> Rect {
        self.to_arc().bounding_box()
    }

    /// The ellipse drawn through `transform`.
    #[must_use]
    pub fn transform(&self, transform: &impl Transform) -> Ellipse {
        let t = transform_central_ellipse(self.major, self.minor, self.tilt, TAU, transform);
        Ellipse::new(transform.transform_point(self.center), t.major, t.minor, t.tilt)
    }

    /// Flatten the ellipse into a closed polyline within `tolerance`.
    pub fn flatten(&self, tolerance: f64, sink: impl FnMut(Point, bool)) -> Result<(), Error> {
        self.to_arc().flatten(tolerance, sink)
    }

    /// Flatten the ellipse as drawn through `transform`.
    pub fn flatten_with(
        &self,
        transform: &impl Transform,
        tolerance: f64,
        sink: impl FnMut(Point, bool),
    ) -> Result<(), Error> {
        self.to_arc().flatten_with(transform, tolerance, sink)
    }
}

impl EllipticArc {
    /// Create a new elliptic arc.
    #[inline]
    pub fn new(ellipse: Ellipse, start_angle: f64, sweep_angle: f64) -> EllipticArc {
        EllipticArc {
            ellipse,
            start_angle,
            sweep_angle,
        }
    }

    /// Whether the underlying ellipse is a circle.
    #[inline]
    pub fn is_circle(&self) -> bool {
        self.ellipse.is_circle()
    }

    /// The point a fraction `t` of the way along the sweep.
    #[inline]
    pub fn eval(&self, t: f64) -> Point {
        self.ellipse.eval(self.start_angle + t * self.sweep_angle)
    }

    /// The start point.
    #[inline]
    pub fn start_point(&self) -> Point {
        self.ellipse.eval(self.start_angle)
    }

    /// The end point.
    #[inline]
    pub fn end_point(&self) -> Point {
        self.ellipse.eval(self.start_angle + self.sweep_angle)
    }

    /// The smallest rectangle enclosing the arc.
    ///
    /// The parametric angles where the ellipse is tangent to an axis have
    /// closed forms in the tilt; those inside the sweep are added to the end
    /// points.
    pub fn bounding_box(&self) -> Rect {
        let Ellipse {
            major: a,
            minor: b,
            tilt,
            ..
        } = self.ellipse;
        let (sin, cos) = tilt.sin_cos();
        // dx/dθ = 0 and dy/dθ = 0 respectively.
        let th_x = (-b * sin).atan2(a * cos);
        let th_y = (b * cos).atan2(a * sin);
        [th_x, th_x + PI, th_y, th_y + PI]
            .into_iter()
            .filter(|&th| angle_in_sweep(th, self.start_angle, self.sweep_angle))
            .map(|th| self.ellipse.eval(th))
            .fold(
                Rect::from_points(self.start_point(), self.end_point()),
                |bbox, p| bbox.union_pt(p),
            )
    }

    /// The same arc drawn through `transform`.
    ///
    /// The start angle is recomputed in the new frame. The sweep keeps its
    /// magnitude and changes sign if `transform` mirrors the plane.
    #[must_use]
    pub fn transform(&self, transform: &impl Transform) -> EllipticArc {
        let Ellipse {
            center,
            major,
            minor,
            tilt,
        } = self.ellipse;
        let t = transform_central_ellipse(major, minor, tilt, self.sweep_angle, transform);
        let ellipse = Ellipse::new(transform.transform_point(center), t.major, t.minor, t.tilt);
        let start = ellipse.parameter_of(transform.transform_point(self.start_point()));
        EllipticArc::new(ellipse, start, t.sweep_angle)
    }

    /// Flatten the arc into a polyline within `tolerance`.
    pub fn flatten(&self, tolerance: f64, sink: impl FnMut(Point, bool)) -> Result<(), Error> {
        self.flatten_with(&Affine::IDENTITY, tolerance, sink)
    }

    /// Flatten the arc as drawn through `transform`, with `tolerance`
    /// measured in device space.
    pub fn flatten_with(
        &self,
        transform: &impl Transform,
        tolerance: f64,
        mut sink: impl FnMut(Point, bool),
    ) -> Result<(), Error> {
        check_tolerance(tolerance)?;
        let eval = |th: f64| transform.transform_point(self.ellipse.eval(th));
        sink(eval(self.start_angle), true);
        flatten_parametric(
            eval,
            self.start_angle,
            self.start_angle + self.sweep_angle,
            tolerance,
            &mut sink,
        )
    }

    /// Convert to cubic Béziers, one per piece of at most a quarter turn of
    /// the parametric angle.
    ///
    /// Each piece is the quarter-circle approximation mapped through the
    /// ellipse's frame, so end points and end tangents match exactly.
    pub fn to_cubic_beziers(&self) -> SmallVec<[CubicBez; 4]> {
        let sweep = clamp(self.sweep_angle, -TAU, TAU);
        let n = (sweep.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
        let step = sweep / n as f64;
        let k = 4.0 / 3.0 * (0.25 * step).tan();
        (0..n)
            .map(|i| {
                let th0 = self.start_angle + i as f64 * step;
                let th1 = th0 + step;
                let p0 = self.ellipse.eval(th0);
                let p3 = self.ellipse.eval(th1);
                CubicBez::new(
                    p0,
                    p0 + k * self.ellipse.deriv(th0),
                    p3 - k * self.ellipse.deriv(th1),
                    p3,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::distance_to_polyline;
    use alloc::vec::Vec;

    fn assert_near(p0: Point, p1: Point, epsilon: f64) {
        assert!(p0.distance(p1) < epsilon, "{p0:?} != {p1:?}");
    }

    fn assert_close(x: f64, y: f64) {
        assert!((x - y).abs() < 1e-9, "{x} != {y}");
    }

    #[test]
    fn ellipse_eval() {
        let e = Ellipse::new((1.0, 2.0), 3.0, 1.0, FRAC_PI_2);
        assert_near(e.eval(0.0), Point::new(1.0, 5.0), 1e-12);
        assert_near(e.eval(FRAC_PI_2), Point::new(0.0, 2.0), 1e-12);
        assert_close(e.parameter_of(Point::new(0.0, 2.0)), FRAC_PI_2);
        for &th in &[-3.0, -1.0, 0.0, 0.5, 2.0, 3.1] {
            assert_close(e.parameter_of(e.eval(th)), th);
        }
        assert!(Ellipse::circle(Point::ZERO, 2.0).is_circle());
        assert!(!e.is_circle());
    }

    #[test]
    fn tilted_extents() {
        let (a, b) = (5.0, 2.0);
        for &tilt in &[0.0, 0.3, FRAC_PI_4, 1.2, FRAC_PI_2, 2.5, -0.7] {
            let e = Ellipse::new((1.0, -1.0), a, b, tilt);
            let (sin, cos) = f64::sin_cos(tilt);
            let w = (a * a * cos * cos + b * b * sin * sin).sqrt();
            let h = (a * a * sin * sin + b * b * cos * cos).sqrt();
            let bbox = e.bounding_box();
            assert_close(bbox.x0, 1.0 - w);
            assert_close(bbox.x1, 1.0 + w);
            assert_close(bbox.y0, -1.0 - h);
            assert_close(bbox.y1, -1.0 + h);
        }
    }

    #[test]
    fn arc_extents() {
        let e = Ellipse::new(Point::ZERO, 2.0, 1.0, 0.0);
        let quarter = EllipticArc::new(e, 0.0, FRAC_PI_2).bounding_box();
        assert_close(quarter.x0, 0.0);
        assert_close(quarter.x1, 2.0);
        assert_close(quarter.y0, 0.0);
        assert_close(quarter.y1, 1.0);
        let clockwise = EllipticArc::new(e, 0.0, -FRAC_PI_2).bounding_box();
        assert_close(clockwise.y0, -1.0);
        assert_close(clockwise.y1, 0.0);
        // From the top, anti-clockwise around the left side to the bottom.
        let left = EllipticArc::new(e, FRAC_PI_2, PI).bounding_box();
        assert_close(left.x0, -2.0);
        assert_close(left.x1, 0.0);
        assert_close(left.y0, -1.0);
        assert_close(left.y1, 1.0);
    }

    #[test]
    fn transform_scales_circle() {
        let t = transform_central_ellipse(1.0, 1.0, 0.0, 1.0, &Affine::scale_non_uniform(2.0, 1.0));
        assert_close(t.major, 2.0);
        assert_close(t.minor, 1.0);
        assert_eq!(t.tilt, 0.0);
        assert_eq!(t.sweep_angle, 1.0);
        assert!(!t.is_circle);

        let t = transform_central_ellipse(1.0, 1.0, 0.0, 1.0, &Affine::scale_non_uniform(1.0, 3.0));
        assert_close(t.major, 3.0);
        assert_close(t.tilt, FRAC_PI_2);
    }

    #[test]
    fn transform_rotates_tilt() {
        let t = transform_central_ellipse(2.0, 1.0, 0.0, 1.0, &Affine::rotate(0.3));
        assert_close(t.major, 2.0);
        assert_close(t.minor, 1.0);
        assert_close(t.tilt, 0.3);
        // Equal diagonal entries take the quarter-turn branch.
        let t = transform_central_ellipse(2.0, 1.0, FRAC_PI_4, 1.0, &Affine::IDENTITY);
        assert_close(t.tilt, FRAC_PI_4);
        let t = transform_central_ellipse(2.0, 1.0, -FRAC_PI_4, 1.0, &Affine::IDENTITY);
        assert_close(t.tilt, -FRAC_PI_4);
    }

    #[test]
    fn transform_mirror_flips_sweep() {
        let t = transform_central_ellipse(2.0, 1.0, 0.3, 1.5, &Affine::FLIP_Y);
        assert_eq!(t.sweep_angle, -1.5);
        assert_close(t.major, 2.0);
        assert_close(t.tilt, -0.3);
    }

    #[test]
    fn uniform_transform_keeps_circle() {
        let transform = Affine::rotate(0.9).then(Affine::scale(3.0));
        let t = transform_central_ellipse(2.0, 2.0, 0.4, 1.0, &transform);
        assert!(t.is_circle);
        assert_close(t.major, 6.0);
        assert_close(t.minor, 6.0);
    }

    #[test]
    fn degenerate_transform() {
        // Collapsing onto the x axis leaves a zero minor radius, not NaN.
        let t = transform_central_ellipse(2.0, 1.0, 0.5, 1.0, &Affine::scale_non_uniform(1.0, 0.0));
        assert!(t.minor.abs() < 1e-7);
        assert!(t.major.is_finite());
    }

    #[test]
    fn arc_transform_tracks_points() {
        let transforms = [
            Affine::scale_non_uniform(2.0, 0.5),
            Affine::rotate(1.3).then(Affine::translate((4.0, -2.0))),
            Affine::FLIP_Y.then(Affine::scale(0.5)),
            Affine::skew(0.7, -0.2).then(Affine::scale_non_uniform(1.0, 2.5)),
            Affine::new([0.3, 1.2, -2.0, 0.4, 1.0, 1.0]),
        ];
        let arcs = [
            EllipticArc::new(Ellipse::circle((1.0, 1.0), 2.0), 0.0, FRAC_PI_2),
            EllipticArc::new(Ellipse::new((0.0, 3.0), 4.0, 1.5, 0.6), -1.0, 2.5),
            EllipticArc::new(Ellipse::new((-2.0, 0.0), 3.0, 2.0, 2.0), 2.0, -4.0),
            Ellipse::new((0.0, 0.0), 1.0, 0.5, -0.3).to_arc(),
        ];
        for transform in &transforms {
            for arc in &arcs {
                let mapped = arc.transform(transform);
                assert!(mapped.ellipse.major >= mapped.ellipse.minor);
                for i in 0..=20 {
                    let t = i as f64 / 20.0;
                    assert_near(mapped.eval(t), transform.transform_point(arc.eval(t)), 1e-9);
                }
            }
        }
    }

    fn check_flatten(arc: &EllipticArc, transform: &Affine, tolerance: f64) -> usize {
        let mut pts = Vec::new();
        arc.flatten_with(transform, tolerance, |p, move_to| {
            assert_eq!(move_to, pts.is_empty());
            pts.push(p);
        })
        .unwrap();
        assert_near(pts[0], transform.transform_point(arc.start_point()), 1e-12);
        assert_near(*pts.last().unwrap(), transform.transform_point(arc.end_point()), 1e-9);
        for i in 0..=2000 {
            let p = transform.transform_point(arc.eval(i as f64 / 2000.0));
            assert!(distance_to_polyline(p, &pts) <= tolerance);
        }
        pts.len()
    }

    #[test]
    fn flatten_elliptic_arcs() {
        let arc = EllipticArc::new(Ellipse::new((0.0, 3.0), 40.0, 15.0, 0.6), -1.0, 2.5);
        let fine = check_flatten(&arc, &Affine::IDENTITY, 0.01);
        let coarse = check_flatten(&arc, &Affine::IDENTITY, 0.5);
        assert!(coarse < fine);
        check_flatten(&arc, &Affine::skew(0.7, -0.2), 0.01);
        let full = Ellipse::new((5.0, 5.0), 10.0, 3.0, -0.3).to_arc();
        check_flatten(&full, &Affine::IDENTITY, 0.01);
        check_flatten(&full, &Affine::FLIP_Y.then(Affine::scale(2.0)), 0.01);
    }

    #[test]
    fn flatten_bad_tolerance() {
        let e = Ellipse::circle(Point::ZERO, 1.0);
        assert_eq!(
            e.flatten(f64::INFINITY, |_, _| {}),
            Err(Error::InvalidTolerance(f64::INFINITY))
        );
    }

    #[test]
    fn arc_to_cubics() {
        let e = Ellipse::new((1.0, -2.0), 6.0, 2.0, 0.4);
        for (sweep, count) in [(0.5, 1), (FRAC_PI_2, 1), (3.0, 2), (-5.0, 4), (TAU, 4)] {
            let arc = EllipticArc::new(e, 0.7, sweep);
            let cubics = arc.to_cubic_beziers();
            assert_eq!(cubics.len(), count);
            assert_near(cubics[0].p0, arc.start_point(), 1e-12);
            assert_near(cubics[count - 1].p3, arc.end_point(), 1e-9);
            for c in &cubics {
                for i in 0..=50 {
                    // Map back to the unit circle and measure the radius.
                    let p = c.eval(i as f64 / 50.0);
                    let d = Affine::rotate(-0.4) * Point::new(p.x - 1.0, p.y + 2.0);
                    let r = ((d.x / 6.0).powi(2) + (d.y / 2.0).powi(2)).sqrt();
                    assert!((r - 1.0).abs() < 3e-4);
                }
            }
        }
    }
}
