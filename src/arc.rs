// Copyright 2026 the Arcwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Circular arcs in bulge form.
//!
//! A bulge arc is stored the way drafting formats store polyline arcs: as its
//! two end points plus a signed scalar, the *bulge*, equal to the tangent of a
//! quarter of the sweep angle. A bulge of zero is a straight segment, a bulge
//! of one is a half circle, and the sign gives the winding: positive bulges
//! sweep anti-clockwise (in a y-up frame) from `p0` to `p1`, which puts the arc
//! to the right of the chord.
//!
//! The representation needs no trigonometry to split: halving an arc keeps its
//! center and replaces the bulge with the tangent of half its angle.

use alloc::vec;

use smallvec::{smallvec, SmallVec};

use crate::flatten::{check_tolerance, depth_limit, MAX_DEPTH};
use crate::{Affine, CubicBez, Error, Point, Rect, Transform, Vec2};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// Bulges below this magnitude describe straight segments.
const LINEAR_BULGE: f64 = 1e-10;

/// The bulge of a quarter circle, `tan(π/8)`.
const QUARTER_CIRCLE_BULGE: f64 = 0.41421356237309503;

/// A circular arc between two points.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BulgeArc {
    /// The start point.
    pub p0: Point,
    /// The end point.
    pub p1: Point,
    /// The tangent of a quarter of the signed sweep angle.
    pub bulge: f64,
}

/// The center parameterization of a circular arc.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArcParams {
    /// The center of the circle.
    pub center: Point,
    /// The radius of the circle.
    pub radius: f64,
    /// The angle of the start point, in radians from the positive x axis.
    pub start_angle: f64,
    /// The signed sweep angle in radians. Positive sweeps are anti-clockwise
    /// in a y-up frame.
    pub sweep_angle: f64,
}

impl BulgeArc {
    /// Create a new arc from its end points and bulge.
    #[inline]
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>, bulge: f64) -> BulgeArc {
        BulgeArc {
            p0: p0.into(),
            p1: p1.into(),
            bulge,
        }
    }

    /// Build the arc described by a center parameterization.
    pub fn from_params(params: &ArcParams) -> BulgeArc {
        let ArcParams {
            center,
            radius,
            start_angle,
            sweep_angle,
        } = *params;
        BulgeArc {
            p0: center + radius * Vec2::from_angle(start_angle),
            p1: center + radius * Vec2::from_angle(start_angle + sweep_angle),
            bulge: BulgeArc::bulge_from_sweep(sweep_angle),
        }
    }

    /// The bulge of an arc sweeping `sweep` radians.
    #[inline]
    pub fn bulge_from_sweep(sweep: f64) -> f64 {
        (0.25 * sweep).tan()
    }

    /// Whether this arc degenerates to a straight segment.
    ///
    /// This is the case when the bulge is close to zero, or the end points
    /// coincide so that no circle is determined.
    #[inline]
    pub fn is_linear(&self) -> bool {
        self.bulge.abs() < LINEAR_BULGE || self.p0 == self.p1
    }

    /// The signed sweep angle, `4·atan(bulge)`.
    #[inline]
    pub fn sweep_angle(&self) -> f64 {
        4.0 * self.bulge.atan()
    }

    /// The center of the circle, or `None` for a straight segment.
    pub fn center(&self) -> Option<Point> {
        if self.is_linear() {
            return None;
        }
        let chord = self.p1 - self.p0;
        let offset = (1.0 - self.bulge * self.bulge) / (4.0 * self.bulge);
        Some(self.p0.midpoint(self.p1) + offset * chord.turn_90())
    }

    /// The radius of the circle, or `None` for a straight segment.
    pub fn radius(&self) -> Option<f64> {
        if self.is_linear() {
            return None;
        }
        let d = self.p0.distance(self.p1);
        Some(d * (1.0 + self.bulge * self.bulge) / (4.0 * self.bulge.abs()))
    }

    /// The distance from the midpoint of the chord to the midpoint of the arc.
    #[inline]
    pub fn sagitta(&self) -> f64 {
        0.5 * self.bulge.abs() * self.p0.distance(self.p1)
    }

    /// The center parameterization, or `None` for a straight segment.
    pub fn params(&self) -> Option<ArcParams> {
        let center = self.center()?;
        let radius = self.radius()?;
        Some(ArcParams {
            center,
            radius,
            start_angle: (self.p0 - center).atan2(),
            sweep_angle: self.sweep_angle(),
        })
    }

    /// The point a fraction `t` of the way along the sweep.
    pub fn eval(&self, t: f64) -> Point {
        match self.params() {
            Some(params) => {
                let th = params.start_angle + t * params.sweep_angle;
                params.center + params.radius * Vec2::from_angle(th)
            }
            None => self.p0.lerp(self.p1, t),
        }
    }

    /// The point halfway along the arc.
    ///
    /// This is exact for straight segments too.
    #[inline]
    pub fn midpoint(&self) -> Point {
        let chord = self.p1 - self.p0;
        self.p0.midpoint(self.p1) - (0.5 * self.bulge) * chord.turn_90()
    }

    /// Split the arc at its midpoint into two arcs of half the sweep.
    pub fn subdivide(&self) -> (BulgeArc, BulgeArc) {
        let mid = self.midpoint();
        let bulge = (0.5 * self.bulge.atan()).tan();
        (
            BulgeArc::new(self.p0, mid, bulge),
            BulgeArc::new(mid, self.p1, bulge),
        )
    }

    /// The same arc traversed from `p1` to `p0`.
    #[must_use]
    #[inline]
    pub fn reversed(&self) -> BulgeArc {
        BulgeArc::new(self.p1, self.p0, -self.bulge)
    }

    /// The smallest rectangle enclosing the arc.
    ///
    /// Besides the end points, this includes each of the four axis-aligned
    /// extremes of the circle that lies on the swept side of the chord.
    pub fn bounding_box(&self) -> Rect {
        let bbox = Rect::from_points(self.p0, self.p1);
        let (Some(center), Some(r)) = (self.center(), self.radius()) else {
            return bbox;
        };
        let chord = self.p1 - self.p0;
        [
            Vec2::new(r, 0.0),
            Vec2::new(0.0, r),
            Vec2::new(-r, 0.0),
            Vec2::new(0.0, -r),
        ]
        .into_iter()
        .map(|v| center + v)
        .filter(|&q| chord.cross(q - self.p0) * self.bulge <= 0.0)
        .fold(bbox, |bbox, q| bbox.union_pt(q))
    }

    /// Flatten the arc into a polyline within `tolerance`.
    ///
    /// The start point is emitted as a move, every other point as a line.
    pub fn flatten(&self, tolerance: f64, sink: impl FnMut(Point, bool)) -> Result<(), Error> {
        self.flatten_with(&Affine::IDENTITY, tolerance, sink)
    }

    /// Flatten the arc as drawn through `transform`, with `tolerance` measured
    /// in device space.
    ///
    /// Each span is accepted once its sagitta is within tolerance. Under a
    /// similarity the sagitta just scales; otherwise the span's sagitta vector
    /// is mapped into device space, where the arc becomes elliptical.
    pub fn flatten_with(
        &self,
        transform: &impl Transform,
        tolerance: f64,
        mut sink: impl FnMut(Point, bool),
    ) -> Result<(), Error> {
        check_tolerance(tolerance)?;
        sink(transform.transform_point(self.p0), true);
        if self.is_linear() {
            sink(transform.transform_point(self.p1), false);
            return Ok(());
        }
        let uniform = transform.is_uniform();
        let scale = transform.determinant().abs().sqrt();
        let mut stack = vec![(*self, 0)];
        while let Some((arc, depth)) = stack.pop() {
            let err = if uniform {
                arc.sagitta() * scale
            } else {
                let sagitta = arc.midpoint() - arc.p0.midpoint(arc.p1);
                transform.transform_vector(sagitta).hypot()
            };
            // Spans beyond a half circle are always split: their chord can be
            // short while the arc is wide.
            if arc.bulge.abs() <= 1.0 && err <= tolerance {
                sink(transform.transform_point(arc.p1), false);
                continue;
            }
            if depth >= MAX_DEPTH {
                return Err(depth_limit());
            }
            let (left, right) = arc.subdivide();
            stack.push((right, depth + 1));
            stack.push((left, depth + 1));
        }
        Ok(())
    }

    /// Convert to cubic Béziers, one per sub-arc of at most a quarter circle.
    ///
    /// Each cubic matches the end points and end tangents of its sub-arc. A
    /// straight segment becomes a single degenerate cubic.
    pub fn to_cubic_beziers(&self) -> SmallVec<[CubicBez; 4]> {
        let Some(center) = self.center() else {
            return smallvec![CubicBez::new(
                self.p0,
                self.p0.lerp(self.p1, 1.0 / 3.0),
                self.p0.lerp(self.p1, 2.0 / 3.0),
                self.p1,
            )];
        };
        let mut arcs: SmallVec<[BulgeArc; 4]> = smallvec![*self];
        while arcs.iter().any(|arc| arc.bulge.abs() > QUARTER_CIRCLE_BULGE) {
            arcs = arcs
                .iter()
                .flat_map(|arc| {
                    let (left, right) = arc.subdivide();
                    [left, right]
                })
                .collect();
        }
        arcs.iter()
            .map(|arc| {
                // The handle length of a circular arc is 4/3·tan(sweep/4)·r.
                let k = 4.0 / 3.0 * arc.bulge;
                CubicBez::new(
                    arc.p0,
                    arc.p0 + k * (arc.p0 - center).turn_90(),
                    arc.p1 - k * (arc.p1 - center).turn_90(),
                    arc.p1,
                )
            })
            .collect()
    }
}

impl ArcParams {
    /// The angle of the end point.
    #[inline]
    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep_angle
    }
}

#[cfg(test)]
mod tests {
    use crate::flatten::{distance_to_polyline, MAX_DEPTH};
    use crate::{Affine, ArcParams, BulgeArc, Error, Point, Rect, Transform};
    use alloc::vec::Vec;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_near(p0: Point, p1: Point, epsilon: f64) {
        assert!(p0.distance(p1) < epsilon, "{p0:?} != {p1:?}");
    }

    fn collect(arc: &BulgeArc, transform: &Affine, tolerance: f64) -> Vec<Point> {
        let mut pts = Vec::new();
        arc.flatten_with(transform, tolerance, |p, move_to| {
            assert_eq!(move_to, pts.is_empty());
            pts.push(p);
        })
        .unwrap();
        pts
    }

    #[test]
    fn semicircle_geometry() {
        let arc = BulgeArc::new((0.0, 0.0), (10.0, 0.0), 1.0);
        assert_near(arc.center().unwrap(), Point::new(5.0, 0.0), 1e-12);
        assert!((arc.radius().unwrap() - 5.0).abs() < 1e-12);
        assert!((arc.sweep_angle() - PI).abs() < 1e-12);
        assert_eq!(arc.sagitta(), 5.0);
        // Positive bulges sweep anti-clockwise, passing below this chord.
        assert_near(arc.midpoint(), Point::new(5.0, -5.0), 1e-12);
        assert_near(arc.eval(0.5), Point::new(5.0, -5.0), 1e-12);
        assert_near(arc.eval(1.0), arc.p1, 1e-12);
    }

    #[test]
    fn minor_arc_center() {
        // The center of a minor arc is on the far side of the chord.
        let arc = BulgeArc::new((0.0, 0.0), (10.0, 0.0), 0.5);
        let center = arc.center().unwrap();
        assert_near(center, Point::new(5.0, 3.75), 1e-12);
        let r = arc.radius().unwrap();
        assert!((r - 6.25).abs() < 1e-12);
        assert!((center.distance(arc.p0) - r).abs() < 1e-12);
        assert!((center.distance(arc.midpoint()) - r).abs() < 1e-12);
        assert!((arc.sagitta() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn linear_arcs() {
        let arc = BulgeArc::new((1.0, 1.0), (3.0, 1.0), 0.0);
        assert!(arc.is_linear());
        assert_eq!(arc.center(), None);
        assert_eq!(arc.radius(), None);
        assert_eq!(arc.params(), None);
        assert_eq!(arc.eval(0.5), Point::new(2.0, 1.0));
        assert_eq!(arc.midpoint(), Point::new(2.0, 1.0));
        assert_eq!(arc.bounding_box(), Rect::new(1.0, 1.0, 3.0, 1.0));
        assert!(BulgeArc::new((1.0, 1.0), (1.0, 1.0), 0.7).is_linear());
        assert_eq!(arc.to_cubic_beziers().len(), 1);
    }

    #[test]
    fn params_round_trip() {
        for &bulge in &[0.1, -0.3, 0.9, 1.0, -1.7, 4.0, -25.0] {
            let arc = BulgeArc::new((-2.0, 3.0), (4.5, 1.0), bulge);
            let params = arc.params().unwrap();
            assert!((params.radius - params.center.distance(arc.p1)).abs() < 1e-9);
            let back = BulgeArc::from_params(&params);
            assert!((back.bulge - bulge).abs() < 1e-9 * bulge.abs().max(1.0));
            assert_near(back.p0, arc.p0, 1e-9);
            assert_near(back.p1, arc.p1, 1e-9);
            let rebuilt = BulgeArc::bulge_from_sweep(params.sweep_angle);
            assert!((rebuilt - bulge).abs() < 1e-9 * bulge.abs().max(1.0));
        }
        let quarter = ArcParams {
            center: Point::new(1.0, 1.0),
            radius: 2.0,
            start_angle: 0.0,
            sweep_angle: FRAC_PI_2,
        };
        let arc = BulgeArc::from_params(&quarter);
        assert_near(arc.p1, Point::new(1.0, 3.0), 1e-12);
        assert!((quarter.end_angle() - FRAC_PI_2).abs() < 1e-15);
    }

    #[test]
    fn subdivide_and_reverse() {
        let arc = BulgeArc::new((0.0, 0.0), (10.0, 0.0), 1.0);
        let (left, right) = arc.subdivide();
        assert!((left.sweep_angle() - FRAC_PI_2).abs() < 1e-12);
        assert_eq!(left.p1, right.p0);
        assert_near(left.center().unwrap(), Point::new(5.0, 0.0), 1e-12);
        assert_near(right.center().unwrap(), Point::new(5.0, 0.0), 1e-12);
        let rev = arc.reversed();
        assert_near(rev.midpoint(), arc.midpoint(), 1e-12);
        assert!((rev.sweep_angle() + arc.sweep_angle()).abs() < 1e-12);
    }

    #[test]
    fn semicircle_extents() {
        let below = BulgeArc::new((0.0, 0.0), (10.0, 0.0), 1.0).bounding_box();
        assert!((below.x0 - 0.0).abs() < 1e-12 && (below.x1 - 10.0).abs() < 1e-12);
        assert!((below.y0 + 5.0).abs() < 1e-12 && below.y1.abs() < 1e-12);
        let above = BulgeArc::new((0.0, 0.0), (10.0, 0.0), -1.0).bounding_box();
        assert!(above.y0.abs() < 1e-12 && (above.y1 - 5.0).abs() < 1e-12);
    }

    #[test]
    fn major_arc_extents() {
        // Three quarters of the unit circle, anti-clockwise from (1, 0) to (0, -1).
        let arc = BulgeArc::new((1.0, 0.0), (0.0, -1.0), BulgeArc::bulge_from_sweep(1.5 * PI));
        assert_near(arc.center().unwrap(), Point::ZERO, 1e-12);
        let bbox = arc.bounding_box();
        assert!((bbox.x0 + 1.0).abs() < 1e-12);
        assert!((bbox.x1 - 1.0).abs() < 1e-12);
        assert!((bbox.y0 + 1.0).abs() < 1e-12);
        assert!((bbox.y1 - 1.0).abs() < 1e-12);
        // The clockwise quarter between the same points only reaches (1, -1).
        let short = BulgeArc::new((1.0, 0.0), (0.0, -1.0), BulgeArc::bulge_from_sweep(-FRAC_PI_2));
        let bbox = short.bounding_box();
        assert!(bbox.x0.abs() < 1e-12 && bbox.y1.abs() < 1e-12);
    }

    #[test]
    fn flatten_semicircle() {
        let arc = BulgeArc::new((0.0, 0.0), (10.0, 0.0), 1.0);
        let pts = collect(&arc, &Affine::IDENTITY, 0.01);
        assert_eq!(pts[0], arc.p0);
        assert_eq!(*pts.last().unwrap(), arc.p1);
        for p in &pts {
            assert!((p.distance(Point::new(5.0, 0.0)) - 5.0).abs() < 0.01);
        }
        for i in 0..=1000 {
            let p = arc.eval(i as f64 / 1000.0);
            assert!(distance_to_polyline(p, &pts) <= 0.01);
        }
    }

    #[test]
    fn flatten_through_transforms() {
        let arc = BulgeArc::new((1.0, 2.0), (4.0, -1.0), -2.5);
        for transform in [
            Affine::scale(3.0),
            Affine::FLIP_Y.then(Affine::rotate(0.4)),
            Affine::scale_non_uniform(4.0, 0.5),
            Affine::skew(0.8, 0.1).then(Affine::translate((10.0, 0.0))),
        ] {
            let tolerance = 0.02;
            let pts = collect(&arc, &transform, tolerance);
            assert_near(pts[0], transform.transform_point(arc.p0), 1e-12);
            assert_near(*pts.last().unwrap(), transform.transform_point(arc.p1), 1e-12);
            for i in 0..=1000 {
                let p = transform.transform_point(arc.eval(i as f64 / 1000.0));
                assert!(distance_to_polyline(p, &pts) <= tolerance + 1e-12);
            }
        }
    }

    #[test]
    fn flatten_is_coarser_for_looser_tolerance() {
        let arc = BulgeArc::new((0.0, 0.0), (100.0, 0.0), 0.8);
        let fine = collect(&arc, &Affine::IDENTITY, 0.001).len();
        let coarse = collect(&arc, &Affine::IDENTITY, 1.0).len();
        assert!(coarse < fine);
        // Shrinking the drawing needs fewer points for the same device tolerance.
        let small = collect(&arc, &Affine::scale(0.01), 0.001).len();
        assert!(small < fine);
    }

    #[test]
    fn flatten_rejects_bad_tolerance() {
        let arc = BulgeArc::new((0.0, 0.0), (1.0, 0.0), 1.0);
        let mut called = false;
        assert_eq!(
            arc.flatten(0.0, |_, _| called = true),
            Err(Error::InvalidTolerance(0.0))
        );
        assert!(!called);
        assert!(arc.flatten(f64::NAN, |_, _| {}).is_err());
    }

    #[test]
    fn flatten_depth_limit() {
        // Radius 1e6: after 24 halvings a span still has a sagitta of ~4e-9.
        let arc = BulgeArc::new((0.0, 0.0), (2e6, 0.0), 1.0);
        let too_deep = Err(Error::DepthLimit(MAX_DEPTH));
        assert_eq!(arc.flatten(1e-9, |_, _| {}), too_deep);
        let skew = Affine::scale_non_uniform(1.0, 2.0);
        assert_eq!(arc.flatten_with(&skew, 1e-9, |_, _| {}), too_deep);
        assert!(arc.flatten(1.0, |_, _| {}).is_ok());
    }

    #[test]
    fn semicircle_to_cubics() {
        let arc = BulgeArc::new((0.0, 0.0), (10.0, 0.0), 1.0);
        let cubics = arc.to_cubic_beziers();
        assert_eq!(cubics.len(), 2);
        assert_eq!(cubics[0].p0, arc.p0);
        assert_eq!(cubics[0].p3, cubics[1].p0);
        assert_eq!(cubics[1].p3, arc.p1);
        let center = Point::new(5.0, 0.0);
        for c in &cubics {
            for i in 0..=100 {
                let p = c.eval(i as f64 / 100.0);
                assert!((p.distance(center) - 5.0).abs() < 2e-3);
                assert!(p.y <= 1e-12);
            }
        }
        let nearly_full = BulgeArc::new((0.0, 0.0), (0.1, 0.0), 200.0);
        assert_eq!(nearly_full.to_cubic_beziers().len(), 4);
        let small = BulgeArc::new((0.0, 0.0), (1.0, 0.0), 0.2);
        assert_eq!(small.to_cubic_beziers().len(), 1);
    }
}
