// Copyright 2026 the Arcwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lines.

use crate::{Point, Rect, Transform};

/// A single line.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    /// The line's start point.
    pub p0: Point,
    /// The line's end point.
    pub p1: Point,
}

impl Line {
    /// Create a new line.
    #[inline(always)]
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Line {
        Line {
            p0: p0.into(),
            p1: p1.into(),
        }
    }

    /// Returns a copy of this `Line` with the end points swapped so that it
    /// points in the opposite direction.
    #[must_use]
    #[inline(always)]
    pub fn reversed(&self) -> Line {
        Self {
            p0: self.p1,
            p1: self.p0,
        }
    }

    /// The length of the line.
    #[inline]
    pub fn length(self) -> f64 {
        self.p0.distance(self.p1)
    }

    /// The point at parameter `t`, where `0` is the start and `1` the end.
    #[inline]
    pub fn eval(&self, t: f64) -> Point {
        self.p0.lerp(self.p1, t)
    }

    /// The smallest rectangle enclosing the line.
    #[inline]
    pub fn bounding_box(&self) -> Rect {
        Rect::from_points(self.p0, self.p1)
    }

    /// Emit the line as a polyline: the start point as a move, then the end.
    ///
    /// A line is already flat, so no tolerance is involved.
    pub fn flatten(&self, sink: impl FnMut(Point, bool)) {
        self.flatten_with(&crate::Affine::IDENTITY, sink);
    }

    /// Emit the line as a polyline in the device space of `transform`.
    pub fn flatten_with(&self, transform: &impl Transform, mut sink: impl FnMut(Point, bool)) {
        sink(transform.transform_point(self.p0), true);
        sink(transform.transform_point(self.p1), false);
    }
}
