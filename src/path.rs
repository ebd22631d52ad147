// Copyright 2026 the Arcwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paths made of lines, bulge arcs and cubic Béziers.

use alloc::vec::Vec;
use core::slice;

use crate::flatten::check_tolerance;
use crate::{Affine, BulgeArc, CubicBez, Error, Line, Point, Rect, Transform};

/// A path that can contain lines, bulge arcs and cubic Bézier segments.
///
/// This is the polyline-with-bulges model of drafting formats, extended with
/// cubics. Each subpath starts with a [`PathEl::MoveTo`]; the segments that
/// follow are read from the end point of the element before them.
///
/// ```
/// use arcwise::{Path, PathSeg};
///
/// let mut path = Path::new();
/// path.move_to((0.0, 0.0));
/// path.line_to((10.0, 0.0));
/// path.arc_to((10.0, 10.0), 1.0);
/// path.close_path();
///
/// let segs: Vec<PathSeg> = path.segments().collect();
/// assert_eq!(segs.len(), 3);
/// ```
#[derive(Clone, Default, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path(Vec<PathEl>);

/// The element of a path.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathEl {
    /// Move directly to the point without drawing anything, starting a new
    /// subpath.
    MoveTo(Point),
    /// Draw a line from the current location to the point.
    LineTo(Point),
    /// Draw a circular arc with the given bulge from the current location to
    /// the point.
    ArcTo(Point, f64),
    /// Draw a cubic Bézier using the two control points and ending at the
    /// last point.
    CurveTo(Point, Point, Point),
    /// Close off the path with a line back to the start of the subpath.
    ClosePath,
}

/// A segment of a path.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathSeg {
    /// A line segment.
    Line(Line),
    /// A circular arc segment.
    Arc(BulgeArc),
    /// A cubic Bézier segment.
    Cubic(CubicBez),
}

/// Receives path segments by kind.
///
/// This lets a consumer handle lines, arcs and cubics separately without
/// matching on [`PathSeg`] itself.
pub trait SegmentVisitor {
    /// Visit a line segment.
    fn line(&mut self, line: &Line);

    /// Visit a bulge arc segment.
    fn arc(&mut self, arc: &BulgeArc);

    /// Visit a cubic Bézier segment.
    fn cubic(&mut self, cubic: &CubicBez);
}

impl Path {
    /// Create a new path.
    pub fn new() -> Path {
        Path::default()
    }

    /// Create a path from a vector of path elements.
    pub fn from_vec(v: Vec<PathEl>) -> Path {
        Path(v)
    }

    /// Push a generic path element onto the path.
    pub fn push(&mut self, el: PathEl) {
        self.0.push(el);
    }

    /// Push a "move to" element onto the path.
    pub fn move_to<P: Into<Point>>(&mut self, p: P) {
        self.push(PathEl::MoveTo(p.into()));
    }

    /// Push a "line to" element onto the path.
    pub fn line_to<P: Into<Point>>(&mut self, p: P) {
        self.push(PathEl::LineTo(p.into()));
    }

    /// Push an "arc to" element onto the path.
    pub fn arc_to<P: Into<Point>>(&mut self, p: P, bulge: f64) {
        self.push(PathEl::ArcTo(p.into(), bulge));
    }

    /// Push a "curve to" element onto the path.
    pub fn curve_to<P: Into<Point>>(&mut self, p1: P, p2: P, p3: P) {
        self.push(PathEl::CurveTo(p1.into(), p2.into(), p3.into()));
    }

    /// Push a "close path" element onto the path.
    pub fn close_path(&mut self) {
        self.push(PathEl::ClosePath);
    }

    /// Get the path elements.
    pub fn elements(&self) -> &[PathEl] {
        &self.0
    }

    /// Is this path empty?
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the path segments.
    ///
    /// A [`PathEl::ClosePath`] yields a closing line unless the subpath
    /// already ends at its start.
    ///
    /// # Panics
    ///
    /// Panics if the path is not empty and does not start with a
    /// [`PathEl::MoveTo`].
    pub fn segments(&self) -> Segments<'_> {
        let first = match self.0.first() {
            Some(PathEl::MoveTo(p)) => *p,
            Some(_) => panic!("first element has to be a PathEl::MoveTo"),
            None => Point::ZERO,
        };
        Segments {
            c: self.0.iter(),
            start: first,
            last: first,
            new_subpath: true,
        }
    }

    /// Hand each segment to the visitor method for its kind, in order.
    pub fn visit_segments(&self, visitor: &mut impl SegmentVisitor) {
        for seg in self.segments() {
            seg.visit(visitor);
        }
    }

    /// The smallest rectangle enclosing every segment, or `None` if the path
    /// draws nothing.
    pub fn bounding_box(&self) -> Option<Rect> {
        self.segments()
            .map(|seg| seg.bounding_box())
            .reduce(|a, b| a.union(b))
    }

    /// Flatten the path into polylines within `tolerance`.
    ///
    /// The first point of each subpath is emitted as a move; consecutive
    /// segments of a subpath share their joining point, which is emitted once.
    pub fn flatten(&self, tolerance: f64, sink: impl FnMut(Point, bool)) -> Result<(), Error> {
        self.flatten_with(&Affine::IDENTITY, tolerance, sink)
    }

    /// Flatten the path as drawn through `transform`, with `tolerance`
    /// measured in device space.
    pub fn flatten_with(
        &self,
        transform: &impl Transform,
        tolerance: f64,
        mut sink: impl FnMut(Point, bool),
    ) -> Result<(), Error> {
        check_tolerance(tolerance)?;
        let mut segments = self.segments();
        while let Some((seg, new_subpath)) = segments.next_with_subpath() {
            let mut first = true;
            seg.flatten_with(transform, tolerance, |p, _| {
                if first {
                    first = false;
                    if new_subpath {
                        sink(p, true);
                    }
                } else {
                    sink(p, false);
                }
            })?;
        }
        Ok(())
    }
}

impl FromIterator<PathEl> for Path {
    fn from_iter<T: IntoIterator<Item = PathEl>>(iter: T) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl PathSeg {
    /// The start point of the segment.
    pub fn start(&self) -> Point {
        match self {
            PathSeg::Line(line) => line.p0,
            PathSeg::Arc(arc) => arc.p0,
            PathSeg::Cubic(cubic) => cubic.p0,
        }
    }

    /// The end point of the segment.
    pub fn end(&self) -> Point {
        match self {
            PathSeg::Line(line) => line.p1,
            PathSeg::Arc(arc) => arc.p1,
            PathSeg::Cubic(cubic) => cubic.p3,
        }
    }

    /// The smallest rectangle enclosing the segment.
    pub fn bounding_box(&self) -> Rect {
        match self {
            PathSeg::Line(line) => line.bounding_box(),
            PathSeg::Arc(arc) => arc.bounding_box(),
            PathSeg::Cubic(cubic) => cubic.bounding_box(),
        }
    }

    /// Hand the segment to the visitor method for its kind.
    pub fn visit(&self, visitor: &mut impl SegmentVisitor) {
        match self {
            PathSeg::Line(line) => visitor.line(line),
            PathSeg::Arc(arc) => visitor.arc(arc),
            PathSeg::Cubic(cubic) => visitor.cubic(cubic),
        }
    }

    /// Flatten the segment as drawn through `transform`.
    pub fn flatten_with(
        &self,
        transform: &impl Transform,
        tolerance: f64,
        sink: impl FnMut(Point, bool),
    ) -> Result<(), Error> {
        match self {
            PathSeg::Line(line) => {
                check_tolerance(tolerance)?;
                line.flatten_with(transform, sink);
                Ok(())
            }
            PathSeg::Arc(arc) => arc.flatten_with(transform, tolerance, sink),
            PathSeg::Cubic(cubic) => cubic.flatten_with(transform, tolerance, sink),
        }
    }
}

/// An iterator over the segments of a [`Path`].
///
/// Created by [`Path::segments`].
#[derive(Clone, Debug)]
pub struct Segments<'a> {
    c: slice::Iter<'a, PathEl>,
    start: Point,
    last: Point,
    new_subpath: bool,
}

impl Segments<'_> {
    /// The next segment, and whether it is the first of its subpath.
    fn next_with_subpath(&mut self) -> Option<(PathSeg, bool)> {
        for el in &mut self.c {
            let (seg, last) = match *el {
                PathEl::MoveTo(p) => {
                    self.start = p;
                    self.last = p;
                    self.new_subpath = true;
                    continue;
                }
                PathEl::LineTo(p) => (PathSeg::Line(Line::new(self.last, p)), p),
                PathEl::ArcTo(p, bulge) => (PathSeg::Arc(BulgeArc::new(self.last, p, bulge)), p),
                PathEl::CurveTo(p1, p2, p3) => {
                    (PathSeg::Cubic(CubicBez::new(self.last, p1, p2, p3)), p3)
                }
                PathEl::ClosePath => {
                    if self.last != self.start {
                        (PathSeg::Line(Line::new(self.last, self.start)), self.start)
                    } else {
                        continue;
                    }
                }
            };
            let new_subpath = self.new_subpath;
            self.last = last;
            self.new_subpath = false;
            return Some((seg, new_subpath));
        }
        None
    }
}

impl Iterator for Segments<'_> {
    type Item = PathSeg;

    fn next(&mut self) -> Option<PathSeg> {
        self.next_with_subpath().map(|(seg, _)| seg)
    }
}
