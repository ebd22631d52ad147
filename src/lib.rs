// Copyright 2026 the Arcwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Numerics and 2D curve geometry for drafting applications.
//!
//! The arcwise library contains the computational core needed to represent,
//! transform and render the curves found in CAD-style drawings: lines,
//! bulge-encoded circular arcs, elliptic arcs and cubic Béziers. It also
//! contains the numerical machinery those curves lean on: closed-form
//! polynomial solvers up to quartic degree, Sturm chains for real-root
//! isolation, Brent's method, golden-section search and adaptive Simpson
//! integration.
//!
//! # Examples
//!
//! Solving a polynomial:
//! ```
//! use arcwise::Poly;
//!
//! // x² - 1
//! let p = Poly::new([-1.0, 0.0, 1.0]);
//! let roots = p.find_roots();
//! assert_eq!(roots.len(), 2);
//! assert!((roots[0] + 1.0).abs() < 1e-12);
//! assert!((roots[1] - 1.0).abs() < 1e-12);
//! ```
//!
//! Flattening a bulge arc for display:
//!
//! ```
//! use arcwise::{BulgeArc, Point};
//!
//! // A half circle of radius 5 centered at (5, 0).
//! let arc = BulgeArc::new((0.0, 0.0), (10.0, 0.0), 1.0);
//! let mut polyline = Vec::new();
//! arc.flatten(0.01, |p, move_to| polyline.push((p, move_to))).unwrap();
//! assert!(polyline[0].1);
//! for (p, _) in &polyline {
//!     assert!((p.distance(Point::new(5.0, 0.0)) - 5.0).abs() < 0.01);
//! }
//! ```
//!
//! # Feature Flags
//!
//! - `std` (enabled by default): Get floating point functions from the standard library.
//! - `libm`: Use floating point implementations from [libm][].
//!   This is useful for `no_std` environments.
//! - `mint`: Enable `From`/`Into` conversion of arcwise and [mint][] types.
//! - `serde`: Implement `serde::Deserialize` and `serde::Serialize` on value types.
//! - `schemars`: Add support for using arcwise types in JSON schemas using [schemars][].
//!
//! At least one of `std` and `libm` is required; `std` overrides `libm`.
//! The crate requires an allocator (it uses [alloc]).
//!
//! [libm]: https://docs.rs/libm
//! [mint]: https://docs.rs/mint
//! [schemars]: https://docs.rs/schemars

// LINEBENDER LINT SET - lib.rs - v1
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]
#![allow(
    clippy::unreadable_literal,
    clippy::many_single_char_names,
    clippy::excessive_precision,
    clippy::bool_to_int_with_if
)]
#![allow(
    missing_debug_implementations,
    elided_lifetimes_in_paths,
    single_use_lifetimes,
    trivial_numeric_casts,
    unnameable_types,
    clippy::use_self,
    clippy::return_self_not_must_use,
    clippy::cast_possible_truncation,
    clippy::wildcard_imports,
    clippy::shadow_unrelated,
    clippy::missing_assert_message,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::exhaustive_enums,
    clippy::match_same_arms,
    clippy::partial_pub_fields,
    clippy::unseparated_literal_suffix,
    clippy::duplicated_attributes,
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason
)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("arcwise requires either the `std` or `libm` feature");

// Suppress the unused_crate_dependencies lint when both std and libm are specified.
#[cfg(all(feature = "std", feature = "libm"))]
use libm as _;

// Only used by the benchmarks.
#[cfg(test)]
use criterion as _;

extern crate alloc;

mod affine;
mod arc;
pub mod common;
mod cubicbez;
mod ellipse;
mod error;
pub mod flatten;
mod line;
mod matrix;
pub mod numeric;
mod path;
mod point;
mod poly;
mod rect;
mod sturm;
mod vec2;

pub use crate::affine::{Affine, Transform};
pub use crate::arc::{ArcParams, BulgeArc};
pub use crate::cubicbez::{CubicBez, MAX_EXTREMA};
pub use crate::ellipse::{transform_central_ellipse, Ellipse, EllipticArc, TransformedEllipse};
pub use crate::error::Error;
pub use crate::line::Line;
pub use crate::matrix::Matrix;
pub use crate::path::{Path, PathEl, PathSeg, SegmentVisitor, Segments};
pub use crate::point::Point;
pub use crate::poly::{Poly, RootOptions};
pub use crate::rect::Rect;
pub use crate::sturm::SturmChain;
pub use crate::vec2::Vec2;
