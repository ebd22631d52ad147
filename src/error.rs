// Copyright 2026 the Arcwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for the fallible numeric and flattening operations.

use thiserror::Error;

/// An error produced when an iterative or adaptive algorithm cannot finish.
///
/// Ordinary "nothing found" outcomes, such as a polynomial with no real
/// roots, are not errors; they are reported as empty results.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Error {
    /// A tolerance that is not strictly positive and finite.
    #[error("tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),
    /// Adaptive subdivision went deeper than the given cap.
    #[error("subdivision exceeded the maximum depth of {0}")]
    DepthLimit(usize),
    /// Root isolation processed more than the given number of intervals.
    #[error("root isolation exceeded {0} iterations")]
    IterationLimit(usize),
    /// Adaptive integration did not converge within the given number of refinements.
    #[error("integration did not converge after {0} refinements")]
    NoConvergence(usize),
}
