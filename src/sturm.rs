// Copyright 2026 the Arcwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Real-root isolation with Sturm sequences.

use alloc::vec;
use alloc::vec::Vec;

use log::debug;

use crate::common::{next_up, DEFAULT_ZERO_TOLERANCE};
use crate::numeric::{brent, find_max, find_min};
use crate::{Error, Poly};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// Remainders with no coefficient above this (relative to unit-magnitude
/// chain members) end the chain.
const REMAINDER_EPSILON: f64 = 1e-10;

/// Chain values below this magnitude count as zero when counting signs.
const SIGN_EPSILON: f64 = 1e-12;

/// Fraction used to split an interval whose midpoint is (nearly) a root.
const OFF_CENTER_SPLIT: f64 = 0.3819660112501051;

/// The Sturm sequence of a polynomial.
///
/// The chain starts with `p₀ = f` and `p₁ = f'`, and continues with
/// `pᵢ = -(pᵢ₋₂ mod pᵢ₋₁)` until the remainder vanishes. The number of sign
/// changes along the chain at `a`, minus the number at `b`, is the number of
/// distinct real roots of `f` in `(a, b]`.
///
/// Each member is scaled by a positive factor so that its largest
/// coefficient has magnitude one. Positive scaling does not change any sign,
/// and it keeps the long divisions well conditioned.
#[derive(Clone, Debug)]
pub struct SturmChain {
    polys: Vec<Poly>,
}

impl SturmChain {
    /// Hard cap on the number of intervals [`SturmChain::find_roots`] examines.
    pub const MAX_ITERATIONS: usize = 10_000;

    /// Build the chain for `p`.
    pub fn new(p: &Poly) -> SturmChain {
        let mut polys = vec![unit_magnitude(&p.trimmed(0.0))];
        if polys[0].degree() > 0 {
            polys.push(unit_magnitude(&polys[0].deriv().trimmed(0.0)));
        }
        loop {
            let n = polys.len();
            if n < 2 || polys[n - 1].degree() == 0 {
                break;
            }
            let rem = -(&polys[n - 2] % &polys[n - 1]);
            if rem.magnitude() <= REMAINDER_EPSILON {
                break;
            }
            polys.push(unit_magnitude(&rem.trimmed(REMAINDER_EPSILON)));
        }
        SturmChain { polys }
    }

    /// The members of the chain, starting with the (scaled) polynomial itself.
    pub fn polys(&self) -> &[Poly] {
        &self.polys
    }

    /// The number of sign changes along the chain evaluated at `x`.
    ///
    /// Values within a small epsilon of zero are treated as zero and skipped,
    /// so the previous nonzero sign carries across them.
    pub fn sign_changes(&self, x: f64) -> usize {
        let mut count = 0;
        let mut last_positive = None;
        for p in &self.polys {
            let v = p.eval(x);
            if v.abs() < SIGN_EPSILON || v.is_nan() {
                continue;
            }
            let positive = v > 0.0;
            if last_positive.is_some_and(|last| last != positive) {
                count += 1;
            }
            last_positive = Some(positive);
        }
        count
    }

    /// The number of distinct real roots in `(min, max]`.
    pub fn roots_in_range(&self, min: f64, max: f64) -> usize {
        self.sign_changes(min).abs_diff(self.sign_changes(max))
    }

    /// Find the real roots in `(min, max]`, in increasing order.
    ///
    /// The interval is bisected until each piece holds a single root. A
    /// piece whose endpoints bracket a sign change is finished with Brent's
    /// method; a piece where the function touches zero without crossing (an
    /// even-multiplicity root) is finished with a golden-section search for
    /// the extremum.
    ///
    /// Roots closer together than `tol` cannot be separated; such clusters
    /// are dropped rather than bisected further. More than
    /// [`SturmChain::MAX_ITERATIONS`] pieces gives
    /// [`Error::IterationLimit`].
    pub fn find_roots(&self, min: f64, max: f64, tol: f64) -> Result<Vec<f64>, Error> {
        self.find_roots_capped(min, max, tol, Self::MAX_ITERATIONS)
    }

    fn find_roots_capped(
        &self,
        min: f64,
        max: f64,
        tol: f64,
        max_iterations: usize,
    ) -> Result<Vec<f64>, Error> {
        let p = &self.polys[0];
        let f = |x: f64| p.eval(x);
        let mut roots = Vec::new();
        let mut stack = vec![(min, max, self.sign_changes(min), self.sign_changes(max))];
        let mut iterations = 0;
        while let Some((a, b, sa, sb)) = stack.pop() {
            iterations += 1;
            if iterations > max_iterations {
                debug!("sturm: gave up after {max_iterations} intervals");
                return Err(Error::IterationLimit(max_iterations));
            }
            match sa.abs_diff(sb) {
                0 => {}
                1 => {
                    // `a` itself is outside the counted range.
                    let a = if f(a) == 0.0 { next_up(a) } else { a };
                    let fa = f(a);
                    let fb = f(b);
                    if fa * fb <= 0.0 {
                        roots.extend(brent(f, a, b, tol, DEFAULT_ZERO_TOLERANCE));
                    } else if fa > 0.0 {
                        roots.push(find_min(f, a, b, tol));
                    } else {
                        roots.push(find_max(f, a, b, tol));
                    }
                }
                n => {
                    if b - a < tol {
                        debug!("sturm: {n} roots in [{a}, {b}] are too close to separate");
                        continue;
                    }
                    let mut mid = 0.5 * (a + b);
                    if f(mid).abs() < SIGN_EPSILON {
                        // Keep roots off the split so each lands in one half.
                        mid = a + (b - a) * OFF_CENTER_SPLIT;
                    }
                    let sm = self.sign_changes(mid);
                    stack.push((mid, b, sm, sb));
                    stack.push((a, mid, sa, sm));
                }
            }
        }
        roots.sort_unstable_by(f64::total_cmp);
        Ok(roots)
    }
}

fn unit_magnitude(p: &Poly) -> Poly {
    let m = p.magnitude();
    if m == 0.0 {
        p.clone()
    } else {
        p * m.recip()
    }
}
