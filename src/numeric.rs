// Copyright 2026 the Arcwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Numerical methods on opaque scalar functions.
//!
//! These routines know nothing about polynomials or curves; they take any
//! `FnMut(f64) -> f64` and are used by the polynomial root finders and by
//! callers that need to solve or integrate curve-derived quantities.

use log::{debug, warn};

use crate::common::sort2;
use crate::Error;

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// Maximum number of steps taken by [`brent`].
pub const BRENT_MAX_ITERATIONS: usize = 1000;

/// Maximum number of interval reductions taken by [`find_min`] and [`find_max`].
pub const GOLDEN_MAX_ITERATIONS: usize = 1000;

/// Hard cap on the number of refinements taken by [`integrate`].
///
/// Refinement `j` samples the integrand `2^(j - 2)` times, so this bounds the
/// total work regardless of the `max_iter` a caller asks for.
pub const MAX_REFINEMENTS: usize = 24;

/// Find a root of `f` in `[xmin, xmax]` using [Brent's method].
///
/// Each step takes an inverse quadratic interpolation or secant step, and
/// falls back to bisection whenever the interpolated point lands outside
/// `[(3a + b) / 4, b]` or fails to shrink the bracket fast enough. The search
/// stops once the bracket is narrower than `tol` or the function is exactly
/// zero.
///
/// The endpoints should bracket a root, that is `f(xmin)` and `f(xmax)` should
/// not have the same sign. If they do, the endpoint with the smaller magnitude
/// is returned when that magnitude is within `zero_tol`, and `None`
/// otherwise. `None` is also returned if the iteration cap is reached with
/// `|f(b)|` still above `zero_tol`.
///
/// [Brent's method]: https://en.wikipedia.org/wiki/Brent%27s_method
pub fn brent(
    mut f: impl FnMut(f64) -> f64,
    xmin: f64,
    xmax: f64,
    tol: f64,
    zero_tol: f64,
) -> Option<f64> {
    let mut a = xmin;
    let mut b = xmax;
    let mut fa = f(a);
    let mut fb = f(b);
    if fa == 0.0 {
        return Some(a);
    }
    if fb == 0.0 {
        return Some(b);
    }
    if fa * fb > 0.0 {
        let (x, fx) = if fa.abs() < fb.abs() { (a, fa) } else { (b, fb) };
        debug!("brent: [{xmin}, {xmax}] does not bracket a root, |f| = {}", fx.abs());
        return (fx.abs() <= zero_tol).then_some(x);
    }
    if fa.abs() < fb.abs() {
        core::mem::swap(&mut a, &mut b);
        core::mem::swap(&mut fa, &mut fb);
    }
    let mut c = a;
    let mut fc = fa;
    let mut d = c;
    let mut bisected = true;
    for _ in 0..BRENT_MAX_ITERATIONS {
        if fb == 0.0 || (b - a).abs() < tol {
            return Some(b);
        }
        let mut s = if fa != fc && fb != fc {
            a * fb * fc / ((fa - fb) * (fa - fc))
                + b * fa * fc / ((fb - fa) * (fb - fc))
                + c * fa * fb / ((fc - fa) * (fc - fb))
        } else {
            b - fb * (b - a) / (fb - fa)
        };
        let (lo, hi) = sort2(0.25 * (3.0 * a + b), b);
        let reject = !(lo..=hi).contains(&s)
            || (bisected && (s - b).abs() >= 0.5 * (b - c).abs())
            || (!bisected && (s - b).abs() >= 0.5 * (c - d).abs())
            || (bisected && (b - c).abs() < tol)
            || (!bisected && (c - d).abs() < tol);
        if reject {
            s = 0.5 * (a + b);
        }
        bisected = reject;
        let fs = f(s);
        d = c;
        c = b;
        fc = fb;
        if fa * fs < 0.0 {
            b = s;
            fb = fs;
        } else {
            a = s;
            fa = fs;
        }
        if fa.abs() < fb.abs() {
            core::mem::swap(&mut a, &mut b);
            core::mem::swap(&mut fa, &mut fb);
        }
    }
    (fb.abs() <= zero_tol).then_some(b)
}

/// Find a minimum of `f` between `xa` and `xb` by golden-section search.
///
/// The function should be unimodal on the interval. The bracket shrinks by
/// the golden ratio each step until it is narrower than `tol` (or
/// [`GOLDEN_MAX_ITERATIONS`] steps have been taken), and its midpoint is
/// returned.
pub fn find_min(mut f: impl FnMut(f64) -> f64, xa: f64, xb: f64, tol: f64) -> f64 {
    // 1 - 1/φ
    const G: f64 = 0.3819660112501051;
    let (mut a, mut b) = sort2(xa, xb);
    let mut x1 = a + G * (b - a);
    let mut x2 = b - G * (b - a);
    let mut f1 = f(x1);
    let mut f2 = f(x2);
    for _ in 0..GOLDEN_MAX_ITERATIONS {
        if b - a < tol {
            break;
        }
        if f1 < f2 {
            b = x2;
            x2 = x1;
            f2 = f1;
            x1 = a + G * (b - a);
            f1 = f(x1);
        } else {
            a = x1;
            x1 = x2;
            f1 = f2;
            x2 = b - G * (b - a);
            f2 = f(x2);
        }
    }
    0.5 * (a + b)
}

/// Find a maximum of `f` between `xa` and `xb`.
///
/// See [`find_min`].
pub fn find_max(mut f: impl FnMut(f64) -> f64, xa: f64, xb: f64, tol: f64) -> f64 {
    find_min(|x| -f(x), xa, xb, tol)
}

/// Integrate `f` from `a` to `b` with Simpson's rule.
///
/// The trapezoid estimate is refined by doubling the number of interior
/// samples, and each pair of successive estimates is combined by Richardson
/// extrapolation into a Simpson estimate `(4 Sₙ - Sₙ₋₁) / 3`. The result is
/// accepted once `|s - s_old| < tol * |s_old|`, checked only after the fifth
/// refinement so that a lucky early agreement is not mistaken for
/// convergence.
///
/// At most `max_iter` refinements (further capped by [`MAX_REFINEMENTS`]) are
/// made. Running out of refinements means the integrand is not smooth enough
/// or the tolerance is out of reach, and is reported as
/// [`Error::NoConvergence`].
pub fn integrate(
    mut f: impl FnMut(f64) -> f64,
    a: f64,
    b: f64,
    max_iter: usize,
    tol: f64,
) -> Result<f64, Error> {
    let max_iter = max_iter.min(MAX_REFINEMENTS);
    let mut trapezoid = 0.0;
    let mut old_trapezoid = 0.0;
    let mut old_s = 0.0;
    for j in 1..=max_iter {
        trapezoid = refine_trapezoid(&mut f, a, b, j, trapezoid);
        let s = (4.0 * trapezoid - old_trapezoid) * (1.0 / 3.0);
        if j > 5 && ((s - old_s).abs() < tol * old_s.abs() || (s == 0.0 && old_s == 0.0)) {
            return Ok(s);
        }
        old_s = s;
        old_trapezoid = trapezoid;
    }
    warn!("integrate: no convergence on [{a}, {b}] after {max_iter} refinements");
    Err(Error::NoConvergence(max_iter))
}

/// Refinement `n` of the trapezoid rule, given refinement `n - 1` as `prev`.
fn refine_trapezoid(f: &mut impl FnMut(f64) -> f64, a: f64, b: f64, n: usize, prev: f64) -> f64 {
    if n == 1 {
        return 0.5 * (b - a) * (f(a) + f(b));
    }
    let count = 1_usize << (n - 2);
    let delta = (b - a) / count as f64;
    let mut x = a + 0.5 * delta;
    let mut sum = 0.0;
    for _ in 0..count {
        sum += f(x);
        x += delta;
    }
    0.5 * (prev + (b - a) * sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{PI, SQRT_2};

    #[test]
    fn brent_sqrt2() {
        let root = brent(|x| x * x - 2.0, 0.0, 2.0, 1e-9, 1e-9).unwrap();
        assert!((root - SQRT_2).abs() < 1e-8, "{root}");
    }

    #[test]
    fn brent_reversed_bracket() {
        let root = brent(|x| x * x * x - x - 1.0, 2.0, 1.0, 1e-12, 1e-12).unwrap();
        assert!((root * root * root - root - 1.0).abs() < 1e-10);
    }

    #[test]
    fn brent_exact_endpoint() {
        assert_eq!(brent(|x| x - 1.0, 1.0, 3.0, 1e-9, 0.0), Some(1.0));
        assert_eq!(brent(|x| x - 3.0, 1.0, 3.0, 1e-9, 0.0), Some(3.0));
    }

    #[test]
    fn brent_unbracketed() {
        assert_eq!(brent(|x| x * x + 1.0, -1.0, 2.0, 1e-9, 1e-9), None);
        // The smaller endpoint value is within the zero tolerance.
        let root = brent(|x| x * x + 1e-12, 0.0, 1.0, 1e-9, 1e-9);
        assert_eq!(root, Some(0.0));
    }

    #[test]
    fn brent_steep() {
        let root = brent(|x| x.powi(9) - 0.5, 0.0, 1.5, 1e-12, 1e-12).unwrap();
        assert!((root - 0.5f64.powf(1.0 / 9.0)).abs() < 1e-10);
    }

    #[test]
    fn golden_section() {
        let x = find_min(|x| (x - 3.0) * (x - 3.0), 0.0, 10.0, 1e-6);
        assert!((x - 3.0).abs() < 1e-5, "{x}");
        let x = find_max(|x| x.sin(), 0.0, PI, 1e-8);
        assert!((x - 0.5 * PI).abs() < 1e-6, "{x}");
        // Bounds in either order.
        let x = find_min(|x| (x + 1.0).abs(), 2.0, -4.0, 1e-9);
        assert!((x + 1.0).abs() < 1e-8, "{x}");
    }

    #[test]
    fn integrate_sin() {
        let area = integrate(f64::sin, 0.0, PI, 100, 1e-9).unwrap();
        assert!((area - 2.0).abs() < 1e-8, "{area}");
    }

    #[test]
    fn integrate_polynomial() {
        // Simpson's rule is exact for cubics.
        let area = integrate(|x| x * x * x - x, -1.0, 2.0, 20, 1e-12).unwrap();
        assert!((area - 2.25).abs() < 1e-12, "{area}");
        assert_eq!(integrate(|_| 0.0, 0.0, 1.0, 20, 1e-9), Ok(0.0));
    }

    #[test]
    fn integrate_gives_up() {
        assert_eq!(
            integrate(f64::sin, 0.0, PI, 5, 1e-9),
            Err(Error::NoConvergence(5))
        );
        // The refinement cap applies even when more iterations are requested.
        assert_eq!(
            integrate(|x| if x < 0.3 { 0.0 } else { 1.0 }, 0.0, 1.0, 1000, 0.0),
            Err(Error::NoConvergence(MAX_REFINEMENTS))
        );
    }
}
