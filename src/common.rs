// Copyright 2026 the Arcwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Common mathematical operations.
//!
//! This module holds the scalar helpers shared by the rest of the crate:
//! angle normalization, tolerant comparisons, IEEE neighbor stepping and the
//! closed-form solvers for polynomials up to degree four.

use core::f64::consts::{PI, TAU};

use arrayvec::ArrayVec;

/// Defines a trait that chooses between libstd or libm implementations of float methods.
macro_rules! define_float_funcs {
    ($(
        fn $name:ident(self $(,$arg:ident: $arg_ty:ty)*) -> $ret:ty
        => $lname:ident;
    )+) => {
        #[cfg(not(feature = "std"))]
        pub(crate) trait FloatFuncs : Sized {
            /// Special implementation for signum, because libm doesn't have it.
            fn signum(self) -> Self;

            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret;)+
        }

        #[cfg(not(feature = "std"))]
        impl FloatFuncs for f64 {
            #[inline]
            fn signum(self) -> f64 {
                if self.is_nan() {
                    f64::NAN
                } else {
                    1.0_f64.copysign(self)
                }
            }

            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret {
                #[cfg(feature = "libm")]
                return libm::$lname(self $(,$arg as _)*);

                #[cfg(not(feature = "libm"))]
                compile_error!("arcwise requires either the `std` or `libm` feature")
            })+
        }
    }
}

define_float_funcs! {
    fn abs(self) -> Self => fabs;
    fn acos(self) -> Self => acos;
    fn atan(self) -> Self => atan;
    fn atan2(self, other: Self) -> Self => atan2;
    fn cbrt(self) -> Self => cbrt;
    fn ceil(self) -> Self => ceil;
    fn copysign(self, sign: Self) -> Self => copysign;
    fn cos(self) -> Self => cos;
    fn floor(self) -> Self => floor;
    fn hypot(self, other: Self) -> Self => hypot;
    fn powi(self, n: i32) -> Self => pow;
    fn round(self) -> Self => round;
    fn sin(self) -> Self => sin;
    fn sin_cos(self) -> (Self, Self) => sincos;
    fn sqrt(self) -> Self => sqrt;
    fn tan(self) -> Self => tan;
}

/// The zero tolerance used by the convenience entry points.
pub const DEFAULT_ZERO_TOLERANCE: f64 = 1e-12;

/// Wrap an angle (in radians) into `[0, 2π)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle % TAU;
    let a = if a < 0.0 { a + TAU } else { a };
    // Adding 2π to a tiny negative remainder can round up to 2π itself.
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Is `angle` inside the sweep that starts at `start` and turns by `sweep`?
///
/// The sign of `sweep` gives the winding: positive sweeps turn
/// anti-clockwise (in a y-up frame), negative sweeps clockwise. Both ends are
/// inclusive, and a sweep of a full turn or more contains every angle.
pub fn angle_in_sweep(angle: f64, start: f64, sweep: f64) -> bool {
    if sweep.abs() >= TAU {
        return true;
    }
    let offset = if sweep >= 0.0 {
        normalize_angle(angle - start)
    } else {
        normalize_angle(start - angle)
    };
    offset <= sweep.abs()
}

/// Clamp `x` to the interval spanned by `min` and `max`.
///
/// Unlike [`f64::clamp`], the bounds may be given in either order and the
/// function never panics. NaN inputs for `x` are passed through.
pub fn clamp(x: f64, min: f64, max: f64) -> f64 {
    let (lo, hi) = sort2(min, max);
    if x < lo {
        lo
    } else if x > hi {
        hi
    } else {
        x
    }
}

/// Return the two values in increasing order.
#[inline]
pub fn sort2(a: f64, b: f64) -> (f64, f64) {
    if b < a {
        (b, a)
    } else {
        (a, b)
    }
}

/// The smallest double strictly greater than `x`.
///
/// NaN and positive infinity are returned unchanged; both zeros step to the
/// smallest positive subnormal.
pub fn next_up(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

/// The largest double strictly less than `x`.
pub fn next_down(x: f64) -> f64 {
    -next_up(-x)
}

/// If we're comparing numbers, our epsilon should depend on how big the number
/// is. This function returns an epsilon appropriate for the size of `num`.
pub fn epsilon_for_value(num: f64) -> f64 {
    (num.abs() * 1e-10).max(f64::EPSILON)
}

/// Compare two values for approximate equality, widening the epsilon by `scale`.
pub fn real_is_approx(num1: f64, num2: f64, scale: f64) -> bool {
    if num1.is_infinite() || num2.is_infinite() {
        return num1 == num2;
    }
    (num1 - num2).abs() <= scale * epsilon_for_value(num1.abs().max(num2.abs()))
}

/// Compare two values for approximate equality.
pub fn real_is_equal(num1: f64, num2: f64) -> bool {
    real_is_approx(num1, num2, 1.0)
}

/// Is `num` approximately zero?
pub fn real_is_zero(num: f64) -> bool {
    real_is_equal(num, 0.0)
}

/// Solve `c0 + c1 x = 0`.
///
/// Returns `None` when the linear coefficient is zero or so small that the
/// root is not representable.
pub fn solve_linear(c0: f64, c1: f64) -> Option<f64> {
    let root = -c0 / c1;
    root.is_finite().then_some(root)
}

/// Find real roots of quadratic equation.
///
/// Return values of x for which c0 + c1 x + c2 x² = 0, in increasing order.
///
/// A discriminant within `zero_tol` of zero is treated as a double root and
/// reported once, which keeps near-tangent cases from flickering between zero
/// and two roots. If the equation is nearly linear, it will return the root
/// ignoring the quadratic term. In the degenerate case where all coefficients
/// are zero, a single `0.0` is returned.
pub fn solve_quadratic(c0: f64, c1: f64, c2: f64, zero_tol: f64) -> ArrayVec<f64, 2> {
    let mut result = ArrayVec::new();
    let sc0 = c0 * c2.recip();
    let sc1 = c1 * c2.recip();
    if !sc0.is_finite() || !sc1.is_finite() {
        // c2 is zero or very small, treat as linear eqn
        if let Some(root) = solve_linear(c0, c1) {
            result.push(root);
        } else if c0 == 0.0 && c1 == 0.0 {
            result.push(0.0);
        }
        return result;
    }
    let disc = sc1 * sc1 - 4.0 * sc0;
    let root1 = if !disc.is_finite() {
        // Likely, calculation of sc1 * sc1 overflowed. Find one root
        // using sc1 x + x² = 0, other root as sc0 / root1.
        -sc1
    } else if disc < -zero_tol {
        return result;
    } else if disc <= zero_tol {
        result.push(-0.5 * sc1);
        return result;
    } else {
        // See https://math.stackexchange.com/questions/866331
        -0.5 * (sc1 + disc.sqrt().copysign(sc1))
    };
    let root2 = sc0 / root1;
    if root2.is_finite() {
        let (lo, hi) = sort2(root1, root2);
        result.push(lo);
        result.push(hi);
    } else {
        result.push(root1);
    }
    result
}

/// Find real roots of cubic equation, using Cardano's formula.
///
/// Return values of x for which c0 + c1 x + c2 x² + c3 x³ = 0, in increasing
/// order. The equation is depressed with `x = y - c2 / (3 c3)` into
/// `y³ + p y + q = 0`, and the sign of the discriminant
/// `D = (q/2)² + (p/3)³` picks the branch: a triple root, a simple root plus
/// a double root (`|D|` within `zero_tol` relative to the larger of its two
/// terms), three real roots in trigonometric form (`D < 0`), or one real root
/// from the sum of two cube roots.
///
/// If `c3` is zero or so small that normalizing by it overflows, the
/// quadratic solver is used instead.
pub fn solve_cubic(c0: f64, c1: f64, c2: f64, c3: f64, zero_tol: f64) -> ArrayVec<f64, 3> {
    let mut result = ArrayVec::new();
    let c3_recip = c3.recip();
    let a = c2 * c3_recip;
    let b = c1 * c3_recip;
    let c = c0 * c3_recip;
    if !(a.is_finite() && b.is_finite() && c.is_finite()) {
        // cubic coefficient is zero or nearly so.
        for root in solve_quadratic(c0, c1, c2, zero_tol) {
            result.push(root);
        }
        return result;
    }
    const ONETHIRD: f64 = 1. / 3.;
    let shift = -a * ONETHIRD;
    let p = b - a * a * ONETHIRD;
    let q = (2.0 * a * a * a - 9.0 * a * b) * (1.0 / 27.0) + c;
    let half_q = 0.5 * q;
    let third_p = p * ONETHIRD;
    let d = half_q * half_q + third_p * third_p * third_p;
    // D scales with the sixth power of the root spacing.
    let d_scale = (half_q * half_q).max((third_p * third_p * third_p).abs());
    if p.abs() <= zero_tol && q.abs() <= zero_tol {
        result.push(shift);
    } else if d.abs() <= zero_tol * d_scale {
        let u = (-half_q).cbrt();
        let (lo, hi) = sort2(2.0 * u + shift, -u + shift);
        result.push(lo);
        result.push(hi);
    } else if d < 0.0 {
        // p < 0 here, so the radicand is positive.
        let r = (-third_p).sqrt();
        let phi = clamp(-half_q / (r * r * r), -1.0, 1.0).acos() * ONETHIRD;
        let t = 2.0 * r;
        for k in 0..3 {
            let angle = phi - f64::from(k) * (2.0 * PI * ONETHIRD);
            result.push(t * angle.cos() + shift);
        }
        result.sort_unstable_by(f64::total_cmp);
    } else {
        let sq = d.sqrt();
        let y = (-half_q + sq).cbrt() + (-half_q - sq).cbrt();
        result.push(y + shift);
    }
    result
}

/// Find real roots of quartic equation, using Ferrari's method.
///
/// Return values of x for which c0 + c1 x + c2 x² + c3 x³ + c4 x⁴ = 0, in
/// increasing order, with repeated roots reported once.
///
/// The equation is depressed with `x = y - c3 / (4 c4)` into
/// `y⁴ + p y² + q y + r = 0`. When `r` vanishes the quartic factors as
/// `y (y³ + p y + q)`; when `q` vanishes it is a quadratic in `y²`.
/// Otherwise a positive root `m` of the resolvent cubic
/// `8m³ + 8p m² + (2p² - 8r) m - q² = 0` splits it into two quadratics.
/// Quadratic discriminants within `zero_tol` of zero count as double roots;
/// clearly negative ones contribute a complex pair and no roots.
///
/// If `c4` is zero or so small that normalizing by it overflows, the cubic
/// solver is used instead.
pub fn solve_quartic(
    c0: f64,
    c1: f64,
    c2: f64,
    c3: f64,
    c4: f64,
    zero_tol: f64,
) -> ArrayVec<f64, 4> {
    let mut result = ArrayVec::new();
    let c4_recip = c4.recip();
    let a = c3 * c4_recip;
    let b = c2 * c4_recip;
    let c = c1 * c4_recip;
    let d = c0 * c4_recip;
    if !(a.is_finite() && b.is_finite() && c.is_finite() && d.is_finite()) {
        for root in solve_cubic(c0, c1, c2, c3, zero_tol) {
            result.push(root);
        }
        return result;
    }
    let shift = -0.25 * a;
    let a2 = a * a;
    let p = b - 0.375 * a2;
    let q = 0.125 * a2 * a - 0.5 * a * b + c;
    let r = (-3.0 / 256.0) * a2 * a2 + 0.0625 * a2 * b - 0.25 * a * c + d;
    if r.abs() <= zero_tol {
        push_distinct(&mut result, shift, zero_tol);
        for y in solve_cubic(q, p, 0.0, 1.0, zero_tol) {
            push_distinct(&mut result, y + shift, zero_tol);
        }
    } else if q.abs() <= zero_tol {
        for z in solve_quadratic(r, p, 1.0, zero_tol) {
            if z < -zero_tol {
                continue;
            }
            let y = z.max(0.0).sqrt();
            push_distinct(&mut result, y + shift, zero_tol);
            push_distinct(&mut result, -y + shift, zero_tol);
        }
    } else {
        let resolvent = solve_cubic(-q * q, 2.0 * p * p - 8.0 * r, 8.0 * p, 8.0, zero_tol);
        let m = match resolvent.last() {
            Some(&m) if m > 0.0 => m,
            _ => return result,
        };
        let s = (2.0 * m).sqrt();
        let base = 0.5 * p + m;
        let k = q / (2.0 * s);
        for y in solve_quadratic(base + k, -s, 1.0, zero_tol) {
            push_distinct(&mut result, y + shift, zero_tol);
        }
        for y in solve_quadratic(base - k, s, 1.0, zero_tol) {
            push_distinct(&mut result, y + shift, zero_tol);
        }
    }
    result.sort_unstable_by(f64::total_cmp);
    result
}

fn push_distinct<const N: usize>(roots: &mut ArrayVec<f64, N>, root: f64, zero_tol: f64) {
    if roots.iter().all(|&r| (r - root).abs() > zero_tol) {
        roots.push(root);
    }
}
