// Copyright 2026 the Arcwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polynomials of dynamic degree.

use core::ops::{Add, Div, Mul, Neg, Rem, Sub};

use alloc::vec;
use alloc::vec::Vec;

use crate::common::{
    solve_cubic, solve_linear, solve_quadratic, solve_quartic, DEFAULT_ZERO_TOLERANCE,
};
use crate::numeric::brent;
use crate::SturmChain;

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// A polynomial with real coefficients.
///
/// A `Poly` always has at least one coefficient, so the constant term is
/// always present. All operations return new values; nothing mutates a
/// polynomial in place.
#[derive(Clone, Debug, PartialEq)]
pub struct Poly {
    /// Coefficients in increasing order of degree.
    ///
    /// For example, `coeffs[0]` is the constant term.
    coeffs: Vec<f64>,
}

/// Tuning knobs for [`Poly::find_roots_with`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootOptions {
    /// Skip the closed-form solvers and always use the numeric fallback.
    pub force_numeric: bool,
    /// Bracket width at which Brent's method stops.
    pub tolerance: f64,
    /// Magnitude below which values and coefficients count as zero.
    pub zero_tolerance: f64,
    /// Minimum spacing between successive roots found by the numeric fallback.
    ///
    /// A candidate root is kept only when it is strictly greater than the
    /// previously kept root plus this threshold. The default of zero merges
    /// exact duplicates only, which is what happens when a double root is
    /// reported from both sides of the critical point that touches zero.
    pub merge_threshold: f64,
}

impl Default for RootOptions {
    fn default() -> Self {
        RootOptions {
            force_numeric: false,
            tolerance: 1e-12,
            zero_tolerance: DEFAULT_ZERO_TOLERANCE,
            merge_threshold: 0.0,
        }
    }
}

impl Poly {
    /// Constructs a new polynomial from coefficients.
    ///
    /// The first coefficient provided will be the constant term, the second will
    /// be the linear term, and so on. An empty iterator gives the zero
    /// polynomial.
    pub fn new(coeffs: impl IntoIterator<Item = f64>) -> Self {
        let mut coeffs: Vec<f64> = coeffs.into_iter().collect();
        if coeffs.is_empty() {
            coeffs.push(0.0);
        }
        Poly { coeffs }
    }

    /// The constant polynomial `c`.
    pub fn constant(c: f64) -> Self {
        Poly { coeffs: vec![c] }
    }

    /// The zero polynomial.
    pub fn zero() -> Self {
        Poly::constant(0.0)
    }

    /// The constant polynomial `1`.
    pub fn one() -> Self {
        Poly::constant(1.0)
    }

    /// The coefficients of this polynomial.
    ///
    /// In the returned slice, the coefficient of `x^i` is at index `i`.
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    /// The degree of this polynomial.
    ///
    /// This function only looks at the *presence* of coefficients, not their
    /// value. Use [`Poly::trimmed`] first to drop vanishing leading terms.
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// The coefficient of the highest-degree term.
    pub fn leading(&self) -> f64 {
        self.coeffs[self.coeffs.len() - 1]
    }

    /// Evaluates this polynomial at a point, using Horner's scheme.
    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
    }

    /// Returns the polynomial that's the derivative of this polynomial.
    pub fn deriv(&self) -> Poly {
        if self.coeffs.len() == 1 {
            return Poly::zero();
        }
        let coeffs = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, c)| c * i as f64)
            .collect();
        Poly { coeffs }
    }

    /// Drop leading coefficients whose magnitude is at most `zero_tol`.
    ///
    /// The constant term is never dropped.
    pub fn trimmed(&self, zero_tol: f64) -> Poly {
        let len = self
            .coeffs
            .iter()
            .rposition(|c| c.abs() > zero_tol)
            .map_or(1, |i| i + 1);
        Poly {
            coeffs: self.coeffs[..len].to_vec(),
        }
    }

    /// Scale so that the leading coefficient is one.
    ///
    /// A polynomial whose leading coefficient is zero is returned unchanged.
    pub fn monic(&self) -> Poly {
        let lead = self.leading();
        if lead == 0.0 {
            return self.clone();
        }
        self * lead.recip()
    }

    /// Are all coefficients exactly zero?
    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|&c| c == 0.0)
    }

    /// The largest coefficient magnitude.
    pub fn magnitude(&self) -> f64 {
        self.coeffs.iter().fold(0.0_f64, |m, c| m.max(c.abs()))
    }

    /// Polynomial long division.
    ///
    /// Returns `(quotient, remainder)` with `self == divisor * quotient + remainder`
    /// and the remainder of lower degree than the divisor. Leading zero
    /// coefficients of the divisor are ignored.
    ///
    /// # Panics
    ///
    /// Panics if `divisor` is the zero polynomial.
    pub fn div_rem(&self, divisor: &Poly) -> (Poly, Poly) {
        let divisor = divisor.trimmed(0.0);
        assert!(!divisor.is_zero(), "division by the zero polynomial");
        let dn = divisor.degree();
        let n = self.degree();
        if n < dn {
            return (Poly::zero(), self.clone());
        }
        let lead = divisor.leading();
        let mut rem = self.coeffs.clone();
        let mut quot = vec![0.0; n - dn + 1];
        for k in (0..=n - dn).rev() {
            let q = rem[k + dn] / lead;
            quot[k] = q;
            for (j, &d) in divisor.coeffs.iter().enumerate() {
                rem[k + j] -= q * d;
            }
            // Exactly cancelled by construction; clear the rounding residue.
            rem[k + dn] = 0.0;
        }
        rem.truncate(dn.max(1));
        (Poly { coeffs: quot }, Poly { coeffs: rem })
    }

    /// Raise to a non-negative integer power.
    pub fn pow(&self, n: u32) -> Poly {
        let mut result = Poly::one();
        let mut base = self.clone();
        let mut n = n;
        while n > 0 {
            if n & 1 == 1 {
                result = &result * &base;
            }
            n >>= 1;
            if n > 0 {
                base = &base * &base;
            }
        }
        result
    }

    /// A bound on the magnitude of every real root.
    ///
    /// This is the smaller of the Cauchy bound `1 + max |aᵢ / aₙ|` and the
    /// Lagrange bound `max(1, Σ |aᵢ / aₙ|)`. Leading coefficients that are
    /// exactly zero are skipped; a constant polynomial gives zero.
    pub fn root_bound(&self) -> f64 {
        let p = self.trimmed(0.0);
        if p.degree() == 0 {
            return 0.0;
        }
        let lead = p.leading().abs();
        let (max, sum) = p.coeffs[..p.degree()]
            .iter()
            .map(|c| c.abs() / lead)
            .fold((0.0_f64, 0.0_f64), |(m, s), r| (m.max(r), s + r));
        (1.0 + max).min(sum.max(1.0))
    }

    /// Find the real roots, in increasing order, with default options.
    ///
    /// ```
    /// use arcwise::Poly;
    ///
    /// // (x - 1)(x - 2)(x - 3)
    /// let p = Poly::new([-6.0, 11.0, -6.0, 1.0]);
    /// let roots = p.find_roots();
    /// assert_eq!(roots.len(), 3);
    /// assert!((roots[2] - 3.0).abs() < 1e-9);
    /// ```
    pub fn find_roots(&self) -> Vec<f64> {
        self.find_roots_with(&RootOptions::default())
    }

    /// Find the real roots, in increasing order.
    ///
    /// Leading coefficients within the zero tolerance are dropped first.
    /// Degrees one to four use closed-form solutions (a near-zero leading
    /// coefficient falls through to the next lower degree). Higher degrees,
    /// or any degree when [`RootOptions::force_numeric`] is set, use the
    /// numeric fallback: the roots of the derivative, found recursively, split
    /// the interval given by [`Poly::root_bound`] into monotonic brackets,
    /// and Brent's method is run on each.
    ///
    /// A constant polynomial, including zero, has no reported roots.
    pub fn find_roots_with(&self, options: &RootOptions) -> Vec<f64> {
        let p = self.trimmed(options.zero_tolerance);
        let zt = options.zero_tolerance;
        let c = &p.coeffs;
        if options.force_numeric {
            return p.numeric_roots(options);
        }
        match p.degree() {
            0 => Vec::new(),
            1 => solve_linear(c[0], c[1]).into_iter().collect(),
            2 => solve_quadratic(c[0], c[1], c[2], zt).to_vec(),
            3 => solve_cubic(c[0], c[1], c[2], c[3], zt).to_vec(),
            4 => solve_quartic(c[0], c[1], c[2], c[3], c[4], zt).to_vec(),
            _ => p.numeric_roots(options),
        }
    }

    /// The Sturm sequence of this polynomial.
    pub fn sturm_chain(&self) -> SturmChain {
        SturmChain::new(self)
    }

    fn numeric_roots(&self, options: &RootOptions) -> Vec<f64> {
        match self.degree() {
            0 => return Vec::new(),
            1 => return solve_linear(self.coeffs[0], self.coeffs[1]).into_iter().collect(),
            _ => {}
        }
        let bound = self.root_bound();
        let critical = self
            .deriv()
            .trimmed(options.zero_tolerance)
            .numeric_roots(options);
        let mut stops = Vec::with_capacity(critical.len() + 2);
        stops.push(-bound);
        stops.extend(critical.into_iter().filter(|&x| x > -bound && x < bound));
        stops.push(bound);

        let mut roots = Vec::new();
        let mut last = f64::NEG_INFINITY;
        for bracket in stops.windows(2) {
            let root = brent(
                |x| self.eval(x),
                bracket[0],
                bracket[1],
                options.tolerance,
                options.zero_tolerance,
            );
            if let Some(root) = root {
                if root > last + options.merge_threshold {
                    roots.push(root);
                    last = root;
                }
            }
        }
        roots
    }
}

impl<'a> Add<&'a Poly> for &'a Poly {
    type Output = Poly;

    fn add(self, rhs: &Poly) -> Poly {
        let (long, short) = if self.coeffs.len() >= rhs.coeffs.len() {
            (self, rhs)
        } else {
            (rhs, self)
        };
        let mut coeffs = long.coeffs.clone();
        for (c, d) in coeffs.iter_mut().zip(&short.coeffs) {
            *c += d;
        }
        Poly { coeffs }
    }
}

impl<'a> Sub<&'a Poly> for &'a Poly {
    type Output = Poly;

    fn sub(self, rhs: &Poly) -> Poly {
        self + &(-rhs)
    }
}

impl<'a> Mul<&'a Poly> for &'a Poly {
    type Output = Poly;

    fn mul(self, rhs: &Poly) -> Poly {
        let mut coeffs = vec![0.0; self.coeffs.len() + rhs.coeffs.len() - 1];

        for (i, c) in self.coeffs.iter().enumerate() {
            for (j, d) in rhs.coeffs.iter().enumerate() {
                coeffs[i + j] += c * d;
            }
        }
        Poly { coeffs }
    }
}

impl<'a> Div<&'a Poly> for &'a Poly {
    type Output = Poly;

    fn div(self, rhs: &Poly) -> Poly {
        self.div_rem(rhs).0
    }
}

impl<'a> Rem<&'a Poly> for &'a Poly {
    type Output = Poly;

    fn rem(self, rhs: &Poly) -> Poly {
        self.div_rem(rhs).1
    }
}

macro_rules! forward_owned_binop {
    ($($imp:ident, $method:ident;)+) => {
        $(
            impl $imp<Poly> for Poly {
                type Output = Poly;

                #[inline]
                fn $method(self, rhs: Poly) -> Poly {
                    (&self).$method(&rhs)
                }
            }

            impl $imp<&Poly> for Poly {
                type Output = Poly;

                #[inline]
                fn $method(self, rhs: &Poly) -> Poly {
                    (&self).$method(rhs)
                }
            }
        )+
    };
}

forward_owned_binop! {
    Add, add;
    Sub, sub;
    Mul, mul;
    Div, div;
    Rem, rem;
}

impl Neg for &Poly {
    type Output = Poly;

    fn neg(self) -> Poly {
        Poly {
            coeffs: self.coeffs.iter().map(|c| -c).collect(),
        }
    }
}

impl Neg for Poly {
    type Output = Poly;

    #[inline]
    fn neg(self) -> Poly {
        -&self
    }
}

impl Mul<f64> for &Poly {
    type Output = Poly;

    fn mul(self, rhs: f64) -> Poly {
        Poly {
            coeffs: self.coeffs.iter().map(|c| c * rhs).collect(),
        }
    }
}

impl Mul<f64> for Poly {
    type Output = Poly;

    #[inline]
    fn mul(self, rhs: f64) -> Poly {
        &self * rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_coeffs_near(p: &Poly, expected: &[f64], epsilon: f64) {
        let coeffs = p.trimmed(epsilon).coeffs().to_vec();
        let expected = Poly::new(expected.iter().copied()).trimmed(epsilon);
        assert_eq!(coeffs.len(), expected.coeffs().len(), "{p:?} != {expected:?}");
        for (c, e) in coeffs.iter().zip(expected.coeffs()) {
            assert!((c - e).abs() <= epsilon, "{p:?} != {expected:?}");
        }
    }

    fn assert_roots_near(roots: &[f64], expected: &[f64], epsilon: f64) {
        assert_eq!(roots.len(), expected.len(), "{roots:?} != {expected:?}");
        for (r, e) in roots.iter().zip(expected) {
            assert!((r - e).abs() <= epsilon, "{roots:?} != {expected:?}");
        }
    }

    fn from_roots(roots: &[f64]) -> Poly {
        roots
            .iter()
            .fold(Poly::one(), |p, &r| p * Poly::new([-r, 1.0]))
    }

    fn random_poly(rng: &mut StdRng, degree: usize) -> Poly {
        Poly::new((0..=degree).map(|_| rng.random_range(-10.0..10.0)))
    }

    #[test]
    fn basics() {
        let p = Poly::new([1.0, -2.0, 3.0]);
        assert_eq!(p.degree(), 2);
        assert_eq!(p.leading(), 3.0);
        assert_eq!(p.eval(2.0), 9.0);
        assert_eq!(p.deriv(), Poly::new([-2.0, 6.0]));
        assert_eq!(Poly::constant(4.0).deriv(), Poly::zero());
        assert_eq!(Poly::new([]), Poly::zero());
        assert_eq!(p.magnitude(), 3.0);
        assert_eq!(p.monic().coeffs(), &[1.0 / 3.0, -2.0 / 3.0, 1.0]);
    }

    #[test]
    fn trimming_keeps_constant_term() {
        let p = Poly::new([2.0, 1.0, 1e-15, 0.0]);
        assert_eq!(p.trimmed(1e-12).coeffs(), &[2.0, 1.0]);
        assert_eq!(p.trimmed(0.0).coeffs(), &[2.0, 1.0, 1e-15]);
        assert_eq!(Poly::new([0.0, 0.0]).trimmed(0.0).coeffs(), &[0.0]);
        assert!(Poly::new([0.0, 0.0]).is_zero());
    }

    #[test]
    fn arithmetic() {
        let a = Poly::new([1.0, 1.0]);
        let b = Poly::new([-1.0, 0.0, 2.0]);
        assert_eq!(&a + &b, Poly::new([0.0, 1.0, 2.0]));
        assert_eq!(&a - &b, Poly::new([2.0, 1.0, -2.0]));
        assert_eq!(&a * &b, Poly::new([-1.0, -1.0, 2.0, 2.0]));
        assert_eq!(-a.clone(), Poly::new([-1.0, -1.0]));
        assert_eq!(a.clone() * 3.0, Poly::new([3.0, 3.0]));
        assert_eq!(a.pow(3), Poly::new([1.0, 3.0, 3.0, 1.0]));
        assert_eq!(a.pow(0), Poly::one());
    }

    #[test]
    fn exact_division() {
        // (x³ - 1) / (x - 1) = x² + x + 1
        let a = Poly::new([-1.0, 0.0, 0.0, 1.0]);
        let b = Poly::new([-1.0, 1.0]);
        let (q, r) = a.div_rem(&b);
        assert_eq!(q, Poly::new([1.0, 1.0, 1.0]));
        assert!(r.is_zero());
        assert_eq!(&a / &b, q);
        // Leading zeros in the divisor are ignored.
        let (q, _) = a.div_rem(&Poly::new([-1.0, 1.0, 0.0]));
        assert_eq!(q, Poly::new([1.0, 1.0, 1.0]));
        // A divisor of higher degree leaves everything in the remainder.
        let (q, r) = b.div_rem(&a);
        assert!(q.is_zero());
        assert_eq!(r, b);
        // Division by a constant.
        let (q, r) = a.div_rem(&Poly::constant(2.0));
        assert_eq!(q, Poly::new([-0.5, 0.0, 0.0, 0.5]));
        assert!(r.is_zero());
    }

    #[test]
    #[should_panic(expected = "division by the zero polynomial")]
    fn divide_by_zero() {
        drop(Poly::new([1.0, 2.0]) % Poly::new([0.0, 0.0]));
    }

    #[test]
    fn division_identity() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..200 {
            let (deg_a, deg_b) = (rng.random_range(0..8), rng.random_range(0..5));
            let a = random_poly(&mut rng, deg_a);
            let b = random_poly(&mut rng, deg_b);
            let (q, r) = a.div_rem(&b);
            assert!(r.degree() < b.degree().max(1));
            let back = &(&b * &q) + &r;
            let scale = a.magnitude().max(q.magnitude() * b.magnitude()).max(1.0);
            assert_coeffs_near(&back, a.coeffs(), 1e-9 * scale);
        }
    }

    #[test]
    fn multiplication_distributes() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let degrees: [usize; 3] = core::array::from_fn(|_| rng.random_range(0..6));
            let a = random_poly(&mut rng, degrees[0]);
            let b = random_poly(&mut rng, degrees[1]);
            let c = random_poly(&mut rng, degrees[2]);
            let lhs = &a * &(&b + &c);
            let rhs = &(&a * &b) + &(&a * &c);
            assert_coeffs_near(&lhs, rhs.coeffs(), 1e-9);
        }
    }

    #[test]
    fn root_bound_contains_roots() {
        let p = from_roots(&[-7.0, 0.5, 3.0]);
        let bound = p.root_bound();
        assert!(bound >= 7.0, "{bound}");
        assert_eq!(Poly::constant(3.0).root_bound(), 0.0);
        // 2x - 1: both bounds agree on 1.
        assert_eq!(Poly::new([-1.0, 2.0]).root_bound(), 1.0);
    }

    #[test]
    fn closed_form_roots() {
        assert_roots_near(&Poly::new([-1.0, 0.0, 1.0]).find_roots(), &[-1.0, 1.0], 1e-12);
        assert_roots_near(&Poly::new([2.0, -3.0, 1.0]).find_roots(), &[1.0, 2.0], 1e-12);
        assert_roots_near(&Poly::new([-3.0, 2.0]).find_roots(), &[1.5], 1e-12);
        assert_roots_near(
            &from_roots(&[-2.0, 0.5, 4.0]).find_roots(),
            &[-2.0, 0.5, 4.0],
            1e-9,
        );
        assert_roots_near(
            &from_roots(&[-3.0, -1.0, 1.0, 2.5]).find_roots(),
            &[-3.0, -1.0, 1.0, 2.5],
            1e-9,
        );
        assert!(Poly::new([1.0, 0.0, 1.0]).find_roots().is_empty());
        assert!(Poly::constant(3.0).find_roots().is_empty());
        assert!(Poly::zero().find_roots().is_empty());
    }

    #[test]
    fn vanishing_leading_coefficient() {
        // Degree drops from three to one.
        let p = Poly::new([-2.0, 1.0, 0.0, 1e-14]);
        assert_roots_near(&p.find_roots(), &[2.0], 1e-12);
    }

    #[test]
    fn numeric_high_degree() {
        let p = from_roots(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_roots_near(&p.find_roots(), &[1.0, 2.0, 3.0, 4.0, 5.0], 1e-9);
        let p = from_roots(&[-4.0, -1.5, 0.0, 0.25, 2.0, 3.5]);
        assert_roots_near(&p.find_roots(), &[-4.0, -1.5, 0.0, 0.25, 2.0, 3.5], 1e-9);
    }

    #[test]
    fn numeric_double_root() {
        // (x - 1)² (x + 2)
        let p = Poly::new([2.0, -3.0, 0.0, 1.0]);
        let options = RootOptions {
            force_numeric: true,
            ..RootOptions::default()
        };
        assert_roots_near(&p.find_roots_with(&options), &[-2.0, 1.0], 1e-9);
    }

    #[test]
    fn merge_threshold() {
        let p = from_roots(&[1.0, 1.0001]);
        let mut options = RootOptions {
            force_numeric: true,
            ..RootOptions::default()
        };
        assert_eq!(p.find_roots_with(&options).len(), 2);
        options.merge_threshold = 1e-3;
        assert_roots_near(&p.find_roots_with(&options), &[1.0], 1e-9);
    }

    #[test]
    fn closed_form_agrees_with_numeric() {
        let mut rng = StdRng::seed_from_u64(42);
        let numeric = RootOptions {
            force_numeric: true,
            ..RootOptions::default()
        };
        for degree in 2..=4 {
            for _ in 0..100 {
                let mut roots: Vec<f64> = Vec::new();
                while roots.len() < degree {
                    let r: f64 = rng.random_range(-5.0..5.0);
                    if roots.iter().all(|x: &f64| (x - r).abs() > 0.1) {
                        roots.push(r);
                    }
                }
                roots.sort_by(f64::total_cmp);
                let p = from_roots(&roots) * rng.random_range(0.5_f64..2.0);
                let closed = p.find_roots();
                let approx = p.find_roots_with(&numeric);
                assert_roots_near(&closed, &roots, 1e-6);
                assert_roots_near(&approx, &closed, 1e-6);
            }
        }
    }

    #[test]
    fn clustered_cubic_roots_agree() {
        let mut rng = StdRng::seed_from_u64(7);
        let numeric = RootOptions {
            force_numeric: true,
            ..RootOptions::default()
        };
        let p = from_roots(&[0.0, 0.01, 0.02]);
        assert_roots_near(&p.find_roots(), &[0.0, 0.01, 0.02], 1e-9);
        assert_roots_near(&p.find_roots_with(&numeric), &[0.0, 0.01, 0.02], 1e-9);
        for _ in 0..200 {
            let center: f64 = rng.random_range(-1.0..1.0);
            let roots = [
                center - rng.random_range(0.01..0.05),
                center,
                center + rng.random_range(0.01..0.05),
            ];
            let p = from_roots(&roots) * rng.random_range(0.5_f64..2.0);
            let closed = p.find_roots();
            assert_roots_near(&closed, &roots, 1e-6);
            assert_roots_near(&p.find_roots_with(&numeric), &closed, 1e-6);
        }
    }

    #[test]
    fn sturm_chain_from_poly() {
        let chain = Poly::new([0.0, -1.0, 0.0, 1.0]).sturm_chain();
        assert_eq!(chain.roots_in_range(-2.0, 2.0), 3);
    }
}
