//! # Polynomials
//!
//! Small fixed capacity polynomials. The capacity is enough to hold the square of the derivative of
//! a cubic Bézier, which is all the ghost ever needs.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::ops::Add;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Maximum number of coefficients of a [`Polynomial`], i.e. polynomials of degree up to 6.
pub const MAX_COEFFS: usize = 7;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A real polynomial `a0 + a1 u + a2 u^2 + ...`, coefficients stored lowest power first.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Polynomial {
    coeffs: [f64; MAX_COEFFS],

    /// Number of coefficients in use
    len: usize,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Polynomial {
    /// The zero polynomial.
    pub fn zero() -> Self {
        Self {
            coeffs: [0.0; MAX_COEFFS],
            len: 1,
        }
    }

    /// Build a polynomial from its coefficients, lowest power first.
    ///
    /// Returns `None` if more than [`MAX_COEFFS`] coefficients are given.
    pub fn from_coeffs(coeffs: &[f64]) -> Option<Self> {
        if coeffs.len() > MAX_COEFFS {
            return None;
        }

        let mut poly = Self::zero();
        poly.coeffs[..coeffs.len()].copy_from_slice(coeffs);
        poly.len = coeffs.len().max(1);

        Some(poly)
    }

    pub fn cubic(a0: f64, a1: f64, a2: f64, a3: f64) -> Self {
        let mut poly = Self::zero();
        poly.coeffs[..4].copy_from_slice(&[a0, a1, a2, a3]);
        poly.len = 4;
        poly
    }

    /// Coefficients in use, lowest power first.
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs[..self.len]
    }

    /// Nominal degree of the polynomial, leading zero coefficients are not trimmed.
    pub fn degree(&self) -> usize {
        self.len - 1
    }

    /// Evaluate the polynomial at `u`.
    pub fn f(&self, u: f64) -> f64 {
        self.coeffs()
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * u + c)
    }

    /// Evaluate the first derivative at `u`.
    pub fn df(&self, u: f64) -> f64 {
        self.derivative().f(u)
    }

    pub fn derivative(&self) -> Self {
        if self.len <= 1 {
            return Self::zero();
        }

        let mut deriv = Self::zero();
        for i in 1..self.len {
            deriv.coeffs[i - 1] = self.coeffs[i] * i as f64;
        }
        deriv.len = self.len - 1;

        deriv
    }

    /// Product of two polynomials, `None` if the result would not fit in [`MAX_COEFFS`].
    pub fn checked_mul(&self, other: &Self) -> Option<Self> {
        let len = self.len + other.len - 1;
        if len > MAX_COEFFS {
            return None;
        }

        let mut prod = Self::zero();
        for i in 0..self.len {
            for j in 0..other.len {
                prod.coeffs[i + j] += self.coeffs[i] * other.coeffs[j];
            }
        }
        prod.len = len;

        Some(prod)
    }

    pub fn square(&self) -> Option<Self> {
        self.checked_mul(self)
    }
}

impl Default for Polynomial {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: Self) -> Self::Output {
        let mut sum = Self::zero();
        for i in 0..MAX_COEFFS {
            sum.coeffs[i] = self.coeffs[i] + rhs.coeffs[i];
        }
        sum.len = self.len.max(rhs.len);
        sum
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Power basis form of the cubic Bézier curve with control values `x0..x3` along one axis.
pub fn bezier_cubic(x0: f64, x1: f64, x2: f64, x3: f64) -> Polynomial {
    Polynomial::cubic(
        x0,
        3.0 * (x1 - x0),
        3.0 * (x0 - 2.0 * x1 + x2),
        3.0 * x1 - x0 - 3.0 * x2 + x3,
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_eval_and_derivative() {
        // 1 + 2u + 3u^2
        let p = Polynomial::from_coeffs(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(p.degree(), 2);
        assert_eq!(p.f(0.0), 1.0);
        assert_eq!(p.f(2.0), 17.0);

        // 2 + 6u
        assert_eq!(p.derivative().coeffs(), &[2.0, 6.0]);
        assert_eq!(p.df(1.0), 8.0);

        assert_eq!(Polynomial::zero().derivative(), Polynomial::zero());
    }

    #[test]
    fn test_mul_add() {
        let a = Polynomial::from_coeffs(&[1.0, 1.0]).unwrap();
        let b = Polynomial::from_coeffs(&[-1.0, 1.0]).unwrap();

        // (1 + u)(-1 + u) = -1 + u^2
        assert_eq!(a.checked_mul(&b).unwrap().coeffs(), &[-1.0, 0.0, 1.0]);
        assert_eq!((a + b).coeffs(), &[0.0, 2.0]);

        // A cubic squared fits, a cubic times a quartic does not
        let c = Polynomial::cubic(1.0, 1.0, 1.0, 1.0);
        assert_eq!(c.square().unwrap().degree(), 6);
        let q = Polynomial::from_coeffs(&[1.0; 5]).unwrap();
        assert!(c.checked_mul(&q).is_none());
        assert!(Polynomial::from_coeffs(&[0.0; 8]).is_none());
    }

    #[test]
    fn test_bezier_endpoints() {
        let p = bezier_cubic(0.2, 0.5, 0.9, 1.4);
        assert!((p.f(0.0) - 0.2).abs() < 1e-12);
        assert!((p.f(1.0) - 1.4).abs() < 1e-12);

        // Endpoint tangents point at the inner control values
        assert!((p.df(0.0) - 3.0 * (0.5 - 0.2)).abs() < 1e-12);
        assert!((p.df(1.0) - 3.0 * (1.4 - 0.9)).abs() < 1e-12);
    }
}
