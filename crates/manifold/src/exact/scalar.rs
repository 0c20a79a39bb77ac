use std::fmt;

use num_bigint::{BigInt, Sign};
use num_traits::{ToPrimitive, Zero};

/// Scalar of the exact computations.
///
/// The reference-taking operations keep `BigInt` allocation-free where the
/// underlying library supports it; `add_mul_assign` mirrors a fused
/// multiply-add and is the workhorse of the dot products.
pub trait ExactScalar: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    fn from_i64(value: i64) -> Self;
    fn zero() -> Self;
    fn is_zero(&self) -> bool;
    /// Sign of the value: -1, 0 or 1.
    fn signum(&self) -> i32;
    fn neg(&self) -> Self;
    fn add(&self, other: &Self) -> Self;
    fn sub(&self, other: &Self) -> Self;
    fn mul(&self, other: &Self) -> Self;
    /// `self += a * b`.
    fn add_mul_assign(&mut self, a: &Self, b: &Self);
    /// Nearest `f64`; exact up to 53 bits of precision.
    fn to_f64(&self) -> f64;
}

impl ExactScalar for i128 {
    #[inline]
    fn from_i64(value: i64) -> Self {
        value as i128
    }
    #[inline]
    fn zero() -> Self {
        0
    }
    #[inline]
    fn is_zero(&self) -> bool {
        *self == 0
    }
    #[inline]
    fn signum(&self) -> i32 {
        i128::signum(*self) as i32
    }
    #[inline]
    fn neg(&self) -> Self {
        -*self
    }
    #[inline]
    fn add(&self, other: &Self) -> Self {
        *self + *other
    }
    #[inline]
    fn sub(&self, other: &Self) -> Self {
        *self - *other
    }
    #[inline]
    fn mul(&self, other: &Self) -> Self {
        *self * *other
    }
    #[inline]
    fn add_mul_assign(&mut self, a: &Self, b: &Self) {
        *self += *a * *b;
    }
    #[inline]
    fn to_f64(&self) -> f64 {
        *self as f64
    }
}

impl ExactScalar for BigInt {
    fn from_i64(value: i64) -> Self {
        BigInt::from(value)
    }
    fn zero() -> Self {
        Zero::zero()
    }
    fn is_zero(&self) -> bool {
        Zero::is_zero(self)
    }
    fn signum(&self) -> i32 {
        match self.sign() {
            Sign::Minus => -1,
            Sign::NoSign => 0,
            Sign::Plus => 1,
        }
    }
    fn neg(&self) -> Self {
        -self
    }
    fn add(&self, other: &Self) -> Self {
        self + other
    }
    fn sub(&self, other: &Self) -> Self {
        self - other
    }
    fn mul(&self, other: &Self) -> Self {
        self * other
    }
    fn add_mul_assign(&mut self, a: &Self, b: &Self) {
        *self += a * b;
    }
    fn to_f64(&self) -> f64 {
        // `to_f64` on BigInt is total; out-of-range values saturate to ±inf,
        // which the bit budgets rule out.
        ToPrimitive::to_f64(self).unwrap_or(f64::NAN)
    }
}
