//! Numerically exact phases backed by rational numbers.
//!
//! A [`Phase`] is an element of the circle group: a rational multiple of 2*π*,
//! reduced modulo 2*π* in every operation. These are the coefficients of the
//! phase polynomial attached to a path-sum; exactness matters because the
//! rewrite rules test whether a coefficient has order ≤ 2 in the group, which
//! is meaningless under floating point.

use std::f64::consts::TAU;
use num_complex::Complex64 as C64;
use num_rational::Rational64 as R64;
use num_traits::{ One, Zero };

// via Euclid's algorithm
fn gcd(mut a: i64, mut b: i64) -> i64 {
    let mut t: i64;
    while b != 0 {
        t = b;
        b = a % b;
        a = t;
    }
    a.abs()
}

fn lcm(a: i64, b: i64) -> i64 { (a / gcd(a, b)) * b }

// return the reduction of `a` modulo `m`, constrained to positive values
pub(crate) fn rempos(a: R64, m: R64) -> R64 {
    let d = lcm(*a.denom(), *m.denom());
    let b = (*(a * d).numer()).rem_euclid(*(m * d).numer());
    R64::new(b, d)
}

/// A description of a phase.
///
/// This type holds an inner [`R64`] representing the number *φ* such that the
/// phase represented by a `Phase` as a whole is 2*π* × *φ*. The representative
/// *φ* is constrained to [0, 1) in all operations.
///
/// ```
/// # use pathsum_calc::phase::Phase;
/// assert_eq!(  Phase::new(3, 4),     -Phase::new(1, 4) );
/// assert_eq!(  Phase::new(5, 4),      Phase::new(1, 4) );
/// assert_eq!(  Phase::new(1, 2) * 2,  Phase::zero()    );
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Phase(pub R64);

impl From<f64> for Phase {
    /// *Panics if the original floating-point number is non-normal.*
    fn from(f: f64) -> Self {
        let ph =
            R64::approximate_float(f / TAU)
            .expect("error converting to phase: unrepresentable float");
        Self(rempos(ph, R64::one()))
    }
}

impl From<Phase> for f64 {
    fn from(ph: Phase) -> Self {
        TAU * (*ph.0.numer() as f64 / *ph.0.denom() as f64)
    }
}

impl PartialEq for Phase {
    fn eq(&self, other: &Self) -> bool {
        rempos(self.0 - other.0, R64::one()) == R64::zero()
    }
}

impl Eq for Phase { }

impl PartialOrd for Phase {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Phase {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        rempos(self.0, R64::one()).cmp(&rempos(other.0, R64::one()))
    }
}

impl std::hash::Hash for Phase {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        rempos(self.0, R64::one()).hash(state);
    }
}

impl Phase {
    /// Construct a new `Phase` as `(numer / denom) × 2π`.
    pub fn new(numer: i64, denom: i64) -> Self {
        Self(rempos(R64::new(numer, denom), R64::one()))
    }

    /// Convert from a floating-point number.
    ///
    /// *Panics if the original number is non-normal.*
    pub fn from_float(f: f64) -> Self { f.into() }

    /// Convert to a floating-point number.
    pub fn into_float(self) -> f64 { self.into() }

    /// Return the `Phase` representation of 0 ≡ 2π mod 2π.
    pub fn zero() -> Self { Self(R64::zero()) }

    /// Return the `Phase` representation of π.
    pub fn pi() -> Self { Self(R64::new(1, 2)) }

    /// Return the `Phase` representation of π/2.
    pub fn pi2() -> Self { Self(R64::new(1, 4)) }

    /// Return the `Phase` representation of π/4.
    pub fn pi4() -> Self { Self(R64::new(1, 8)) }

    /// Return the `Phase` representation of π/8.
    pub fn pi8() -> Self { Self(R64::new(1, 16)) }

    /// Return the `Phase` representation of 2π/`n`.
    pub fn frac(n: i64) -> Self { Self(rempos(R64::new(1, n), R64::one())) }

    /// Return a copy of `self` reduced modulo 2π.
    pub fn reduced(self) -> Self { Self(rempos(self.0, R64::one())) }

    /// Return `true` if `self` is zero.
    pub fn is_zero(self) -> bool { self == Self::zero() }

    /// Return `true` if `self` is an integer multiple of π, i.e. has order
    /// ≤ 2 in the circle group.
    ///
    /// Coefficients satisfying this test are exactly the ones a phase
    /// polynomial can coerce to GF(2).
    pub fn is_half_turn(self) -> bool {
        (self * 2) == Self::zero()
    }

    /// Return `true` if `self` is an integer multiple of 2π/`n`.
    pub fn is_mult(self, n: i64) -> bool {
        self % Self::frac(n) == Self::zero()
    }

    /// Convert to a complex number with modulus 1 and argument equal to
    /// `self`.
    pub fn cis(self) -> C64 { C64::cis(self.into()) }

    /// Convert to a complex number with modulus `r` and argument equal to
    /// `self`.
    pub fn as_polar(self, r: f64) -> C64 { C64::from_polar(r, self.into()) }

    pub(crate) fn label(&self) -> String {
        if *self == Self::zero() {
            return "0".to_string();
        } else if *self == Self::pi() {
            return "π".to_string();
        }
        let modpi = 2 * *self;
        if *modpi.0.numer() == 1 {
            format!("π/{}", modpi.0.denom())
        } else {
            format!("({})π", modpi.0)
        }
    }
}

impl std::ops::Neg for Phase {
    type Output = Phase;

    fn neg(self) -> Self::Output {
        Self(rempos(-self.0, R64::one()))
    }
}

macro_rules! impl_addsubrem_phase {
    (
        $trait:ident,
        $fun:ident,
        $op:tt,
        $trait_assign:ident,
        $fun_assign:ident,
        $op_assign:tt
    ) => {
        impl std::ops::$trait<Phase> for Phase {
            type Output = Phase;

            fn $fun(self, rhs: Phase) -> Self::Output {
                Self(rempos(self.0 $op rhs.0, R64::one()))
            }
        }

        impl std::ops::$trait_assign<Phase> for Phase {
            fn $fun_assign(&mut self, rhs: Phase) {
                *self = *self $op rhs;
            }
        }
    }
}
impl_addsubrem_phase!(Add, add, +, AddAssign, add_assign, +=);
impl_addsubrem_phase!(Sub, sub, -, SubAssign, sub_assign, -=);
impl_addsubrem_phase!(Rem, rem, %, RemAssign, rem_assign, %=);

impl std::iter::Sum for Phase {
    fn sum<I>(iter: I) -> Self
    where I: IntoIterator<Item = Self>
    {
        let mut acc = Self::zero();
        for ph in iter.into_iter() { acc += ph; }
        acc
    }
}

impl std::ops::Mul<i64> for Phase {
    type Output = Phase;

    fn mul(self, rhs: i64) -> Self::Output {
        Self(rempos(self.0 * rhs, R64::one()))
    }
}

impl std::ops::MulAssign<i64> for Phase {
    fn mul_assign(&mut self, rhs: i64) {
        *self = Phase(rempos(self.0 * rhs, R64::one()));
    }
}

impl std::ops::Mul<Phase> for i64 {
    type Output = Phase;

    fn mul(self, rhs: Phase) -> Self::Output {
        Phase(rempos(rhs.0 * self, R64::one()))
    }
}

impl std::ops::Mul<R64> for Phase {
    type Output = Phase;

    /// Dyadic (or general rational) scaling, applied to the reduced
    /// representative in [0, 1).
    fn mul(self, rhs: R64) -> Self::Output {
        Self(rempos(rempos(self.0, R64::one()) * rhs, R64::one()))
    }
}

impl std::ops::Div<i64> for Phase {
    type Output = Phase;

    /// Division acts on the reduced representative in [0, 1).
    fn div(self, rhs: i64) -> Self::Output {
        Self(rempos(rempos(self.0, R64::one()) / rhs, R64::one()))
    }
}

impl std::ops::DivAssign<i64> for Phase {
    fn div_assign(&mut self, rhs: i64) {
        *self = *self / rhs;
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_mod() {
        assert_eq!(Phase::new(5, 3), Phase(R64::new(2, 3)));
        assert_eq!(Phase::new(4, 3), Phase::new(1, 3));
        assert_eq!(Phase::new(-1, 3), Phase::new(2, 3));
        assert_eq!(Phase::new(1, -3), Phase::new(2, 3));
        assert_eq!(Phase::pi(), Phase::new(1, 2));
        assert_eq!(Phase::pi2(), Phase::new(1, 4));
        assert_eq!(Phase::pi4(), Phase::new(1, 8));
        assert_eq!(Phase::pi8(), Phase::new(1, 16));
        assert_eq!(Phase::frac(2), Phase::pi());
        assert_eq!(Phase::frac(3), Phase::new(1, 3));
    }

    #[test]
    fn add_sub() {
        assert_eq!(Phase::pi() + Phase::pi(), Phase::zero());
        assert_eq!(Phase::new(1, 3) + Phase::new(2, 3), Phase::zero());
        assert_eq!(Phase::new(2, 3) + Phase::new(2, 3), Phase::new(1, 3));
        assert_eq!(Phase::new(1, 3) - Phase::new(2, 3), Phase::new(2, 3));
        assert_eq!(Phase::zero() - Phase::pi4(), Phase::new(7, 8));
    }

    #[test]
    fn mul_div() {
        assert_eq!(Phase::new(1, 3) * 2, Phase::new(2, 3));
        assert_eq!(Phase::new(1, 3) * 3, Phase::zero());
        assert_eq!(2 * Phase::new(1, 3), Phase::new(2, 3));
        assert_eq!(Phase::new(1, 3) / 2, Phase::new(1, 6));
        assert_eq!(Phase::pi() * R64::new(1, 2), Phase::pi2());
        assert_eq!(Phase::new(3, 4) * R64::new(1, 2), Phase::new(3, 8));
    }

    #[test]
    fn half_turns() {
        assert!(Phase::zero().is_half_turn());
        assert!(Phase::pi().is_half_turn());
        assert!(!Phase::pi2().is_half_turn());
        assert!(!Phase::pi4().is_half_turn());
        assert!((Phase::pi4() * 4).is_half_turn());
    }

    #[test]
    fn float_conv() {
        fn approx_eq(f1: f64, f2: f64) -> bool { (f1 - f2).abs() < 1e-15 }

        assert_eq!(Phase::from_float(TAU), Phase::zero());
        assert_eq!(Phase::from_float(TAU / 2.0), Phase::pi());
        assert!(approx_eq(Phase::pi().into_float(), TAU / 2.0));
        assert!(approx_eq(Phase::frac(3).into_float(), TAU / 3.0));
    }
}
