//! Variables and multilinear polynomials over them.
//!
//! Two polynomial types underlie the path-sum representation: [`BoolPoly`],
//! a multilinear polynomial over GF(2) describing an output value, and
//! [`PhasePoly`], a pseudo-boolean polynomial with [`Phase`][crate::phase]
//! coefficients describing the phase picked up by each assignment of the
//! variables. Both are keyed on [`Monomial`]s -- sets of distinct variables --
//! so no variable ever appears with an exponent above 1.

pub(crate) mod var;
pub use var::*;

pub(crate) mod poly;
pub use poly::*;
