//! The balanced path-sum representation of a quantum operator and its
//! composition operators.
//!
//! A [`Pathsum`] describes the linear map
//!
//! > 2^(−sde/2) · Σ_y exp(2*π*i · Φ(x, y)) · ∣f(x, y)⟩⟨x∣
//!
//! where the sum ranges over all assignments of the path variables *y*, Φ is
//! a [`PhasePoly`] over input and path variables, and *f* is a vector of
//! GF(2) [`BoolPoly`]s, one per output wire. Composition ([`tensor`],
//! [`compose_rev`], [`sum`]) is defined directly on this data; equational
//! reasoning is replaced by the rewrite engine in [`rules`].
//!
//! [`tensor`]: Pathsum::tensor
//! [`compose_rev`]: Pathsum::compose_rev
//! [`sum`]: Pathsum::sum

use std::collections::BTreeSet;
use itertools::Itertools;
use thiserror::Error;
use crate::{
    algebra::{ BoolPoly, Monomial, PhasePoly, Var },
    phase::Phase,
};

/// Errors for fallible operations on path-sums.
#[derive(Debug, Error)]
pub enum PathsumError {
    /// Returned when sequential composition is attempted between operators of
    /// non-matching degree.
    #[error("cannot match {0} output(s) with {1} input(s)")]
    ComposeDim(usize, usize),

    /// Returned when a branch merge is attempted between operators of
    /// non-matching degree.
    #[error("cannot sum a {0}→{1} operator with a {2}→{3} operator")]
    SumDim(usize, usize, usize, usize),

    /// Returned when a branch merge is attempted between operators whose
    /// amplitude weights differ.
    #[error("unbalanced sum: sde {0} with {1} path(s) against sde {2} with {3} path(s)")]
    SumBalance(i32, usize, i32, usize),

    /// Returned when a gate is applied to an output wire that does not exist.
    #[error("missing output wire {0}: operator has {1}")]
    MissingWire(usize, usize),

    /// Returned when a gate is applied to a repeated output wire.
    #[error("repeated output wire {0}")]
    RepeatedWire(usize),

    /// Returned when a gate application does not cover the gate's degree.
    #[error("gate arity mismatch: gate has degree {0}→{1}, got {2} wire(s)")]
    GateArity(usize, usize, usize),
}
pub type PathsumResult<T> = Result<T, PathsumError>;
use PathsumError::*;

pub mod rules;

/// A balanced path-sum in the variables `Input(0..in_deg)` and
/// `Path(0..path_vars)`.
///
/// Path variable indices are kept contiguous from zero: every operation that
/// removes a path variable renumbers the higher indices down. Equality is
/// structural, so two path-sums compare equal exactly when all six fields
/// agree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pathsum {
    pub(crate) sde: i32,
    pub(crate) in_deg: usize,
    pub(crate) out_deg: usize,
    pub(crate) path_vars: usize,
    pub(crate) phase_poly: PhasePoly,
    pub(crate) out_vals: Vec<BoolPoly>,
}

impl Pathsum {
    /// The identity on `n` wires.
    pub fn identity(n: usize) -> Self {
        Self {
            sde: 0,
            in_deg: n,
            out_deg: n,
            path_vars: 0,
            phase_poly: PhasePoly::zero(),
            out_vals: (0..n).map(|i| BoolPoly::var(Var::Input(i))).collect(),
        }
    }

    /// The constant map on zero inputs fixing each output wire to a bit.
    pub fn constant(bits: &[bool]) -> Self {
        Self {
            sde: 0,
            in_deg: 0,
            out_deg: bits.len(),
            path_vars: 0,
            phase_poly: PhasePoly::zero(),
            out_vals:
                bits.iter()
                .map(|b| if *b { BoolPoly::one() } else { BoolPoly::zero() })
                .collect(),
        }
    }

    /// The Hadamard gate.
    pub fn hadamard() -> Self {
        Self {
            sde: 1,
            in_deg: 1,
            out_deg: 1,
            path_vars: 1,
            phase_poly: PhasePoly::term(
                [Var::Input(0), Var::Path(0)].into_iter().collect(),
                Phase::pi(),
            ),
            out_vals: vec![BoolPoly::var(Var::Path(0))],
        }
    }

    /// The NOT gate.
    pub fn xgate() -> Self {
        Self {
            sde: 0,
            in_deg: 1,
            out_deg: 1,
            path_vars: 0,
            phase_poly: PhasePoly::zero(),
            out_vals: vec![BoolPoly::var(Var::Input(0)) + BoolPoly::one()],
        }
    }

    /// The diagonal gate multiplying the all-ones subspace of `arity` wires
    /// by e^(2πi·theta).
    ///
    /// Arity 0 is a global phase; arity 1 is a Z-rotation; arity 2 is a
    /// controlled phase.
    pub fn phase_gate(theta: Phase, arity: usize) -> Self {
        let mut id = Self::identity(arity);
        id.phase_poly = PhasePoly::term(
            (0..arity).map(Var::Input).collect(),
            theta,
        );
        id
    }

    /// The Pauli-Z gate.
    pub fn zgate() -> Self { Self::phase_gate(Phase::pi(), 1) }

    /// The S gate.
    pub fn sgate() -> Self { Self::phase_gate(Phase::pi2(), 1) }

    /// The S-dagger gate.
    pub fn sdggate() -> Self { Self::phase_gate(-Phase::pi2(), 1) }

    /// The T gate.
    pub fn tgate() -> Self { Self::phase_gate(Phase::pi4(), 1) }

    /// The T-dagger gate.
    pub fn tdggate() -> Self { Self::phase_gate(-Phase::pi4(), 1) }

    /// A Z-rotation through `theta`, as the diagonal (1, e^(2πi·theta)).
    pub fn rz(theta: Phase) -> Self { Self::phase_gate(theta, 1) }

    /// The controlled-Z gate.
    pub fn czgate() -> Self { Self::phase_gate(Phase::pi(), 2) }

    /// The controlled-NOT gate (control first).
    pub fn cx() -> Self {
        let mut id = Self::identity(2);
        id.out_vals[1] = BoolPoly::var(Var::Input(0)) + BoolPoly::var(Var::Input(1));
        id
    }

    /// The Toffoli gate (controls first).
    pub fn ccx() -> Self {
        let mut id = Self::identity(3);
        id.out_vals[2] =
            BoolPoly::var(Var::Input(2))
            + BoolPoly::monomial(
                [Var::Input(0), Var::Input(1)].into_iter().collect());
        id
    }

    /// A NOT on the last of `controls + 1` wires, controlled on all the
    /// others.
    ///
    /// `mcx(0)` is the NOT gate, `mcx(1)` the controlled-NOT, and `mcx(2)`
    /// the Toffoli.
    pub fn mcx(controls: usize) -> Self {
        let mut id = Self::identity(controls + 1);
        id.out_vals[controls] =
            BoolPoly::var(Var::Input(controls))
            + BoolPoly::monomial((0..controls).map(Var::Input).collect());
        id
    }

    /// The swap gate.
    pub fn swap() -> Self {
        let mut id = Self::identity(2);
        id.out_vals.swap(0, 1);
        id
    }

    /// The exponent of the 1/√2 normalization factor.
    pub fn sde(&self) -> i32 { self.sde }

    /// The number of input wires.
    pub fn in_deg(&self) -> usize { self.in_deg }

    /// The number of output wires.
    pub fn out_deg(&self) -> usize { self.out_deg }

    /// The number of existentially summed path variables.
    pub fn path_vars(&self) -> usize { self.path_vars }

    /// The phase polynomial.
    pub fn phase_poly(&self) -> &PhasePoly { &self.phase_poly }

    /// The output-value vector.
    pub fn out_vals(&self) -> &[BoolPoly] { &self.out_vals }

    /// Adjust the normalization exponent by `k`, scaling the operator by
    /// 2^(−k/2).
    pub fn scale_sde(&mut self, k: i32) { self.sde += k; }

    /// Return `true` if `self` is the identity on its input degree: no path
    /// variables, no phase, no normalization factor, and every output equal
    /// to its input variable.
    pub fn is_trivial(&self) -> bool {
        self.path_vars == 0
            && self.sde == 0
            && self.phase_poly.is_zero()
            && self.in_deg == self.out_deg
            && self.out_vals.iter().enumerate()
                .all(|(i, p)| p.as_var() == Some(Var::Input(i)))
    }

    /// Return `true` if path variable `y` does not occur in any output
    /// value.
    pub fn is_internal(&self, y: usize) -> bool {
        let v = Var::Path(y);
        !self.out_vals.iter().any(|p| p.contains_var(&v))
    }

    /// All path variables not occurring in any output value.
    pub fn internal_path_vars(&self) -> Vec<usize> {
        (0..self.path_vars).filter(|y| self.is_internal(*y)).collect()
    }

    /// The set of path variable indices occurring anywhere in the phase
    /// polynomial or the outputs.
    pub fn path_var_support(&self) -> BTreeSet<usize> {
        let mut support: BTreeSet<usize> =
            self.phase_poly.vars().iter()
            .filter_map(|v| v.path_index())
            .collect();
        for out in self.out_vals.iter() {
            support.extend(out.vars().iter().filter_map(|v| v.path_index()));
        }
        support
    }

    /// Substitute the GF(2) polynomial `p` for `v` in the phase polynomial
    /// (lifted) and every output value.
    pub fn substitute(&mut self, v: &Var, p: &BoolPoly) {
        self.phase_poly = self.phase_poly.substitute(v, p);
        for out in self.out_vals.iter_mut() {
            *out = out.substitute(v, p);
        }
    }

    // remove path variable `y`, which must occur nowhere, and renumber the
    // higher path indices down
    pub(crate) fn drop_path_var(&mut self, y: usize) {
        debug_assert!(!self.phase_poly.contains_var(&Var::Path(y)));
        debug_assert!(self.is_internal(y));
        let remap = |v: &Var| match v {
            Var::Path(i) if *i > y => Var::Path(*i - 1),
            other => other.clone(),
        };
        self.phase_poly = self.phase_poly.map_vars(remap);
        for out in self.out_vals.iter_mut() {
            *out = out.map_vars(remap);
        }
        self.path_vars -= 1;
    }

    /// Parallel composition, with `rhs`'s wires appended after `self`'s.
    ///
    /// `rhs`'s input and path variables are shifted past `self`'s; the phase
    /// polynomials and normalization exponents add.
    pub fn tensor(mut self, rhs: Self) -> Self {
        let shift_in = self.in_deg;
        let shift_path = self.path_vars;
        let remap = |v: &Var| match v {
            Var::Input(i) => Var::Input(*i + shift_in),
            Var::Path(i) => Var::Path(*i + shift_path),
            other => other.clone(),
        };
        self.sde += rhs.sde;
        self.phase_poly += rhs.phase_poly.map_vars(remap);
        self.out_vals.extend(rhs.out_vals.iter().map(|p| p.map_vars(remap)));
        self.in_deg += rhs.in_deg;
        self.out_deg += rhs.out_deg;
        self.path_vars += rhs.path_vars;
        self
    }

    /// Sequential composition running `rhs` after `self`.
    ///
    /// Fails with [`PathsumError::ComposeDim`] unless `self.out_deg ==
    /// rhs.in_deg`. `rhs`'s path variables are shifted past `self`'s and
    /// every `Input(i)` of `rhs` is substituted with `self.out_vals[i]`.
    pub fn compose_rev(self, rhs: Self) -> PathsumResult<Self> {
        if self.out_deg != rhs.in_deg {
            return Err(ComposeDim(self.out_deg, rhs.in_deg));
        }
        let shift = self.path_vars;
        let remap = |v: &Var| match v {
            Var::Path(i) => Var::Path(*i + shift),
            other => other.clone(),
        };
        let rhs_phase =
            rhs.phase_poly.map_vars(remap)
            .substitute_inputs(&self.out_vals);
        let out_vals: Vec<BoolPoly> =
            rhs.out_vals.iter()
            .map(|p| p.map_vars(remap).substitute_inputs(&self.out_vals))
            .collect();
        Ok(Self {
            sde: self.sde + rhs.sde,
            in_deg: self.in_deg,
            out_deg: rhs.out_deg,
            path_vars: self.path_vars + rhs.path_vars,
            phase_poly: self.phase_poly + rhs_phase,
            out_vals,
        })
    }

    /// Sequential composition `self ∘ rhs`, running `rhs` first.
    pub fn compose(self, rhs: Self) -> PathsumResult<Self> {
        rhs.compose_rev(self)
    }

    /// Branch merge: the amplitude-level sum of `self` and `rhs` under a
    /// fresh selector path variable.
    ///
    /// Fails with [`PathsumError::SumDim`] unless the degrees agree, and
    /// with [`PathsumError::SumBalance`] unless
    /// `sde(A) + 2·path_vars(B) == sde(B) + 2·path_vars(A)` -- both branches
    /// must contribute equal amplitude weight.
    ///
    /// With selector `y`, the result's phase is `y·Φ(A) + (1 − y)·Φ(B)` and
    /// each output is `b + y·(a + b)`, so `y = 1` selects the `self` branch.
    pub fn sum(self, rhs: Self) -> PathsumResult<Self> {
        if self.in_deg != rhs.in_deg || self.out_deg != rhs.out_deg {
            return Err(SumDim(self.in_deg, self.out_deg, rhs.in_deg, rhs.out_deg));
        }
        if self.sde + 2 * rhs.path_vars as i32
            != rhs.sde + 2 * self.path_vars as i32
        {
            return Err(SumBalance(
                self.sde, self.path_vars, rhs.sde, rhs.path_vars,
            ));
        }
        let shift = self.path_vars;
        let remap = |v: &Var| match v {
            Var::Path(i) => Var::Path(*i + shift),
            other => other.clone(),
        };
        let y = Var::Path(self.path_vars + rhs.path_vars);
        let ym = Monomial::var(y.clone());
        let rhs_phase = rhs.phase_poly.map_vars(remap);

        // y·Φ(A) + Φ(B') − y·Φ(B'); y is fresh, so the products are exact
        let mut phase_poly = PhasePoly::zero();
        for (m, a) in self.phase_poly.terms() {
            phase_poly.add_term(m.union(&ym), *a);
        }
        for (m, a) in rhs_phase.terms() {
            phase_poly.add_term(m.clone(), *a);
            phase_poly.add_term(m.union(&ym), -*a);
        }

        let yp = BoolPoly::var(y);
        let out_vals: Vec<BoolPoly> =
            self.out_vals.iter().zip(rhs.out_vals.iter())
            .map(|(a, b)| {
                let b = b.map_vars(remap);
                let diff = a.clone() + b.clone();
                b + &yp * &diff
            })
            .collect();

        Ok(Self {
            sde: self.sde + 2 * rhs.path_vars as i32,
            in_deg: self.in_deg,
            out_deg: self.out_deg,
            path_vars: self.path_vars + rhs.path_vars + 1,
            phase_poly,
            out_vals,
        })
    }

    /// Fold a `gate` path-sum into `self` on the given output wires.
    ///
    /// The gate must be square with degree equal to `wires.len()`, and the
    /// wires must be distinct indices below `self.out_deg`.
    pub fn apply(&mut self, gate: &Pathsum, wires: &[usize]) -> PathsumResult<()> {
        if gate.in_deg != gate.out_deg || gate.in_deg != wires.len() {
            return Err(GateArity(gate.in_deg, gate.out_deg, wires.len()));
        }
        let n = self.out_deg;
        let mut seen = BTreeSet::new();
        for &w in wires.iter() {
            if w >= n { return Err(MissingWire(w, n)); }
            if !seen.insert(w) { return Err(RepeatedWire(w)); }
        }
        let remap = |v: &Var| match v {
            Var::Input(i) => Var::Input(wires[*i]),
            other => other.clone(),
        };
        let mut emb_out: Vec<BoolPoly> =
            (0..n).map(|i| BoolPoly::var(Var::Input(i))).collect();
        for (pos, &w) in wires.iter().enumerate() {
            emb_out[w] = gate.out_vals[pos].map_vars(remap);
        }
        let emb = Pathsum {
            sde: gate.sde,
            in_deg: n,
            out_deg: n,
            path_vars: gate.path_vars,
            phase_poly: gate.phase_poly.map_vars(remap),
            out_vals: emb_out,
        };
        let cur = std::mem::replace(self, Pathsum::identity(0));
        *self = cur.compose_rev(emb)?;
        Ok(())
    }
}

impl std::fmt::Display for Pathsum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "2^({}/2) Σ[y0..y{}] exp(2πi({})) |{}⟩⟨x0..x{}|",
            -self.sde,
            self.path_vars,
            self.phase_poly,
            self.out_vals.iter().map(|p| format!("{}", p)).join(", "),
            self.in_deg,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xv(i: usize) -> BoolPoly { BoolPoly::var(Var::Input(i)) }

    #[test]
    fn identity_trivial() {
        assert!(Pathsum::identity(0).is_trivial());
        assert!(Pathsum::identity(3).is_trivial());
        assert!(!Pathsum::hadamard().is_trivial());
        assert!(!Pathsum::xgate().is_trivial());
    }

    #[test]
    fn constant_outputs() {
        let sop = Pathsum::constant(&[true, false]);
        assert_eq!(sop.in_deg(), 0);
        assert_eq!(sop.out_deg(), 2);
        assert!(sop.out_vals()[0].is_one());
        assert!(sop.out_vals()[1].is_zero());
        let applied = sop.compose_rev(Pathsum::cx()).unwrap();
        assert!(applied.out_vals()[1].is_one());
    }

    #[test]
    fn tensor_degrees() {
        let hh = Pathsum::hadamard().tensor(Pathsum::hadamard());
        assert_eq!(hh.in_deg(), 2);
        assert_eq!(hh.out_deg(), 2);
        assert_eq!(hh.path_vars(), 2);
        assert_eq!(hh.sde(), 2);
        assert_eq!(hh.out_vals()[0].as_var(), Some(Var::Path(0)));
        assert_eq!(hh.out_vals()[1].as_var(), Some(Var::Path(1)));
    }

    #[test]
    fn compose_dim_mismatch() {
        let res = Pathsum::hadamard().compose_rev(Pathsum::cx());
        assert!(matches!(res, Err(PathsumError::ComposeDim(1, 2))));
    }

    #[test]
    fn compose_cx_twice() {
        let sop = Pathsum::cx().compose_rev(Pathsum::cx()).unwrap();
        assert!(sop.is_trivial());
    }

    #[test]
    fn compose_x_twice() {
        let sop = Pathsum::xgate().compose_rev(Pathsum::xgate()).unwrap();
        assert!(sop.is_trivial());
    }

    #[test]
    fn compose_substitutes_phase() {
        // CX then CZ: π·L(x0)·L(x0 + x1) = π·(x0 − x0·x1), and −π ≡ π
        let sop = Pathsum::cx().compose_rev(Pathsum::czgate()).unwrap();
        let mut expected = PhasePoly::zero();
        expected.add_term(Monomial::var(Var::Input(0)), Phase::pi());
        expected.add_term(
            [Var::Input(0), Var::Input(1)].into_iter().collect(),
            Phase::pi(),
        );
        assert_eq!(sop.phase_poly(), &expected);
        assert_eq!(sop.out_vals()[1], xv(0) + xv(1));
    }

    #[test]
    fn swap_involutive() {
        let sop = Pathsum::swap().compose_rev(Pathsum::swap()).unwrap();
        assert!(sop.is_trivial());
    }

    #[test]
    fn sum_balance_rejected() {
        // H has sde 1 and one path variable; I has neither: 1 + 0 ≠ 0 + 2
        let res = Pathsum::hadamard().sum(Pathsum::identity(1));
        assert!(matches!(res, Err(PathsumError::SumBalance(1, 1, 0, 0))));
    }

    #[test]
    fn sum_dim_rejected() {
        let res = Pathsum::identity(2).sum(Pathsum::identity(1));
        assert!(matches!(res, Err(PathsumError::SumDim(2, 2, 1, 1))));
    }

    #[test]
    fn sum_x_plus_identity() {
        // X + I: Σ_y |x0 ⊕ y⟩⟨x0|
        let sop = Pathsum::xgate().sum(Pathsum::identity(1)).unwrap();
        assert_eq!(sop.path_vars(), 1);
        assert_eq!(sop.sde(), 0);
        assert!(sop.phase_poly().is_zero());
        assert_eq!(sop.out_vals()[0], xv(0) + BoolPoly::var(Var::Path(0)));
    }

    #[test]
    fn apply_embeds() {
        let mut sop = Pathsum::identity(3);
        sop.apply(&Pathsum::cx(), &[2, 0]).unwrap();
        assert_eq!(sop.out_vals()[0], xv(2) + xv(0));
        assert_eq!(sop.out_vals()[1], xv(1));
        assert_eq!(sop.out_vals()[2], xv(2));
    }

    #[test]
    fn apply_bad_wires() {
        let mut sop = Pathsum::identity(2);
        assert!(matches!(
            sop.apply(&Pathsum::cx(), &[0, 5]),
            Err(PathsumError::MissingWire(5, 2)),
        ));
        assert!(matches!(
            sop.apply(&Pathsum::cx(), &[1, 1]),
            Err(PathsumError::RepeatedWire(1)),
        ));
        assert!(matches!(
            sop.apply(&Pathsum::cx(), &[0]),
            Err(PathsumError::GateArity(2, 2, 1)),
        ));
    }

    #[test]
    fn hh_composed_shape() {
        let sop = Pathsum::hadamard()
            .compose_rev(Pathsum::hadamard())
            .unwrap();
        assert_eq!(sop.sde(), 2);
        assert_eq!(sop.path_vars(), 2);
        assert_eq!(sop.out_vals()[0].as_var(), Some(Var::Path(1)));
        // phase = π·x0·y0 + π·y0·y1
        let mut expected = PhasePoly::zero();
        expected.add_term(
            [Var::Input(0), Var::Path(0)].into_iter().collect(),
            Phase::pi(),
        );
        expected.add_term(
            [Var::Path(0), Var::Path(1)].into_iter().collect(),
            Phase::pi(),
        );
        assert_eq!(sop.phase_poly(), &expected);
        assert!(sop.is_internal(0));
        assert!(!sop.is_internal(1));
    }
}
