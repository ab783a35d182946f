//! Gate sequences over named wires, and their folding into path-sums.
//!
//! A [`Circuit`] is the boundary format on both sides of the pipeline: input
//! circuits are folded into a [`Pathsum`] gate by gate, and extraction
//! produces a new `Circuit` over the same wire identifiers. Gates are kept
//! close to the primitives of the extraction log -- Hadamard, NOT and its
//! multiply-controlled forms, swap, and the arbitrary-angle diagonal
//! [`Gate::Phase`] -- with the usual Clifford+T names available as
//! constructors.

use itertools::Itertools;
use rustc_hash::FxHashMap;
use thiserror::Error;
use crate::{
    pathsum::{ Pathsum, PathsumError },
    phase::Phase,
};

/// Errors for malformed circuits.
#[derive(Debug, Error)]
pub enum CircuitError {
    /// Returned when a gate references a wire the circuit does not have.
    #[error("unknown wire {0}")]
    UnknownWire(String),

    /// Returned when a circuit is created with a repeated wire identifier.
    #[error("duplicate wire {0}")]
    DuplicateWire(String),

    /// Returned when a gate references the same wire more than once.
    #[error("gate references wire {0} more than once")]
    RepeatedGateWire(String),

    /// Returned when two circuits over different wire sets are compared or
    /// joined.
    #[error("wire sets do not match")]
    WireMismatch,

    /// Errors at the path-sum level.
    #[error("path-sum error: {0}")]
    Pathsum(#[from] PathsumError),
}
pub type CircuitResult<T> = Result<T, CircuitError>;
use CircuitError::*;

/// A gate in a quantum circuit, over named wires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Gate {
    /// Hadamard.
    H(String),
    /// NOT.
    X(String),
    /// Controlled-NOT (control first).
    Cx(String, String),
    /// Toffoli (controls first).
    Ccx(String, String, String),
    /// Swap.
    Swap(String, String),
    /// The diagonal gate multiplying the all-ones subspace of the listed
    /// wires by e^(2πi·θ). No wires is a global phase; one wire is a
    /// Z-rotation; two wires is a controlled phase.
    Phase(Phase, Vec<String>),
    /// Multi-controlled NOT (controls, then target).
    Mct(Vec<String>, String),
}

impl Gate {
    /// Create a new Hadamard gate.
    pub fn h<S: Into<String>>(w: S) -> Self { Self::H(w.into()) }

    /// Create a new NOT gate.
    pub fn x<S: Into<String>>(w: S) -> Self { Self::X(w.into()) }

    /// Create a new controlled-NOT gate.
    pub fn cx<S: Into<String>>(c: S, t: S) -> Self {
        Self::Cx(c.into(), t.into())
    }

    /// Create a new Toffoli gate.
    pub fn ccx<S: Into<String>>(c0: S, c1: S, t: S) -> Self {
        Self::Ccx(c0.into(), c1.into(), t.into())
    }

    /// Create a new swap gate.
    pub fn swap<S: Into<String>>(a: S, b: S) -> Self {
        Self::Swap(a.into(), b.into())
    }

    /// Create a new Z gate.
    pub fn z<S: Into<String>>(w: S) -> Self {
        Self::Phase(Phase::pi(), vec![w.into()])
    }

    /// Create a new S gate.
    pub fn s<S: Into<String>>(w: S) -> Self {
        Self::Phase(Phase::pi2(), vec![w.into()])
    }

    /// Create a new S-dagger gate.
    pub fn sdg<S: Into<String>>(w: S) -> Self {
        Self::Phase(-Phase::pi2(), vec![w.into()])
    }

    /// Create a new T gate.
    pub fn t<S: Into<String>>(w: S) -> Self {
        Self::Phase(Phase::pi4(), vec![w.into()])
    }

    /// Create a new T-dagger gate.
    pub fn tdg<S: Into<String>>(w: S) -> Self {
        Self::Phase(-Phase::pi4(), vec![w.into()])
    }

    /// Create a new Z-rotation through `theta`.
    pub fn rz<S: Into<String>>(theta: Phase, w: S) -> Self {
        Self::Phase(theta, vec![w.into()])
    }

    /// Create a new controlled-Z gate.
    pub fn cz<S: Into<String>>(a: S, b: S) -> Self {
        Self::Phase(Phase::pi(), vec![a.into(), b.into()])
    }

    /// Create a new controlled-S gate.
    pub fn cs<S: Into<String>>(a: S, b: S) -> Self {
        Self::Phase(Phase::pi2(), vec![a.into(), b.into()])
    }

    /// Create a new doubly-controlled Z gate.
    pub fn ccz<S: Into<String>>(a: S, b: S, c: S) -> Self {
        Self::Phase(Phase::pi(), vec![a.into(), b.into(), c.into()])
    }

    /// Create a new multi-controlled NOT gate.
    pub fn mct<S: Into<String>, I: IntoIterator<Item = S>>(cs: I, t: S) -> Self {
        Self::Mct(cs.into_iter().map(|c| c.into()).collect(), t.into())
    }

    /// Return `true` if `self` is `H`.
    pub fn is_h(&self) -> bool { matches!(self, Self::H(..)) }

    /// Return `true` if `self` is `X`.
    pub fn is_x(&self) -> bool { matches!(self, Self::X(..)) }

    /// Return `true` if `self` is `Cx`.
    pub fn is_cx(&self) -> bool { matches!(self, Self::Cx(..)) }

    /// Return `true` if `self` is `Ccx`.
    pub fn is_ccx(&self) -> bool { matches!(self, Self::Ccx(..)) }

    /// Return `true` if `self` is `Swap`.
    pub fn is_swap(&self) -> bool { matches!(self, Self::Swap(..)) }

    /// Return `true` if `self` is `Phase`.
    pub fn is_phase(&self) -> bool { matches!(self, Self::Phase(..)) }

    /// Return `true` if `self` is `Mct`.
    pub fn is_mct(&self) -> bool { matches!(self, Self::Mct(..)) }

    /// The wires referenced by `self`, in order.
    pub fn wires(&self) -> Vec<&str> {
        match self {
            Self::H(w) | Self::X(w) => vec![w],
            Self::Cx(c, t) => vec![c, t],
            Self::Ccx(c0, c1, t) => vec![c0, c1, t],
            Self::Swap(a, b) => vec![a, b],
            Self::Phase(_, ws) => ws.iter().map(String::as_str).collect(),
            Self::Mct(cs, t) => {
                let mut ws: Vec<&str> =
                    cs.iter().map(String::as_str).collect();
                ws.push(t);
                ws
            },
        }
    }

    /// Return the inverse of `self`.
    pub fn inv(&self) -> Self {
        match self {
            Self::Phase(a, ws) => Self::Phase(-*a, ws.clone()),
            other => other.clone(),
        }
    }

    // the path-sum of the bare gate, over dense wire indices
    pub(crate) fn to_pathsum(&self) -> Pathsum {
        match self {
            Self::H(..) => Pathsum::hadamard(),
            Self::X(..) => Pathsum::xgate(),
            Self::Cx(..) => Pathsum::cx(),
            Self::Ccx(..) => Pathsum::ccx(),
            Self::Swap(..) => Pathsum::swap(),
            Self::Phase(a, ws) => Pathsum::phase_gate(*a, ws.len()),
            Self::Mct(cs, _) => Pathsum::mcx(cs.len()),
        }
    }
}

impl std::fmt::Display for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::H(w) => write!(f, "H[{}]", w),
            Self::X(w) => write!(f, "X[{}]", w),
            Self::Cx(c, t) => write!(f, "CX[{}, {}]", c, t),
            Self::Ccx(c0, c1, t) => write!(f, "CCX[{}, {}, {}]", c0, c1, t),
            Self::Swap(a, b) => write!(f, "SWAP[{}, {}]", a, b),
            Self::Phase(a, ws) =>
                write!(f, "PHASE({})[{}]", a, ws.iter().join(", ")),
            Self::Mct(cs, t) =>
                write!(f, "MCT[{}; {}]", cs.iter().join(", "), t),
        }
    }
}

/// An ordered gate sequence over a fixed set of named wires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Circuit {
    pub(crate) wires: Vec<String>,
    pub(crate) gates: Vec<Gate>,
}

impl Circuit {
    /// Create a new, empty circuit over the given wires.
    ///
    /// Fails with [`CircuitError::DuplicateWire`] if an identifier repeats.
    pub fn new<S, I>(wires: I) -> CircuitResult<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        let wires: Vec<String> =
            wires.into_iter().map(|w| w.into()).collect();
        let mut seen: FxHashMap<&str, ()> = FxHashMap::default();
        for w in wires.iter() {
            if seen.insert(w.as_str(), ()).is_some() {
                return Err(DuplicateWire(w.clone()));
            }
        }
        Ok(Self { wires, gates: Vec::new() })
    }

    // internal constructor for gate lists already known to be well-formed
    pub(crate) fn from_parts(wires: Vec<String>, gates: Vec<Gate>) -> Self {
        Self { wires, gates }
    }

    /// The wire identifiers, in index order.
    pub fn wires(&self) -> &[String] { &self.wires }

    /// The gate sequence, in execution order.
    pub fn gates(&self) -> &[Gate] { &self.gates }

    /// The number of gates.
    pub fn len(&self) -> usize { self.gates.len() }

    /// Return `true` if the circuit contains no gates.
    pub fn is_empty(&self) -> bool { self.gates.is_empty() }

    /// Append a gate.
    ///
    /// Fails with [`CircuitError::UnknownWire`] if the gate references a wire
    /// the circuit does not have, and [`CircuitError::RepeatedGateWire`] if
    /// it references a wire more than once.
    pub fn push(&mut self, gate: Gate) -> CircuitResult<()> {
        let mut seen: FxHashMap<&str, ()> = FxHashMap::default();
        for w in gate.wires() {
            if !self.wires.iter().any(|id| id == w) {
                return Err(UnknownWire(w.to_string()));
            }
            if seen.insert(w, ()).is_some() {
                return Err(RepeatedGateWire(w.to_string()));
            }
        }
        self.gates.push(gate);
        Ok(())
    }

    /// Append a sequence of gates.
    pub fn extend<I>(&mut self, gates: I) -> CircuitResult<()>
    where I: IntoIterator<Item = Gate>
    {
        for g in gates.into_iter() { self.push(g)?; }
        Ok(())
    }

    /// The inverse circuit: the gate sequence reversed, with each gate
    /// individually inverted.
    pub fn inverse(&self) -> Self {
        Self {
            wires: self.wires.clone(),
            gates: self.gates.iter().rev().map(Gate::inv).collect(),
        }
    }

    /// Fold the gate sequence into a path-sum, starting from the identity on
    /// the circuit's wires.
    ///
    /// The result is not normalized; follow with [`grind`][Pathsum::grind]
    /// as needed.
    pub fn to_pathsum(&self) -> CircuitResult<Pathsum> {
        let index: FxHashMap<&str, usize> =
            self.wires.iter()
            .enumerate()
            .map(|(i, w)| (w.as_str(), i))
            .collect();
        let mut sop = Pathsum::identity(self.wires.len());
        for gate in self.gates.iter() {
            let wires: Vec<usize> =
                gate.wires().iter().map(|w| index[w]).collect();
            sop.apply(&gate.to_pathsum(), &wires)?;
        }
        Ok(sop)
    }
}

/// Check whether two circuits over the same wires realize the same operator,
/// by folding `a · b⁻¹` into a path-sum and normalizing.
///
/// This check is sound but incomplete: `true` means the circuits are
/// equivalent; `false` means the normal form did not reduce to the identity,
/// not a proof of inequivalence.
pub fn check_equivalence(a: &Circuit, b: &Circuit) -> CircuitResult<bool> {
    if a.wires != b.wires { return Err(WireMismatch); }
    let mut sop = a.to_pathsum()?.compose_rev(b.inverse().to_pathsum()?)?;
    sop.grind();
    Ok(sop.is_trivial())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wires2() -> Circuit { Circuit::new(["q0", "q1"]).unwrap() }

    #[test]
    fn push_validates() {
        let mut circ = wires2();
        assert!(circ.push(Gate::h("q0")).is_ok());
        assert!(matches!(
            circ.push(Gate::h("q7")),
            Err(CircuitError::UnknownWire(_)),
        ));
        assert!(matches!(
            circ.push(Gate::cx("q0", "q0")),
            Err(CircuitError::RepeatedGateWire(_)),
        ));
        assert!(matches!(
            Circuit::new(["q0", "q0"]),
            Err(CircuitError::DuplicateWire(_)),
        ));
    }

    #[test]
    fn fold_cx_pair_trivial() {
        let mut circ = wires2();
        circ.extend([Gate::cx("q0", "q1"), Gate::cx("q0", "q1")]).unwrap();
        let sop = circ.to_pathsum().unwrap();
        assert!(sop.is_trivial());
    }

    #[test]
    fn inverse_reverses_and_negates() {
        let mut circ = wires2();
        circ.extend([Gate::t("q0"), Gate::h("q1")]).unwrap();
        let inv = circ.inverse();
        assert_eq!(inv.gates()[0], Gate::h("q1"));
        assert_eq!(inv.gates()[1], Gate::tdg("q0"));
    }

    #[test]
    fn s_twice_is_z() {
        let mut a = Circuit::new(["q"]).unwrap();
        a.extend([Gate::s("q"), Gate::s("q")]).unwrap();
        let mut b = Circuit::new(["q"]).unwrap();
        b.push(Gate::z("q")).unwrap();
        assert!(check_equivalence(&a, &b).unwrap());
    }

    #[test]
    fn double_hadamard_is_identity() {
        let mut a = Circuit::new(["q"]).unwrap();
        a.extend([Gate::h("q"), Gate::h("q")]).unwrap();
        let b = Circuit::new(["q"]).unwrap();
        assert!(check_equivalence(&a, &b).unwrap());
    }

    #[test]
    fn x_is_not_z() {
        let mut a = Circuit::new(["q"]).unwrap();
        a.push(Gate::x("q")).unwrap();
        let mut b = Circuit::new(["q"]).unwrap();
        b.push(Gate::z("q")).unwrap();
        assert!(!check_equivalence(&a, &b).unwrap());
    }

    #[test]
    fn mct_folds_products() {
        let mut circ = Circuit::new(["a", "b", "c", "d"]).unwrap();
        circ.push(Gate::mct(["a", "b", "c"], "d")).unwrap();
        let sop = circ.to_pathsum().unwrap();
        assert_eq!(sop.out_vals()[3].degree(), 3);
        assert_eq!(sop.out_vals()[3].terms().count(), 2);
    }
}
