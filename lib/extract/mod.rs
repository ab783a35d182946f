//! Extraction: compiling a normalized path-sum back into a gate sequence.
//!
//! The extractor peels transformations off the output side of a path-sum
//! until it is the identity. Every peeled gate is appended to a log in
//! reverse logical order; the forward circuit is recovered at the end by
//! inverting each gate and reversing the sequence. One *frontier pass*
//! normalizes, runs the polynomial-time synthesis passes (affine → phase →
//! nonlinear → phase), and then tries to remove a path variable via the
//! Hadamard layer, falling back once to the exponential strength-reduction
//! search. The driver loops frontier passes while the path-variable count
//! strictly decreases; at the fixpoint, extraction succeeds iff the residue
//! is the trivial path-sum -- anything else reports `None`, which is a
//! defined outcome ("this algorithm could not resolve the path-sum"), not a
//! proof of inequivalence.
//!
//! There is no internal abort path or budget: strength reduction is
//! combinatorial in the number of path variables, and callers needing a
//! latency bound must impose one around the whole extraction call.

use std::collections::BTreeSet;
use rustc_hash::FxHashMap;
use thiserror::Error;
use crate::{
    algebra::{ BoolPoly, Monomial, Var },
    circuit::{ Circuit, Gate },
    pathsum::Pathsum,
    phase::Phase,
};

/// Errors raised when setting up an extraction.
///
/// Extraction *failure* -- reaching a fixpoint short of the identity -- is not
/// an error but an expected absence of result; see [`Extractor::run`].
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Returned when the operator is not square.
    #[error("cannot extract a non-square operator: {0} input(s), {1} output(s)")]
    NotSquare(usize, usize),

    /// Returned when the identifier count does not match the wire count.
    #[error("wire count mismatch: operator has degree {0}, got {1} identifier(s)")]
    WireCount(usize, usize),

    /// Returned when a wire identifier repeats.
    #[error("duplicate wire identifier {0}")]
    DuplicateWire(String),

    /// Errors from the circuit layer.
    #[error("circuit error: {0}")]
    Circuit(#[from] crate::circuit::CircuitError),
}
pub type ExtractResult<T> = Result<T, ExtractError>;
use ExtractError::*;

pub mod context;
pub use context::{ FreshAlloc, WireMap };

pub(crate) mod linalg;
use linalg::{ BitMat, RowOp };

mod frame;
pub use frame::Frame;

mod strength;
mod mct;

/// A gate record in the extraction log.
///
/// The log is append-only and in reverse logical order: the extractor works
/// by peeling gates off the back of the target operator, so the forward
/// circuit is the log with each gate inverted and the sequence reversed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogGate {
    /// Hadamard.
    H(String),
    /// Diagonal phase over a (possibly empty) control set.
    Phase(Phase, Vec<String>),
    /// Multi-controlled NOT.
    Mct(Vec<String>, String),
    /// Swap.
    Swap(String, String),
}

impl LogGate {
    /// Return the inverse of `self`.
    pub fn inv(self) -> Self {
        match self {
            Self::Phase(a, ws) => Self::Phase(-a, ws),
            other => other,
        }
    }

    fn into_gate(self) -> Gate {
        match self {
            Self::H(w) => Gate::H(w),
            Self::Phase(a, ws) => Gate::Phase(a, ws),
            Self::Mct(cs, t) => Gate::Mct(cs, t),
            Self::Swap(a, b) => Gate::Swap(a, b),
        }
    }
}

/// The synthesis session: a path-sum under extraction, the index↔identifier
/// context, and the gate log, threaded through every pass.
#[derive(Clone, Debug)]
pub struct Extractor {
    sop: Pathsum,
    ctx: WireMap,
    log: Vec<LogGate>,
    fresh: FreshAlloc,
}

impl Extractor {
    /// Start a session for a square path-sum over the given wire
    /// identifiers.
    pub fn new<S, I>(sop: Pathsum, ids: I) -> ExtractResult<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        if sop.in_deg() != sop.out_deg() {
            return Err(NotSquare(sop.in_deg(), sop.out_deg()));
        }
        let ids: Vec<String> = ids.into_iter().map(|id| id.into()).collect();
        if ids.len() != sop.in_deg() {
            return Err(WireCount(sop.in_deg(), ids.len()));
        }
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for id in ids.iter() {
            if !seen.insert(id.as_str()) {
                return Err(DuplicateWire(id.clone()));
            }
        }
        Ok(Self {
            sop,
            ctx: WireMap::new(ids),
            log: Vec::new(),
            fresh: FreshAlloc::new(),
        })
    }

    /// The path-sum in its current state of reduction.
    pub fn sop(&self) -> &Pathsum { &self.sop }

    /// The gate log so far, in reverse logical order.
    pub fn log_gates(&self) -> &[LogGate] { &self.log }

    /// Run the driver loop to completion.
    ///
    /// Returns the forward-order circuit over the original identifiers on
    /// success, `None` if the loop reached a fixpoint short of the trivial
    /// path-sum.
    pub fn run(mut self) -> Option<Circuit> {
        loop {
            self.sop.grind();
            let before = self.sop.path_vars();
            if before == 0 {
                self.synthesis_pass();
                // calling finalize on a non-affine frontier is a contract
                // violation; a residue the passes could not make affine is
                // an ordinary extraction failure instead
                if self.affine_frontier() { self.finalize(); }
                break;
            }
            self.synthesis_pass();
            self.reduce_paths();
            if self.sop.path_vars() >= before { break; }
        }
        self.sop.is_trivial().then(|| self.into_circuit())
    }

    // every output affine and over input variables only
    fn affine_frontier(&self) -> bool {
        self.sop.out_vals().iter().all(|p| {
            p.degree() <= 1 && p.vars().iter().all(|v| v.is_input())
        })
    }

    // affine → phase → nonlinear → phase; phase simplification runs twice
    // because folding nonlinear terms out of the outputs can re-expose
    // boolean-linear phase terms
    fn synthesis_pass(&mut self) {
        self.affine_simplify();
        self.phase_simplify();
        self.nonlinear_simplify();
        self.phase_simplify();
    }

    // map from bare-output variables to their wires; first wire wins
    fn bare_wires(&self) -> FxHashMap<Var, usize> {
        let mut map: FxHashMap<Var, usize> = FxHashMap::default();
        for (i, p) in self.sop.out_vals().iter().enumerate() {
            if let Some(v) = p.as_var() {
                map.entry(v).or_insert(i);
            }
        }
        map
    }

    fn emit_row_ops(&mut self, ops: &[RowOp]) {
        for op in ops.iter() {
            match op {
                RowOp::Swap(a, b) => {
                    let ga = self.ctx.ids[*a].clone();
                    let gb = self.ctx.ids[*b].clone();
                    self.log.push(LogGate::Swap(ga, gb));
                },
                RowOp::Add(src, tgt) => {
                    let gc = self.ctx.ids[*src].clone();
                    let gt = self.ctx.ids[*tgt].clone();
                    self.log.push(LogGate::Mct(vec![gc], gt));
                },
            }
        }
    }

    /// Affine simplification: linearize the outputs over their monomials
    /// (each distinct nonlinear monomial becomes an atomic synthetic
    /// column), row-reduce, and replay the reduction as CNOT/SWAP/NOT
    /// gates.
    fn affine_simplify(&mut self) {
        let n = self.sop.out_deg();
        let mut cols: Vec<Monomial> = {
            let mut set: BTreeSet<Monomial> = BTreeSet::new();
            for p in self.sop.out_vals().iter() {
                for m in p.terms() {
                    if !m.is_unit() { set.insert(m.clone()); }
                }
            }
            set.into_iter().collect()
        };
        // variable columns first, synthetic monomial columns after
        cols.sort_by_key(|m| (m.degree() > 1, m.clone()));
        let col_index: FxHashMap<&Monomial, usize> =
            cols.iter().enumerate().map(|(c, m)| (m, c)).collect();

        let mut bm = BitMat::zeros(n, cols.len() + 1);
        for (i, p) in self.sop.out_vals().iter().enumerate() {
            for m in p.terms() {
                if m.is_unit() {
                    bm.set(i, cols.len(), true);
                } else {
                    bm.set(i, col_index[m], true);
                }
            }
        }

        let ops = bm.rref(cols.len());
        self.emit_row_ops(&ops);

        let mut out_vals: Vec<BoolPoly> = Vec::with_capacity(n);
        for i in 0..n {
            let mut p = BoolPoly::zero();
            for (c, m) in cols.iter().enumerate() {
                if bm.get(i, c) { p.toggle(m.clone()); }
            }
            if bm.get(i, cols.len()) {
                self.log.push(LogGate::Mct(vec![], self.ctx.ids[i].clone()));
            }
            out_vals.push(p);
        }
        self.sop.out_vals = out_vals;
    }

    /// Phase simplification: change frame so the outputs are literally
    /// variables, realize every phase monomial lying within the frame as a
    /// multi-controlled phase gate (the empty monomial as a global phase),
    /// and revert the frame.
    fn phase_simplify(&mut self) {
        let frame = self.sop.change_frame(&mut self.fresh);
        let wires = self.bare_wires();
        let extractable: Vec<(Monomial, Phase)> =
            self.sop.phase_poly().terms()
            .filter(|(m, _)| m.vars().all(|v| wires.contains_key(v)))
            .map(|(m, a)| (m.clone(), *a))
            .collect();
        for (m, a) in extractable {
            let ws: Vec<String> =
                m.vars().map(|v| self.ctx.ids[wires[v]].clone()).collect();
            self.log.push(LogGate::Phase(-a, ws));
            self.sop.phase_poly.add_term(m, -a);
        }
        self.sop.revert_frame(frame);
    }

    /// Nonlinear simplification: fold every output monomial of degree > 1
    /// whose variables all sit bare on wires out through a multi-controlled
    /// NOT. Fixpoint.
    fn nonlinear_simplify(&mut self) {
        loop {
            let wires = self.bare_wires();
            let mut found: Option<(usize, Monomial)> = None;
            'search: for (i, p) in self.sop.out_vals().iter().enumerate() {
                for m in p.terms() {
                    if m.degree() > 1
                        && m.vars().all(|v| wires.contains_key(v))
                    {
                        found = Some((i, m.clone()));
                        break 'search;
                    }
                }
            }
            let Some((i, m)) = found else { break };
            let controls: Vec<String> =
                m.vars().map(|v| self.ctx.ids[wires[v]].clone()).collect();
            self.log.push(LogGate::Mct(controls, self.ctx.ids[i].clone()));
            let mut out = self.sop.out_vals[i].clone();
            out.toggle(m);
            self.sop.out_vals[i] = out;
        }
    }

    /// Hadamard-layer reduction: find an output that is exactly one path
    /// variable `y`, absent from every other output, whose phase quotient
    /// coerces to GF(2); emit a Hadamard on that wire and eliminate `y`
    /// through the embedded H action. First such instance, or nothing.
    fn h_layer(&mut self) -> bool {
        let n = self.sop.out_deg();
        for i in 0..n {
            let Some(v) = self.sop.out_vals()[i].as_var() else { continue };
            let Some(y) = v.path_index() else { continue };
            if (0..n).any(|j| {
                j != i && self.sop.out_vals()[j].contains_var(&v)
            }) {
                continue;
            }
            let Some(p) = self.sop.phase_poly().quotient(&v).to_bool()
                else { continue };
            self.log.push(LogGate::H(self.ctx.ids[i].clone()));
            self.sop.phase_poly = self.sop.phase_poly.remainder(&v);
            self.sop.out_vals[i] = p;
            self.sop.sde -= 1;
            self.sop.drop_path_var(y);
            return true;
        }
        false
    }

    /// One attempt at strength reduction. On a hit, the substitutions are
    /// applied and a corrective CNOT is emitted for every substituted
    /// variable whose wire (and the candidate's) is assigned, restoring
    /// those wires to bare variables.
    fn strength_reduce(&mut self) -> bool {
        let Some(red) = strength::attempt(&self.sop) else { return false };
        let wire_of = |sop: &Pathsum, y: usize| {
            sop.out_vals().iter()
                .position(|p| p.as_var() == Some(Var::Path(y)))
        };
        let y_wire = wire_of(&self.sop, red.y);
        let z_wires: Vec<Option<usize>> =
            red.subs.iter().map(|z| wire_of(&self.sop, *z)).collect();
        self.sop = red.sop;
        if let Some(wy) = y_wire {
            for wz in z_wires.into_iter().flatten() {
                let gy = self.ctx.ids[wy].clone();
                let gz = self.ctx.ids[wz].clone();
                self.log.push(LogGate::Mct(vec![gy], gz));
                let src = self.sop.out_vals[wy].clone();
                let tgt = self.sop.out_vals[wz].clone();
                self.sop.out_vals[wz] = tgt + src;
            }
        }
        true
    }

    // H-layer; else strength-reduction once, then H-layer; re-normalize in
    // every branch -- whether a path variable was removed is the driver's
    // progress check
    fn reduce_paths(&mut self) {
        if self.h_layer() {
            self.sop.grind();
            return;
        }
        if self.strength_reduce() {
            self.h_layer();
        }
        self.sop.grind();
    }

    /// Finalization: with no path variables left, synthesize the residual
    /// affine input→output transform as a reversible linear circuit.
    ///
    /// *Panics* if an output has degree > 1, contains a path or free
    /// variable, or the transform is singular -- these indicate the synthesis
    /// passes ran out of order or on malformed input.
    fn finalize(&mut self) {
        assert_eq!(
            self.sop.path_vars(), 0,
            "finalize: residual path variables",
        );
        let n = self.sop.out_deg();
        for (i, p) in self.sop.out_vals().iter().enumerate() {
            if p.degree() > 1 {
                panic!("finalize: non-affine output {}: {}", i, p);
            }
            if p.vars().iter().any(|v| !v.is_input()) {
                panic!(
                    "finalize: unresolved path or free variable in output {}",
                    i,
                );
            }
        }
        let mut bm = BitMat::zeros(n, n + 1);
        for (i, p) in self.sop.out_vals().iter().enumerate() {
            for m in p.terms() {
                if m.is_unit() {
                    bm.set(i, n, true);
                } else {
                    let j = m.as_var().unwrap().input_index().unwrap();
                    bm.set(i, j, true);
                }
            }
        }
        let ops = bm.rref(n);
        if !bm.is_identity(n) {
            panic!("finalize: singular affine transform");
        }
        self.emit_row_ops(&ops);
        for i in 0..n {
            if bm.get(i, n) {
                self.log.push(LogGate::Mct(vec![], self.ctx.ids[i].clone()));
            }
        }
        self.sop.out_vals =
            (0..n).map(|i| BoolPoly::var(Var::Input(i))).collect();
    }

    // invert and reverse the log, then lower multi-controlled NOTs
    fn into_circuit(self) -> Circuit {
        let gates: Vec<Gate> =
            self.log.into_iter()
            .rev()
            .map(|g| g.inv().into_gate())
            .collect();
        let (gates, scratch) = mct::decompose_gates(gates, &self.ctx.ids);
        let mut wires = self.ctx.ids;
        wires.extend(scratch);
        Circuit::from_parts(wires, gates)
    }
}

/// Extract a gate sequence from a path-sum over the given wire identifiers.
///
/// `Ok(None)` means the algorithm could not resolve the path-sum.
pub fn extract<S, I>(sop: Pathsum, ids: I) -> ExtractResult<Option<Circuit>>
where
    S: Into<String>,
    I: IntoIterator<Item = S>,
{
    Ok(Extractor::new(sop, ids)?.run())
}

/// Fold a circuit into a path-sum, normalize, and extract it again.
///
/// The returned circuit realizes the same operator as the input whenever
/// extraction succeeds.
pub fn resynthesize(circ: &Circuit) -> ExtractResult<Option<Circuit>> {
    let mut sop = circ.to_pathsum()?;
    sop.grind();
    Ok(Extractor::new(sop, circ.wires().iter().map(String::as_str))?.run())
}
