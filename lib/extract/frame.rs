//! Frame changes: temporary reparameterizations making the output vector
//! literally a list of variables.
//!
//! Phase simplification wants to read the phase polynomial over the values
//! sitting on the output wires. [`Pathsum::change_frame`] replaces each
//! non-variable output with a fresh free variable, solving the output
//! polynomial for one of its linear variables where possible and rewriting
//! the phase polynomial through that solution; [`Pathsum::revert_frame`]
//! undoes the reparameterization exactly, so
//! `revert_frame(change_frame(sop))` is the identity on any path-sum.

use rustc_hash::FxHashSet;
use crate::{
    algebra::{ BoolPoly, Var },
    pathsum::Pathsum,
};
use super::context::FreshAlloc;

#[derive(Clone, Debug)]
pub(crate) struct FrameEntry {
    pub(crate) wire: usize,
    pub(crate) fresh: Var,
    pub(crate) orig: BoolPoly,
    // (solved variable v, rest q) with orig = v ⊕ q; the phase polynomial
    // was rewritten with v ← fresh ⊕ q
    pub(crate) solved: Option<(Var, BoolPoly)>,
}

/// The record of a frame change, consumed by [`Pathsum::revert_frame`].
#[derive(Clone, Debug)]
pub struct Frame {
    pub(crate) entries: Vec<FrameEntry>,
}

impl Frame {
    /// The number of outputs that were reparameterized.
    pub fn len(&self) -> usize { self.entries.len() }

    /// Return `true` if no output needed reparameterization.
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl Pathsum {
    /// Reparameterize so that every output value is a bare variable.
    ///
    /// Outputs already consisting of a single variable are left alone. Every
    /// other output is replaced with a fresh free variable; if the output
    /// polynomial contains a variable `v` occurring only as a bare linear
    /// term, the solution `v = fresh ⊕ q` is substituted into the phase
    /// polynomial so that phase terms over `v` become readable in the new
    /// frame. Among solvable variables, one that is not itself a bare output
    /// on another wire is preferred.
    pub fn change_frame(&mut self, alloc: &mut FreshAlloc) -> Frame {
        let bare: FxHashSet<Var> =
            self.out_vals.iter()
            .filter_map(|p| p.as_var())
            .collect();
        let mut entries: Vec<FrameEntry> = Vec::new();
        for i in 0..self.out_deg {
            if self.out_vals[i].as_var().is_some() { continue; }
            let orig = self.out_vals[i].clone();
            let fresh = alloc.fresh();
            let cands: Vec<Var> =
                orig.vars().into_iter()
                .filter(|v| orig.quotient(v).is_one())
                .collect();
            let solved_var =
                cands.iter().find(|v| !bare.contains(*v))
                .or_else(|| cands.first());
            let solved = solved_var.map(|v| (v.clone(), orig.remainder(v)));
            if let Some((v, q)) = &solved {
                let sub = BoolPoly::var(fresh.clone()) + q.clone();
                self.phase_poly = self.phase_poly.substitute(v, &sub);
            }
            self.out_vals[i] = BoolPoly::var(fresh.clone());
            entries.push(FrameEntry { wire: i, fresh, orig, solved });
        }
        Frame { entries }
    }

    /// Undo a frame change, restoring the original outputs and rewriting the
    /// phase polynomial back into the original variables.
    pub fn revert_frame(&mut self, frame: Frame) {
        for entry in frame.entries.into_iter().rev() {
            if let Some((v, q)) = &entry.solved {
                let back = BoolPoly::var(v.clone()) + q.clone();
                self.phase_poly = self.phase_poly.substitute(&entry.fresh, &back);
            }
            self.out_vals[entry.wire] = entry.orig;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        algebra::{ Monomial, PhasePoly },
        phase::Phase,
    };

    fn xp(i: usize) -> BoolPoly { BoolPoly::var(Var::Input(i)) }

    #[test]
    fn bare_outputs_untouched() {
        let mut sop = Pathsum::hadamard();
        let mut alloc = FreshAlloc::new();
        let frame = sop.change_frame(&mut alloc);
        assert!(frame.is_empty());
        assert_eq!(sop, Pathsum::hadamard());
    }

    #[test]
    fn roundtrip_exact() {
        // CX then CZ: out = [x0, x0 ⊕ x1] with a nontrivial phase
        let sop0 = Pathsum::cx()
            .compose_rev(Pathsum::czgate())
            .unwrap();
        let mut sop = sop0.clone();
        let mut alloc = FreshAlloc::new();
        let frame = sop.change_frame(&mut alloc);
        assert_eq!(frame.len(), 1);
        assert!(sop.out_vals().iter().all(|p| p.as_var().is_some()));
        sop.revert_frame(frame);
        assert_eq!(sop, sop0);
    }

    #[test]
    fn solved_substitution_reads_phase() {
        // out = [x0, x0 ⊕ x1], phase = π·x1: solving the second output for
        // x1 (x0 is bare on wire 0) rewrites the phase over the frame
        let mut sop = Pathsum::cx();
        sop.phase_poly.add_term(Monomial::var(Var::Input(1)), Phase::pi());
        let mut alloc = FreshAlloc::new();
        let frame = sop.change_frame(&mut alloc);
        let f = sop.out_vals()[1].as_var().unwrap();
        assert!(f.is_free());
        // x1 = f ⊕ x0, so π·x1 becomes π·f + π·x0 + cross terms ≡ 0 mod 2π
        let mut expected = PhasePoly::zero();
        expected.add_term(Monomial::var(f), Phase::pi());
        expected.add_term(Monomial::var(Var::Input(0)), Phase::pi());
        assert_eq!(sop.phase_poly(), &expected);
        sop.revert_frame(frame);
        assert_eq!(sop.out_vals()[1], xp(0) + xp(1));
        assert_eq!(
            sop.phase_poly(),
            &PhasePoly::term(Monomial::var(Var::Input(1)), Phase::pi()),
        );
    }

    #[test]
    fn roundtrip_with_nonlinear_output() {
        let mut sop = Pathsum::ccx()
            .compose_rev(Pathsum::identity(3))
            .unwrap();
        sop.phase_poly.add_term(Monomial::var(Var::Input(2)), Phase::pi4());
        let sop0 = sop.clone();
        let mut alloc = FreshAlloc::new();
        let frame = sop.change_frame(&mut alloc);
        sop.revert_frame(frame);
        assert_eq!(sop, sop0);
    }
}
