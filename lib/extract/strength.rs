//! Strength reduction: the exponential-search fallback of the extraction
//! algorithm.
//!
//! When no output wire carries a bare, reducible path variable, a change of
//! summation variables can sometimes create one: substituting `z ← y ⊕ z`
//! for a subset of the other path variables is a bijection on path
//! assignments, so it is always sound, and for the right subset it cancels
//! the occurrences of `y` that block reduction. The search enumerates
//! subsets by increasing size and lexicographic order, so the smallest fix
//! wins. Worst case combinatorial in the number of path variables; this is
//! the only non-polynomial step of the pipeline, and the search is
//! deliberately no smarter than the subset substitution described here --
//! known-irreducible normal forms stay irreducible.

use itertools::Itertools;
use crate::{
    algebra::{ BoolPoly, Var },
    pathsum::Pathsum,
};

/// A successful strength reduction: the rewritten path-sum along with the
/// variable it was rewritten for and the substituted subset.
#[derive(Clone, Debug)]
pub(crate) struct Reduction {
    pub(crate) y: usize,
    pub(crate) subs: Vec<usize>,
    pub(crate) sop: Pathsum,
}

/// Return `true` if path variable `y` is reducible: its phase-polynomial
/// quotient coerces to GF(2) and it occurs in every output at most as a bare
/// linear term.
pub(crate) fn reducible(sop: &Pathsum, y: usize) -> bool {
    let v = Var::Path(y);
    sop.phase_poly().quotient(&v).is_boolean()
        && sop.out_vals().iter().all(|p| p.quotient(&v).degree() <= 0)
}

/// Search for a set of substitutions `z ← y ⊕ z` making some path variable
/// `y` reducible. Returns the first hit in size-then-lexicographic order,
/// or `None` if the whole space is exhausted.
pub(crate) fn attempt(sop: &Pathsum) -> Option<Reduction> {
    let n = sop.path_vars();
    for size in 1..n {
        for y in 0..n {
            let others: Vec<usize> = (0..n).filter(|z| *z != y).collect();
            for subset in others.into_iter().combinations(size) {
                let mut cand = sop.clone();
                for z in subset.iter() {
                    let p =
                        BoolPoly::var(Var::Path(y))
                        + BoolPoly::var(Var::Path(*z));
                    cand.substitute(&Var::Path(*z), &p);
                }
                if reducible(&cand, y) {
                    return Some(Reduction { y, subs: subset, sop: cand });
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ algebra::PhasePoly, phase::Phase };

    #[test]
    fn reducible_checks_quotients() {
        let sop = Pathsum::hadamard();
        // quotient of y0 is π·x0: boolean, and y0 is bare on the output
        assert!(reducible(&sop, 0));

        let mut sop = Pathsum::hadamard();
        sop.phase_poly.add_term(
            [Var::Input(0), Var::Path(0)].into_iter().collect(),
            Phase::pi4(),
        );
        assert!(!reducible(&sop, 0));
    }

    #[test]
    fn finds_linear_cancellation() {
        // out = [y0 ⊕ y1, y1], phase = π·x0·y0: substituting y1 ← y0 ⊕ y1
        // cancels y0 out of the first output, leaving it bare on no wire but
        // reducible, with y1 restored by the corrective CNOT downstream
        let mut sop = Pathsum::identity(2);
        sop.path_vars = 2;
        sop.sde = 2;
        sop.out_vals[0] =
            BoolPoly::var(Var::Path(0)) + BoolPoly::var(Var::Path(1));
        sop.out_vals[1] = BoolPoly::var(Var::Path(1));
        sop.phase_poly = PhasePoly::zero();
        sop.phase_poly.add_term(
            [Var::Input(0), Var::Path(0)].into_iter().collect(),
            Phase::pi(),
        );
        let red = attempt(&sop).expect("search should find a substitution");
        assert_eq!(red.subs.len(), 1);
        assert!(reducible(&red.sop, red.y));
    }

    #[test]
    fn exhausted_search_returns_none() {
        // a single path variable has no candidate subsets
        let mut sop = Pathsum::hadamard();
        sop.phase_poly.add_term(
            [Var::Input(0), Var::Path(0)].into_iter().collect(),
            Phase::pi4(),
        );
        assert!(attempt(&sop).is_none());
    }
}
