//! Rewrite rules for path-sum normalization.
//!
//! Application of particular rules is facilitated through the [`RuleFinder`]
//! and [`Rule`] traits, keeping the match and the rewrite separate so that a
//! test can assert that a rule fires without re-deriving its effect. Usually
//! their methods are not called as such; a particular rule is instead
//! represented by a unit type implementing `RuleFinder`, which is passed to
//! [`Pathsum::find_rule`] or [`Pathsum::simplify_rule`].
//!
//! The normalization procedure [`Pathsum::grind`] applies [`Elim`], the
//! solved Hadamard-Hadamard instance [`HHSolved`], and [`Omega`] in that
//! priority until none match. Every rule strictly decreases the number of
//! path variables, so the fixpoint always exists. [`Pathsum::simplify_once`]
//! is the single-shot variant, which trades [`HHSolved`] for the weaker
//! [`HHLinear`].

use crate::{
    algebra::{ BoolPoly, Var },
    pathsum::Pathsum,
    phase::Phase,
};

/// A trait for types that can inspect a [`Pathsum`] and find an instance of
/// a particular rewrite rule.
///
/// Types implementing this trait (usually unit structs) have the only purpose
/// of denoting the existence of a particular rewrite rule. The value returned
/// by [`find`][RuleFinder::find] holds a mutable reference to the path-sum it
/// will rewrite alongside the matched instance.
pub trait RuleFinder {
    /// The type representing the instantiated (but not executed) rewrite
    /// rule.
    type Output<'a>: Rule;

    /// Inspect a [`Pathsum`] to find an instance of a particular rule.
    /// Returns `None` if none exists.
    fn find(self, sop: &mut Pathsum) -> Option<Self::Output<'_>>;
}

/// A trait representing an unexecuted rewrite rule on a [`Pathsum`].
pub trait Rule {
    /// Execute the rewrite rule, consuming self and releasing the inner hold
    /// on the path-sum.
    fn simplify(self);
}

mod elim;
pub use elim::*;
mod hh;
pub use hh::*;
mod omega;
pub use omega::*;

impl Pathsum {
    /// Find an instance of a rewrite rule, if one exists.
    pub fn find_rule<R>(&mut self, rule: R) -> Option<R::Output<'_>>
    where R: RuleFinder
    {
        rule.find(self)
    }

    /// Find and apply an instance of a rewrite rule, returning `true` if the
    /// rule fired.
    pub fn simplify_rule<R>(&mut self, rule: R) -> bool
    where R: RuleFinder
    {
        if let Some(instance) = rule.find(self) {
            instance.simplify();
            true
        } else {
            false
        }
    }

    /// Normalize in place: apply [`Elim`], [`HHSolved`], and [`Omega`] --
    /// first match in that priority -- until none fires.
    ///
    /// Returns the number of rewrites applied. The result is a fixpoint, so
    /// a second `grind` returns 0 and leaves `self` unchanged.
    pub fn grind(&mut self) -> usize {
        let mut count: usize = 0;
        loop {
            if self.simplify_rule(Elim) { count += 1; continue; }
            if self.simplify_rule(HHSolved) { count += 1; continue; }
            if self.simplify_rule(Omega) { count += 1; continue; }
            break;
        }
        count
    }

    /// Apply at most one rewrite -- [`Elim`], [`HHLinear`], or [`Omega`],
    /// first match in that priority -- without cascading.
    ///
    /// Returns `true` if a rule fired.
    pub fn simplify_once(&mut self) -> bool {
        self.simplify_rule(Elim)
            || self.simplify_rule(HHLinear)
            || self.simplify_rule(Omega)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // every path index below path_vars, none at or above it
    fn contiguous(sop: &Pathsum) -> bool {
        sop.path_var_support().iter().all(|y| *y < sop.path_vars())
    }

    #[test]
    fn grind_hh_to_identity() {
        let mut sop = Pathsum::hadamard()
            .compose_rev(Pathsum::hadamard())
            .unwrap();
        let steps = sop.grind();
        assert_eq!(steps, 2);
        assert!(sop.is_trivial());
    }

    #[test]
    fn grind_idempotent() {
        let mut sop = Pathsum::hadamard()
            .compose_rev(Pathsum::sgate()).unwrap()
            .compose_rev(Pathsum::hadamard()).unwrap();
        sop.grind();
        let frozen = sop.clone();
        assert_eq!(sop.grind(), 0);
        assert_eq!(sop, frozen);
    }

    #[test]
    fn grind_preserves_contiguity() {
        let mut sop = Pathsum::hadamard()
            .compose_rev(Pathsum::hadamard()).unwrap()
            .compose_rev(Pathsum::hadamard()).unwrap()
            .compose_rev(Pathsum::tgate()).unwrap()
            .compose_rev(Pathsum::hadamard()).unwrap();
        while sop.simplify_rule(Elim)
            || sop.simplify_rule(HHSolved)
            || sop.simplify_rule(Omega)
        {
            assert!(contiguous(&sop));
        }
        assert!(contiguous(&sop));
    }

    #[test]
    fn simplify_once_single_step() {
        let mut sop = Pathsum::hadamard()
            .compose_rev(Pathsum::hadamard())
            .unwrap();
        assert!(sop.simplify_once());
        assert!(!sop.is_trivial());
        assert!(sop.simplify_once());
        assert!(sop.is_trivial());
        assert!(!sop.simplify_once());
    }
}
