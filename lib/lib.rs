//! This package compiles quantum circuits to and from the *balanced
//! path-sum* representation: an algebraic normal form describing a linear
//! operator as a phase-weighted sum over existentially bound boolean "path"
//! variables.
//!
//! - [`circuit`] provides ordinary gate-sequence descriptions of quantum
//! circuits over named wires, and folds them into path-sums.
//! - [`pathsum`] implements the normal-form value type, its composition
//! operators (tensor, sequential, branch-sum), and the confluent rewrite
//! engine ([`grind`][pathsum::Pathsum::grind]) that reduces path-sums to
//! minimal form.
//! - [`extract`] re-synthesizes a gate sequence from a normalized path-sum
//! through a multi-pass, possibly-backtracking procedure.
//! - [`sim`] evaluates both representations to dense matrices, as a
//! validation utility only.
//!
//! Compiling a gate sequence into a path-sum, normalizing, and extracting it
//! again is the verification workflow: the extracted circuit realizes the
//! same operator by construction, and normalizing a circuit against the
//! inverse of another decides equivalence whenever the normal form reaches
//! the identity
//! ([`check_equivalence`][circuit::check_equivalence]).
//!
//! # Example
//!
//! ```
//! use pathsum_calc::{ circuit::{ Circuit, Gate }, extract };
//!
//! let mut circ = Circuit::new(["q0", "q1"]).unwrap();
//! circ.extend([
//!     Gate::cx("q0", "q1"),
//!     Gate::h("q0"),
//! ]).unwrap();
//!
//! let resynth = extract::resynthesize(&circ).unwrap()
//!     .expect("extraction failed to resolve the path-sum");
//! assert!(pathsum_calc::circuit::check_equivalence(&circ, &resynth).unwrap());
//! ```
//!
//! # See also
//! - [Feynman](https://github.com/meamy/feynman): a Haskell toolkit for
//! path-sum based verification and optimization.
//! - [QuiZX](https://github.com/zxcalc/quizx): circuit rewriting in Rust via
//! the ZX-calculus.
//!
//! # Further reading
//! - M. Amy, "Towards Large-scale Functional Verification of Universal
//! Quantum Circuits." [arXiv:1805.06908](https://arxiv.org/abs/1805.06908)
//! - M. Amy, "Formal Methods in Quantum Circuit Design." (PhD thesis,
//! University of Waterloo, 2019)

pub mod phase;
pub mod algebra;
pub mod pathsum;
pub mod circuit;
pub mod extract;
pub mod sim;
