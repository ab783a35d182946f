//! Validation-only evaluation of path-sums and circuits to dense matrices.
//!
//! Nothing in the extraction pipeline depends on this module; it exists so
//! that tests (and doubtful users) can cross-check the algebra against
//! brute-force linear algebra. The two evaluators are deliberately
//! independent: [`pathsum_matrix`] enumerates input and path assignments of
//! the polynomial data, while [`circuit_matrix`] applies gates directly to
//! basis states, so agreement between them is meaningful.
//!
//! Wire `i` is bit `i` of the basis index (little-endian). Cost is
//! exponential in the wire and path-variable counts; keep inputs small.

use std::f64::consts::FRAC_1_SQRT_2;
use ndarray::Array2;
use num_complex::Complex64 as C64;
use rustc_hash::FxHashMap;
use crate::{
    algebra::Var,
    circuit::{ Circuit, Gate },
    pathsum::Pathsum,
};

/// Evaluate a path-sum to its matrix by brute-force enumeration.
pub fn pathsum_matrix(sop: &Pathsum) -> Array2<C64> {
    let rows = 1_usize << sop.out_deg();
    let cols = 1_usize << sop.in_deg();
    let paths = 1_usize << sop.path_vars();
    let scale = 2.0_f64.powf(-f64::from(sop.sde()) / 2.0);
    let mut mat: Array2<C64> = Array2::zeros((rows, cols));
    for x in 0..cols {
        for y in 0..paths {
            let assign = |v: &Var| match v {
                Var::Input(i) => (x >> i) & 1 == 1,
                Var::Path(i) => (y >> i) & 1 == 1,
                Var::Free(_) => false,
            };
            let ph = sop.phase_poly().eval(assign);
            let mut row = 0_usize;
            for (i, p) in sop.out_vals().iter().enumerate() {
                if p.eval(assign) { row |= 1 << i; }
            }
            mat[[row, x]] += scale * ph.cis();
        }
    }
    mat
}

fn apply_gate(mat: &mut Array2<C64>, gate: &Gate, index: &FxHashMap<&str, usize>) {
    let dim = mat.nrows();
    let bit = |w: &String| 1_usize << index[w.as_str()];
    let toggle_rows = |mat: &mut Array2<C64>, ctrl: usize, tgt: usize| {
        for r in 0..dim {
            if r & ctrl == ctrl && r & tgt == 0 {
                let r1 = r | tgt;
                for c in 0..dim {
                    mat.swap([r, c], [r1, c]);
                }
            }
        }
    };
    match gate {
        Gate::H(w) => {
            let bw = bit(w);
            for r in 0..dim {
                if r & bw == 0 {
                    let r1 = r | bw;
                    for c in 0..dim {
                        let a = mat[[r, c]];
                        let b = mat[[r1, c]];
                        mat[[r, c]] = (a + b) * FRAC_1_SQRT_2;
                        mat[[r1, c]] = (a - b) * FRAC_1_SQRT_2;
                    }
                }
            }
        },
        Gate::X(w) => { toggle_rows(mat, 0, bit(w)); },
        Gate::Cx(c, t) => { toggle_rows(mat, bit(c), bit(t)); },
        Gate::Ccx(c0, c1, t) => {
            toggle_rows(mat, bit(c0) | bit(c1), bit(t));
        },
        Gate::Mct(cs, t) => {
            let ctrl = cs.iter().fold(0_usize, |acc, c| acc | bit(c));
            toggle_rows(mat, ctrl, bit(t));
        },
        Gate::Swap(a, b) => {
            let (ba, bb) = (bit(a), bit(b));
            for r in 0..dim {
                if r & ba != 0 && r & bb == 0 {
                    let r1 = (r & !ba) | bb;
                    for c in 0..dim {
                        mat.swap([r, c], [r1, c]);
                    }
                }
            }
        },
        Gate::Phase(a, ws) => {
            let ctrl = ws.iter().fold(0_usize, |acc, w| acc | bit(w));
            let z = a.cis();
            for r in 0..dim {
                if r & ctrl == ctrl {
                    for c in 0..dim {
                        mat[[r, c]] *= z;
                    }
                }
            }
        },
    }
}

/// Evaluate a circuit to its matrix by applying gates to basis states.
pub fn circuit_matrix(circ: &Circuit) -> Array2<C64> {
    let index: FxHashMap<&str, usize> =
        circ.wires().iter()
        .enumerate()
        .map(|(i, w)| (w.as_str(), i))
        .collect();
    let dim = 1_usize << circ.wires().len();
    let mut mat: Array2<C64> = Array2::eye(dim);
    for gate in circ.gates().iter() {
        apply_gate(&mut mat, gate, &index);
    }
    mat
}

/// Return `true` if two matrices agree entrywise within `tol`.
pub fn approx_eq(a: &Array2<C64>, b: &Array2<C64>, tol: f64) -> bool {
    a.shape() == b.shape()
        && a.iter().zip(b.iter()).all(|(x, y)| (x - y).norm() <= tol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::resynthesize;

    const TOL: f64 = 1e-9;

    #[test]
    fn identity_matrix() {
        let mat = pathsum_matrix(&Pathsum::identity(2));
        assert!(approx_eq(&mat, &Array2::eye(4), TOL));
    }

    #[test]
    fn hadamard_matrix() {
        let mat = pathsum_matrix(&Pathsum::hadamard());
        let mut expected: Array2<C64> =
            Array2::from_elem((2, 2), C64::new(FRAC_1_SQRT_2, 0.0));
        expected[[1, 1]] = C64::new(-FRAC_1_SQRT_2, 0.0);
        assert!(approx_eq(&mat, &expected, TOL));
    }

    #[test]
    fn evaluators_agree() {
        let mut circ = Circuit::new(["q0", "q1"]).unwrap();
        circ.extend([
            Gate::h("q0"),
            Gate::t("q0"),
            Gate::cx("q0", "q1"),
            Gate::s("q1"),
            Gate::h("q1"),
            Gate::cz("q0", "q1"),
        ]).unwrap();
        let by_gates = circuit_matrix(&circ);
        let by_sop = pathsum_matrix(&circ.to_pathsum().unwrap());
        assert!(approx_eq(&by_gates, &by_sop, TOL));
    }

    #[test]
    fn grind_preserves_matrix() {
        let mut circ = Circuit::new(["q0"]).unwrap();
        circ.extend([Gate::h("q0"), Gate::s("q0"), Gate::h("q0")]).unwrap();
        let mut sop = circ.to_pathsum().unwrap();
        let before = pathsum_matrix(&sop);
        sop.grind();
        let after = pathsum_matrix(&sop);
        assert!(approx_eq(&before, &after, TOL));
    }

    #[test]
    fn extraction_preserves_matrix() {
        let mut circ = Circuit::new(["x", "y"]).unwrap();
        circ.extend([
            Gate::h("x"),
            Gate::cs("x", "y"),
            Gate::h("y"),
            Gate::cx("y", "x"),
        ]).unwrap();
        let extracted = resynthesize(&circ).unwrap().unwrap();
        assert_eq!(extracted.wires(), circ.wires());
        assert!(approx_eq(
            &circuit_matrix(&circ),
            &circuit_matrix(&extracted),
            TOL,
        ));
    }

    #[test]
    fn extraction_preserves_matrix_cnot_h() {
        let mut circ = Circuit::new(["q0", "q1"]).unwrap();
        circ.extend([Gate::cx("q0", "q1"), Gate::h("q0")]).unwrap();
        let extracted = resynthesize(&circ).unwrap().unwrap();
        assert!(approx_eq(
            &circuit_matrix(&circ),
            &circuit_matrix(&extracted),
            TOL,
        ));
    }

    #[test]
    fn mct_decomposition_borrows_scratch() {
        let mut circ = Circuit::new(["a", "b", "c", "d"]).unwrap();
        circ.push(Gate::mct(["a", "b", "c"], "d")).unwrap();
        let extracted = resynthesize(&circ).unwrap().unwrap();
        // one borrowed scratch wire, restored to its input value
        assert_eq!(extracted.wires().len(), 5);
        assert!(extracted.gates().iter().all(|g| !g.is_mct()));
        let big = circuit_matrix(&extracted);
        let orig = circuit_matrix(&circ);
        let mask = (1 << 4) - 1;
        let dim = 1 << 5;
        for r in 0..dim {
            for c in 0..dim {
                let expected =
                    if r >> 4 == c >> 4 {
                        orig[[r & mask, c & mask]]
                    } else {
                        C64::new(0.0, 0.0)
                    };
                assert!((big[[r, c]] - expected).norm() <= TOL);
            }
        }
    }
}
