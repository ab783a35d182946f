//! GF(2) linear algebra backing the affine synthesis passes.
//!
//! Row-reducing the output matrix of a path-sum and synthesizing the
//! reversible circuit for its inverse are the same computation: every
//! elementary row operation of the reduction corresponds to one reversible
//! gate (row add → CNOT, row swap → SWAP), so [`BitMat::rref`] returns the
//! operation trace for the caller to replay as gates.

use ndarray::Array2;

/// An elementary row operation over GF(2).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum RowOp {
    /// Exchange two rows.
    Swap(usize, usize),
    /// XOR the first row into the second.
    Add(usize, usize),
}

/// A dense bit matrix over GF(2).
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BitMat {
    pub(crate) mat: Array2<u8>,
}

impl BitMat {
    pub(crate) fn zeros(rows: usize, cols: usize) -> Self {
        Self { mat: Array2::zeros((rows, cols)) }
    }

    pub(crate) fn rows(&self) -> usize { self.mat.nrows() }

    pub(crate) fn cols(&self) -> usize { self.mat.ncols() }

    pub(crate) fn get(&self, r: usize, c: usize) -> bool {
        self.mat[[r, c]] != 0
    }

    pub(crate) fn set(&mut self, r: usize, c: usize, b: bool) {
        self.mat[[r, c]] = u8::from(b);
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b { return; }
        for c in 0..self.cols() {
            self.mat.swap([a, c], [b, c]);
        }
    }

    fn add_row(&mut self, src: usize, tgt: usize) {
        for c in 0..self.cols() {
            self.mat[[tgt, c]] ^= self.mat[[src, c]];
        }
    }

    /// Bring the matrix to reduced row echelon form, pivoting only on the
    /// first `pivot_cols` columns (trailing columns -- e.g. an affine
    /// constant -- ride along). Returns the operation trace.
    pub(crate) fn rref(&mut self, pivot_cols: usize) -> Vec<RowOp> {
        let mut ops: Vec<RowOp> = Vec::new();
        let mut pivot_row: usize = 0;
        for col in 0..pivot_cols.min(self.cols()) {
            if pivot_row >= self.rows() { break; }
            let Some(hit) =
                (pivot_row..self.rows()).find(|r| self.get(*r, col))
                else { continue };
            if hit != pivot_row {
                self.swap_rows(hit, pivot_row);
                ops.push(RowOp::Swap(hit, pivot_row));
            }
            for r in 0..self.rows() {
                if r != pivot_row && self.get(r, col) {
                    self.add_row(pivot_row, r);
                    ops.push(RowOp::Add(pivot_row, r));
                }
            }
            pivot_row += 1;
        }
        ops
    }

    /// Return `true` if the leading square block is the identity.
    pub(crate) fn is_identity(&self, n: usize) -> bool {
        (0..n).all(|r| {
            (0..n).all(|c| self.get(r, c) == (r == c))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_rows(rows: &[&[u8]]) -> BitMat {
        let mut bm = BitMat::zeros(rows.len(), rows[0].len());
        for (r, row) in rows.iter().enumerate() {
            for (c, b) in row.iter().enumerate() {
                bm.set(r, c, *b != 0);
            }
        }
        bm
    }

    #[test]
    fn rref_invertible_reaches_identity() {
        let mut bm = from_rows(&[
            &[1, 1, 0],
            &[0, 1, 1],
            &[1, 1, 1],
        ]);
        let ops = bm.rref(3);
        assert!(bm.is_identity(3));
        assert!(!ops.is_empty());
    }

    #[test]
    fn rref_carries_constant_column() {
        // [x0 ⊕ x1 ⊕ 1, x1] reduces to [x0 ⊕ 1, x1]
        let mut bm = from_rows(&[
            &[1, 1, 1],
            &[0, 1, 0],
        ]);
        let ops = bm.rref(2);
        assert_eq!(ops, vec![RowOp::Add(1, 0)]);
        assert!(bm.is_identity(2));
        assert!(bm.get(0, 2));
        assert!(!bm.get(1, 2));
    }

    #[test]
    fn rref_replay_matches() {
        // replaying the trace on a fresh copy reproduces the reduction
        let orig = from_rows(&[
            &[0, 1, 1, 0],
            &[1, 0, 1, 1],
            &[1, 1, 0, 0],
        ]);
        let mut reduced = orig.clone();
        let ops = reduced.rref(4);
        let mut replay = orig;
        for op in ops {
            match op {
                RowOp::Swap(a, b) => replay.swap_rows(a, b),
                RowOp::Add(s, t) => replay.add_row(s, t),
            }
        }
        assert_eq!(replay, reduced);
    }
}
