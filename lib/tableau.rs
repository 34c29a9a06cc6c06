//! *N*-qubit stabilizer states in the Aaronson-Gottesman tableau
//! representation.
//!
//! In the tableau representation, states are identified not by complex
//! amplitudes but by the set of *N*-qubit Pauli operators that stabilize them,
//! of which there are *N* independent generators. Following Aaronson and
//! Gottesman[^1], these are stored alongside *N* more "destabilizers", which
//! together with the stabilizers generate the full *N*-qubit Pauli group.
//!
//! Here the tableau is a single binary matrix of size 2*N* × (2*N* + 1):
//!
//! | Rows              | Contents        |
//! | :---------------- | :-------------- |
//! | `0..N`            | destabilizers   |
//! | `N..2N`           | stabilizers     |
//!
//! | Columns           | Contents                          |
//! | :---------------- | :-------------------------------- |
//! | `0..N`            | X bit `x_j` of qubit `j`          |
//! | `N..2N`           | Z bit `z_j` of qubit `j`          |
//! | `2N`              | sign bit `r` (0 for +1, 1 for -1) |
//!
//! and the row (`x`, `z`, `r`) encodes the operator (-1)<sup>r</sup> ∏<sub>j</sub>
//! X<sub>j</sub><sup>x<sub>j</sub></sup> Z<sub>j</sub><sup>z<sub>j</sub></sup>.
//! For a row `T[i, _]`,
//!
//! | <code>T[i, j]</code> | <code>T[i, N + j]</code> | Pauli |
//! | :------------------: | :----------------------: | :---: |
//! | 0                    | 0                        | *I*   |
//! | 1                    | 0                        | *X*   |
//! | 1                    | 1                        | *Y*   |
//! | 0                    | 1                        | *Z*   |
//!
//! Nothing in this module checks the group invariants (stabilizers commute;
//! destabilizer `i` anticommutes only with stabilizer `N + i`). They hold as
//! long as all mutation goes through the gate and measurement methods in
//! [`gate`][crate::gate] and [`measure`][crate::measure].
//!
//! [^1]: [arXiv:quant-ph/0406196](https://arxiv.org/abs/quant-ph/0406196)

use std::fmt;
use itertools::Itertools;
use ndarray::{ self as nd, s };
use crate::gate::Pauli;

/// The binary destabilizer/stabilizer matrix of an *N*-qubit register.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tableau {
    pub(crate) n: usize,
    // size 2n x (2n + 1)
    pub(crate) data: nd::Array2<bool>,
}

impl Tableau {
    /// Create a new tableau of capacity `n`, initialized to ∣0...0⟩.
    pub fn new(n: usize) -> Self {
        let data: nd::Array2<bool> = nd::Array2::from_elem((2 * n, 2 * n + 1), false);
        let mut tab = Self { n, data };
        tab.set_diagonal(true);
        tab
    }

    /// Return the number of qubits.
    pub fn num_qubits(&self) -> usize { self.n }

    /// Column index of the X bit of qubit `k`.
    pub(crate) fn xcol(&self, k: usize) -> usize { k }

    /// Column index of the Z bit of qubit `k`.
    pub(crate) fn zcol(&self, k: usize) -> usize { self.n + k }

    /// Column index of the sign bit.
    pub(crate) fn rcol(&self) -> usize { 2 * self.n }

    /// Read the `(row, col)` bit.
    ///
    /// *Panics if either index is out of bounds.*
    pub fn get(&self, row: usize, col: usize) -> bool { self.data[[row, col]] }

    /// Write the `(row, col)` bit.
    ///
    /// *Panics if either index is out of bounds.*
    pub fn set(&mut self, row: usize, col: usize, val: bool) -> &mut Self {
        self.data[[row, col]] = val;
        self
    }

    /// X bit of qubit `k` in row `i`.
    pub fn x(&self, i: usize, k: usize) -> bool { self.data[[i, k]] }

    /// Z bit of qubit `k` in row `i`.
    pub fn z(&self, i: usize, k: usize) -> bool { self.data[[i, self.n + k]] }

    /// Sign bit of row `i`.
    pub fn r(&self, i: usize) -> bool { self.data[[i, 2 * self.n]] }

    /// View a full row, sign bit included.
    pub fn row(&self, i: usize) -> nd::ArrayView1<'_, bool> {
        self.data.row(i)
    }

    /// View a full column.
    pub fn column(&self, j: usize) -> nd::ArrayView1<'_, bool> {
        self.data.column(j)
    }

    /// Return an owned copy of the full matrix.
    pub fn snapshot(&self) -> nd::Array2<bool> { self.data.clone() }

    /// Exchange columns `a` and `b` across all rows.
    pub fn swap_columns(&mut self, a: usize, b: usize) -> &mut Self {
        self.data.axis_iter_mut(nd::Axis(0))
            .for_each(|mut row| { row.swap(a, b); });
        self
    }

    /// Set every `(i, i)` entry to `val`.
    pub(crate) fn set_diagonal(&mut self, val: bool) -> &mut Self {
        self.data.diag_mut().fill(val);
        self
    }

    // set row b equal to row a
    pub(crate) fn row_copy(&mut self, a: usize, b: usize) -> &mut Self {
        for mut col in self.data.axis_iter_mut(nd::Axis(1)) {
            col[b] = col[a];
        }
        self
    }

    pub(crate) fn row_clear(&mut self, i: usize) -> &mut Self {
        self.data.slice_mut(s![i, ..]).fill(false);
        self
    }

    /// Read row `i` as a signed Pauli string.
    pub fn pauli_string(&self, i: usize) -> PauliString {
        let ops: Vec<Pauli>
            = (0..self.n)
            .map(|k| Pauli::from_bits(self.x(i, k), self.z(i, k)))
            .collect();
        PauliString { neg: self.r(i), ops }
    }

    /// Convert `self` to a more human-readable destabilizer/stabilizer group
    /// representation.
    pub fn as_group(&self) -> StabGroup {
        let destab: Vec<PauliString>
            = (0..self.n).map(|i| self.pauli_string(i)).collect();
        let stab: Vec<PauliString>
            = (self.n..2 * self.n).map(|i| self.pauli_string(i)).collect();
        StabGroup { destab, stab }
    }
}

/// A single *N*-qubit Pauli operator with a ±1 sign.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PauliString {
    /// `true` for an overall sign of -1.
    pub neg: bool,
    pub ops: Vec<Pauli>,
}

impl PauliString {
    /// Return `true` if `self` and `other` commute.
    ///
    /// *Panics if the two strings have different lengths.*
    pub fn commutes_with(&self, other: &Self) -> bool {
        assert_eq!(self.ops.len(), other.ops.len());
        self.ops.iter().zip(&other.ops)
            .filter(|(a, b)| !a.commutes_with(**b))
            .count() % 2 == 0
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", if self.neg { "-" } else { "+" })?;
        self.ops.iter()
            .try_for_each(|p| fmt::Display::fmt(p, f))
    }
}

/// The complete *N*-qubit destabilizer/stabilizer groups for a given state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StabGroup {
    pub destab: Vec<PauliString>,
    pub stab: Vec<PauliString>,
}

impl fmt::Display for StabGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines
            = self.destab.iter().zip(&self.stab)
            .map(|(destab, stab)| {
                if f.alternate() {
                    format!("{:#} | {:#}", destab, stab)
                } else {
                    format!("{} | {}", destab, stab)
                }
            })
            .join("\n");
        write!(f, "{}", lines)
    }
}
