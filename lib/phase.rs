//! Sign bookkeeping for products of Pauli rows.
//!
//! XOR-ing the X/Z bits of two rows gives the Pauli content of their product,
//! but loses the sign: single-qubit factors pick up powers of *i*
//! (*XZ* = -*iY*, *ZX* = *iY*, etc.). The exponents are summed here over all
//! qubits and reduced mod 4 together with the existing signs; for two
//! commuting rows the total is always even, and a total of 2 means the
//! product carries a sign of -1.

use ndarray::{ self as nd, s };
use crate::tableau::Tableau;

/// Exponent *e* ∈ {-1, 0, 1} such that the product of the single-qubit Paulis
/// encoded by (`x1`, `z1`) and (`x2`, `z2`) is *i*<sup>*e*</sup> times the
/// Pauli encoded by (`x1 ⊕ x2`, `z1 ⊕ z2`).
pub fn pauli_product_phase(x1: bool, z1: bool, x2: bool, z2: bool) -> i32 {
    let (x2, z2) = (i32::from(x2), i32::from(z2));
    match (x1, z1) {
        (false, false) => 0,
        (true,  true ) => z2 - x2,
        (true,  false) => z2 * (2 * x2 - 1),
        (false, true ) => x2 * (1 - 2 * z2),
    }
}

/// Return the sign bit of the product `row1 · row2`, where both rows are laid
/// out as in the tableau (`n` X bits, `n` Z bits, then the sign bit).
///
/// *Panics if the rows differ in length.*
pub fn phase_product(row1: nd::ArrayView1<bool>, row2: nd::ArrayView1<bool>)
    -> bool
{
    assert_eq!(row1.len(), row2.len());
    let n = (row1.len() - 1) / 2;
    let e: i32
        = (0..n)
        .map(|j| pauli_product_phase(row1[j], row1[n + j], row2[j], row2[n + j]))
        .sum();
    let r1 = 2 * i32::from(row1[2 * n]);
    let r2 = 2 * i32::from(row2[2 * n]);
    (e + r1 + r2).rem_euclid(4) == 2
}

impl Tableau {
    /// Left-multiply row `target` by row `source`, so that `target ←
    /// target · source` in the Pauli group.
    ///
    /// *Panics if `target == source`.*
    pub fn set_row_sum(&mut self, target: usize, source: usize) -> &mut Self {
        assert_ne!(target, source, "set_row_sum: rows must be distinct");
        let r = phase_product(self.row(target), self.row(source));
        let rcol = self.rcol();
        for mut col in self.data.axis_iter_mut(nd::Axis(1)).take(rcol) {
            col[target] ^= col[source];
        }
        self.data[[target, rcol]] = r;
        self
    }

    /// Like [`Self::set_row_sum`], but with an external accumulator row as the
    /// target.
    pub(crate) fn fold_row_into(&self, acc: &mut nd::Array1<bool>, source: usize) {
        let rcol = self.rcol();
        let r = phase_product(acc.view(), self.row(source));
        nd::Zip::from(acc.slice_mut(s![..rcol]))
            .and(self.data.slice(s![source, ..rcol]))
            .for_each(|a, &b| { *a ^= b; });
        acc[rcol] = r;
    }
}
