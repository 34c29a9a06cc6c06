//! Projective Z-basis measurement of a single tableau column.
//!
//! A measurement of qubit *k* is random exactly when some stabilizer carries an
//! X or Y on *k* (i.e. anticommutes with *Z<sub>k</sub>*); otherwise ±*Z<sub>k</sub>*
//! is already in the stabilizer group and the outcome is read off by
//! multiplying together the stabilizers paired with every destabilizer that
//! anticommutes with *Z<sub>k</sub>*.

use ndarray as nd;
use rand::Rng;
use tracing::debug;
use crate::tableau::Tableau;

/// The result of a measurement, generated by [`Tableau::measure`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// A deterministic outcome resulting in ∣0⟩
    Det0,
    /// A deterministic outcome resulting in ∣1⟩
    Det1,
    /// A random outcome resulting in ∣0⟩
    Rand0,
    /// A random outcome resulting in ∣1⟩
    Rand1,
}

impl Outcome {
    pub(crate) fn new(deterministic: bool, bit: bool) -> Self {
        match (deterministic, bit) {
            (true,  false) => Self::Det0,
            (true,  true ) => Self::Det1,
            (false, false) => Self::Rand0,
            (false, true ) => Self::Rand1,
        }
    }

    /// Return the measured bit (`true` for ∣1⟩).
    pub fn bit(self) -> bool { matches!(self, Self::Det1 | Self::Rand1) }

    /// Return `true` if the outcome was fixed before measurement.
    pub fn is_deterministic(self) -> bool {
        matches!(self, Self::Det0 | Self::Det1)
    }
}

impl Tableau {
    // first stabilizer row with an X bit on qubit `k`, if any
    fn first_anticommuting(&self, k: usize) -> Option<usize> {
        (self.n..2 * self.n).find(|&i| self.x(i, k))
    }

    /// Return the outcome of a Z-basis measurement of qubit `k` if it is
    /// deterministic, without changing the state.
    pub fn determined(&self, k: usize) -> Option<bool> {
        self.first_anticommuting(k).is_none()
            .then(|| self.deterministic_outcome(k))
    }

    // only meaningful when no stabilizer anticommutes with Z_k
    fn deterministic_outcome(&self, k: usize) -> bool {
        let mut acc: nd::Array1<bool> = nd::Array1::from_elem(2 * self.n + 1, false);
        (0..self.n)
            .filter(|&i| self.x(i, k))
            .for_each(|i| { self.fold_row_into(&mut acc, i + self.n); });
        acc[2 * self.n]
    }

    /// Perform a projective measurement on a qubit `k` in the Z-basis,
    /// returning the outcome of the measurement.
    ///
    /// Random outcomes are drawn as a fair coin from `rng`. Either way, an
    /// immediate repeat measurement of `k` is deterministic with the same
    /// outcome.
    pub fn measure<R>(&mut self, k: usize, rng: &mut R) -> Outcome
    where R: Rng + ?Sized
    {
        let Some(p) = self.first_anticommuting(k) else {
            let bit = self.deterministic_outcome(k);
            debug!(qubit = k, outcome = bit, "deterministic measurement");
            return Outcome::new(true, bit);
        };

        let bit: bool = rng.gen();
        let collisions: Vec<usize>
            = (0..2 * self.n)
            .filter(|&i| i != p && self.x(i, k))
            .collect();
        for i in collisions {
            self.set_row_sum(i, p);
        }
        let (zk, rc) = (self.zcol(k), self.rcol());
        self.row_copy(p, p - self.n)
            .row_clear(p)
            .set(p, zk, true)
            .set(p, rc, bit);
        debug!(qubit = k, outcome = bit, "random measurement");
        Outcome::new(false, bit)
    }
}
