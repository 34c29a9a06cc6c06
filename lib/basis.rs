//! Measurements and assertions on multi-qubit Pauli observables.
//!
//! A tensor product *P*<sub>1</sub> ⊗ ... ⊗ *P*<sub>k</sub> is reduced to a
//! single Z-basis measurement by borrowing an ancilla in ∣0⟩ and accumulating
//! the parity of every factor onto it with Clifford conjugations. Reading the
//! ancilla then has the same outcome distribution as reading the full
//! observable, after which the same conjugations are applied again to hand the
//! ancilla back in ∣0⟩.

use itertools::Itertools;
use rand::Rng;
use tracing::debug;
use crate::{
    alloc::{ QubitAllocator, QubitId },
    error::{ ChpError, ChpResult },
    gate::Pauli,
    measure::Outcome,
    simulator::Simulator,
};

/// Tolerance used by [`Simulator::assert`].
pub const ASSERT_TOLERANCE: f64 = 1e-10;

// position of the only non-identity factor, if it is a Z
fn single_z(bases: &[Pauli]) -> Option<usize> {
    if bases.iter().any(|b| matches!(b, Pauli::X | Pauli::Y)) {
        return None;
    }
    let mut zs = bases.iter().positions(|b| *b == Pauli::Z);
    match (zs.next(), zs.next()) {
        (Some(i), None) => Some(i),
        _ => None,
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Expectation {
    Det0,
    Det1,
    Random,
}

impl Expectation {
    fn classify(p0: f64, tol: f64) -> ChpResult<Self> {
        if (p0 - 0.0).abs() < tol {
            Ok(Self::Det1)
        } else if (p0 - 0.5).abs() < tol {
            Ok(Self::Random)
        } else if (p0 - 1.0).abs() < tol {
            Ok(Self::Det0)
        } else {
            Err(ChpError::InvalidAssertionParameter {
                probability: p0,
                tolerance: tol,
            })
        }
    }

    fn is_met_by(self, determined: Option<bool>) -> bool {
        matches!(
            (self, determined),
            (Self::Det0, Some(false)) | (Self::Det1, Some(true)) | (Self::Random, None)
        )
    }
}

fn describe(determined: Option<bool>) -> &'static str {
    match determined {
        Some(false) => "deterministic 0",
        Some(true) => "deterministic 1",
        None => "random",
    }
}

impl<A, R> Simulator<A, R>
where
    A: QubitAllocator,
    R: Rng,
{
    // at most one factor per qubit, or the second parity pass does not
    // disentangle the ancilla
    fn check_bases(bases: &[Pauli], qubits: &[QubitId]) -> ChpResult<()> {
        if bases.len() != qubits.len() {
            return Err(ChpError::BasisLengthMismatch {
                bases: bases.len(),
                qubits: qubits.len(),
            });
        }
        match qubits.iter().duplicates().next() {
            Some(q) => Err(ChpError::unsupported(format!(
                "joint Pauli observable names qubit {} more than once", q))),
            None => Ok(()),
        }
    }

    // CNOT the parity of every factor onto `anc`; applying this twice is the
    // identity
    fn entangle_parity(&mut self, bases: &[Pauli], idxs: &[usize], anc: usize) {
        for (basis, &q) in bases.iter().zip(idxs) {
            match basis {
                Pauli::I => { },
                Pauli::Z => { self.tableau.apply_cnot(q, anc); },
                Pauli::X => {
                    self.tableau
                        .apply_h(q)
                        .apply_cnot(q, anc)
                        .apply_h(q);
                },
                Pauli::Y => {
                    self.tableau
                        .apply_sinv(q)
                        .apply_h(q)
                        .apply_cnot(q, anc)
                        .apply_h(q)
                        .apply_s(q);
                },
            }
        }
    }

    // borrow an ancilla for the duration of `f`; it is released on every path,
    // and `f` must return it in ∣0⟩
    fn with_ancilla<T, F>(&mut self, f: F) -> ChpResult<T>
    where F: FnOnce(&mut Self, QubitId) -> ChpResult<T>
    {
        let anc
            = self.alloc.allocate()
            .map_err(|err| match err {
                ChpError::CapacityExceeded { .. } => ChpError::AllocatorExhausted,
                err => err,
            })?;
        debug!(ancilla = %anc, "borrowed ancilla");
        let res = f(self, anc);
        let released = self.alloc.release(anc);
        debug!(ancilla = %anc, "released ancilla");
        let out = res?;
        released.map(|_| out)
    }

    /// Measure the joint Pauli observable `bases[0] ⊗ bases[1] ⊗ ...` on
    /// `qubits`.
    ///
    /// A lone Z factor is measured directly; anything else borrows one ancilla
    /// from the allocator, failing with [`ChpError::AllocatorExhausted`] if
    /// none is free. The register is left in the collapsed state consistent
    /// with having measured only the requested observable.
    pub fn measure(&mut self, bases: &[Pauli], qubits: &[QubitId])
        -> ChpResult<Outcome>
    {
        Self::check_bases(bases, qubits)?;
        let idxs = self.indices_of(qubits)?;
        if let Some(i) = single_z(bases) {
            return Ok(self.tableau.measure(idxs[i], &mut self.rng));
        }
        let outcome = self.with_ancilla(|sim, anc| {
            let a = sim.index_of(anc)?;
            sim.entangle_parity(bases, &idxs, a);
            let outcome = sim.tableau.measure(a, &mut sim.rng);
            sim.entangle_parity(bases, &idxs, a);
            Ok(outcome)
        })?;
        debug!(
            bases = %bases.iter().join(""),
            outcome = outcome.bit(),
            deterministic = outcome.is_deterministic(),
            "joint measurement",
        );
        Ok(outcome)
    }

    /// Assert that measuring the joint Pauli observable on `qubits` would give
    /// `expected` with certainty.
    ///
    /// Shorthand for [`Self::assert_prob`] with probability 1 (`expected ==
    /// false`) or 0 (`expected == true`) of measuring zero.
    pub fn assert(
        &mut self,
        bases: &[Pauli],
        qubits: &[QubitId],
        expected: bool,
        msg: &str,
    ) -> ChpResult<()>
    {
        let p0 = if expected { 0.0 } else { 1.0 };
        self.assert_prob(bases, qubits, p0, msg, ASSERT_TOLERANCE)
    }

    /// Assert that measuring the joint Pauli observable on `qubits` would give
    /// zero with probability `p0`.
    ///
    /// Only 0, 1/2, and 1 are meaningful for stabilizer states; any `p0` more
    /// than `tol` away from all three fails with
    /// [`ChpError::InvalidAssertionParameter`]. A probability of 0 or 1 expects
    /// a deterministic outcome of 1 or 0 respectively, and 1/2 expects a random
    /// one. The state of the register is not changed, even on failure.
    pub fn assert_prob(
        &mut self,
        bases: &[Pauli],
        qubits: &[QubitId],
        p0: f64,
        msg: &str,
        tol: f64,
    ) -> ChpResult<()>
    {
        let expect = Expectation::classify(p0, tol)?;
        Self::check_bases(bases, qubits)?;
        let idxs = self.indices_of(qubits)?;
        if let Some(i) = single_z(bases) {
            let determined = self.tableau.determined(idxs[i]);
            debug!(?expect, observed = describe(determined), "assertion");
            return if expect.is_met_by(determined) {
                Ok(())
            } else {
                Err(ChpError::AssertionFailed(format!(
                    "{msg} (expected {expect:?}, observed {})",
                    describe(determined),
                )))
            };
        }
        self.with_ancilla(|sim, anc| {
            let a = sim.index_of(anc)?;
            sim.entangle_parity(bases, &idxs, a);
            let res = sim.assert_prob(&[Pauli::Z], &[anc], p0, msg, tol);
            sim.entangle_parity(bases, &idxs, a);
            res
        })
    }
}

#[cfg(test)]
mod test {
    use crate::simulator::SimConfig;
    use super::*;

    fn sim(capacity: usize) -> Simulator {
        Simulator::new(SimConfig::default().with_capacity(capacity).with_seed(10546))
    }

    fn bell(sim: &mut Simulator) -> Vec<QubitId> {
        let q = sim.allocate_qubits(2).unwrap();
        sim.h(q[0]).unwrap().cnot(q[0], q[1]).unwrap();
        q
    }

    #[test]
    fn single_z_detection() {
        use Pauli::*;
        assert_eq!(single_z(&[I, Z, I]), Some(1));
        assert_eq!(single_z(&[Z]), Some(0));
        assert_eq!(single_z(&[Z, Z]), None);
        assert_eq!(single_z(&[X, Z]), None);
        assert_eq!(single_z(&[I, I]), None);
        assert_eq!(single_z(&[]), None);
    }

    #[test]
    fn classify_probabilities() {
        assert_eq!(Expectation::classify(1.0, 1e-10), Ok(Expectation::Det0));
        assert_eq!(Expectation::classify(0.0, 1e-10), Ok(Expectation::Det1));
        assert_eq!(Expectation::classify(0.5 + 1e-12, 1e-10), Ok(Expectation::Random));
        assert!(matches!(
            Expectation::classify(0.25, 1e-10),
            Err(ChpError::InvalidAssertionParameter { .. }),
        ));
        assert!(Expectation::classify(f64::NAN, 1e-10).is_err());
    }

    #[test]
    fn lone_z_needs_no_ancilla() {
        let mut sim = sim(1);
        let q = sim.allocate_qubits(1).unwrap()[0];
        sim.x(q).unwrap();
        assert_eq!(sim.measure(&[Pauli::Z], &[q]), Ok(Outcome::Det1));
        sim.assert(&[Pauli::Z], &[q], true, "flipped").unwrap();
    }

    #[test]
    fn x_and_y_eigenstates() {
        let mut sim = sim(3);
        let q = sim.allocate_qubits(2).unwrap();
        sim.h(q[0]).unwrap();
        sim.x(q[1]).unwrap().h(q[1]).unwrap();
        assert_eq!(sim.measure(&[Pauli::X], &[q[0]]), Ok(Outcome::Det0));
        assert_eq!(sim.measure(&[Pauli::X], &[q[1]]), Ok(Outcome::Det1));
        sim.s(q[0]).unwrap();
        sim.s(q[1]).unwrap();
        assert_eq!(sim.measure(&[Pauli::Y], &[q[0]]), Ok(Outcome::Det0));
        assert_eq!(sim.measure(&[Pauli::Y], &[q[1]]), Ok(Outcome::Det1));
        assert_eq!(sim.num_live(), 2);
    }

    #[test]
    fn bell_pair_parities() {
        let mut sim = sim(3);
        let q = bell(&mut sim);
        let before = sim.tableau().clone();
        assert_eq!(sim.measure(&[Pauli::X, Pauli::X], &q), Ok(Outcome::Det0));
        assert_eq!(sim.measure(&[Pauli::Z, Pauli::Z], &q), Ok(Outcome::Det0));
        assert_eq!(sim.measure(&[Pauli::Y, Pauli::Y], &q), Ok(Outcome::Det1));
        assert_eq!(sim.tableau(), &before);
    }

    #[test]
    fn joint_collapse_is_idempotent() {
        let mut sim = sim(3);
        let q = sim.allocate_qubits(2).unwrap();
        for bases in [[Pauli::X, Pauli::X], [Pauli::Y, Pauli::Z], [Pauli::Y, Pauli::I]] {
            let first = sim.measure(&bases, &q).unwrap();
            let second = sim.measure(&bases, &q).unwrap();
            assert!(second.is_deterministic());
            assert_eq!(first.bit(), second.bit());
        }
    }

    #[test]
    fn ancilla_returned_clean() {
        let mut sim = sim(3);
        let q = sim.allocate_qubits(2).unwrap();
        for _ in 0..16 {
            sim.measure(&[Pauli::Y, Pauli::X], &q).unwrap();
            assert_eq!(sim.num_live(), 2);
            let anc = sim.allocate_qubits(1).unwrap()[0];
            assert_eq!(sim.m(anc), Ok(Outcome::Det0));
            sim.release_qubits(&[anc]).unwrap();
        }
    }

    #[test]
    fn assertions_leave_state() {
        let mut sim = sim(3);
        let q = bell(&mut sim);
        let before = sim.tableau().clone();
        sim.assert(&[Pauli::Y, Pauli::Y], &q, true, "YY").unwrap();
        sim.assert_prob(&[Pauli::Z, Pauli::I], &q, 0.5, "Z0", 1e-6).unwrap();
        sim.assert_prob(&[Pauli::X, Pauli::I], &q, 0.5, "X0", 1e-6).unwrap();
        assert!(matches!(
            sim.assert(&[Pauli::Z, Pauli::Z], &q, true, "ZZ"),
            Err(ChpError::AssertionFailed(_)),
        ));
        assert_eq!(sim.tableau(), &before);
        assert_eq!(sim.num_live(), 2);
    }

    #[test]
    fn determinism_mismatch_fails() {
        let mut sim = sim(2);
        let q = sim.allocate_qubits(1).unwrap();
        assert!(matches!(
            sim.assert_prob(&[Pauli::Z], &q, 0.5, "fresh", 1e-6),
            Err(ChpError::AssertionFailed(_)),
        ));
        sim.h(q[0]).unwrap();
        assert!(matches!(
            sim.assert_prob(&[Pauli::Z], &q, 1.0, "plus", 1e-6),
            Err(ChpError::AssertionFailed(_)),
        ));
        assert!(matches!(
            sim.assert(&[Pauli::X], &q, true, "plus"),
            Err(ChpError::AssertionFailed(_)),
        ));
        assert_eq!(sim.num_live(), 1);
    }

    #[test]
    fn invalid_probability_rejected() {
        let mut sim = sim(2);
        let q = sim.allocate_qubits(1).unwrap();
        assert_eq!(
            sim.assert_prob(&[Pauli::X], &q, 0.3, "bad", 1e-3),
            Err(ChpError::InvalidAssertionParameter { probability: 0.3, tolerance: 1e-3 }),
        );
    }

    #[test]
    fn ancilla_exhaustion() {
        let mut sim = sim(2);
        let q = sim.allocate_qubits(2).unwrap();
        let before = sim.tableau().clone();
        assert_eq!(
            sim.measure(&[Pauli::X, Pauli::Z], &q),
            Err(ChpError::AllocatorExhausted),
        );
        assert_eq!(
            sim.assert(&[Pauli::Z, Pauli::Z], &q, false, "full"),
            Err(ChpError::AllocatorExhausted),
        );
        assert_eq!(sim.measure(&[Pauli::I, Pauli::Z], &q), Ok(Outcome::Det0));
        assert_eq!(sim.tableau(), &before);
    }

    #[test]
    fn repeated_qubit_rejected() {
        let mut sim = sim(2);
        let q = sim.allocate_qubits(1).unwrap()[0];
        let before = sim.tableau().clone();
        assert!(matches!(
            sim.measure(&[Pauli::X, Pauli::Z], &[q, q]),
            Err(ChpError::UnsupportedOperation(_)),
        ));
        assert!(matches!(
            sim.assert(&[Pauli::Z, Pauli::Z], &[q, q], false, "ZZ"),
            Err(ChpError::UnsupportedOperation(_)),
        ));
        assert_eq!(sim.tableau(), &before);
        assert_eq!(sim.num_live(), 1);
        let anc = sim.allocate_qubits(1).unwrap()[0];
        assert_eq!(sim.m(anc), Ok(Outcome::Det0));
    }

    #[test]
    fn basis_length_checked() {
        let mut sim = sim(3);
        let q = sim.allocate_qubits(2).unwrap();
        assert_eq!(
            sim.measure(&[Pauli::Z], &q),
            Err(ChpError::BasisLengthMismatch { bases: 1, qubits: 2 }),
        );
    }
}
