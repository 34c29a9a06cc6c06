//! Host-facing simulator: a tableau, the allocator that owns its columns, and
//! the random number generator used for measurement outcomes.

use itertools::Itertools;
use rand::{ rngs::StdRng, Rng, SeedableRng };
use tracing::debug;
use crate::{
    alloc::{ Allocator, QubitAllocator, QubitId },
    error::{ ChpError, ChpResult },
    gate::{ Gate, Operation },
    measure::Outcome,
    tableau::{ StabGroup, Tableau },
};

/// Construction-time settings for a [`Simulator`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SimConfig {
    /// Maximum number of simultaneously live qubits.
    pub capacity: usize,
    /// Seed for the measurement RNG; drawn from OS entropy if `None`.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self { Self { capacity: 1024, seed: None } }
}

impl SimConfig {
    /// Set the register capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Main driver for applying Clifford gates and Pauli measurements to a
/// register of qubits addressed by handle.
#[derive(Clone, Debug)]
pub struct Simulator<A = Allocator, R = StdRng> {
    pub(crate) tableau: Tableau,
    pub(crate) alloc: A,
    pub(crate) rng: R,
}

impl Default for Simulator {
    fn default() -> Self { Self::new(SimConfig::default()) }
}

impl Simulator {
    /// Create a new simulator with all columns initialized to ∣0⟩ and no live
    /// qubits.
    pub fn new(config: SimConfig) -> Self {
        let rng
            = config.seed.map(StdRng::seed_from_u64)
            .unwrap_or_else(StdRng::from_entropy);
        Self::with_parts(Allocator::new(config.capacity), rng)
    }
}

impl<A> Simulator<A, StdRng>
where A: QubitAllocator
{
    /// Replace the measurement RNG with a freshly seeded one.
    pub fn reseed(&mut self, seed: u64) -> &mut Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}

impl<A, R> Simulator<A, R>
where
    A: QubitAllocator,
    R: Rng,
{
    /// Create a new simulator from an arbitrary allocator and RNG.
    ///
    /// The tableau is sized to the allocator's capacity.
    pub fn with_parts(alloc: A, rng: R) -> Self {
        let tableau = Tableau::new(alloc.capacity());
        Self { tableau, alloc, rng }
    }

    /// Return the register capacity.
    pub fn capacity(&self) -> usize { self.alloc.capacity() }

    /// Return the number of live qubits.
    pub fn num_live(&self) -> usize { self.alloc.live() }

    /// Return a read-only reference to the underlying tableau.
    pub fn tableau(&self) -> &Tableau { &self.tableau }

    /// Return the destabilizer/stabilizer generators of the full register.
    pub fn dump(&self) -> StabGroup { self.tableau.as_group() }

    pub(crate) fn index_of(&self, qubit: QubitId) -> ChpResult<usize> {
        self.alloc.index_of(qubit)
    }

    pub(crate) fn indices_of(&self, qubits: &[QubitId]) -> ChpResult<Vec<usize>> {
        qubits.iter().map(|q| self.index_of(*q)).collect()
    }

    /// Allocate `n` qubits.
    ///
    /// Fails without allocating anything if fewer than `n` are available.
    pub fn allocate_qubits(&mut self, n: usize) -> ChpResult<Vec<QubitId>> {
        let qubits = self.alloc.allocate_many(n)?;
        debug!(count = n, live = self.alloc.live(), "allocate_qubits");
        Ok(qubits)
    }

    /// Release qubits back to the allocator.
    ///
    /// Fails without releasing anything if any handle is not live or appears
    /// more than once. Qubits are not reset; they should be returned in ∣0⟩.
    pub fn release_qubits(&mut self, qubits: &[QubitId]) -> ChpResult<()> {
        self.indices_of(qubits)?;
        if let Some(q) = qubits.iter().duplicates().next() {
            return Err(ChpError::UnknownQubit(*q));
        }
        qubits.iter().try_for_each(|q| self.alloc.release(*q))?;
        debug!(count = qubits.len(), live = self.alloc.live(), "release_qubits");
        Ok(())
    }

    /// Perform the action of a host-level operation.
    ///
    /// Fails before touching the tableau if the operation is unsupported or
    /// names a qubit that is not live.
    pub fn apply(&mut self, op: &Operation) -> ChpResult<&mut Self> {
        let gate: Gate = op.to_gate(|q| self.index_of(q))?;
        self.tableau.apply_gate(gate);
        Ok(self)
    }

    /// Perform a series of host-level operations, stopping at the first
    /// failure.
    pub fn apply_all<'a, I>(&mut self, ops: I) -> ChpResult<&mut Self>
    where I: IntoIterator<Item = &'a Operation>
    {
        for op in ops { self.apply(op)?; }
        Ok(self)
    }

    /// Apply a Hadamard gate.
    pub fn h(&mut self, q: QubitId) -> ChpResult<&mut Self> {
        self.apply(&Operation::H(q))
    }

    /// Apply an S gate.
    pub fn s(&mut self, q: QubitId) -> ChpResult<&mut Self> {
        self.apply(&Operation::S(q))
    }

    /// Apply an S<sup>†</sup> gate.
    pub fn s_adj(&mut self, q: QubitId) -> ChpResult<&mut Self> {
        self.apply(&Operation::SAdjoint(q))
    }

    /// Apply an X gate.
    pub fn x(&mut self, q: QubitId) -> ChpResult<&mut Self> {
        self.apply(&Operation::X(q))
    }

    /// Apply a Y gate.
    pub fn y(&mut self, q: QubitId) -> ChpResult<&mut Self> {
        self.apply(&Operation::Y(q))
    }

    /// Apply a Z gate.
    pub fn z(&mut self, q: QubitId) -> ChpResult<&mut Self> {
        self.apply(&Operation::Z(q))
    }

    /// Apply a CNOT gate.
    pub fn cnot(&mut self, control: QubitId, target: QubitId)
        -> ChpResult<&mut Self>
    {
        self.apply(&Operation::CNOT(control, target))
    }

    /// Apply a CY gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId)
        -> ChpResult<&mut Self>
    {
        self.apply(&Operation::ControlledY(vec![control], target))
    }

    /// Apply a CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId)
        -> ChpResult<&mut Self>
    {
        self.apply(&Operation::ControlledZ(vec![control], target))
    }

    /// Apply a SWAP gate.
    pub fn swap(&mut self, a: QubitId, b: QubitId) -> ChpResult<&mut Self> {
        self.apply(&Operation::Swap(a, b))
    }

    /// Measure a single qubit in the Z basis.
    pub fn m(&mut self, q: QubitId) -> ChpResult<Outcome> {
        let k = self.index_of(q)?;
        Ok(self.tableau.measure(k, &mut self.rng))
    }

    /// Measure a single qubit in the Z basis and flip it back to ∣0⟩ if the
    /// outcome was ∣1⟩.
    pub fn reset(&mut self, q: QubitId) -> ChpResult<&mut Self> {
        let k = self.index_of(q)?;
        if self.tableau.measure(k, &mut self.rng).bit() {
            self.tableau.apply_x(k);
        }
        Ok(self)
    }
}
