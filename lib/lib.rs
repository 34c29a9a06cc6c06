//! Tools for simulating registers of qubits under Clifford circuits with the
//! CHP (CNOT-Hadamard-Phase) stabilizer tableau algorithm.
//!
//! Assumes all operations will be limited to Clifford-group transformations
//! (i.e. Hadamard, Pauli, singly controlled Pauli, or phase rotations that are
//! integer multiples of π/2) and Pauli measurements, which together can be
//! simulated in polynomial time. Anything else is rejected with
//! [`ChpError::UnsupportedOperation`].
//!
//! ```
//! use chp_sim::{ Pauli, SimConfig, Simulator };
//!
//! let mut sim = Simulator::new(SimConfig::default().with_capacity(3).with_seed(0));
//! let q = sim.allocate_qubits(2).unwrap();
//! sim.h(q[0]).unwrap().cnot(q[0], q[1]).unwrap();
//! assert!(sim.measure(&[Pauli::Y, Pauli::Y], &q).unwrap().bit());
//! sim.assert(&[Pauli::X, Pauli::X], &q, false, "Bell pair").unwrap();
//! ```

pub mod alloc;
pub mod basis;
pub mod error;
pub mod gate;
pub mod measure;
pub mod phase;
pub mod simulator;
pub mod tableau;

pub use alloc::{ Allocator, QubitAllocator, QubitId };
pub use error::{ ChpError, ChpResult };
pub use gate::{ Gate, Operation, Pauli };
pub use measure::Outcome;
pub use simulator::{ SimConfig, Simulator };
pub use tableau::{ PauliString, StabGroup, Tableau };
