//! Errors for fallible operations on the simulator.
//!
//! Every condition here is fail-fast: none are transient, so nothing in the
//! crate retries. After an error raised partway through a gate sequence the
//! register should be considered unusable.

use thiserror::Error;
use crate::alloc::QubitId;

/// Errors for fallible simulator operations.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ChpError {
    /// Returned when an allocation would push the number of live qubits past
    /// the register's fixed capacity.
    #[error("simulator supports a max of {capacity} qubits; requested {requested} with {live} live")]
    CapacityExceeded { requested: usize, live: usize, capacity: usize },

    /// Returned for any gate outside the single-qubit Clifford + CNOT group, or
    /// when a single-control constraint is violated.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Returned when an asserted probability is not within tolerance of 0,
    /// 1/2, or 1.
    #[error("probability {probability} is not within {tolerance} of 0, 0.5, or 1")]
    InvalidAssertionParameter { probability: f64, tolerance: f64 },

    /// Returned when an assertion disagrees with the state of the register.
    #[error("assertion failed: {0}")]
    AssertionFailed(String),

    /// Returned when no ancilla can be borrowed for a multi-qubit Pauli
    /// measurement.
    #[error("no ancilla qubit available for basis rotation")]
    AllocatorExhausted,

    /// Returned when a qubit handle is not live or does not address a column
    /// of the tableau.
    #[error("unknown qubit {0}")]
    UnknownQubit(QubitId),

    /// Returned when a list of Pauli bases and a list of qubits differ in
    /// length.
    #[error("cannot match {bases} Pauli basis/bases with {qubits} qubit(s)")]
    BasisLengthMismatch { bases: usize, qubits: usize },
}
pub type ChpResult<T> = Result<T, ChpError>;

impl ChpError {
    pub(crate) fn unsupported<S>(msg: S) -> Self
    where S: Into<String>
    {
        Self::UnsupportedOperation(msg.into())
    }
}
