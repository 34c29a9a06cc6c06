//! Qubit handles and the allocator that maps them onto tableau columns.
//!
//! The simulator's register has a fixed capacity *N*, chosen at construction;
//! at most *N* handles may be live at any time. How handles map to column
//! indices `0..N` is entirely up to the [`QubitAllocator`] implementation.

use std::fmt;
use rustc_hash::FxHashSet;
use tracing::debug;
use crate::error::{ ChpError, ChpResult };

/// An externally visible handle to a single qubit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QubitId(pub usize);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Hands out and takes back qubit handles for a register of fixed capacity.
pub trait QubitAllocator {
    /// Return the maximum number of simultaneously live handles.
    fn capacity(&self) -> usize;

    /// Return the number of currently live handles.
    fn live(&self) -> usize;

    /// Allocate a single handle.
    ///
    /// Fails with [`ChpError::CapacityExceeded`] if `capacity` handles are
    /// already live.
    fn allocate(&mut self) -> ChpResult<QubitId>;

    /// Return a handle to the allocator.
    fn release(&mut self, qubit: QubitId) -> ChpResult<()>;

    /// Return the tableau column addressed by a live handle.
    fn index_of(&self, qubit: QubitId) -> ChpResult<usize>;

    /// Allocate `count` handles at once.
    ///
    /// Capacity is checked before anything is handed out, so a failed call
    /// leaves the allocator untouched.
    fn allocate_many(&mut self, count: usize) -> ChpResult<Vec<QubitId>> {
        let live = self.live();
        let capacity = self.capacity();
        if live + count > capacity {
            return Err(
                ChpError::CapacityExceeded { requested: count, live, capacity });
        }
        (0..count).map(|_| self.allocate()).collect()
    }
}

/// Default free-list allocator, where each handle is its own column index.
///
/// Released indices are reused most-recent-first.
#[derive(Clone, Debug)]
pub struct Allocator {
    capacity: usize,
    free: Vec<usize>,
    live: FxHashSet<usize>,
}

impl Allocator {
    /// Create a new allocator for a register of `capacity` qubits, with no
    /// live handles.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            free: (0..capacity).rev().collect(),
            live: FxHashSet::default(),
        }
    }

    /// Return `true` if `qubit` is currently live.
    pub fn is_live(&self, qubit: QubitId) -> bool {
        self.live.contains(&qubit.0)
    }
}

impl QubitAllocator for Allocator {
    fn capacity(&self) -> usize { self.capacity }

    fn live(&self) -> usize { self.live.len() }

    fn allocate(&mut self) -> ChpResult<QubitId> {
        let k
            = self.free.pop()
            .ok_or(ChpError::CapacityExceeded {
                requested: 1,
                live: self.live.len(),
                capacity: self.capacity,
            })?;
        self.live.insert(k);
        debug!(qubit = k, live = self.live.len(), "allocated qubit");
        Ok(QubitId(k))
    }

    fn release(&mut self, qubit: QubitId) -> ChpResult<()> {
        if !self.live.remove(&qubit.0) {
            return Err(ChpError::UnknownQubit(qubit));
        }
        self.free.push(qubit.0);
        debug!(qubit = qubit.0, live = self.live.len(), "released qubit");
        Ok(())
    }

    fn index_of(&self, qubit: QubitId) -> ChpResult<usize> {
        self.is_live(qubit).then_some(qubit.0)
            .ok_or(ChpError::UnknownQubit(qubit))
    }
}
