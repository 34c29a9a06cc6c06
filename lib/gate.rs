//! Gates whose operations belong to the *n*-qubit Clifford group, and their
//! action on a [`Tableau`].
//!
//! Only the three generators (Hadamard, π/2 phase, and CNOT) touch the tableau
//! directly; every other supported gate is a fixed sequence of them. Each
//! generator acts on the columns of a single qubit (or pair of qubits) across
//! all 2*N* rows, so that destabilizers and stabilizers are conjugated
//! together.
//!
//! See also: <https://en.wikipedia.org/wiki/Clifford_gates>

use std::fmt;
use ndarray as nd;
use rand::Rng;
use tracing::trace;
use crate::{
    alloc::QubitId,
    error::{ ChpError, ChpResult },
    tableau::Tableau,
};

/// A single-qubit Pauli operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Pauli {
    /// Identity
    I,
    /// σ<sub>*x*</sub>
    X,
    /// σ<sub>*y*</sub>
    Y,
    /// σ<sub>*z*</sub>
    Z,
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::I => write!(f, "{}", if f.alternate() { "." } else { "I" }),
            _ => write!(f, "{:?}", self),
        }
    }
}

impl Pauli {
    /// Return `true` if `self` and `other` commute.
    pub fn commutes_with(self, other: Self) -> bool {
        match (self, other) {
            (_, Self::I) => true,
            (Self::I, _) => true,
            (a, b) if a == b => true,
            _ => false,
        }
    }

    /// Decode from a tableau (`x`, `z`) bit pair.
    pub fn from_bits(x: bool, z: bool) -> Self {
        match (x, z) {
            (false, false) => Self::I,
            (true,  false) => Self::X,
            (true,  true ) => Self::Y,
            (false, true ) => Self::Z,
        }
    }

    /// Encode as a tableau (`x`, `z`) bit pair.
    pub fn to_bits(self) -> (bool, bool) {
        match self {
            Self::I => (false, false),
            Self::X => (true,  false),
            Self::Y => (true,  true ),
            Self::Z => (false, true ),
        }
    }
}

/// Description of a single supported gate, addressed by tableau column index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Gate {
    /// Hadamard
    H(usize),
    /// π/2 rotation about Z
    S(usize),
    /// -π/2 rotation about Z
    SInv(usize),
    /// π rotation about X
    X(usize),
    /// π rotation about Y
    Y(usize),
    /// π rotation about Z
    Z(usize),
    /// Z-controlled π rotation about X.
    ///
    /// The first qubit index is the control.
    CX(usize, usize),
    /// Z-controlled π rotation about Y.
    ///
    /// The first qubit index is the control.
    CY(usize, usize),
    /// Z-controlled π rotation about Z.
    ///
    /// The first qubit index is the control.
    CZ(usize, usize),
    /// Swap
    Swap(usize, usize),
}

impl Gate {
    /// Return `true` if `self` acts on two qubits.
    pub fn is_two_qubit(&self) -> bool {
        matches!(self, Self::CX(..) | Self::CY(..) | Self::CZ(..) | Self::Swap(..))
    }

    /// Return the inverse gate.
    pub fn inverse(self) -> Self {
        match self {
            Self::S(k) => Self::SInv(k),
            Self::SInv(k) => Self::S(k),
            g => g,
        }
    }

    /// Return `true` if all qubit indices are less than `n` and two-qubit
    /// indices are non-equal.
    pub fn is_valid(&self, n: usize) -> bool {
        match *self {
            Self::H(k)
            | Self::S(k)
            | Self::SInv(k)
            | Self::X(k)
            | Self::Y(k)
            | Self::Z(k)
            => k < n,
            Self::CX(a, b)
            | Self::CY(a, b)
            | Self::CZ(a, b)
            | Self::Swap(a, b)
            => a < n && b < n && a != b,
        }
    }

    /// Sample a random gate on a register of `n` qubits.
    ///
    /// Two-qubit gates are only drawn when `n ≥ 2`.
    ///
    /// *Panics if `n == 0`.*
    pub fn sample<R>(n: usize, rng: &mut R) -> Self
    where R: Rng + ?Sized
    {
        let a = rng.gen_range(0..n);
        let kind = rng.gen_range(0..if n > 1 { 10 } else { 6 });
        let mut other = || (a + rng.gen_range(1..n)) % n;
        match kind {
            0 => Self::H(a),
            1 => Self::S(a),
            2 => Self::SInv(a),
            3 => Self::X(a),
            4 => Self::Y(a),
            5 => Self::Z(a),
            6 => Self::CX(a, other()),
            7 => Self::CY(a, other()),
            8 => Self::CZ(a, other()),
            9 => Self::Swap(a, other()),
            _ => unreachable!(),
        }
    }
}

impl Tableau {
    /// Apply a Hadamard gate to the `k`-th qubit.
    ///
    /// Swaps the X and Z columns of `k`, then flips the sign of every row
    /// carrying a *Y* there (*HYH* = -*Y*).
    pub fn apply_h(&mut self, k: usize) -> &mut Self {
        trace!(qubit = k, "H");
        let (xk, zk, rc) = (self.xcol(k), self.zcol(k), self.rcol());
        self.swap_columns(xk, zk);
        for mut row in self.data.axis_iter_mut(nd::Axis(0)) {
            row[rc] ^= row[xk] && row[zk];
        }
        self
    }

    /// Apply an S gate (= Z(π/2)) to the `k`-th qubit.
    ///
    /// The sign update reads `z` before it is overwritten (*SYS*<sup>†</sup> =
    /// -*X*).
    pub fn apply_s(&mut self, k: usize) -> &mut Self {
        trace!(qubit = k, "S");
        let (xk, zk, rc) = (self.xcol(k), self.zcol(k), self.rcol());
        for mut row in self.data.axis_iter_mut(nd::Axis(0)) {
            row[rc] ^= row[xk] && row[zk];
            row[zk] ^= row[xk];
        }
        self
    }

    /// Apply a CNOT gate to the `b`-th qubit, with the `a`-th qubit as control.
    pub fn apply_cnot(&mut self, a: usize, b: usize) -> &mut Self {
        trace!(control = a, target = b, "CNOT");
        let (xa, za) = (self.xcol(a), self.zcol(a));
        let (xb, zb) = (self.xcol(b), self.zcol(b));
        let rc = self.rcol();
        for mut row in self.data.axis_iter_mut(nd::Axis(0)) {
            row[rc] ^= row[xa] && row[zb] && !(row[xb] ^ row[za]);
            row[xb] ^= row[xa];
            row[za] ^= row[zb];
        }
        self
    }

    /// Apply an S<sup>†</sup> gate (= Z(-π/2)) to the `k`-th qubit.
    pub fn apply_sinv(&mut self, k: usize) -> &mut Self {
        self.apply_s(k).apply_s(k).apply_s(k)
    }

    /// Apply an X gate to the `k`-th qubit.
    pub fn apply_x(&mut self, k: usize) -> &mut Self {
        self.apply_h(k).apply_z(k).apply_h(k)
    }

    /// Apply a Y gate to the `k`-th qubit.
    pub fn apply_y(&mut self, k: usize) -> &mut Self {
        self.apply_sinv(k).apply_x(k).apply_s(k)
    }

    /// Apply a Z gate to the `k`-th qubit.
    pub fn apply_z(&mut self, k: usize) -> &mut Self {
        self.apply_s(k).apply_s(k)
    }

    /// Apply a CY gate to the `b`-th qubit, with the `a`-th qubit as control.
    pub fn apply_cy(&mut self, a: usize, b: usize) -> &mut Self {
        self.apply_sinv(b).apply_cnot(a, b).apply_s(b)
    }

    /// Apply a CZ gate to the `a`-th and `b`-th qubits.
    pub fn apply_cz(&mut self, a: usize, b: usize) -> &mut Self {
        self.apply_h(b).apply_cnot(a, b).apply_h(b)
    }

    /// Apply a SWAP gate to the `a`-th and `b`-th qubits.
    pub fn apply_swap(&mut self, a: usize, b: usize) -> &mut Self {
        self.apply_cnot(a, b).apply_cnot(b, a).apply_cnot(a, b)
    }

    /// Perform the action of a gate.
    ///
    /// *Panics if any qubit index is out of bounds.*
    pub fn apply_gate(&mut self, gate: Gate) -> &mut Self {
        match gate {
            Gate::H(k) => self.apply_h(k),
            Gate::S(k) => self.apply_s(k),
            Gate::SInv(k) => self.apply_sinv(k),
            Gate::X(k) => self.apply_x(k),
            Gate::Y(k) => self.apply_y(k),
            Gate::Z(k) => self.apply_z(k),
            Gate::CX(a, b) => self.apply_cnot(a, b),
            Gate::CY(a, b) => self.apply_cy(a, b),
            Gate::CZ(a, b) => self.apply_cz(a, b),
            Gate::Swap(a, b) => self.apply_swap(a, b),
        }
    }

    /// Perform a series of gates.
    pub fn apply_circuit<'a, I>(&mut self, gates: I) -> &mut Self
    where I: IntoIterator<Item = &'a Gate>
    {
        gates.into_iter().copied().for_each(|g| { self.apply_gate(g); });
        self
    }
}

/// A gate request in the host's vocabulary, addressed by qubit handle.
///
/// This covers everything a host may ask for, including operations that have
/// no exact stabilizer representation; those resolve to
/// [`ChpError::UnsupportedOperation`] in [`Self::to_gate`].
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    H(QubitId),
    S(QubitId),
    SAdjoint(QubitId),
    X(QubitId),
    Y(QubitId),
    Z(QubitId),
    CNOT(QubitId, QubitId),
    /// Controls first, then the target.
    ControlledX(Vec<QubitId>, QubitId),
    ControlledY(Vec<QubitId>, QubitId),
    ControlledZ(Vec<QubitId>, QubitId),
    /// Only valid with zero controls.
    ControlledH(Vec<QubitId>, QubitId),
    Swap(QubitId, QubitId),
    T(QubitId),
    TAdjoint(QubitId),
    /// Rotation by an angle about a Pauli axis.
    R(Pauli, f64, QubitId),
    /// Phase rotation by an angle.
    R1(f64, QubitId),
    /// Exponential of a multi-qubit Pauli.
    Exp(Vec<Pauli>, f64, Vec<QubitId>),
    ControlledS(Vec<QubitId>, QubitId),
    ControlledSAdjoint(Vec<QubitId>, QubitId),
    ControlledT(Vec<QubitId>, QubitId),
    ControlledTAdjoint(Vec<QubitId>, QubitId),
    ControlledSwap(Vec<QubitId>, QubitId, QubitId),
    ControlledR(Vec<QubitId>, Pauli, f64, QubitId),
    ControlledR1(Vec<QubitId>, f64, QubitId),
    ControlledExp(Vec<QubitId>, Vec<Pauli>, f64, Vec<QubitId>),
}

impl Operation {
    /// Return the host-facing name of the operation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::H(..) => "H",
            Self::S(..) => "S",
            Self::SAdjoint(..) => "SAdjoint",
            Self::X(..) => "X",
            Self::Y(..) => "Y",
            Self::Z(..) => "Z",
            Self::CNOT(..) => "CNOT",
            Self::ControlledX(..) => "ControlledX",
            Self::ControlledY(..) => "ControlledY",
            Self::ControlledZ(..) => "ControlledZ",
            Self::ControlledH(..) => "ControlledH",
            Self::Swap(..) => "SWAP",
            Self::T(..) => "T",
            Self::TAdjoint(..) => "TAdjoint",
            Self::R(..) => "R",
            Self::R1(..) => "R1",
            Self::Exp(..) => "Exp",
            Self::ControlledS(..) => "ControlledS",
            Self::ControlledSAdjoint(..) => "ControlledSAdjoint",
            Self::ControlledT(..) => "ControlledT",
            Self::ControlledTAdjoint(..) => "ControlledTAdjoint",
            Self::ControlledSwap(..) => "ControlledSWAP",
            Self::ControlledR(..) => "ControlledR",
            Self::ControlledR1(..) => "ControlledR1",
            Self::ControlledExp(..) => "ControlledExp",
        }
    }

    /// Resolve to a [`Gate`] on tableau columns, using `index` to map qubit
    /// handles to column indices.
    ///
    /// Fails if the operation is not in the supported Clifford set, if a
    /// controlled gate has other than exactly one control (or any control, in
    /// the case of `ControlledH`), or if a two-qubit gate names the same qubit
    /// twice.
    pub fn to_gate<F>(&self, index: F) -> ChpResult<Gate>
    where F: Fn(QubitId) -> ChpResult<usize>
    {
        let single_control = |controls: &[QubitId]| -> ChpResult<QubitId> {
            match controls {
                [c] => Ok(*c),
                _ => Err(ChpError::unsupported(format!(
                    "{}: only singly controlled gates are allowed (got {} controls)",
                    self.name(),
                    controls.len(),
                ))),
            }
        };
        let pair = |a: QubitId, b: QubitId| -> ChpResult<(usize, usize)> {
            if a == b {
                return Err(ChpError::unsupported(format!(
                    "{}: control and target must be distinct (both {})",
                    self.name(),
                    a,
                )));
            }
            Ok((index(a)?, index(b)?))
        };
        match self {
            Self::H(q) => Ok(Gate::H(index(*q)?)),
            Self::S(q) => Ok(Gate::S(index(*q)?)),
            Self::SAdjoint(q) => Ok(Gate::SInv(index(*q)?)),
            Self::X(q) => Ok(Gate::X(index(*q)?)),
            Self::Y(q) => Ok(Gate::Y(index(*q)?)),
            Self::Z(q) => Ok(Gate::Z(index(*q)?)),
            Self::CNOT(c, t) => pair(*c, *t).map(|(c, t)| Gate::CX(c, t)),
            Self::ControlledX(cs, t) => {
                let c = single_control(cs)?;
                pair(c, *t).map(|(c, t)| Gate::CX(c, t))
            },
            Self::ControlledY(cs, t) => {
                let c = single_control(cs)?;
                pair(c, *t).map(|(c, t)| Gate::CY(c, t))
            },
            Self::ControlledZ(cs, t) => {
                let c = single_control(cs)?;
                pair(c, *t).map(|(c, t)| Gate::CZ(c, t))
            },
            Self::ControlledH(cs, q) if cs.is_empty() => Ok(Gate::H(index(*q)?)),
            Self::ControlledH(..) => Err(ChpError::unsupported(
                "ControlledH: controlled H is not a Clifford operation")),
            Self::Swap(a, b) => pair(*a, *b).map(|(a, b)| Gate::Swap(a, b)),
            _ => Err(ChpError::unsupported(format!(
                "{}: not supported in the CHP stabilizer formalism",
                self.name(),
            ))),
        }
    }
}

#[cfg(test)]
mod test {
    use rand::{ rngs::StdRng, SeedableRng };
    use super::*;

    fn run(n: usize, gates: &[Gate]) -> Tableau {
        let mut tab = Tableau::new(n);
        tab.apply_circuit(gates);
        tab
    }

    fn group(tab: &Tableau) -> String { format!("{}", tab.as_group()) }

    #[test]
    fn hadamard_maps_z_to_x() {
        let tab = run(1, &[Gate::H(0)]);
        assert_eq!(group(&tab), "+Z | +X");
    }

    #[test]
    fn phase_maps_x_to_y() {
        let tab = run(1, &[Gate::H(0), Gate::S(0)]);
        assert_eq!(group(&tab), "+Z | +Y");
        let tab = run(1, &[Gate::H(0), Gate::S(0), Gate::S(0)]);
        assert_eq!(group(&tab), "+Z | -X");
    }

    #[test]
    fn hadamard_negates_y() {
        let tab = run(1, &[Gate::H(0), Gate::S(0), Gate::H(0)]);
        assert_eq!(group(&tab), "+X | -Y");
    }

    #[test]
    fn pauli_gates_flip_signs() {
        assert_eq!(group(&run(1, &[Gate::X(0)])), "+X | -Z");
        assert_eq!(group(&run(1, &[Gate::Z(0)])), "-X | +Z");
        assert_eq!(group(&run(1, &[Gate::Y(0)])), "-X | -Z");
    }

    #[test]
    fn cnot_spreads_paulis() {
        let tab = run(2, &[Gate::H(0), Gate::CX(0, 1)]);
        assert_eq!(group(&tab), "+ZI | +XX\n+IX | +ZZ");
    }

    #[test]
    fn cz_on_plus_states() {
        let tab = run(2, &[Gate::H(0), Gate::H(1), Gate::CZ(0, 1)]);
        assert_eq!(group(&tab), "+ZI | +XZ\n+IZ | +ZX");
    }

    #[test]
    fn cy_matches_definition() {
        let tab = run(2, &[Gate::H(0), Gate::CY(0, 1)]);
        assert_eq!(group(&tab), "+ZI | +XY\n+ZX | +ZZ");
    }

    #[test]
    fn swap_exchanges_qubits() {
        let a = run(2, &[Gate::H(0), Gate::S(0), Gate::X(1), Gate::Swap(0, 1)]);
        let b = run(2, &[Gate::H(1), Gate::S(1), Gate::X(0)]);
        let stab_a = a.as_group().stab;
        for p in b.as_group().stab {
            assert!(stab_a.contains(&p), "missing {p}");
        }
    }

    #[test]
    fn involutions_restore_tableau() {
        let mut rng = StdRng::seed_from_u64(10546);
        let mut tab = Tableau::new(4);
        for _ in 0..50 { tab.apply_gate(Gate::sample(4, &mut rng)); }
        let init = tab.clone();
        for gate in [
            Gate::H(1), Gate::X(2), Gate::Y(0), Gate::Z(3),
            Gate::CX(0, 3), Gate::CZ(1, 2), Gate::CY(2, 0), Gate::Swap(1, 3),
        ] {
            tab.apply_gate(gate).apply_gate(gate);
            assert_eq!(tab, init, "{gate:?}");
        }
        tab.apply_gate(Gate::S(2)).apply_gate(Gate::S(2).inverse());
        assert_eq!(tab, init);
    }

    #[test]
    fn sampled_gates_are_valid() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..200 {
            assert!(Gate::sample(3, &mut rng).is_valid(3));
            assert!(!Gate::sample(1, &mut rng).is_two_qubit());
        }
    }

    #[test]
    fn operation_resolution() {
        let index = |q: QubitId| -> ChpResult<usize> {
            if q.0 < 4 { Ok(q.0) } else { Err(ChpError::UnknownQubit(q)) }
        };
        let (a, b) = (QubitId(0), QubitId(1));
        assert_eq!(Operation::SAdjoint(a).to_gate(index), Ok(Gate::SInv(0)));
        assert_eq!(
            Operation::ControlledY(vec![a], b).to_gate(index),
            Ok(Gate::CY(0, 1)),
        );
        assert_eq!(Operation::ControlledH(vec![], b).to_gate(index), Ok(Gate::H(1)));
        assert!(matches!(
            Operation::ControlledH(vec![a], b).to_gate(index),
            Err(ChpError::UnsupportedOperation(_)),
        ));
        assert!(matches!(
            Operation::ControlledX(vec![a, QubitId(2)], b).to_gate(index),
            Err(ChpError::UnsupportedOperation(_)),
        ));
        assert!(matches!(
            Operation::ControlledZ(vec![], b).to_gate(index),
            Err(ChpError::UnsupportedOperation(_)),
        ));
        assert!(matches!(
            Operation::CNOT(a, a).to_gate(index),
            Err(ChpError::UnsupportedOperation(_)),
        ));
        assert!(matches!(
            Operation::T(a).to_gate(index),
            Err(ChpError::UnsupportedOperation(_)),
        ));
        assert!(matches!(
            Operation::R(Pauli::X, 0.5, a).to_gate(index),
            Err(ChpError::UnsupportedOperation(_)),
        ));
        assert_eq!(
            Operation::H(QubitId(9)).to_gate(index),
            Err(ChpError::UnknownQubit(QubitId(9))),
        );
    }
}
