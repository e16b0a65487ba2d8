//! In-memory representation of a parsed bench netlist
//!
//! This is the single immutable root shared by the simulator, the explicit
//! explorer and the CNF encoder: gate kinds, fan-in/fan-out adjacency, the
//! primary-input and flip-flop orderings that define bit positions in input
//! vectors and state strings, and the per-net numbering used by the SAT
//! encoding.

mod builder;

pub use builder::CircuitBuilder;

use fxhash::FxHashMap;

/// Identifies a gate: every AND, NOT, DFF and primary INPUT gets one, in
/// file order
pub type GateId = u32;

/// A flip-flop valuation, one character per flip-flop in `flip_flops()` order
pub type State = String;

/// A primary-input valuation, one entry per input in `primary_inputs()` order
pub type InputVector = Vec<bool>;

/// Identifies a net (a single-driver wire), assigned on first mention
///
/// Kept as a distinct type from [`GateId`] even though, for this netlist
/// dialect where every gate drives exactly one net, the two are in
/// bijection: an encoder that accidentally mixes up a net index and a gate
/// index should fail to type-check rather than silently miscompile the CNF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NetId(pub u32);

/// The kind of a gate; AND and NOT are combinational, DFF is the only
/// stateful element, INPUT is a primary input with no fan-in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateKind {
    /// Primary input, value supplied externally each cycle
    Input,
    /// Two-input conjunction
    And,
    /// One-input negation
    Not,
    /// Edge-triggered flip-flop; `inputs_of` holds its D input
    Dff,
}

/// The parsed, immutable netlist
#[derive(Debug, Clone)]
pub struct Circuit {
    kind: Vec<GateKind>,
    inputs_of: Vec<Vec<GateId>>,
    outputs_of: Vec<Vec<GateId>>,
    primary_inputs: Vec<GateId>,
    flip_flops: Vec<GateId>,
    net_of: Vec<NetId>,
    num_nets: u32,
    input_rank: FxHashMap<GateId, usize>,
    ff_rank: FxHashMap<GateId, usize>,
    goal: String,
}

impl Circuit {
    /// Number of gates (including primary inputs)
    pub fn num_gates(&self) -> usize {
        self.kind.len()
    }

    /// The kind of gate `i`
    pub fn kind(&self, i: GateId) -> GateKind {
        self.kind[i as usize]
    }

    /// Ordered fan-in of gate `i`: 0 entries for Input, 1 for Not/Dff, 2 for And
    pub fn inputs_of(&self, i: GateId) -> &[GateId] {
        &self.inputs_of[i as usize]
    }

    /// Fan-out of gate `i`: every gate that consumes its output
    pub fn outputs_of(&self, i: GateId) -> &[GateId] {
        &self.outputs_of[i as usize]
    }

    /// Primary inputs, in the order that defines input-vector bit positions
    pub fn primary_inputs(&self) -> &[GateId] {
        &self.primary_inputs
    }

    /// Flip-flops, in the order that defines state-string bit positions
    pub fn flip_flops(&self) -> &[GateId] {
        &self.flip_flops
    }

    /// Position of a primary input in `primary_inputs()`
    pub fn rank_of_input(&self, i: GateId) -> usize {
        self.input_rank[&i]
    }

    /// Position of a flip-flop in `flip_flops()`
    pub fn rank_of_ff(&self, i: GateId) -> usize {
        self.ff_rank[&i]
    }

    /// The net driven by gate `i`'s output
    pub fn output_net(&self, i: GateId) -> NetId {
        self.net_of[i as usize]
    }

    /// The nets driving gate `i`'s inputs, in the same order as `inputs_of`
    pub fn input_nets(&self, i: GateId) -> Vec<NetId> {
        self.inputs_of(i).iter().map(|&d| self.net_of[d as usize]).collect()
    }

    /// Total number of distinct nets (`P` in the CNF encoder's numbering scheme)
    pub fn num_nets(&self) -> usize {
        self.num_nets as usize
    }

    /// The target state string, length `flip_flops().len()`, over `{'0','1'}`
    pub fn goal(&self) -> &str {
        &self.goal
    }

    /// The all-zero state, length `flip_flops().len()`
    pub fn initial_state(&self) -> String {
        "0".repeat(self.flip_flops.len())
    }

    /// Number of primary inputs (`k` in `2^k` input vectors per state)
    pub fn num_inputs(&self) -> usize {
        self.primary_inputs.len()
    }

    /// Number of flip-flops
    pub fn num_flip_flops(&self) -> usize {
        self.flip_flops.len()
    }
}
