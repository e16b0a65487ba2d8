//! Decoding a solver assignment back into a per-frame trace
//!
//! Inverts the `var = net + frame*P` numbering from [`super::cnf`]: each
//! literal is mapped back to the net it constrains and the frame it
//! constrains it in, and that net is looked up against the handful of roles
//! the trace actually cares about (primary input, flip-flop D, flip-flop Q
//! at frame 0).

use fxhash::FxHashMap;

use crate::circuit::{Circuit, GateId, GateKind, InputVector, State};

/// A decoded `U`-step trace: `states` has length `U+1`, `inputs` has length `U`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolicTrace {
    /// `states[0]` is the initial state, `states[U]` is the goal
    pub states: Vec<State>,
    /// `inputs[t]` is the vector applied while in `states[t]`
    pub inputs: Vec<InputVector>,
}

struct NetRoles {
    input_of: FxHashMap<u32, GateId>,
    dff_d_of: FxHashMap<u32, GateId>,
    dff_q_of: FxHashMap<u32, GateId>,
}

fn net_roles(circuit: &Circuit) -> NetRoles {
    let mut input_of = FxHashMap::default();
    let mut dff_d_of = FxHashMap::default();
    let mut dff_q_of = FxHashMap::default();
    for g in 0..circuit.num_gates() as GateId {
        match circuit.kind(g) {
            GateKind::Input => {
                input_of.insert(circuit.output_net(g).0, g);
            }
            GateKind::Dff => {
                dff_q_of.insert(circuit.output_net(g).0, g);
                dff_d_of.insert(circuit.input_nets(g)[0].0, g);
            }
            GateKind::And | GateKind::Not => {}
        }
    }
    NetRoles { input_of, dff_d_of, dff_q_of }
}

/// Turn a raw signed-literal assignment into a [`SymbolicTrace`]
///
/// Literals for nets or frames outside the trace's bookkeeping (ordinary
/// AND/NOT gate outputs, for instance) are simply not roles anything maps
/// to, and are ignored.
pub fn decode_assignment(circuit: &Circuit, unroll: usize, assignment: &[i64]) -> SymbolicTrace {
    let p = circuit.num_nets();
    let roles = net_roles(circuit);

    let mut states: Vec<Vec<char>> = vec![vec!['0'; circuit.num_flip_flops()]; unroll + 1];
    let mut inputs: Vec<InputVector> = vec![vec![false; circuit.num_inputs()]; unroll];

    for &lit in assignment {
        let idx = lit.unsigned_abs() as usize - 1;
        let net = (idx % p) as u32;
        let frame = idx / p;
        let value = lit > 0;

        if let Some(&g) = roles.input_of.get(&net) {
            if frame < inputs.len() {
                inputs[frame][circuit.rank_of_input(g)] = value;
            }
        }
        if let Some(&g) = roles.dff_d_of.get(&net) {
            if frame + 1 < states.len() {
                states[frame + 1][circuit.rank_of_ff(g)] = if value { '1' } else { '0' };
            }
        }
        if frame == 0 {
            if let Some(&g) = roles.dff_q_of.get(&net) {
                states[0][circuit.rank_of_ff(g)] = if value { '1' } else { '0' };
            }
        }
    }

    SymbolicTrace {
        states: states.into_iter().map(|chars| chars.into_iter().collect()).collect(),
        inputs,
    }
}
