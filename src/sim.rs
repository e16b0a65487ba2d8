//! One synchronous step of combinational propagation
//!
//! Given the current state (flip-flop Q values) and one primary-input
//! vector, computes the output of every gate and, in particular, the next
//! state: the value currently driving each flip-flop's D input.

use std::collections::VecDeque;

use crate::circuit::{Circuit, GateId, GateKind};

/// Per-worker scratchpad, reused across steps
///
/// Owned exclusively by one caller; all scratch vectors are sized to
/// `circuit.num_gates()` and cleared at the start of every [`Simulator::step`].
pub struct Simulator<'c> {
    circuit: &'c Circuit,
    value: Vec<bool>,
    ready: Vec<bool>,
    queued: Vec<bool>,
    queue: VecDeque<GateId>,
}

impl<'c> Simulator<'c> {
    /// Build a simulator scratchpad for the given circuit
    pub fn new(circuit: &'c Circuit) -> Self {
        let n = circuit.num_gates();
        Simulator {
            circuit,
            value: vec![false; n],
            ready: vec![false; n],
            queued: vec![false; n],
            queue: VecDeque::new(),
        }
    }

    /// Push `consumer` onto the worklist if it isn't already ready or
    /// queued, and every one of its inputs is now ready
    fn try_enqueue(&mut self, consumer: GateId) {
        let c = self.circuit;
        if self.ready[consumer as usize] || self.queued[consumer as usize] {
            return;
        }
        if c.inputs_of(consumer).iter().all(|&d| self.ready[d as usize]) {
            self.queued[consumer as usize] = true;
            self.queue.push_back(consumer);
        }
    }

    /// Run one synchronous step: seed inputs and flip-flop outputs from
    /// `state`/`inputs`, propagate the combinational gates, and return the
    /// next state string
    ///
    /// `state` must have length `circuit.num_flip_flops()`; `inputs` must
    /// have length `circuit.num_inputs()`.
    pub fn step(&mut self, state: &str, inputs: &[bool]) -> String {
        let c = self.circuit;
        debug_assert_eq!(state.len(), c.num_flip_flops());
        debug_assert_eq!(inputs.len(), c.num_inputs());

        self.ready.iter_mut().for_each(|r| *r = false);
        self.queued.iter_mut().for_each(|q| *q = false);
        self.queue.clear();

        let state_bits: Vec<bool> = state.chars().map(|ch| ch == '1').collect();

        for &g in c.primary_inputs() {
            self.value[g as usize] = inputs[c.rank_of_input(g)];
            self.ready[g as usize] = true;
        }
        for &g in c.flip_flops() {
            self.value[g as usize] = state_bits[c.rank_of_ff(g)];
            self.ready[g as usize] = true;
        }

        for &g in c.primary_inputs().iter().chain(c.flip_flops()) {
            for &consumer in c.outputs_of(g) {
                if c.kind(consumer) != GateKind::Dff {
                    self.try_enqueue(consumer);
                }
            }
        }

        while let Some(j) = self.queue.pop_front() {
            let deps = c.inputs_of(j);
            let val = match c.kind(j) {
                GateKind::And => self.value[deps[0] as usize] && self.value[deps[1] as usize],
                GateKind::Not => !self.value[deps[0] as usize],
                GateKind::Input | GateKind::Dff => unreachable!("seeded gates never re-enqueued"),
            };
            self.value[j as usize] = val;
            self.ready[j as usize] = true;
            for &consumer in c.outputs_of(j) {
                if c.kind(consumer) != GateKind::Dff {
                    self.try_enqueue(consumer);
                }
            }
        }
        debug_assert!(
            self.queue.is_empty(),
            "combinational worklist wedged: a cycle escaped parse-time detection"
        );

        let mut next_state = String::with_capacity(c.num_flip_flops());
        for &ff in c.flip_flops() {
            let d = c.inputs_of(ff)[0];
            next_state.push(if self.value[d as usize] { '1' } else { '0' });
        }
        next_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::CircuitBuilder;

    fn dff_identity() -> crate::circuit::Circuit {
        let mut b = CircuitBuilder::new();
        b.add_input("a").unwrap();
        b.add_dff("q", "a").unwrap();
        b.finish("1".to_string()).unwrap()
    }

    #[test]
    fn single_dff_identity() {
        let c = dff_identity();
        let mut sim = Simulator::new(&c);
        assert_eq!(sim.step("0", &[true]), "1");
        assert_eq!(sim.step("1", &[false]), "0");
    }

    #[test]
    fn two_bit_counter() {
        // q0 = DFF(NOT(q0)); q1 = DFF(q0)
        let mut b = CircuitBuilder::new();
        b.add_dff("q0", "not_q0").unwrap();
        b.add_not("not_q0", "q0").unwrap();
        b.add_dff("q1", "q0").unwrap();
        let c = b.finish("00".to_string()).unwrap();
        let mut sim = Simulator::new(&c);
        // state order is declaration order: q0, q1
        assert_eq!(sim.step("00", &[]), "10");
        assert_eq!(sim.step("10", &[]), "01");
        assert_eq!(sim.step("01", &[]), "10");
        assert_eq!(sim.step("10", &[]), "01");
    }

    #[test]
    fn and_feedback_never_sets() {
        // v = AND(a, q); q = DFF(v) -- with a held high, q stays 0 forever
        let mut b = CircuitBuilder::new();
        b.add_input("a").unwrap();
        b.add_and("v", "a", "q").unwrap();
        b.add_dff("q", "v").unwrap();
        let c = b.finish("1".to_string()).unwrap();
        let mut sim = Simulator::new(&c);
        let mut state = c.initial_state();
        for _ in 0..5 {
            state = sim.step(&state, &[true]);
            assert_eq!(state, "0");
        }
    }

    #[test]
    fn dedup_shared_fanout_evaluated_once() {
        // x = AND(a, b); y = AND(x, x) -- x feeds y through two ports
        let mut b = CircuitBuilder::new();
        b.add_input("a").unwrap();
        b.add_input("b").unwrap();
        b.add_and("x", "a", "b").unwrap();
        b.add_and("y", "x", "x").unwrap();
        let c = b.finish("".to_string()).unwrap();
        let mut sim = Simulator::new(&c);
        assert_eq!(sim.step("", &[true, true]), "");
        assert_eq!(c.inputs_of(3), &[2, 2]);
    }

    #[test]
    fn determinism() {
        let c = dff_identity();
        let mut sim1 = Simulator::new(&c);
        let mut sim2 = Simulator::new(&c);
        for _ in 0..10 {
            assert_eq!(sim1.step("1", &[true]), sim2.step("1", &[true]));
        }
    }
}
