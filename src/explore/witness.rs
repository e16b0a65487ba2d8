//! Reconstructing a witness trace from a successor map
//!
//! The successor map records forward edges `s -> (s', input)`. Earlier
//! versions of this walked backward from the goal by picking an arbitrary
//! predecessor at each step, but on a state graph with a cycle (any two
//! mutually reachable states, e.g. a counter oscillating between two
//! values) the chosen predecessor pointers can themselves form a cycle that
//! never reaches the initial state, hanging forever on a reachable goal.
//! Walking forward instead — a BFS from the initial state that stops the
//! moment it reaches the goal — always terminates (every state has finite
//! out-degree and the search never revisits a state) and, as a side
//! effect, yields a minimum-hop witness.

use std::collections::VecDeque;

use fxhash::{FxHashMap, FxHashSet};

use crate::circuit::{InputVector, State};

/// One step of a reconstructed witness: the input vector applied in this
/// state and the state it led to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WitnessStep {
    /// State the input vector was applied from
    pub from: State,
    /// Input vector applied
    pub input: InputVector,
    /// State reached as a result
    pub to: State,
}

/// Breadth-first search `successor_map` from `initial` to `goal`
///
/// Returns `None` if `goal` is not reachable from `initial` within the
/// recorded edges — including the trivial case where `goal` is itself the
/// initial state, whose witness is the empty trace, returned as `Some(&[])`.
pub fn reconstruct_witness(
    successor_map: &FxHashMap<State, Vec<(State, Vec<InputVector>)>>,
    initial: &str,
    goal: &str,
) -> Option<Vec<WitnessStep>> {
    if goal == initial {
        return Some(Vec::new());
    }

    let mut visited: FxHashSet<State> = FxHashSet::default();
    visited.insert(initial.to_string());
    let mut came_from: FxHashMap<State, (State, InputVector)> = FxHashMap::default();
    let mut queue: VecDeque<State> = VecDeque::new();
    queue.push_back(initial.to_string());

    while let Some(s) = queue.pop_front() {
        let Some(edges) = successor_map.get(&s) else {
            continue;
        };
        for (to, inputs) in edges {
            if visited.contains(to) {
                continue;
            }
            visited.insert(to.clone());
            let input = inputs.first().expect("edge always carries at least one input vector");
            came_from.insert(to.clone(), (s.clone(), input.clone()));
            if to == goal {
                return Some(backtrack(&came_from, initial, goal));
            }
            queue.push_back(to.clone());
        }
    }
    None
}

fn backtrack(
    came_from: &FxHashMap<State, (State, InputVector)>,
    initial: &str,
    goal: &str,
) -> Vec<WitnessStep> {
    let mut steps = Vec::new();
    let mut current = goal.to_string();
    while current != initial {
        let (pred, input) = came_from
            .get(&current)
            .expect("every visited state but the initial one has a recorded predecessor")
            .clone();
        steps.push(WitnessStep {
            from: pred.clone(),
            input,
            to: current,
        });
        current = pred;
    }
    steps.reverse();
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxhash::FxHashMap;

    fn chain_map() -> FxHashMap<State, Vec<(State, Vec<InputVector>)>> {
        // "0" --[1]--> "1" --[0]--> "0" (self-loop aside), "1" --[1]--> "2"
        let mut m: FxHashMap<State, Vec<(State, Vec<InputVector>)>> = FxHashMap::default();
        m.insert("0".to_string(), vec![("1".to_string(), vec![vec![true]])]);
        m.insert(
            "1".to_string(),
            vec![
                ("0".to_string(), vec![vec![false]]),
                ("2".to_string(), vec![vec![true]]),
            ],
        );
        m
    }

    fn two_cycle_map() -> FxHashMap<State, Vec<(State, Vec<InputVector>)>> {
        // The two-bit counter's reachable graph: "00" -> "10" <-> "01".
        // Both cross edges of the 2-cycle are present, which is exactly the
        // shape that made the old backward walk able to spin forever.
        let mut m: FxHashMap<State, Vec<(State, Vec<InputVector>)>> = FxHashMap::default();
        m.insert("00".to_string(), vec![("10".to_string(), vec![vec![]])]);
        m.insert("10".to_string(), vec![("01".to_string(), vec![vec![]])]);
        m.insert("01".to_string(), vec![("10".to_string(), vec![vec![]])]);
        m
    }

    #[test]
    fn goal_equal_to_initial_is_the_empty_trace() {
        let m = chain_map();
        let w = reconstruct_witness(&m, "0", "0").unwrap();
        assert!(w.is_empty());
    }

    #[test]
    fn two_hop_chain_reconstructs_in_order() {
        let m = chain_map();
        let w = reconstruct_witness(&m, "0", "2").unwrap();
        assert_eq!(w.len(), 2);
        assert_eq!(w[0].from, "0");
        assert_eq!(w[0].to, "1");
        assert_eq!(w[0].input, vec![true]);
        assert_eq!(w[1].from, "1");
        assert_eq!(w[1].to, "2");
        assert_eq!(w[1].input, vec![true]);
    }

    #[test]
    fn unreached_state_has_no_witness() {
        let m = chain_map();
        assert!(reconstruct_witness(&m, "0", "99").is_none());
    }

    #[test]
    fn terminates_and_finds_shortest_path_through_a_cycle() {
        let m = two_cycle_map();
        let w = reconstruct_witness(&m, "00", "01").unwrap();
        assert_eq!(w.len(), 2);
        assert_eq!(w[0].from, "00");
        assert_eq!(w[0].to, "10");
        assert_eq!(w[1].from, "10");
        assert_eq!(w[1].to, "01");
    }

    #[test]
    fn witness_steps_each_simulate_correctly() {
        use crate::circuit::CircuitBuilder;
        use crate::sim::Simulator;

        let mut b = CircuitBuilder::new();
        b.add_dff("q0", "not_q0").unwrap();
        b.add_not("not_q0", "q0").unwrap();
        b.add_dff("q1", "q0").unwrap();
        let c = b.finish("10".to_string()).unwrap();

        let mut m: FxHashMap<State, Vec<(State, Vec<InputVector>)>> = FxHashMap::default();
        m.insert("00".to_string(), vec![("10".to_string(), vec![vec![]])]);
        let w = reconstruct_witness(&m, "00", "10").unwrap();

        let mut sim = Simulator::new(&c);
        let mut state = c.initial_state();
        for step in &w {
            assert_eq!(step.from, state);
            state = sim.step(&state, &step.input);
            assert_eq!(step.to, state);
        }
        assert_eq!(state, "10");
    }
}
