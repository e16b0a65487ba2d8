//! Parallel breadth-first exploration of the state graph
//!
//! A pool of worker threads pulls pending states off a work channel; for
//! each state, a worker enumerates every primary-input vector, simulates one
//! synchronous step, and reports the resulting edges to a single coordinator
//! thread. The coordinator owns the visited set and the successor map
//! exclusively and is the only place a state is marked seen, which is what
//! makes "enqueue this state" a well-defined, race-free event even though
//! many workers discover edges concurrently.

mod witness;

pub use witness::reconstruct_witness;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::{select, unbounded, Receiver, Sender};
use fxhash::{FxHashMap, FxHashSet};
use itertools::Itertools;

use crate::circuit::{Circuit, InputVector, State};
use crate::sim::Simulator;

/// Configuration threaded from the orchestrator into the explorer
///
/// Carried explicitly rather than read from module-level flags, so the
/// explorer has no notion of where its settings came from.
#[derive(Debug, Clone)]
pub struct Options {
    /// When set, exploration stops as soon as this state is discovered
    /// (early-exit mode); when `None`, it runs to exhaustion (full
    /// enumeration, used to count all reachable states).
    pub goal: Option<State>,
    /// Number of worker threads
    pub num_workers: usize,
    /// Wall-clock budget for the whole search
    pub time_budget: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            goal: None,
            num_workers: 10,
            time_budget: Duration::from_secs(10 * 60),
        }
    }
}

/// Outcome of an exploration run
#[derive(Debug)]
pub struct ExploreResult {
    /// Whether `opts.goal` was found (always `false` in full-enumeration mode)
    pub reached: bool,
    /// Number of distinct states discovered
    pub visited_states: usize,
    /// Every discovered edge, keyed by source state; a successor appears at
    /// most once per source, carrying every input vector that reaches it
    pub successor_map: FxHashMap<State, Vec<(State, Vec<InputVector>)>>,
    /// Whether the wall-clock budget elapsed before the search finished
    pub timed_out: bool,
}

enum Discovery {
    Edge { from: State, to: State, input: InputVector },
    Done,
}

/// Run the explicit-state search described in [`Options`]
pub fn explore_reachable(circuit: &Circuit, opts: &Options) -> ExploreResult {
    let (work_tx, work_rx) = unbounded::<State>();
    let (disc_tx, disc_rx) = unbounded::<Discovery>();

    let initial = circuit.initial_state();
    let mut visited: FxHashSet<State> = FxHashSet::default();
    visited.insert(initial.clone());
    let mut successor_map: FxHashMap<State, Vec<(State, Vec<InputVector>)>> = FxHashMap::default();
    let mut outstanding = 1usize;
    let mut reached = opts.goal.as_deref() == Some(initial.as_str());
    let mut timed_out = false;

    work_tx.send(initial).expect("receivers outlive this send");

    let num_workers = opts.num_workers.max(1);
    let deadline = Instant::now() + opts.time_budget;
    let cancelled = AtomicBool::new(false);

    std::thread::scope(|scope| {
        for _ in 0..num_workers {
            let work_rx = work_rx.clone();
            let disc_tx = disc_tx.clone();
            let cancelled = &cancelled;
            scope.spawn(move || worker_loop(circuit, &work_rx, &disc_tx, cancelled));
        }
        drop(work_rx);
        drop(disc_tx);

        if !reached {
            'coordinate: loop {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    timed_out = true;
                    break;
                }
                let timeout = crossbeam_channel::after(remaining);
                select! {
                    recv(disc_rx) -> msg => match msg {
                        Ok(Discovery::Edge { from, to, input }) => {
                            record_edge(&mut successor_map, from, to.clone(), input);
                            if !visited.contains(&to) {
                                visited.insert(to.clone());
                                outstanding += 1;
                                let _ = work_tx.send(to.clone());
                            }
                            if opts.goal.as_deref() == Some(to.as_str()) {
                                reached = true;
                                break 'coordinate;
                            }
                        }
                        Ok(Discovery::Done) => {
                            outstanding -= 1;
                            if outstanding == 0 {
                                break 'coordinate;
                            }
                        }
                        Err(_) => break 'coordinate,
                    },
                    recv(timeout) -> _ => {
                        timed_out = true;
                        break 'coordinate;
                    }
                }
            }
        }

        // Closing the work channel alone isn't enough: crossbeam drains
        // every already-buffered state before recv() ever returns Err, so
        // on a goal early-exit or a timeout the frontier would otherwise
        // keep getting fully explored underneath the coordinator. The flag
        // makes each worker abandon its remaining buffered states instead.
        cancelled.store(true, Ordering::Relaxed);
        drop(work_tx);
    });

    ExploreResult {
        reached,
        visited_states: visited.len(),
        successor_map,
        timed_out,
    }
}

fn record_edge(
    map: &mut FxHashMap<State, Vec<(State, Vec<InputVector>)>>,
    from: State,
    to: State,
    input: InputVector,
) {
    let entries = map.entry(from).or_default();
    match entries.iter_mut().find(|(s, _)| *s == to) {
        Some((_, inputs)) => inputs.push(input),
        None => entries.push((to, vec![input])),
    }
}

fn worker_loop(
    circuit: &Circuit,
    work_rx: &Receiver<State>,
    disc_tx: &Sender<Discovery>,
    cancelled: &AtomicBool,
) {
    let mut sim = Simulator::new(circuit);
    let k = circuit.num_inputs();
    while let Ok(state) = work_rx.recv() {
        if cancelled.load(Ordering::Relaxed) {
            return;
        }
        for v in 0..(1u64 << k) {
            let input: InputVector = (0..k).rev().map(|b| (v >> b) & 1 == 1).collect_vec();
            let next = sim.step(&state, &input);
            let edge = Discovery::Edge {
                from: state.clone(),
                to: next,
                input,
            };
            if disc_tx.send(edge).is_err() {
                return;
            }
        }
        if disc_tx.send(Discovery::Done).is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::CircuitBuilder;
    use std::time::Duration;

    fn dff_identity() -> Circuit {
        let mut b = CircuitBuilder::new();
        b.add_input("a").unwrap();
        b.add_dff("q", "a").unwrap();
        b.finish("1".to_string()).unwrap()
    }

    fn two_bit_counter() -> Circuit {
        let mut b = CircuitBuilder::new();
        b.add_dff("q0", "not_q0").unwrap();
        b.add_not("not_q0", "q0").unwrap();
        b.add_dff("q1", "q0").unwrap();
        b.finish("11".to_string()).unwrap()
    }

    #[test]
    fn single_flip_flop_goal_is_reachable() {
        let c = dff_identity();
        let opts = Options {
            goal: Some("1".to_string()),
            num_workers: 2,
            time_budget: Duration::from_secs(5),
        };
        let res = explore_reachable(&c, &opts);
        assert!(res.reached);
        assert!(!res.timed_out);
    }

    #[test]
    fn two_bit_counter_goal_11_is_unreachable() {
        let c = two_bit_counter();
        let opts = Options {
            goal: Some("11".to_string()),
            num_workers: 4,
            time_budget: Duration::from_secs(5),
        };
        let res = explore_reachable(&c, &opts);
        assert!(!res.reached);
        assert_eq!(res.visited_states, 3);
    }

    #[test]
    fn full_enumeration_counts_every_reachable_state() {
        let c = two_bit_counter();
        let opts = Options {
            goal: None,
            num_workers: 3,
            time_budget: Duration::from_secs(5),
        };
        let res = explore_reachable(&c, &opts);
        assert!(!res.reached);
        assert_eq!(res.visited_states, 3);
    }

    #[test]
    fn worker_count_does_not_change_visited_size() {
        let c = two_bit_counter();
        for n in [1, 2, 8] {
            let opts = Options {
                goal: None,
                num_workers: n,
                time_budget: Duration::from_secs(5),
            };
            let res = explore_reachable(&c, &opts);
            assert_eq!(res.visited_states, 3, "worker count {n}");
        }
    }

    #[test]
    fn every_recorded_edge_matches_simulation() {
        let c = dff_identity();
        let opts = Options {
            goal: None,
            num_workers: 2,
            time_budget: Duration::from_secs(5),
        };
        let res = explore_reachable(&c, &opts);
        let mut sim = Simulator::new(&c);
        for (from, edges) in &res.successor_map {
            for (to, inputs) in edges {
                for input in inputs {
                    assert_eq!(&sim.step(from, input), to);
                }
            }
        }
    }
}
