//! Command line interface
//!
//! Deliberately thin: argument parsing, file loading and result printing
//! live here; every engine call goes straight to a library entry point with
//! no logic of its own in between.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::explore::{self, Options as ExploreOptions};
use crate::io::load_circuit;
use crate::symbolic;

/// Bounded reachability checker for sequential bench netlists
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Bench file stem: reads `<input>.bench` and the companion `<input>.state`
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Worker count for the explicit explorer
    #[arg(short = 'r', long = "runners", default_value_t = 10)]
    pub runners: usize,

    /// Unrolling depth for the symbolic checker
    #[arg(short = 'u', long = "unroll", default_value_t = 2)]
    pub unroll: usize,

    /// Run the explicit-state explorer, stopping as soon as the goal is found
    #[arg(short = 'e', long = "explicit")]
    pub explicit: bool,

    /// Run the explicit-state explorer to full enumeration, counting every
    /// reachable state instead of stopping at the goal
    #[arg(short = 'c', long = "count")]
    pub count: bool,

    /// Run the symbolic (bounded model checking) engine
    #[arg(short = 's', long = "symbolic")]
    pub symbolic: bool,

    /// External SAT solver binary invoked by the symbolic engine
    #[arg(long = "solver", default_value = "kissat")]
    pub solver: String,

    /// Wall-clock budget for the explicit explorer, in seconds
    #[arg(long = "timeout-secs", default_value_t = 600)]
    pub timeout_secs: u64,

    /// Verbosity level; accepted for forward compatibility with a
    /// caller-supplied logger, but this crate does not log on its own
    #[arg(long = "log", default_value_t = 0)]
    pub log: u8,
}

impl Cli {
    /// Run every engine selected by the flags, printing results to stdout
    ///
    /// Returns a process exit code: 0 on any completion (including
    /// `reached=false` or UNSAT, which are normal results, not errors),
    /// nonzero only on I/O or parse failure.
    pub fn run(&self) -> i32 {
        let circuit = match load_circuit(&self.input) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("error loading {}: {e}", self.input.display());
                return 1;
            }
        };

        if !self.explicit && !self.count && !self.symbolic {
            eprintln!("nothing to do: pass -e, -c and/or -s");
            return 1;
        }

        if self.explicit {
            let opts = ExploreOptions {
                goal: Some(circuit.goal().to_string()),
                num_workers: self.runners,
                time_budget: Duration::from_secs(self.timeout_secs),
            };
            let result = explore::explore_reachable(&circuit, &opts);
            println!(
                "explicit: reached={} visited_states={} timed_out={}",
                result.reached, result.visited_states, result.timed_out
            );
            if result.reached {
                match explore::reconstruct_witness(
                    &result.successor_map,
                    &circuit.initial_state(),
                    circuit.goal(),
                ) {
                    Some(steps) => {
                        for step in &steps {
                            println!("  {} --{:?}--> {}", step.from, step.input, step.to);
                        }
                    }
                    None => eprintln!("  goal reported reached but no witness could be reconstructed"),
                }
            }
        }

        if self.count {
            let opts = ExploreOptions {
                goal: None,
                num_workers: self.runners,
                time_budget: Duration::from_secs(self.timeout_secs),
            };
            let result = explore::explore_reachable(&circuit, &opts);
            println!(
                "count: visited_states={} timed_out={}",
                result.visited_states, result.timed_out
            );
        }

        if self.symbolic {
            match symbolic::solve_symbolic(&circuit, self.unroll, &self.solver) {
                Ok(result) if result.sat => {
                    println!("symbolic: SAT at depth {}", self.unroll);
                    if let Some(trace) = result.trace {
                        for (t, state) in trace.states.iter().enumerate() {
                            print!("  state_{t}={state}");
                            if let Some(input) = trace.inputs.get(t) {
                                print!(" input_{t}={input:?}");
                            }
                            println!();
                        }
                    }
                }
                Ok(_) => println!("symbolic: UNSAT at depth {}", self.unroll),
                Err(e) => {
                    eprintln!("symbolic engine error: {e}");
                    return 1;
                }
            }
        }

        0
    }
}
