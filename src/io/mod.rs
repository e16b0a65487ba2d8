//! Reading circuits and goal files from disk

mod bench;

pub use bench::read_bench;

use std::fs::File;
use std::path::Path;

use crate::circuit::Circuit;
use crate::error::Result;

/// Read `<stem>.bench` and `<stem>.state` and build the parsed circuit
///
/// This is the `LoadCircuit(path) -> Circuit` entry point named in the
/// top-level design notes; `stem` is the path without either extension.
pub fn load_circuit<P: AsRef<Path>>(stem: P) -> Result<Circuit> {
    let stem = stem.as_ref();
    let bench_path = stem.with_extension("bench");
    let state_path = stem.with_extension("state");

    let f = File::open(&bench_path)?;
    let goal = std::fs::read_to_string(&state_path)?.trim().to_string();
    read_bench(f, goal)
}
