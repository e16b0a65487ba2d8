//! Invoking an external SAT solver as a subprocess
//!
//! The solver is never linked in: a DIMACS CNF is piped to its stdin, its
//! stdout is parsed for `v ...` assignment lines, and its exit code decides
//! SAT (10) versus UNSAT (20). Anything else is a protocol error.

use std::io::Write;
use std::process::{Command, Stdio};

use super::Cnf;
use crate::error::{Error, Result};

/// What the solver reported
#[derive(Debug)]
pub enum SatOutcome {
    /// Satisfiable; the full signed-literal assignment it printed
    Sat(Vec<i64>),
    /// Unsatisfiable
    Unsat,
}

/// Spawn `solver_path`, feed it `formula` as DIMACS CNF on stdin, and
/// interpret its exit code and stdout
pub fn run_solver(solver_path: &str, formula: &Cnf) -> Result<SatOutcome> {
    let mut child = Command::new(solver_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| Error::SolverSpawnFailed(format!("{solver_path}: {e}")))?;

    {
        let stdin = child
            .stdin
            .as_mut()
            .expect("stdin was requested with Stdio::piped");
        formula.write_dimacs(&mut *stdin)?;
        stdin.flush()?;
    }

    let output = child.wait_with_output()?;
    match output.status.code() {
        Some(10) => Ok(SatOutcome::Sat(parse_assignment(&output.stdout)?)),
        Some(20) => Ok(SatOutcome::Unsat),
        other => Err(Error::SolverProtocolError(format!(
            "solver exited with {other:?}, expected 10 (SAT) or 20 (UNSAT)"
        ))),
    }
}

fn parse_assignment(stdout: &[u8]) -> Result<Vec<i64>> {
    let text = String::from_utf8_lossy(stdout);
    let mut literals = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('v') else {
            continue;
        };
        for tok in rest.split_whitespace() {
            let n: i64 = tok
                .parse()
                .map_err(|_| Error::SolverProtocolError(format!("unparseable literal {tok:?}")))?;
            if n != 0 {
                literals.push(n);
            }
        }
    }
    Ok(literals)
}
