//! Error types shared by every stage of the checker

use std::fmt;
use std::io;

/// Every way a run can fail, per the error table in the top-level design notes
///
/// `GoalUnreachable` is deliberately absent: an exploration that completes
/// without finding the goal is a normal result (`reached: false`), not an
/// error.
#[derive(Debug)]
pub enum Error {
    /// Could not open or read the bench or state file
    Io(io::Error),
    /// A gate references an undefined name, or a goal string has the wrong
    /// length or characters
    MalformedNetlist(String),
    /// The external SAT solver binary could not be started
    SolverSpawnFailed(String),
    /// The solver exited with neither the SAT (10) nor UNSAT (20) code, or
    /// its output could not be parsed
    SolverProtocolError(String),
    /// The wall-clock exploration budget elapsed before the search finished
    Timeout,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::MalformedNetlist(msg) => write!(f, "malformed netlist: {msg}"),
            Error::SolverSpawnFailed(msg) => write!(f, "could not start SAT solver: {msg}"),
            Error::SolverProtocolError(msg) => write!(f, "SAT solver protocol error: {msg}"),
            Error::Timeout => write!(f, "exploration timed out"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        Error::Io(e)
    }
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
