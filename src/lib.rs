//! Bounded reachability checking for synchronous sequential circuits
//! described in the bench (ISCAS-style) netlist dialect.
//!
//! A circuit is a graph of AND/NOT gates and edge-triggered flip-flops; a
//! state is the flip-flops' combined Q value, serialized as a binary
//! string. Two independent engines answer "can the circuit reach this
//! state from all-zero": [`explore::explore_reachable`] exhaustively
//! simulates the finite state graph, and [`symbolic::solve_symbolic`]
//! unrolls the circuit into a CNF formula and hands it to an external SAT
//! solver.

pub mod circuit;
pub mod cmd;
pub mod error;
pub mod explore;
pub mod io;
pub mod sim;
pub mod symbolic;

pub use circuit::Circuit;
pub use error::{Error, Result};
pub use explore::{explore_reachable, Options as ExploreOptions};
pub use io::load_circuit;
pub use symbolic::solve_symbolic;
