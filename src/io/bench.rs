//! Reading the bench (ISCAS-style) netlist dialect
//!
//! ```text
//!     INPUT(a)
//!     INPUT(b)
//!     x = AND(a, b)
//!     y = NOT(x)
//!     q = DFF(y)
//!     OUTPUT(q)
//! ```
//!
//! Whitespace around tokens is ignored; lines matching neither a gate, an
//! `INPUT`/`OUTPUT` declaration, nor a comment are ignored. `OUTPUT` is
//! accepted and has no effect on the built circuit: this dialect has no
//! notion of primary outputs, only flip-flops and the gates that feed them.

use std::io::{BufRead, BufReader, Read};

use crate::circuit::{Circuit, CircuitBuilder};
use crate::error::{Error, Result};

/// Parse a circuit in bench format, pairing it with an already-read goal string
pub fn read_bench<R: Read>(r: R, goal: String) -> Result<Circuit> {
    let mut builder = CircuitBuilder::new();

    for line in BufReader::new(r).lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if !trimmed.contains('=') {
            let parts: Vec<&str> = trimmed
                .split(['(', ')'])
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            if parts.len() != 2 {
                return Err(Error::MalformedNetlist(format!("malformed line: {line}")));
            }
            match parts[0] {
                "INPUT" => {
                    builder.add_input(parts[1])?;
                }
                "OUTPUT" => {
                    // Accepted and ignored: see module docs.
                }
                other => {
                    return Err(Error::MalformedNetlist(format!("unknown keyword {other}")));
                }
            }
            continue;
        }

        let parts: Vec<&str> = trimmed
            .split(['=', '(', ',', ')'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if parts.len() < 2 {
            return Err(Error::MalformedNetlist(format!("malformed line: {line}")));
        }
        let name = parts[0];
        let kind = parts[1].to_uppercase();
        let deps = &parts[2..];
        match kind.as_str() {
            "AND" => {
                if deps.len() != 2 {
                    return Err(Error::MalformedNetlist(format!("AND takes 2 inputs: {line}")));
                }
                builder.add_and(name, deps[0], deps[1])?;
            }
            "NOT" => {
                if deps.len() != 1 {
                    return Err(Error::MalformedNetlist(format!("NOT takes 1 input: {line}")));
                }
                builder.add_not(name, deps[0])?;
            }
            "DFF" => {
                if deps.len() != 1 {
                    return Err(Error::MalformedNetlist(format!("DFF takes 1 input: {line}")));
                }
                builder.add_dff(name, deps[0])?;
            }
            other => {
                return Err(Error::MalformedNetlist(format!("unknown gate type {other}")));
            }
        }
    }

    builder.finish(goal)
}
