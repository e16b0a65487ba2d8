//! Tseitin-style CNF encoding of an unrolled circuit
//!
//! Net `n` (1-based: net 0 becomes variable 1) in frame `t` is variable
//! `n + t*P`, where `P` is the total number of nets. Unrolling the circuit
//! `U` times and chaining each flip-flop's `Q_{t+1} = D_t` turns the
//! sequential circuit into a single combinational formula over `U` cycles,
//! satisfiable exactly when the goal is reachable within `U` steps.

use crate::circuit::{Circuit, GateKind, NetId};
use crate::error::{Error, Result};

/// A DIMACS-ready CNF formula: clauses as signed literal lists over
/// `1..=num_vars`, standard convention (positive = true, negative = false)
#[derive(Debug)]
pub struct Cnf {
    /// Highest variable number used in the encoding
    pub num_vars: i64,
    /// Total nets per frame (`P`); needed by the decoder to invert `var`
    pub num_nets: usize,
    /// Clauses, each a disjunction of literals
    pub clauses: Vec<Vec<i64>>,
}

fn var(net: NetId, frame: usize, num_nets: usize) -> i64 {
    (net.0 as i64 + 1) + (frame as i64) * (num_nets as i64)
}

/// Build the unrolled goal-reachability formula for `circuit` at depth `unroll`
pub fn encode(circuit: &Circuit, unroll: usize) -> Result<Cnf> {
    if unroll == 0 {
        return Err(Error::MalformedNetlist("unroll depth must be at least 1".to_string()));
    }

    let p = circuit.num_nets();
    let mut clauses = Vec::new();

    for t in 0..unroll {
        for g in 0..circuit.num_gates() as u32 {
            match circuit.kind(g) {
                GateKind::And => {
                    let o = var(circuit.output_net(g), t, p);
                    let ins = circuit.input_nets(g);
                    let a = var(ins[0], t, p);
                    let b = var(ins[1], t, p);
                    clauses.push(vec![a, -o]);
                    clauses.push(vec![b, -o]);
                    clauses.push(vec![-a, -b, o]);
                }
                GateKind::Not => {
                    let o = var(circuit.output_net(g), t, p);
                    let a = var(circuit.input_nets(g)[0], t, p);
                    clauses.push(vec![-a, -o]);
                    clauses.push(vec![a, o]);
                }
                GateKind::Input | GateKind::Dff => {}
            }
        }
    }

    for &ff in circuit.flip_flops() {
        let q0 = var(circuit.output_net(ff), 0, p);
        clauses.push(vec![-q0]);
    }

    for t in 0..unroll.saturating_sub(1) {
        for &ff in circuit.flip_flops() {
            let d = var(circuit.input_nets(ff)[0], t, p);
            let q_next = var(circuit.output_net(ff), t + 1, p);
            clauses.push(vec![d, -q_next]);
            clauses.push(vec![-d, q_next]);
        }
    }

    let last = unroll - 1;
    let goal = circuit.goal().as_bytes();
    for (r, &ff) in circuit.flip_flops().iter().enumerate() {
        let d = var(circuit.input_nets(ff)[0], last, p);
        clauses.push(vec![if goal[r] == b'1' { d } else { -d }]);
    }

    Ok(Cnf {
        num_vars: (p as i64) * (unroll as i64),
        num_nets: p,
        clauses,
    })
}

impl Cnf {
    /// Number of clauses, as reported in the DIMACS preamble
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Write this formula as DIMACS CNF text
    pub fn write_dimacs<W: std::io::Write>(&self, mut w: W) -> std::io::Result<()> {
        writeln!(w, "p cnf {} {}", self.num_vars, self.num_clauses())?;
        for clause in &self.clauses {
            for lit in clause {
                write!(w, "{lit} ")?;
            }
            writeln!(w, "0")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::CircuitBuilder;

    fn dff_identity() -> Circuit {
        let mut b = CircuitBuilder::new();
        b.add_input("a").unwrap();
        b.add_dff("q", "a").unwrap();
        b.finish("1".to_string()).unwrap()
    }

    #[test]
    fn zero_unroll_is_rejected() {
        let c = dff_identity();
        assert!(encode(&c, 0).is_err());
    }

    #[test]
    fn initial_clause_forces_ff_output_low_at_frame_zero() {
        let c = dff_identity();
        let f = encode(&c, 1).unwrap();
        // q's output net is net 1 (gate 1, 1-based); frame 0 variable is 2.
        assert!(f.clauses.contains(&vec![-2]));
    }

    #[test]
    fn goal_clause_asserts_d_input_at_last_frame() {
        let c = dff_identity();
        let f = encode(&c, 1).unwrap();
        // goal "1": d-input of q is net 0 (gate a), frame 0 -> variable 1, asserted positively.
        assert!(f.clauses.contains(&vec![1]));
    }

    #[test]
    fn two_frame_unroll_adds_an_inter_frame_pair() {
        // dff_identity has no AND/NOT gates, so the only difference between
        // unrolling by 1 and by 2 is the single q_{t+1} = d_t transition.
        let c = dff_identity();
        let f1 = encode(&c, 1).unwrap();
        let f2 = encode(&c, 2).unwrap();
        assert_eq!(f2.clauses.len(), f1.clauses.len() + 2);
    }

    #[test]
    fn variable_count_scales_with_nets_and_unroll() {
        let c = dff_identity();
        let f = encode(&c, 3).unwrap();
        assert_eq!(f.num_vars, c.num_nets() as i64 * 3);
    }
}
