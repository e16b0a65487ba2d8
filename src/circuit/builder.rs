//! Two-pass construction of a [`Circuit`] from parsed bench statements
//!
//! Pass 1 (`declare_input`/`declare_gate`) assigns gate IDs in file order.
//! Pass 2 (`finish`) walks the declarations again, resolving each gate's
//! named dependencies against the producer table built during pass 1 —
//! this is what lets a gate reference a name declared later in the file.

use fxhash::FxHashMap;

use super::{Circuit, GateId, GateKind, NetId};
use crate::error::{Error, Result};

enum Pending {
    Input,
    Gate { kind: GateKind, deps: Vec<String> },
}

/// Incremental builder used by the bench-file reader
pub struct CircuitBuilder {
    names: Vec<String>,
    pending: Vec<Pending>,
    name_to_id: FxHashMap<String, GateId>,
}

impl CircuitBuilder {
    /// Start an empty builder
    pub fn new() -> Self {
        CircuitBuilder {
            names: Vec::new(),
            pending: Vec::new(),
            name_to_id: FxHashMap::default(),
        }
    }

    fn declare(&mut self, name: &str, pending: Pending) -> Result<GateId> {
        if self.name_to_id.contains_key(name) {
            return Err(Error::MalformedNetlist(format!("{name} is defined twice")));
        }
        let id = self.pending.len() as GateId;
        self.name_to_id.insert(name.to_string(), id);
        self.names.push(name.to_string());
        self.pending.push(pending);
        Ok(id)
    }

    /// Declare a primary input (pass 1)
    pub fn add_input(&mut self, name: &str) -> Result<GateId> {
        self.declare(name, Pending::Input)
    }

    /// Declare an AND gate with its two named dependencies (pass 1)
    pub fn add_and(&mut self, name: &str, a: &str, b: &str) -> Result<GateId> {
        self.declare(
            name,
            Pending::Gate {
                kind: GateKind::And,
                deps: vec![a.to_string(), b.to_string()],
            },
        )
    }

    /// Declare a NOT gate with its named dependency (pass 1)
    pub fn add_not(&mut self, name: &str, a: &str) -> Result<GateId> {
        self.declare(
            name,
            Pending::Gate {
                kind: GateKind::Not,
                deps: vec![a.to_string()],
            },
        )
    }

    /// Declare a DFF gate with its named D-input dependency (pass 1)
    pub fn add_dff(&mut self, name: &str, d: &str) -> Result<GateId> {
        self.declare(
            name,
            Pending::Gate {
                kind: GateKind::Dff,
                deps: vec![d.to_string()],
            },
        )
    }

    fn resolve(&self, name: &str) -> Result<GateId> {
        self.name_to_id
            .get(name)
            .copied()
            .ok_or_else(|| Error::MalformedNetlist(format!("undefined name {name}")))
    }

    /// Resolve every declared dependency (pass 2), assign net IDs on first
    /// mention, and validate the goal string against the flip-flop count
    pub fn finish(self, goal: String) -> Result<Circuit> {
        let num_gates = self.pending.len();
        let mut kind = Vec::with_capacity(num_gates);
        let mut inputs_of: Vec<Vec<GateId>> = Vec::with_capacity(num_gates);
        let mut outputs_of: Vec<Vec<GateId>> = vec![Vec::new(); num_gates];
        let mut primary_inputs = Vec::new();
        let mut flip_flops = Vec::new();

        for (i, p) in self.pending.iter().enumerate() {
            match p {
                Pending::Input => {
                    kind.push(GateKind::Input);
                    inputs_of.push(Vec::new());
                    primary_inputs.push(i as GateId);
                }
                Pending::Gate { kind: k, deps } => {
                    kind.push(*k);
                    let mut resolved = Vec::with_capacity(deps.len());
                    for d in deps {
                        let producer = self.resolve(d)?;
                        resolved.push(producer);
                    }
                    inputs_of.push(resolved);
                    if *k == GateKind::Dff {
                        flip_flops.push(i as GateId);
                    }
                }
            }
        }

        // Fan-out is the symmetric image of fan-in, dedup'd by gate ID, a
        // gate reached through two distinct statements still appears once.
        for (consumer, deps) in inputs_of.iter().enumerate() {
            for &producer in deps {
                let out = &mut outputs_of[producer as usize];
                if !out.contains(&(consumer as GateId)) {
                    out.push(consumer as GateId);
                }
            }
        }

        // Net IDs are assigned to each gate's output net, in the order gates
        // appear; for this dialect every gate drives exactly one net, so
        // this is a bijection with gate IDs, but kept as a separate pass so
        // the encoder never reaches for a gate ID where a net ID belongs.
        let net_of: Vec<NetId> = (0..num_gates as u32).map(NetId).collect();
        let num_nets = num_gates as u32;

        if goal.len() != flip_flops.len() {
            return Err(Error::MalformedNetlist(format!(
                "goal length {} does not match {} flip-flops",
                goal.len(),
                flip_flops.len()
            )));
        }
        if !goal.chars().all(|c| c == '0' || c == '1') {
            return Err(Error::MalformedNetlist(format!(
                "goal {goal} is not a binary string"
            )));
        }

        let input_rank = primary_inputs
            .iter()
            .enumerate()
            .map(|(r, &g)| (g, r))
            .collect();
        let ff_rank = flip_flops.iter().enumerate().map(|(r, &g)| (g, r)).collect();

        let circuit = Circuit {
            kind,
            inputs_of,
            outputs_of,
            primary_inputs,
            flip_flops,
            net_of,
            num_nets,
            input_rank,
            ff_rank,
            goal,
        };
        check_acyclic(&circuit)?;
        Ok(circuit)
    }
}

impl Default for CircuitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Verify that the subgraph obtained by removing DFF gates is a DAG
///
/// A combinational cycle not broken by a flip-flop would wedge the
/// simulator's ready-set worklist (§4.2); catching it at parse time turns
/// that into a clean error instead.
fn check_acyclic(c: &Circuit) -> Result<()> {
    let n = c.num_gates();
    let mut indegree = vec![0u32; n];
    for i in 0..n as GateId {
        if c.kind(i) == GateKind::Dff {
            continue;
        }
        for &d in c.inputs_of(i) {
            if c.kind(d) != GateKind::Dff {
                indegree[i as usize] += 1;
            }
        }
    }
    let mut queue: Vec<GateId> = (0..n as GateId)
        .filter(|&i| c.kind(i) != GateKind::Dff && indegree[i as usize] == 0)
        .collect();
    let mut visited = 0usize;
    while let Some(i) = queue.pop() {
        visited += 1;
        for &consumer in c.outputs_of(i) {
            if c.kind(consumer) == GateKind::Dff {
                continue;
            }
            indegree[consumer as usize] -= 1;
            if indegree[consumer as usize] == 0 {
                queue.push(consumer);
            }
        }
    }
    let num_comb = (0..n as GateId).filter(|&i| c.kind(i) != GateKind::Dff).count();
    if visited != num_comb {
        return Err(Error::MalformedNetlist(
            "combinational cycle not broken by a flip-flop".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_name_is_rejected() {
        let mut b = CircuitBuilder::new();
        b.add_input("a").unwrap();
        assert!(b.add_input("a").is_err());
    }

    #[test]
    fn undefined_dependency_is_rejected() {
        let mut b = CircuitBuilder::new();
        b.add_not("x", "undefined").unwrap();
        assert!(b.finish("0".to_string()).is_err());
    }

    #[test]
    fn forward_reference_resolves() {
        // x = AND(a, b) declared before b; both names exist by pass 2
        let mut b = CircuitBuilder::new();
        let a = b.add_input("a").unwrap();
        b.add_and("x", "a", "b").unwrap();
        let bb = b.add_input("b").unwrap();
        let c = b.finish("0".to_string()).unwrap();
        assert_eq!(c.inputs_of(1), &[a, bb]);
    }

    #[test]
    fn goal_length_mismatch_is_rejected() {
        let mut b = CircuitBuilder::new();
        b.add_input("a").unwrap();
        b.add_dff("q", "a").unwrap();
        assert!(b.finish("00".to_string()).is_err());
    }

    #[test]
    fn combinational_cycle_without_dff_is_rejected() {
        // x = AND(x, a) -- self-referential, no flip-flop breaks the cycle
        let mut b = CircuitBuilder::new();
        b.add_input("a").unwrap();
        // Declare x referencing itself and a: name "x" isn't known yet when
        // declared, but will be once pass 2 resolves "x" against itself.
        b.add_and("x", "x", "a").unwrap();
        assert!(b.finish("".to_string()).is_err());
    }

    #[test]
    fn cycle_broken_by_dff_is_accepted() {
        // q = DFF(x); x = AND(q, a) -- fine, the loop passes through a DFF
        let mut b = CircuitBuilder::new();
        b.add_input("a").unwrap();
        b.add_dff("q", "x").unwrap();
        b.add_and("x", "q", "a").unwrap();
        let c = b.finish("0".to_string()).unwrap();
        assert_eq!(c.num_flip_flops(), 1);
    }
}
