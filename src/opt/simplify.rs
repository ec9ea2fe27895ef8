use std::collections::HashMap;

use tracing::{debug, trace};

use crate::ir::{Block, Constant, Opcode, Operation, Value};

use super::parity::{Parity, ParityFacts};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimplifyStats {
    pub visited: usize,
    pub cse_hits: usize,
    pub rewrites: usize,
    pub emitted: usize,
}

pub struct Simplified<'a> {
    pub block: Block<'a>,
    pub facts: ParityFacts<'a>,
    pub stats: SimplifyStats,
}

/// Pattern rewrites for a single operation. Returns the value `op` is equal to, if any.
fn rewrite<'a>(op: &'a Operation<'a>, facts: &ParityFacts<'a>) -> Option<Value<'a>> {
    let args = op.args().collect::<Vec<_>>();

    match (op.opcode(), &args[..]) {
        (Opcode::BitAnd, &[x, Value::Constant(Constant(1))])
        | (Opcode::BitAnd, &[Value::Constant(Constant(1)), x]) => {
            let p = facts.parity_of(x);
            if p == Parity::EVEN {
                return Some(Value::from(0));
            }
            if p == Parity::ODD {
                return Some(Value::from(1));
            }
        }
        (Opcode::Add, &[Value::Constant(Constant(l)), Value::Constant(Constant(r))]) => {
            return Some(Value::from(l.wrapping_add(r)));
        }
        _ => (),
    }

    // 全部定数なら畳み込む
    if op.opcode().is_pure() {
        let constants = args
            .iter()
            .map(|a| a.as_constant())
            .collect::<Option<Vec<_>>>()?;
        return op.opcode().evaluate(&constants).ok().map(Value::from);
    }

    None
}

/// Single forward pass of CSE, parity-driven rewrites and constant folding.
///
/// Operations that are rewritten or found to be common subexpressions are forwarded to their
/// replacement and left out of the returned block.
///
/// Forwarding happens in place on the shared nodes, so `block` is consumed: run further passes
/// on the returned block, never on `block` again. Simplifying the returned block is a no-op.
pub fn simplify<'a>(block: &Block<'a>) -> Simplified<'a> {
    let mut facts = ParityFacts::for_block(block);
    let mut cse = HashMap::<(Opcode, Vec<Value<'a>>), &'a Operation<'a>>::new();
    let mut stats = SimplifyStats::default();

    let mut result = block.derive();
    for op in block {
        stats.visited += 1;

        let name_args = (op.opcode(), op.args().collect::<Vec<_>>());
        if let Some(&prev) = cse.get(&name_args) {
            trace!(opcode = %op.opcode(), "common subexpression");
            op.make_equal_to(prev);
            stats.cse_hits += 1;
            continue;
        }

        if let Some(v) = rewrite(op, &facts) {
            trace!(opcode = %op.opcode(), to = ?v, "rewritten");
            op.make_equal_to(v);
            stats.rewrites += 1;
            continue;
        }

        result.push(op);
        cse.insert(name_args, op);
        let p = facts.analyze(op);
        trace!(opcode = %op.opcode(), parity = %p, "emitted");
        stats.emitted += 1;
    }

    debug!(
        visited = stats.visited,
        cse_hits = stats.cse_hits,
        rewrites = stats.rewrites,
        emitted = stats.emitted,
        "simplify finished"
    );

    Simplified {
        block: result,
        facts,
        stats,
    }
}
