use std::collections::HashSet;

use tracing::debug;

use crate::{
    ir::{Block, Opcode, Value},
    utils::PtrEq,
};

/// Drops operations whose results are not needed.
///
/// `getarg` operations and the representatives of `live_out` are kept along with everything
/// they use (read through representatives). Kept operations retain their relative order.
pub fn eliminate_dead_code<'a>(block: &Block<'a>, live_out: &[Value<'a>]) -> Block<'a> {
    let mut live = live_out
        .iter()
        .filter_map(|v| v.find().as_operation())
        .map(PtrEq)
        .collect::<HashSet<_>>();

    // 後ろから見ていけば使用箇所が先に確定する
    for op in block.iter().rev() {
        if op.opcode() == Opcode::GetArg || live.contains(&PtrEq(op)) {
            live.insert(PtrEq(op));
            live.extend(op.args().filter_map(Value::as_operation).map(PtrEq));
        }
    }

    let mut result = block.derive();
    for op in block {
        if live.contains(&PtrEq(op)) {
            result.push(op);
        }
    }

    debug!(
        removed = block.len() - result.len(),
        kept = result.len(),
        "dead code eliminated"
    );

    result
}

#[cfg(test)]
mod tests {
    use typed_arena::Arena;

    use super::*;
    use crate::ir::dump::bb_to_str;

    #[test]
    fn keeps_parameters_and_live_chain() {
        let arena = Arena::new();
        let mut bb = Block::new(&arena);
        let v0 = bb.getarg(0);
        let v1 = bb.getarg(1);
        let v2 = bb.add(v0, 1);
        let v3 = bb.mul(v1, v1);
        let v4 = bb.dummy(v2);

        let out = eliminate_dead_code(&bb, &[v4.into()]);
        assert_eq!(
            bb_to_str(&out, "v").unwrap(),
            "v0 = getarg(0)\nv1 = getarg(1)\nv2 = add(v0, 1)\nv3 = dummy(v2)"
        );
        assert!(!out.iter().any(|op| core::ptr::eq(op, v3)));
    }

    #[test]
    fn constant_live_out_keeps_only_parameters() {
        let arena = Arena::new();
        let mut bb = Block::new(&arena);
        let v0 = bb.getarg(0);
        let v1 = bb.lshift(v0, 1);
        let v2 = bb.bitand(v1, 1);
        v2.make_equal_to(0);

        let mut live = bb.derive();
        live.push(v0);
        live.push(v1);
        let out = eliminate_dead_code(&live, &[v2.into()]);
        assert_eq!(bb_to_str(&out, "v").unwrap(), "v0 = getarg(0)");
    }

    #[test]
    fn uses_follow_forwarding() {
        let arena = Arena::new();
        let mut bb = Block::new(&arena);
        let v0 = bb.getarg(0);
        let v1 = bb.add(v0, 2);
        let v2 = bb.add(v0, 3);
        let v3 = bb.dummy(v1);

        // dummy(v1) の v1 が v2 に置き換わったとき、v1 は死ぬ
        v1.make_equal_to(v2);
        let out = eliminate_dead_code(&bb, &[v3.into()]);
        assert_eq!(
            bb_to_str(&out, "v").unwrap(),
            "v0 = getarg(0)\nv1 = add(v0, 3)\nv2 = dummy(v1)"
        );
    }
}
