use std::collections::HashMap;

use crate::{error::IrError, utils::PtrEq};

use super::{Block, Constant, Operation, Value};

/// Renders `block` as `{prefix}{index} = name(arg, ...)`, one instruction per line.
pub fn bb_to_str(block: &Block<'_>, varprefix: &str) -> Result<String, IrError> {
    bb_to_str_annotated(block, varprefix, |_| None::<String>)
}

/// Same as [`bb_to_str`], with `{prefix}{index}:{fact}` for every operation `annotate` returns
/// a fact for.
pub fn bb_to_str_annotated<'a, F, D>(
    block: &Block<'a>,
    varprefix: &str,
    mut annotate: F,
) -> Result<String, IrError>
where
    F: FnMut(&'a Operation<'a>) -> Option<D>,
    D: core::fmt::Display,
{
    let mut varnames = HashMap::with_capacity(block.len());
    let mut lines = Vec::with_capacity(block.len());
    for (index, op) in block.iter().enumerate() {
        let var = format!("{varprefix}{index}");
        varnames.insert(PtrEq(op), var.clone());

        let arguments = op
            .args()
            .map(|a| match a {
                Value::Constant(Constant(c)) => Ok(c.to_string()),
                // 名前がないならSSAとして不正（使用前に定義されていない）
                Value::Operation(o) => {
                    varnames
                        .get(&o)
                        .cloned()
                        .ok_or(IrError::ForwardReference {
                            position: index,
                            opcode: op.opcode(),
                        })
                }
            })
            .collect::<Result<Vec<_>, _>>()?
            .join(", ");
        let head = match annotate(op) {
            Some(fact) => format!("{var}:{fact}"),
            None => var,
        };
        lines.push(format!("{head} = {}({arguments})", op.opcode()));
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use typed_arena::Arena;

    use super::*;

    #[test]
    fn renders_in_emission_order() {
        let arena = Arena::new();
        let mut bb = Block::new(&arena);
        let v0 = bb.getarg(0);
        let v1 = bb.getarg(1);
        let v2 = bb.add(v0, v1);
        bb.bitand(v2, 1);

        assert_eq!(
            bb_to_str(&bb, "v").unwrap(),
            "v0 = getarg(0)\nv1 = getarg(1)\nv2 = add(v0, v1)\nv3 = bitand(v2, 1)"
        );
        assert_eq!(
            bb_to_str(&bb, "x").unwrap().lines().next(),
            Some("x0 = getarg(0)")
        );
    }

    #[test]
    fn renders_through_representatives() {
        let arena = Arena::new();
        let mut bb = Block::new(&arena);
        let v0 = bb.getarg(0);
        let v1 = bb.dummy(v0);
        let v2 = bb.add(v1, v1);

        v1.make_equal_to(v0);
        let mut out = bb.derive();
        out.push(v0);
        out.push(v2);
        assert_eq!(
            bb_to_str(&out, "v").unwrap(),
            "v0 = getarg(0)\nv1 = add(v0, v0)"
        );

        v0.make_equal_to(21);
        assert_eq!(
            bb_to_str(&out, "v").unwrap(),
            "v0 = getarg(0)\nv1 = add(21, 21)"
        );
    }

    #[test]
    fn annotations() {
        let arena = Arena::new();
        let mut bb = Block::new(&arena);
        let v0 = bb.getarg(0);
        bb.dummy(v0);

        let text = bb_to_str_annotated(&bb, "v", |op| {
            core::ptr::eq(op, v0).then_some("param")
        })
        .unwrap();
        assert_eq!(text, "v0:param = getarg(0)\nv1 = dummy(v0)");
    }

    #[test]
    fn forward_reference_is_an_error() {
        let arena = Arena::new();
        let mut bb = Block::new(&arena);
        let v0 = bb.getarg(0);
        let v1 = bb.dummy(v0);

        let mut out = bb.derive();
        out.push(v1);
        assert_eq!(
            bb_to_str(&out, "v"),
            Err(IrError::ForwardReference {
                position: 0,
                opcode: crate::ir::Opcode::Dummy
            })
        );
    }

    #[test]
    fn empty_block_renders_empty() {
        let arena = Arena::new();
        let bb = Block::new(&arena);
        assert_eq!(bb_to_str(&bb, "v").unwrap(), "");
    }
}
