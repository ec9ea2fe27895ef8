//! Malformed-IR and evaluation errors.
//!
//! Optimizer bugs (forwarding a constant to a different constant, forwarding cycles)
//! are not represented here: they panic at the point of violation.

use thiserror::Error;

use crate::ir::Opcode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IrError {
    #[error("unknown operation name: {0:?}")]
    UnknownOperation(String),

    #[error("instruction #{position} ({opcode}) refers to an operation not defined before it")]
    ForwardReference { position: usize, opcode: Opcode },

    #[error("{opcode} expects {expected} operand(s), found {found}")]
    ArgumentCount {
        opcode: Opcode,
        expected: usize,
        found: usize,
    },

    #[error("getarg expects a constant index")]
    NonConstantArgIndex,

    #[error("getarg index {index} is out of range ({count} argument(s) given)")]
    ArgIndexOutOfRange { index: i64, count: usize },

    #[error("shift amount {0} is out of range")]
    ShiftOutOfRange(i64),

    #[error("{0} cannot be evaluated from its operands alone")]
    Impure(Opcode),

    #[error("block has no instructions")]
    EmptyBlock,
}
