//! Reference interpreter over a single block.

use std::collections::HashMap;

use crate::{
    error::IrError,
    ir::{Block, Constant, Opcode, Operation, Value},
    utils::PtrEq,
};

struct Interpreter<'a, 'x> {
    args: &'x [i64],
    values: HashMap<PtrEq<'a, Operation<'a>>, i64>,
}
impl<'a, 'x> Interpreter<'a, 'x> {
    fn new(args: &'x [i64], capacity: usize) -> Self {
        Self {
            args,
            values: HashMap::with_capacity(capacity),
        }
    }

    fn value_of(&self, value: Value<'a>) -> Option<i64> {
        match value.find() {
            Value::Constant(Constant(c)) => Some(c),
            Value::Operation(op) => self.values.get(&op).copied(),
        }
    }

    fn run(&mut self, block: &Block<'a>) -> Result<(), IrError> {
        for (position, op) in block.iter().enumerate() {
            if op.arg_count() != op.opcode().arity() {
                return Err(IrError::ArgumentCount {
                    opcode: op.opcode(),
                    expected: op.opcode().arity(),
                    found: op.arg_count(),
                });
            }

            let value = match op.opcode() {
                Opcode::GetArg => {
                    let Value::Constant(Constant(index)) = op.arg(0) else {
                        return Err(IrError::NonConstantArgIndex);
                    };
                    usize::try_from(index)
                        .ok()
                        .and_then(|i| self.args.get(i).copied())
                        .ok_or(IrError::ArgIndexOutOfRange {
                            index,
                            count: self.args.len(),
                        })?
                }
                opcode => {
                    let operands = op
                        .args()
                        .map(|a| {
                            self.value_of(a)
                                .ok_or(IrError::ForwardReference { position, opcode })
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    opcode.evaluate(&operands)?
                }
            };
            self.values.insert(PtrEq(op), value);
        }

        Ok(())
    }
}

/// Runs `block` with `args` and returns the value of its last instruction.
pub fn interpret<'a>(block: &Block<'a>, args: &[i64]) -> Result<i64, IrError> {
    let last = block.last().ok_or(IrError::EmptyBlock)?;
    interpret_value(block, args, last)
}

/// Runs `block` with `args` and returns the value `value` resolves to.
///
/// `value` may be an instruction that was optimized away; it is read through its representative,
/// which must then either be a constant or appear in `block`.
pub fn interpret_value<'a>(
    block: &Block<'a>,
    args: &[i64],
    value: impl Into<Value<'a>>,
) -> Result<i64, IrError> {
    let value = value.into();
    let mut interp = Interpreter::new(args, block.len());
    interp.run(block)?;

    match value.find() {
        Value::Constant(Constant(c)) => Ok(c),
        Value::Operation(op) => {
            interp
                .values
                .get(&op)
                .copied()
                .ok_or(IrError::ForwardReference {
                    position: block.len(),
                    opcode: op.opcode(),
                })
        }
    }
}
