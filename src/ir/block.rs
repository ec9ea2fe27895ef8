use std::collections::HashSet;

use typed_arena::Arena;

use crate::{error::IrError, utils::PtrEq};

use super::{Opcode, Operation, Value};

/// A straight-line SSA sequence of operations.
///
/// Nodes live in the shared arena; blocks only hold references, so a pass can build a new block
/// out of the nodes of an old one.
pub struct Block<'a> {
    arena: &'a Arena<Operation<'a>>,
    operations: Vec<&'a Operation<'a>>,
}
impl<'a> Block<'a> {
    pub fn new(arena: &'a Arena<Operation<'a>>) -> Self {
        Self {
            arena,
            operations: Vec::new(),
        }
    }

    /// Empty block backed by the same arena as `self`.
    #[inline]
    pub fn derive(&self) -> Self {
        Self::new(self.arena)
    }

    #[inline(always)]
    pub fn push(&mut self, op: &'a Operation<'a>) {
        self.operations.push(op);
    }

    #[inline(always)]
    pub fn operations(&self) -> &[&'a Operation<'a>] {
        &self.operations
    }

    #[inline(always)]
    pub fn iter(
        &self,
    ) -> impl DoubleEndedIterator<Item = &'a Operation<'a>> + ExactSizeIterator + '_ {
        self.operations.iter().copied()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    #[inline(always)]
    pub fn last(&self) -> Option<&'a Operation<'a>> {
        self.operations.last().copied()
    }

    /// Allocates a new operation and appends it. Operand counts are not checked here.
    pub fn emit(&mut self, opcode: Opcode, args: Vec<Value<'a>>) -> &'a Operation<'a> {
        let op: &'a Operation<'a> = self.arena.alloc(Operation::new(opcode, args));
        self.operations.push(op);

        op
    }

    pub fn emit_named(
        &mut self,
        name: &str,
        args: Vec<Value<'a>>,
    ) -> Result<&'a Operation<'a>, IrError> {
        Ok(self.emit(name.parse()?, args))
    }

    pub fn getarg(&mut self, index: impl Into<Value<'a>>) -> &'a Operation<'a> {
        self.emit(Opcode::GetArg, vec![index.into()])
    }

    pub fn add(
        &mut self,
        left: impl Into<Value<'a>>,
        right: impl Into<Value<'a>>,
    ) -> &'a Operation<'a> {
        self.emit(Opcode::Add, vec![left.into(), right.into()])
    }

    pub fn mul(
        &mut self,
        left: impl Into<Value<'a>>,
        right: impl Into<Value<'a>>,
    ) -> &'a Operation<'a> {
        self.emit(Opcode::Mul, vec![left.into(), right.into()])
    }

    pub fn lshift(
        &mut self,
        value: impl Into<Value<'a>>,
        amount: impl Into<Value<'a>>,
    ) -> &'a Operation<'a> {
        self.emit(Opcode::LShift, vec![value.into(), amount.into()])
    }

    pub fn bitand(
        &mut self,
        left: impl Into<Value<'a>>,
        right: impl Into<Value<'a>>,
    ) -> &'a Operation<'a> {
        self.emit(Opcode::BitAnd, vec![left.into(), right.into()])
    }

    pub fn dummy(&mut self, value: impl Into<Value<'a>>) -> &'a Operation<'a> {
        self.emit(Opcode::Dummy, vec![value.into()])
    }

    /// Checks that every resolved operand refers to an operation defined earlier in the block.
    pub fn verify(&self) -> Result<(), IrError> {
        let mut defined = HashSet::with_capacity(self.operations.len());
        for (position, &op) in self.operations.iter().enumerate() {
            if op
                .args()
                .filter_map(Value::as_operation)
                .any(|a| !defined.contains(&PtrEq(a)))
            {
                return Err(IrError::ForwardReference {
                    position,
                    opcode: op.opcode(),
                });
            }

            defined.insert(PtrEq(op));
        }

        Ok(())
    }
}
impl<'a, 'b> IntoIterator for &'b Block<'a> {
    type Item = &'a Operation<'a>;
    type IntoIter = core::iter::Copied<core::slice::Iter<'b, &'a Operation<'a>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter().copied()
    }
}
impl core::fmt::Debug for Block<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.operations.iter()).finish()
    }
}
