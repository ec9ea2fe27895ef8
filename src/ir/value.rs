use std::cell::Cell;

use crate::utils::PtrEq;

use super::Opcode;

/// 定数
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Constant(pub i64);

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Value<'a> {
    Constant(Constant),
    Operation(PtrEq<'a, Operation<'a>>),
}
impl<'a> Value<'a> {
    /// Representative of this value in the union-find sense.
    ///
    /// Follows forwarding pointers until reaching a constant or an operation that is not
    /// forwarded anywhere. No path compression.
    pub fn find(self) -> Self {
        let mut v = self;
        while let Self::Operation(PtrEq(op)) = v {
            match op.forwarded.get() {
                Some(next) => v = next,
                None => break,
            }
        }

        v
    }

    #[inline(always)]
    pub const fn as_constant(self) -> Option<i64> {
        match self {
            Self::Constant(Constant(c)) => Some(c),
            Self::Operation(_) => None,
        }
    }

    #[inline(always)]
    pub const fn as_operation(self) -> Option<&'a Operation<'a>> {
        match self {
            Self::Operation(PtrEq(op)) => Some(op),
            Self::Constant(_) => None,
        }
    }
}
impl core::fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Constant(Constant(c)) => write!(f, "Constant({c})"),
            Self::Operation(PtrEq(op)) => core::fmt::Debug::fmt(op, f),
        }
    }
}
impl From<Constant> for Value<'_> {
    #[inline(always)]
    fn from(value: Constant) -> Self {
        Self::Constant(value)
    }
}
impl From<i64> for Value<'_> {
    #[inline(always)]
    fn from(value: i64) -> Self {
        Self::Constant(Constant(value))
    }
}
impl From<i32> for Value<'_> {
    #[inline(always)]
    fn from(value: i32) -> Self {
        Self::Constant(Constant(value.into()))
    }
}
impl<'a> From<&'a Operation<'a>> for Value<'a> {
    #[inline(always)]
    fn from(value: &'a Operation<'a>) -> Self {
        Self::Operation(PtrEq(value))
    }
}

pub struct Operation<'a> {
    opcode: Opcode,
    args: Vec<Value<'a>>,
    forwarded: Cell<Option<Value<'a>>>,
}
impl<'a> Operation<'a> {
    pub fn new(opcode: Opcode, args: Vec<Value<'a>>) -> Self {
        Self {
            opcode,
            args,
            forwarded: Cell::new(None),
        }
    }

    #[inline(always)]
    pub const fn opcode(&self) -> Opcode {
        self.opcode
    }

    #[inline(always)]
    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Arguments as given at construction time. These may be stale; read through [`Operation::arg`]
    /// or [`Operation::args`] for anything that depends on optimization results.
    #[inline(always)]
    pub fn raw_args(&self) -> &[Value<'a>] {
        &self.args
    }

    /// Representative of argument `index`.
    #[inline(always)]
    pub fn arg(&self, index: usize) -> Value<'a> {
        self.args[index].find()
    }

    pub fn args(&self) -> impl ExactSizeIterator<Item = Value<'a>> + '_ {
        self.args.iter().map(|x| x.find())
    }

    #[inline(always)]
    pub fn is_forwarded(&self) -> bool {
        self.forwarded.get().is_some()
    }

    #[inline(always)]
    pub fn find(&'a self) -> Value<'a> {
        Value::from(self).find()
    }

    /// "union" in the union-find sense, but directed: the representative of `self` is pointed
    /// at `value`, which must be a constant or an operation that stays in the output.
    ///
    /// # Panics
    ///
    /// Panics if `self` already resolves to a constant other than `value`, or if `value` resolves
    /// back to the representative of `self` (the forwarding chain would become a cycle).
    pub fn make_equal_to(&'a self, value: impl Into<Value<'a>>) {
        let value = value.into();
        match self.find() {
            Value::Operation(PtrEq(rep)) => {
                assert!(
                    value.find() != Value::from(rep),
                    "forwarding {rep:?} to {value:?} would create a cycle"
                );
                rep.forwarded.set(Some(value));
            }
            // 定数に決まったものが別の定数に等しいと判明するのはコンパイラのバグ
            Value::Constant(c) => assert_eq!(
                value.find(),
                Value::Constant(c),
                "{self:?} already resolved to {c:?}"
            ),
        }
    }
}
impl core::fmt::Debug for Operation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Operation({}, {:?}", self.opcode, self.args)?;
        match self.forwarded.get() {
            Some(v) => write!(f, " -> {v:?})"),
            None => f.write_str(")"),
        }
    }
}
