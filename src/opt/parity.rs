use std::collections::HashMap;

use crate::{
    ir::{Block, Constant, Opcode, Operation, Value},
    utils::PtrEq,
};

bitflags::bitflags! {
    /// Parity lattice: the set of parities a value may have at runtime.
    ///
    /// The empty set is `BOTTOM` (not analyzed yet), the full set is `TOP` (unknown).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Parity: u8 {
        const EVEN = 0b01;
        const ODD = 0b10;
    }
}
impl Parity {
    pub const BOTTOM: Self = Self::empty();
    pub const TOP: Self = Self::EVEN.union(Self::ODD);

    #[inline(always)]
    pub const fn of_constant(Constant(value): Constant) -> Self {
        if value % 2 == 0 {
            Self::EVEN
        } else {
            Self::ODD
        }
    }

    /// Abstract semantics of `opcode` over the parities of its resolved operands.
    ///
    /// Operations without a dedicated rule are `TOP`.
    pub fn transfer(opcode: Opcode, args: &[Self]) -> Self {
        match (opcode, args) {
            (Opcode::GetArg, _) => Self::TOP,
            (Opcode::Add, &[a, b]) => {
                if a.is_empty() || b.is_empty() {
                    Self::BOTTOM
                } else if a == Self::TOP || b == Self::TOP {
                    Self::TOP
                } else if a == b {
                    Self::EVEN
                } else {
                    Self::ODD
                }
            }
            (Opcode::LShift, &[a, b]) => {
                if a.is_empty() || b.is_empty() {
                    Self::BOTTOM
                } else if b == Self::ODD {
                    // shifting by an odd amount never leaves bit 0 set; even amounts are not
                    // distinguished from zero here
                    Self::EVEN
                } else {
                    Self::TOP
                }
            }
            _ => Self::TOP,
        }
    }
}
impl core::fmt::Display for Parity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(if *self == Self::EVEN {
            "even"
        } else if *self == Self::ODD {
            "odd"
        } else if self.is_empty() {
            "bottom"
        } else {
            "top"
        })
    }
}

/// Parity facts for the operations of one block.
pub struct ParityFacts<'a> {
    facts: HashMap<PtrEq<'a, Operation<'a>>, Parity>,
}
impl<'a> ParityFacts<'a> {
    /// Every operation of `block` starts as `BOTTOM`.
    pub fn for_block(block: &Block<'a>) -> Self {
        Self {
            facts: block.iter().map(|op| (PtrEq(op), Parity::BOTTOM)).collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            facts: HashMap::new(),
        }
    }

    #[inline]
    pub fn get(&self, op: &'a Operation<'a>) -> Option<Parity> {
        self.facts.get(&PtrEq(op)).copied()
    }

    /// # Panics
    ///
    /// Panics if `value` resolves to an operation that does not belong to the analyzed block.
    pub fn parity_of(&self, value: Value<'a>) -> Parity {
        match value.find() {
            Value::Constant(c) => Parity::of_constant(c),
            Value::Operation(op) => match self.facts.get(&op) {
                Some(&p) => p,
                None => panic!("parity queried for {:?} outside of the analyzed block", op.0),
            },
        }
    }

    /// Computes and records the fact for `op` from the facts of its operands.
    pub fn analyze(&mut self, op: &'a Operation<'a>) -> Parity {
        let args = op.args().map(|a| self.parity_of(a)).collect::<Vec<_>>();
        let p = Parity::transfer(op.opcode(), &args);
        self.facts.insert(PtrEq(op), p);

        p
    }
}

#[cfg(test)]
mod tests {
    use typed_arena::Arena;

    use super::*;

    #[test]
    fn lattice_shape() {
        assert!(Parity::BOTTOM.is_empty());
        assert!(Parity::TOP.contains(Parity::EVEN));
        assert!(Parity::TOP.contains(Parity::ODD));
        assert_eq!(Parity::TOP, Parity::all());
        assert_eq!(Parity::TOP.to_string(), "top");
        assert_eq!(Parity::BOTTOM.to_string(), "bottom");
        assert_eq!(Parity::EVEN.to_string(), "even");
        assert_eq!(Parity::ODD.to_string(), "odd");
    }

    #[test]
    fn constants() {
        assert_eq!(Parity::of_constant(Constant(0)), Parity::EVEN);
        assert_eq!(Parity::of_constant(Constant(7)), Parity::ODD);
        assert_eq!(Parity::of_constant(Constant(-3)), Parity::ODD);
        assert_eq!(Parity::of_constant(Constant(-4)), Parity::EVEN);
    }

    #[test]
    fn add_rules() {
        let (e, o, t, b) = (Parity::EVEN, Parity::ODD, Parity::TOP, Parity::BOTTOM);
        assert_eq!(Parity::transfer(Opcode::Add, &[e, e]), e);
        assert_eq!(Parity::transfer(Opcode::Add, &[o, o]), e);
        assert_eq!(Parity::transfer(Opcode::Add, &[e, o]), o);
        assert_eq!(Parity::transfer(Opcode::Add, &[o, e]), o);
        assert_eq!(Parity::transfer(Opcode::Add, &[t, e]), t);
        assert_eq!(Parity::transfer(Opcode::Add, &[o, t]), t);
        assert_eq!(Parity::transfer(Opcode::Add, &[b, t]), b);
        assert_eq!(Parity::transfer(Opcode::Add, &[e, b]), b);
    }

    #[test]
    fn lshift_rules() {
        let (e, o, t, b) = (Parity::EVEN, Parity::ODD, Parity::TOP, Parity::BOTTOM);
        assert_eq!(Parity::transfer(Opcode::LShift, &[t, o]), e);
        assert_eq!(Parity::transfer(Opcode::LShift, &[o, o]), e);
        // shift by an even amount (which may be 0) is not known
        assert_eq!(Parity::transfer(Opcode::LShift, &[o, e]), t);
        assert_eq!(Parity::transfer(Opcode::LShift, &[e, t]), t);
        assert_eq!(Parity::transfer(Opcode::LShift, &[b, o]), b);
    }

    #[test]
    fn everything_else_is_top() {
        let e = Parity::EVEN;
        assert_eq!(Parity::transfer(Opcode::GetArg, &[e]), Parity::TOP);
        assert_eq!(Parity::transfer(Opcode::Mul, &[e, e]), Parity::TOP);
        assert_eq!(Parity::transfer(Opcode::BitAnd, &[e, e]), Parity::TOP);
        assert_eq!(Parity::transfer(Opcode::Dummy, &[e]), Parity::TOP);
        // malformed operand lists fall through to the default
        assert_eq!(Parity::transfer(Opcode::Add, &[e]), Parity::TOP);
    }

    #[test]
    fn facts_follow_representatives() {
        let arena = Arena::new();
        let mut bb = Block::new(&arena);
        let v0 = bb.getarg(0);
        let v1 = bb.lshift(v0, 1);
        let v2 = bb.add(v1, 3);

        let mut facts = ParityFacts::for_block(&bb);
        assert_eq!(facts.get(v1), Some(Parity::BOTTOM));
        assert_eq!(facts.analyze(v0), Parity::TOP);
        assert_eq!(facts.analyze(v1), Parity::EVEN);
        assert_eq!(facts.analyze(v2), Parity::ODD);

        v1.make_equal_to(8);
        assert_eq!(facts.parity_of(v1.into()), Parity::EVEN);
        assert_eq!(facts.parity_of(Value::from(5)), Parity::ODD);
    }

    #[test]
    #[should_panic(expected = "outside of the analyzed block")]
    fn foreign_operation_panics() {
        let arena = Arena::new();
        let mut bb = Block::new(&arena);
        let v0 = bb.getarg(0);

        let facts = ParityFacts::for_block(&bb.derive());
        facts.parity_of(v0.into());
    }
}
