use crate::error::IrError;

/// 命令の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Opcode {
    GetArg,
    Add,
    Mul,
    LShift,
    BitAnd,
    Dummy,
}
impl Opcode {
    pub const ALL: [Self; 6] = [
        Self::GetArg,
        Self::Add,
        Self::Mul,
        Self::LShift,
        Self::BitAnd,
        Self::Dummy,
    ];

    #[inline(always)]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GetArg => "getarg",
            Self::Add => "add",
            Self::Mul => "mul",
            Self::LShift => "lshift",
            Self::BitAnd => "bitand",
            Self::Dummy => "dummy",
        }
    }

    #[inline(always)]
    pub const fn arity(self) -> usize {
        match self {
            Self::GetArg | Self::Dummy => 1,
            Self::Add | Self::Mul | Self::LShift | Self::BitAnd => 2,
        }
    }

    /// 引数だけで値が決まる命令か
    #[inline(always)]
    pub const fn is_pure(self) -> bool {
        !matches!(self, Self::GetArg)
    }

    /// Concrete semantics over 64-bit two's complement integers.
    pub fn evaluate(self, args: &[i64]) -> Result<i64, IrError> {
        if !self.is_pure() {
            return Err(IrError::Impure(self));
        }
        if args.len() != self.arity() {
            return Err(IrError::ArgumentCount {
                opcode: self,
                expected: self.arity(),
                found: args.len(),
            });
        }

        match (self, args) {
            (Self::Add, &[a, b]) => Ok(a.wrapping_add(b)),
            (Self::Mul, &[a, b]) => Ok(a.wrapping_mul(b)),
            (Self::BitAnd, &[a, b]) => Ok(a & b),
            // 64 ビット以上ずらすと下位 64 ビットは全部 0
            (Self::LShift, &[a, b]) => match u32::try_from(b) {
                Ok(s) => Ok(a.checked_shl(s).unwrap_or(0)),
                Err(_) => Err(IrError::ShiftOutOfRange(b)),
            },
            (Self::Dummy, &[a]) => Ok(a),
            _ => unreachable!("arity already checked for {self}"),
        }
    }
}
impl core::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
impl core::str::FromStr for Opcode {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|x| x.name() == s)
            .ok_or_else(|| IrError::UnknownOperation(s.to_owned()))
    }
}
