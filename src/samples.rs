//! Built-in demonstration blocks.

use crate::ir::{Block, Operation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Sample {
    /// Two shifted parameters added and masked with 1
    EndToEnd,
    /// A shifted parameter masked with 1
    Masking,
    /// A bare parameter masked with 1
    Passthrough,
    /// The same expression computed twice
    Cse,
    /// Arithmetic on constants
    Fold,
}
impl Sample {
    pub const ALL: [Self; 5] = [
        Self::EndToEnd,
        Self::Masking,
        Self::Passthrough,
        Self::Cse,
        Self::Fold,
    ];

    /// Number of `getarg` parameters the sample reads.
    pub const fn parameter_count(self) -> usize {
        match self {
            Self::EndToEnd | Self::Cse => 2,
            Self::Masking | Self::Passthrough | Self::Fold => 1,
        }
    }

    /// Appends the sample to `block` and returns its tail instruction.
    pub fn build<'a>(self, block: &mut Block<'a>) -> &'a Operation<'a> {
        match self {
            Self::EndToEnd => {
                let v0 = block.getarg(0);
                let v1 = block.getarg(1);
                let v2 = block.lshift(v0, 1);
                let v3 = block.lshift(v1, 1);
                let v4 = block.add(v2, v3);
                let v5 = block.bitand(v4, 1);
                block.dummy(v5)
            }
            Self::Masking => {
                let v0 = block.getarg(0);
                let v1 = block.lshift(v0, 1);
                block.bitand(v1, 1)
            }
            Self::Passthrough => {
                let v0 = block.getarg(0);
                block.bitand(v0, 1)
            }
            Self::Cse => {
                let v0 = block.getarg(0);
                let v1 = block.getarg(1);
                let v2 = block.mul(v0, v1);
                let v3 = block.mul(v0, v1);
                let v4 = block.add(v2, v3);
                let v5 = block.add(v3, v2);
                block.add(v4, v5)
            }
            Self::Fold => {
                let v0 = block.getarg(0);
                let v1 = block.add(3, 4);
                let v2 = block.lshift(v1, 1);
                let v3 = block.add(v0, v2);
                block.bitand(v3, 1)
            }
        }
    }
}
