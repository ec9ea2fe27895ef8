use tracing::info;

use crate::ir::{Block, Value};

pub mod dce;
pub mod parity;
pub mod simplify;

pub use self::dce::eliminate_dead_code;
pub use self::parity::{Parity, ParityFacts};
pub use self::simplify::{simplify, Simplified, SimplifyStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Pass {
    /// CSE, parity-driven rewrites and constant folding
    Simplify,
    /// Remove operations not needed by parameters or live-out values
    DeadCode,
}

pub struct Optimized<'a> {
    pub block: Block<'a>,
    /// Facts from the last `Simplify` run (empty if there was none).
    pub facts: ParityFacts<'a>,
}

/// Runs `passes` in order, each on the output of the previous one.
pub fn optimize<'a>(block: &Block<'a>, passes: &[Pass], live_out: &[Value<'a>]) -> Optimized<'a> {
    let mut current = block.derive();
    for op in block {
        current.push(op);
    }
    let mut facts = ParityFacts::empty();

    for &pass in passes {
        let before = current.len();
        current = match pass {
            Pass::Simplify => {
                let s = simplify(&current);
                facts = s.facts;
                s.block
            }
            Pass::DeadCode => eliminate_dead_code(&current, live_out),
        };
        info!(?pass, before, after = current.len(), "pass finished");
    }

    Optimized {
        block: current,
        facts,
    }
}
