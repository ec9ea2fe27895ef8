//! Union-find forwarding, CSE and parity analysis over a single SSA basic block.

pub mod error;
pub mod interp;
pub mod ir;
pub mod opt;
pub mod samples;
pub mod utils;

pub use self::error::IrError;
