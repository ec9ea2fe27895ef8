pub mod block;
pub mod dump;
pub mod opcode;
pub mod value;

pub use self::block::Block;
pub use self::opcode::Opcode;
pub use self::value::{Constant, Operation, Value};
