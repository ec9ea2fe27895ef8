mod ptr_eq;
pub use self::ptr_eq::*;
