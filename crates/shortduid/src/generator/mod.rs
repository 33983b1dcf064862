mod basic;
mod batch;
mod interface;
mod lock;

pub use basic::*;
pub use batch::*;
pub use interface::*;
pub use lock::*;
