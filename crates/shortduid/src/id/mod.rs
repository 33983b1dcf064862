mod compose;
mod duid;

pub use compose::*;
pub use duid::*;
