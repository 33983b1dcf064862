mod alphabet;
mod codec;

pub use alphabet::*;
pub use codec::*;
