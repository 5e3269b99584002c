mod account;
mod interest;
mod money;

pub use account::*;
pub use interest::*;
pub use money::*;
