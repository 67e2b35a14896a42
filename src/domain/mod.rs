mod account;
mod journal;
mod money;
mod transfer;

pub use account::*;
pub use journal::*;
pub use money::*;
pub use transfer::*;
