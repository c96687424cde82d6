pub mod classify;
pub mod ring;

pub use classify::*;
pub use ring::*;
