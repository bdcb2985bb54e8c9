//! The live event channel.

pub mod live;

pub use live::{LiveChannel, TokenSource};
