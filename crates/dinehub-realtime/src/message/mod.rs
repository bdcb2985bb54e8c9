//! Live channel wire messages.

pub mod envelope;
pub mod push;

pub use envelope::Envelope;
pub use push::{LocalIdSequence, normalize_push};
