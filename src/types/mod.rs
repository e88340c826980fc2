//! Core types for the resource kernel.

pub mod term;
pub mod graph;
pub mod record;
pub mod version;

pub use term::{Term, Triple};
pub use graph::Graph;
pub use record::{Record, RecordKey};
pub use version::VersionTag;
