//! In-memory implementations of the resolver protocols.
//!
//! They hold their rows in shared buffers, so copies are cheap and independent of each other.

mod resolution;
mod statements;
mod tuples;

pub use resolution::MemoryResolution;
pub use statements::MemoryStatements;
pub use tuples::MemoryTuples;
