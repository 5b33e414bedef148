pub mod memory;
mod resolution;
mod statements;
pub mod xa;

pub use resolution::Resolution;
pub use statements::{Statements, OBJECT, PREDICATE, SUBJECT};
