pub mod error;
mod resolver_factory;
pub mod tuples;

pub use resolver_factory::{ResolverFactory, ResolverFactoryRef};
pub use tuples::{Cursor, RowCardinality, Tuples};

pub type TransformationResult<T> = Result<T, error::TransformationError>;
pub type TuplesResult<T> = Result<T, error::TuplesError>;
