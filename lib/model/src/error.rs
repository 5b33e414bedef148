use crate::ConstraintElement;
use thiserror::Error;

/// Raised when a [ConstraintElement] is expected to be a variable but holds a fixed term.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Expected a variable, found the fixed term {0}")]
pub struct NotAVariableError(pub ConstraintElement);

/// Raised when a constraint position outside `0..4` is accessed.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("Invalid constraint position {0}, a constraint has exactly four positions")]
pub struct InvalidPositionError(pub usize);
