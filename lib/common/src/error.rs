use std::error::Error;
use triad_model::NamedNode;

/// An error raised while symbolically rewriting a constraint expression.
///
/// A failed transformation always aborts query compilation. Skipping a rewrite silently could
/// change the solutions of the query.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TransformationError {
    /// The model of a constraint could not be mapped to its model type.
    #[error("Failed to match model with model type")]
    ModelTypeLookup(#[from] ModelLookupError),
    /// The structure a constraint reports about itself does not match its content.
    #[error("Inconsistent constraint structure: {0}")]
    InconsistentConstraint(String),
    /// A resolver-specific rewrite failed.
    #[error("{0}")]
    Other(#[source] Box<dyn Error + Send + Sync + 'static>),
}

impl TransformationError {
    /// Builds an [TransformationError::InconsistentConstraint] from a printable message.
    pub fn inconsistent(msg: impl Into<String>) -> Self {
        Self::InconsistentConstraint(msg.into())
    }
}

/// An error returned by a transformation context if a model is unknown.
#[derive(Debug, thiserror::Error)]
#[error("Unable to determine the type of model {model}")]
pub struct ModelLookupError {
    model: NamedNode,
    #[source]
    cause: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl ModelLookupError {
    /// Creates an error for a model that is not known at all.
    pub fn unknown(model: NamedNode) -> Self {
        Self { model, cause: None }
    }

    /// Creates an error for a model whose lookup failed with `cause`.
    pub fn new(
        model: NamedNode,
        cause: impl Into<Box<dyn Error + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            model,
            cause: Some(cause.into()),
        }
    }

    pub fn model(&self) -> &NamedNode {
        &self.model
    }
}

/// An error related to reading [Tuples](crate::Tuples).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TuplesError {
    /// A value was requested while the cursor was not positioned on a row.
    #[error("The cursor is not positioned on a row")]
    NotOnRow,
    /// A column outside the width of the tuples was requested.
    #[error("Column {column} is out of bounds for tuples with {width} columns")]
    ColumnOutOfBounds { column: usize, width: usize },
    /// The cursor has already been closed.
    #[error("The cursor has been closed")]
    Closed,
    /// A row does not have the width announced by the variables.
    #[error("Row {row} has {actual} columns but {expected} variables are declared")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("{0}")]
    Other(#[source] Box<dyn Error + Send + Sync + 'static>),
}
