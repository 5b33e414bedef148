use crate::ConstraintExpression;
use rustc_hash::FxHashMap;
use triad_common::error::ModelLookupError;
use triad_model::{NamedNode, NamedNodeRef};

/// The environment of a transformation.
pub trait TransformationContext {
    /// Returns the IRI of the type of `model`, which identifies the resolver that backs it.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unknown or the lookup fails.
    fn map_to_model_type(&self, model: NamedNodeRef<'_>) -> Result<NamedNode, ModelLookupError>;
}

/// A query whose constraint expression can be replaced by transformations.
pub trait MutableLocalQuery {
    fn constraint_expression(&self) -> &ConstraintExpression;

    fn set_constraint_expression(&mut self, expression: ConstraintExpression);
}

/// A plain [MutableLocalQuery] that only holds its expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalQuery {
    expression: ConstraintExpression,
}

impl LocalQuery {
    pub fn new(expression: ConstraintExpression) -> Self {
        Self { expression }
    }

    pub fn into_constraint_expression(self) -> ConstraintExpression {
        self.expression
    }
}

impl MutableLocalQuery for LocalQuery {
    fn constraint_expression(&self) -> &ConstraintExpression {
        &self.expression
    }

    fn set_constraint_expression(&mut self, expression: ConstraintExpression) {
        self.expression = expression;
    }
}

/// A [TransformationContext] backed by a fixed table of models and their types.
#[derive(Debug, Clone, Default)]
pub struct StaticModelTypes {
    types: FxHashMap<NamedNode, NamedNode>,
}

impl StaticModelTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `model` with the type `model_type`.
    #[must_use]
    pub fn with_model(mut self, model: NamedNode, model_type: NamedNode) -> Self {
        self.insert(model, model_type);
        self
    }

    /// Registers `model` with the type `model_type`. Returns the previous type, if any.
    pub fn insert(&mut self, model: NamedNode, model_type: NamedNode) -> Option<NamedNode> {
        self.types.insert(model, model_type)
    }
}

impl TransformationContext for StaticModelTypes {
    fn map_to_model_type(&self, model: NamedNodeRef<'_>) -> Result<NamedNode, ModelLookupError> {
        self.types
            .get(&model.into_owned())
            .cloned()
            .ok_or_else(|| ModelLookupError::unknown(model.into_owned()))
    }
}
