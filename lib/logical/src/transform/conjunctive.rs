use crate::transform::grouping::{ModelGrouping, OrderedGroups};
use crate::transform::{SymbolicTransformation, TransformationContext};
use crate::{Constraint, ConstraintExpression, Transformed};
use std::fmt::Debug;
use tracing::debug;
use triad_common::TransformationResult;
use triad_model::{NamedNode, NamedNodeRef};

/// Creates the replacement for the constraints of one model that a [ConjunctiveTransformer] has
/// grouped.
pub trait CompoundConstraintBuilder: Debug + Send + Sync {
    /// Builds a single expression that is equivalent to the conjunction of all constraints in
    /// `grouping`.
    fn build(&self, grouping: ModelGrouping) -> TransformationResult<ConstraintExpression>;
}

/// Merges the constraints of a conjunction that can be answered by the same resolver in a single
/// request.
///
/// Only constraints whose model is a fixed IRI of type `model_type` are considered. For each such
/// model, the constraints are grouped by subject and predicate and handed to the
/// [CompoundConstraintBuilder]. All other operands of the conjunction are kept. Nested
/// conjunctions are flattened, while disjunctions and filters are transformed on their own and
/// never merged with the enclosing conjunction.
#[derive(Debug)]
pub struct ConjunctiveTransformer<B> {
    model_type: NamedNode,
    builder: B,
}

/// The state of a single grouping pass over a (flattened) conjunction.
#[derive(Default)]
struct Accumulator {
    groupings: OrderedGroups<NamedNode, ModelGrouping>,
    residuals: Vec<ConstraintExpression>,
    residuals_transformed: bool,
}

impl<B: CompoundConstraintBuilder> ConjunctiveTransformer<B> {
    /// Creates a new [ConjunctiveTransformer] for the models of type `model_type`.
    pub fn new(model_type: NamedNode, builder: B) -> Self {
        Self {
            model_type,
            builder,
        }
    }

    pub fn model_type(&self) -> NamedNodeRef<'_> {
        self.model_type.as_ref()
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    /// Transforms `expression`.
    ///
    /// # Errors
    ///
    /// Returns an error if the type of a model cannot be determined or if the builder fails.
    pub fn transform_expression(
        &self,
        context: &dyn TransformationContext,
        expression: ConstraintExpression,
    ) -> TransformationResult<Transformed<ConstraintExpression>> {
        match expression {
            ConstraintExpression::Constraint(_) => {
                let grouped = self.group_conjunction(context, std::slice::from_ref(&expression))?;
                Ok(grouped.map_or_else(|| Transformed::no(expression), Transformed::yes))
            }
            ConstraintExpression::Conjunction(operands) => {
                match self.group_conjunction(context, &operands)? {
                    Some(grouped) => Ok(Transformed::yes(grouped)),
                    None => Ok(Transformed::no(ConstraintExpression::Conjunction(operands))),
                }
            }
            ConstraintExpression::Disjunction(operands) => {
                let operands = operands
                    .into_iter()
                    .map(|operand| self.transform_expression(context, operand))
                    .collect::<TransformationResult<Vec<_>>>()?;
                Ok(Transformed::collect_all(operands).map_data(ConstraintExpression::Disjunction))
            }
            ConstraintExpression::Filter { inner, filter } => {
                let inner = self.transform_expression(context, *inner)?;
                Ok(inner.map_data(|inner| ConstraintExpression::filter(inner, filter)))
            }
            expression => Ok(Transformed::no(expression)),
        }
    }

    /// Groups the operands of a conjunction. Returns [None] if nothing changed.
    fn group_conjunction(
        &self,
        context: &dyn TransformationContext,
        operands: &[ConstraintExpression],
    ) -> TransformationResult<Option<ConstraintExpression>> {
        let mut accumulator = Accumulator::default();
        self.accumulate(context, operands, &mut accumulator)?;

        if accumulator.groupings.is_empty() && !accumulator.residuals_transformed {
            return Ok(None);
        }

        debug!(
            model_type = %self.model_type,
            models = accumulator.groupings.len(),
            residuals = accumulator.residuals.len(),
            "Grouped conjunctive constraints"
        );

        let mut result = accumulator.residuals;
        for grouping in accumulator.groupings.into_values() {
            result.push(self.builder.build(grouping)?);
        }
        Ok(Some(ConstraintExpression::Conjunction(result)))
    }

    fn accumulate(
        &self,
        context: &dyn TransformationContext,
        operands: &[ConstraintExpression],
        accumulator: &mut Accumulator,
    ) -> TransformationResult<()> {
        for operand in operands {
            match operand {
                ConstraintExpression::Conjunction(nested) => {
                    self.accumulate(context, nested, accumulator)?;
                }
                ConstraintExpression::Constraint(constraint) => {
                    if !self.try_group(context, constraint, accumulator)? {
                        accumulator.residuals.push(operand.clone());
                    }
                }
                ConstraintExpression::Disjunction(_) | ConstraintExpression::Filter { .. } => {
                    let result = self.transform_expression(context, operand.clone())?;
                    accumulator.residuals_transformed |= result.transformed;
                    accumulator.residuals.push(result.data);
                }
                _ => accumulator.residuals.push(operand.clone()),
            }
        }
        Ok(())
    }

    /// Adds `constraint` to the grouping of its model if the model has the target type.
    fn try_group(
        &self,
        context: &dyn TransformationContext,
        constraint: &Constraint,
        accumulator: &mut Accumulator,
    ) -> TransformationResult<bool> {
        let Some(model) = constraint.model().as_named_node() else {
            return Ok(false);
        };

        if context.map_to_model_type(model)? != self.model_type {
            return Ok(false);
        }

        accumulator
            .groupings
            .get_or_insert_with(model.into_owned(), || {
                ModelGrouping::new(model.into_owned())
            })
            .push(constraint);
        Ok(true)
    }
}

impl<B: CompoundConstraintBuilder> SymbolicTransformation for ConjunctiveTransformer<B> {
    fn name(&self) -> &str {
        "conjunctive_grouping"
    }

    fn rewrite(
        &self,
        context: &dyn TransformationContext,
        expression: ConstraintExpression,
    ) -> TransformationResult<Transformed<ConstraintExpression>> {
        self.transform_expression(context, expression)
    }
}
