//! Symbolic rewrites of constraint expressions.
//!
//! A rewrite never changes the solutions of an expression. It only changes how the expression is
//! split into requests to the resolvers.

mod conjunctive;
mod context;
mod duplicate_variable;
mod grouped;
mod grouping;
mod pipeline;

pub use conjunctive::{CompoundConstraintBuilder, ConjunctiveTransformer};
pub use context::{
    LocalQuery, MutableLocalQuery, StaticModelTypes, TransformationContext,
};
pub use duplicate_variable::{DuplicateVariableTransformer, VarFreq};
pub use grouped::{GroupedConstraint, GroupedConstraintBuilder};
pub use grouping::{ModelGrouping, PredicateGroups, SubjectGroups};
pub use pipeline::TransformationPipeline;

use crate::{ConstraintExpression, Transformed};
use std::fmt::Debug;
use triad_common::TransformationResult;

/// A rewrite of the constraint expression of a query.
pub trait SymbolicTransformation: Debug + Send + Sync {
    /// The name of the transformation, used for logging.
    fn name(&self) -> &str;

    /// Rewrites `expression`. An expression that is not affected must be returned unchanged with
    /// [Transformed::no].
    fn rewrite(
        &self,
        context: &dyn TransformationContext,
        expression: ConstraintExpression,
    ) -> TransformationResult<Transformed<ConstraintExpression>>;

    /// Rewrites the expression of `query` and stores the result in `query` if it changed.
    ///
    /// Returns whether the query has been changed.
    fn transform(
        &self,
        context: &dyn TransformationContext,
        query: &mut dyn MutableLocalQuery,
    ) -> TransformationResult<bool> {
        let result = self.rewrite(context, query.constraint_expression().clone())?;
        if result.transformed {
            query.set_constraint_expression(result.data);
        }
        Ok(result.transformed)
    }
}
