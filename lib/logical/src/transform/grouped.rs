use crate::transform::{CompoundConstraintBuilder, ModelGrouping};
use crate::{ConstraintExpression, ExtensionConstraint};
use itertools::Itertools;
use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use triad_common::TransformationResult;
use triad_model::{NamedNodeRef, Variable};

/// The constraints of one model that are resolved in a single request.
///
/// This is the compound constraint of resolvers that accept the raw [ModelGrouping].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupedConstraint {
    grouping: ModelGrouping,
}

impl GroupedConstraint {
    pub fn new(grouping: ModelGrouping) -> Self {
        Self { grouping }
    }

    pub fn grouping(&self) -> &ModelGrouping {
        &self.grouping
    }

    /// Returns the equivalent conjunction of atomic constraints.
    pub fn to_conjunction(&self) -> ConstraintExpression {
        ConstraintExpression::conjunction(
            self.grouping
                .constraints()
                .map(ConstraintExpression::Constraint),
        )
    }
}

impl ExtensionConstraint for GroupedConstraint {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn name(&self) -> &str {
        "Grouped"
    }

    fn model(&self) -> Option<NamedNodeRef<'_>> {
        Some(self.grouping.model())
    }

    fn variables(&self) -> Vec<Variable> {
        let mut result = Vec::new();
        for constraint in self.grouping.constraints() {
            for variable in constraint.variables() {
                if !result.contains(variable) {
                    result.push(variable.clone());
                }
            }
        }
        result
    }

    fn fmt_for_explain(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.grouping.model())?;
        let subjects = self
            .grouping
            .by_variable_subject()
            .subjects()
            .chain(self.grouping.by_fixed_subject().subjects());
        for (subject, predicates) in subjects {
            let predicates = predicates
                .predicates()
                .map(|(predicate, objects)| format!("{predicate}: [{}]", objects.iter().join(", ")))
                .join(", ");
            write!(f, " {subject} {{{predicates}}}")?;
        }
        Ok(())
    }

    fn dyn_eq(&self, other: &dyn ExtensionConstraint) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| self == other)
    }

    fn dyn_hash(&self, state: &mut dyn Hasher) {
        let mut state = state;
        self.hash(&mut state);
    }
}

/// A [CompoundConstraintBuilder] that wraps every grouping in a [GroupedConstraint].
#[derive(Debug, Default, Clone, Copy)]
pub struct GroupedConstraintBuilder;

impl CompoundConstraintBuilder for GroupedConstraintBuilder {
    fn build(&self, grouping: ModelGrouping) -> TransformationResult<ConstraintExpression> {
        Ok(ConstraintExpression::extension(Arc::new(
            GroupedConstraint::new(grouping),
        )))
    }
}
