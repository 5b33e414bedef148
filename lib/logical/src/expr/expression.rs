use crate::expr::{Constraint, Extension, ExtensionConstraint, Filter};
use std::fmt;
use std::sync::Arc;
use triad_model::{ConstraintElement, Variable};

/// A tree of constraints that is resolved against the models of a store.
///
/// Nesting is arbitrary. The empty [ConstraintExpression::Conjunction] matches exactly one empty
/// solution and is the [Default].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstraintExpression {
    /// An atomic constraint.
    Constraint(Constraint),
    /// Solutions that satisfy all operands.
    Conjunction(Vec<ConstraintExpression>),
    /// Solutions that satisfy any operand.
    Disjunction(Vec<ConstraintExpression>),
    /// Solutions of `minuend` that are not compatible with a solution of `subtrahend`.
    Difference {
        minuend: Box<ConstraintExpression>,
        subtrahend: Box<ConstraintExpression>,
    },
    /// Solutions of `main`, extended by the compatible solutions of `optional` that pass `filter`.
    OptionalJoin {
        main: Box<ConstraintExpression>,
        optional: Box<ConstraintExpression>,
        filter: Option<Filter>,
    },
    /// Solutions of `inner` for which `filter` evaluates to `true`.
    Filter {
        inner: Box<ConstraintExpression>,
        filter: Filter,
    },
    /// Resolves `inner` against `model` instead of the models named by its constraints.
    In {
        inner: Box<ConstraintExpression>,
        model: ConstraintElement,
    },
    /// A constraint defined by a resolver backend.
    Extension(Extension),
}

impl ConstraintExpression {
    pub fn conjunction(operands: impl IntoIterator<Item = ConstraintExpression>) -> Self {
        Self::Conjunction(operands.into_iter().collect())
    }

    pub fn disjunction(operands: impl IntoIterator<Item = ConstraintExpression>) -> Self {
        Self::Disjunction(operands.into_iter().collect())
    }

    pub fn difference(minuend: ConstraintExpression, subtrahend: ConstraintExpression) -> Self {
        Self::Difference {
            minuend: Box::new(minuend),
            subtrahend: Box::new(subtrahend),
        }
    }

    pub fn optional_join(
        main: ConstraintExpression,
        optional: ConstraintExpression,
        filter: Option<Filter>,
    ) -> Self {
        Self::OptionalJoin {
            main: Box::new(main),
            optional: Box::new(optional),
            filter,
        }
    }

    pub fn filter(inner: ConstraintExpression, filter: Filter) -> Self {
        Self::Filter {
            inner: Box::new(inner),
            filter,
        }
    }

    pub fn in_model(inner: ConstraintExpression, model: impl Into<ConstraintElement>) -> Self {
        Self::In {
            inner: Box::new(inner),
            model: model.into(),
        }
    }

    pub fn extension(node: Arc<dyn ExtensionConstraint>) -> Self {
        Self::Extension(Extension::new(node))
    }

    /// Returns the distinct variables of this expression in order of their first occurrence.
    pub fn variables(&self) -> Vec<Variable> {
        let mut result = Vec::new();
        self.collect_variables(&mut result);
        result
    }

    fn collect_variables(&self, result: &mut Vec<Variable>) {
        match self {
            ConstraintExpression::Constraint(constraint) => {
                for variable in constraint.variables() {
                    push_unique(result, variable);
                }
            }
            ConstraintExpression::Conjunction(operands)
            | ConstraintExpression::Disjunction(operands) => {
                for operand in operands {
                    operand.collect_variables(result);
                }
            }
            ConstraintExpression::Difference { minuend, .. } => {
                minuend.collect_variables(result);
            }
            ConstraintExpression::OptionalJoin { main, optional, .. } => {
                main.collect_variables(result);
                optional.collect_variables(result);
            }
            ConstraintExpression::Filter { inner, .. } => inner.collect_variables(result),
            ConstraintExpression::In { inner, model } => {
                inner.collect_variables(result);
                if let Some(variable) = model.as_variable() {
                    push_unique(result, variable);
                }
            }
            ConstraintExpression::Extension(extension) => {
                for variable in &extension.node.variables() {
                    push_unique(result, variable);
                }
            }
        }
    }

    /// Returns all atomic constraints of this expression in depth-first order.
    ///
    /// Constraints hidden inside extensions are not included.
    pub fn constraints(&self) -> Vec<&Constraint> {
        let mut result = Vec::new();
        self.collect_constraints(&mut result);
        result
    }

    fn collect_constraints<'a>(&'a self, result: &mut Vec<&'a Constraint>) {
        match self {
            ConstraintExpression::Constraint(constraint) => result.push(constraint),
            ConstraintExpression::Conjunction(operands)
            | ConstraintExpression::Disjunction(operands) => {
                for operand in operands {
                    operand.collect_constraints(result);
                }
            }
            ConstraintExpression::Difference {
                minuend,
                subtrahend,
            } => {
                minuend.collect_constraints(result);
                subtrahend.collect_constraints(result);
            }
            ConstraintExpression::OptionalJoin { main, optional, .. } => {
                main.collect_constraints(result);
                optional.collect_constraints(result);
            }
            ConstraintExpression::Filter { inner, .. } | ConstraintExpression::In { inner, .. } => {
                inner.collect_constraints(result);
            }
            ConstraintExpression::Extension(_) => {}
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}", "", indent = depth * 2)?;
        match self {
            ConstraintExpression::Constraint(constraint) => write!(f, "Constraint: {constraint}"),
            ConstraintExpression::Conjunction(operands) => {
                f.write_str("Conjunction")?;
                fmt_children(f, operands, depth)
            }
            ConstraintExpression::Disjunction(operands) => {
                f.write_str("Disjunction")?;
                fmt_children(f, operands, depth)
            }
            ConstraintExpression::Difference {
                minuend,
                subtrahend,
            } => {
                f.write_str("Difference")?;
                fmt_children(f, [minuend.as_ref(), subtrahend.as_ref()], depth)
            }
            ConstraintExpression::OptionalJoin {
                main,
                optional,
                filter,
            } => {
                f.write_str("OptionalJoin")?;
                if let Some(filter) = filter {
                    write!(f, ": {filter}")?;
                }
                fmt_children(f, [main.as_ref(), optional.as_ref()], depth)
            }
            ConstraintExpression::Filter { inner, filter } => {
                write!(f, "Filter: {filter}")?;
                fmt_children(f, [inner.as_ref()], depth)
            }
            ConstraintExpression::In { inner, model } => {
                write!(f, "In: {model}")?;
                fmt_children(f, [inner.as_ref()], depth)
            }
            ConstraintExpression::Extension(extension) => extension.node.fmt_for_explain(f),
        }
    }
}

fn push_unique(result: &mut Vec<Variable>, variable: &Variable) {
    if !result.contains(variable) {
        result.push(variable.clone());
    }
}

fn fmt_children<'a>(
    f: &mut fmt::Formatter<'_>,
    children: impl IntoIterator<Item = &'a ConstraintExpression>,
    depth: usize,
) -> fmt::Result {
    for child in children {
        writeln!(f)?;
        child.fmt_indented(f, depth + 1)?;
    }
    Ok(())
}

impl Default for ConstraintExpression {
    fn default() -> Self {
        Self::Conjunction(Vec::new())
    }
}

impl From<Constraint> for ConstraintExpression {
    fn from(value: Constraint) -> Self {
        Self::Constraint(value)
    }
}

impl fmt::Display for ConstraintExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}
