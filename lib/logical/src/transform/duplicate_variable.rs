use crate::transform::{SymbolicTransformation, TransformationContext};
use crate::{Constraint, ConstraintExpression, Filter, Transformed};
use tracing::debug;
use triad_common::error::TransformationError;
use triad_common::TransformationResult;
use triad_model::{ConstraintElement, Variable};

/// The variable that occurs more than once in a constraint, together with its number of
/// occurrences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarFreq {
    variable: Variable,
    frequency: usize,
}

impl VarFreq {
    /// Finds the first variable (in position order) that occurs at least twice in `constraint`.
    ///
    /// # Errors
    ///
    /// Returns an error if no variable repeats.
    pub fn of(constraint: &Constraint) -> TransformationResult<Self> {
        let elements = constraint.elements();
        for (position, element) in elements.iter().enumerate() {
            let Some(variable) = element.as_variable() else {
                continue;
            };

            let frequency = elements[position..]
                .iter()
                .filter(|candidate| candidate.is_variable_named(variable.as_ref()))
                .count();
            if frequency >= 2 {
                return Ok(Self {
                    variable: variable.clone(),
                    frequency,
                });
            }
        }

        Err(TransformationError::inconsistent(format!(
            "Constraint {constraint} reports a repeated variable but no variable occurs twice"
        )))
    }

    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    pub fn frequency(&self) -> usize {
        self.frequency
    }

    /// Renames all but the first occurrence of the variable in `constraint`.
    ///
    /// Repetitions are named `<name>*<k>` with the smallest `k` that is not taken by another
    /// variable of the constraint. The `*` cannot occur in a parsed variable name, but unchecked
    /// variables may contain it. Returns the renamed constraint and one `sameTerm` test per renamed
    /// occurrence.
    fn split(&self, constraint: Constraint) -> TransformationResult<(Constraint, Vec<Filter>)> {
        let taken: Vec<String> = constraint
            .variables()
            .into_iter()
            .map(|variable| variable.as_str().to_owned())
            .collect();
        let mut suffix = 0;
        let mut occurrence = 0;
        let mut tests = Vec::with_capacity(self.frequency - 1);
        let elements = constraint.into_elements().map(|element| {
            if !element.is_variable_named(self.variable.as_ref()) {
                return element;
            }

            occurrence += 1;
            if occurrence == 1 {
                return element;
            }

            let name = loop {
                suffix += 1;
                let name = format!("{}*{suffix}", self.variable.as_str());
                if !taken.contains(&name) {
                    break name;
                }
            };
            let synthetic = Variable::new_unchecked(name);
            tests.push(Filter::same_term(self.variable.clone(), synthetic.clone()));
            ConstraintElement::Variable(synthetic)
        });

        if occurrence != self.frequency {
            return Err(TransformationError::inconsistent(format!(
                "Expected {} occurrences of {} but found {occurrence}",
                self.frequency, self.variable
            )));
        }
        Ok((Constraint::from_elements(elements), tests))
    }
}

/// Removes repeated variables from atomic constraints.
///
/// A constraint like `[?x <p> ?x <m>]` cannot be resolved positionally. It is rewritten to
/// `[?x <p> ?x*1 <m>]` and wrapped in a filter that requires `sameTerm(?x, ?x*1)`. Extension
/// constraints are passed through unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct DuplicateVariableTransformer;

impl DuplicateVariableTransformer {
    pub fn new() -> Self {
        Self
    }

    /// Transforms all atomic constraints in `expression`.
    ///
    /// # Errors
    ///
    /// Returns an error if a constraint reports inconsistent repetitions.
    pub fn transform_expression(
        &self,
        expression: ConstraintExpression,
    ) -> TransformationResult<Transformed<ConstraintExpression>> {
        Ok(match expression {
            ConstraintExpression::Constraint(constraint) => {
                if constraint.is_repeating() {
                    Transformed::yes(rewrite_constraint(constraint)?)
                } else {
                    Transformed::no(ConstraintExpression::Constraint(constraint))
                }
            }
            ConstraintExpression::Conjunction(operands) => self
                .transform_all(operands)?
                .map_data(ConstraintExpression::Conjunction),
            ConstraintExpression::Disjunction(operands) => self
                .transform_all(operands)?
                .map_data(ConstraintExpression::Disjunction),
            ConstraintExpression::Difference {
                minuend,
                subtrahend,
            } => {
                let minuend = self.transform_expression(*minuend)?;
                let subtrahend = self.transform_expression(*subtrahend)?;
                Transformed::new(
                    ConstraintExpression::difference(minuend.data, subtrahend.data),
                    minuend.transformed || subtrahend.transformed,
                )
            }
            ConstraintExpression::OptionalJoin {
                main,
                optional,
                filter,
            } => {
                let main = self.transform_expression(*main)?;
                let optional = self.transform_expression(*optional)?;
                Transformed::new(
                    ConstraintExpression::optional_join(main.data, optional.data, filter),
                    main.transformed || optional.transformed,
                )
            }
            ConstraintExpression::Filter { inner, filter } => self
                .transform_expression(*inner)?
                .map_data(|inner| ConstraintExpression::filter(inner, filter)),
            ConstraintExpression::In { inner, model } => self
                .transform_expression(*inner)?
                .map_data(|inner| ConstraintExpression::in_model(inner, model)),
            extension @ ConstraintExpression::Extension(_) => Transformed::no(extension),
        })
    }

    fn transform_all(
        &self,
        operands: Vec<ConstraintExpression>,
    ) -> TransformationResult<Transformed<Vec<ConstraintExpression>>> {
        let operands = operands
            .into_iter()
            .map(|operand| self.transform_expression(operand))
            .collect::<TransformationResult<Vec<_>>>()?;
        Ok(Transformed::collect_all(operands))
    }
}

/// Renames repeated variables until no variable repeats and wraps the result in the
/// corresponding `sameTerm` filter.
fn rewrite_constraint(constraint: Constraint) -> TransformationResult<ConstraintExpression> {
    let original = constraint.to_string();
    let mut constraint = constraint;
    let mut tests = Vec::new();
    while constraint.is_repeating() {
        let frequency = VarFreq::of(&constraint)?;
        let (renamed, new_tests) = frequency.split(constraint)?;
        constraint = renamed;
        tests.extend(new_tests);
    }

    let filter = match <[Filter; 1]>::try_from(tests) {
        Ok([test]) => test,
        Err(tests) => Filter::And(tests),
    };
    debug!(%original, %filter, "Split repeated variables");

    Ok(ConstraintExpression::filter(
        ConstraintExpression::Constraint(constraint),
        filter,
    ))
}

impl SymbolicTransformation for DuplicateVariableTransformer {
    fn name(&self) -> &str {
        "duplicate_variable_elimination"
    }

    fn rewrite(
        &self,
        _context: &dyn TransformationContext,
        expression: ConstraintExpression,
    ) -> TransformationResult<Transformed<ConstraintExpression>> {
        self.transform_expression(expression)
    }
}
