use itertools::Itertools;
use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;
use triad_model::{Term, TermRef, Variable, VariableRef};

/// Gives access to the values bound to variables in a solution.
pub trait Bindings {
    /// Returns the term bound to `variable`, or [None] if it is unbound.
    fn term(&self, variable: VariableRef<'_>) -> Option<TermRef<'_>>;
}

impl<S: BuildHasher> Bindings for HashMap<Variable, Term, S> {
    fn term(&self, variable: VariableRef<'_>) -> Option<TermRef<'_>> {
        self.get(&variable.into_owned()).map(Term::as_ref)
    }
}

/// A boolean test over the bindings of a solution.
///
/// Evaluation follows the error semantics of SPARQL filters: a test over an unbound variable
/// raises an error (represented as [None]) which `&&` and `||` may absorb.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Both variables are bound to the identical RDF term.
    SameTerm(Variable, Variable),
    /// The variable is bound.
    Bound(Variable),
    Not(Box<Filter>),
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    pub fn same_term(lhs: impl Into<Variable>, rhs: impl Into<Variable>) -> Self {
        Self::SameTerm(lhs.into(), rhs.into())
    }

    /// Returns `true` if this filter is a `SameTerm` test or a conjunction of such tests.
    pub fn is_same_term_only(&self) -> bool {
        match self {
            Filter::SameTerm(_, _) => true,
            Filter::And(inner) => inner.iter().all(Filter::is_same_term_only),
            _ => false,
        }
    }

    /// Returns the number of `SameTerm` tests in this filter.
    pub fn same_term_count(&self) -> usize {
        match self {
            Filter::SameTerm(_, _) => 1,
            Filter::Bound(_) => 0,
            Filter::Not(inner) => inner.same_term_count(),
            Filter::And(inner) | Filter::Or(inner) => {
                inner.iter().map(Filter::same_term_count).sum()
            }
        }
    }

    /// Evaluates the filter. Returns [None] if the evaluation raises an error.
    pub fn evaluate(&self, bindings: &impl Bindings) -> Option<bool> {
        match self {
            Filter::SameTerm(lhs, rhs) => {
                let lhs = bindings.term(lhs.as_ref())?;
                let rhs = bindings.term(rhs.as_ref())?;
                Some(lhs == rhs)
            }
            Filter::Bound(variable) => Some(bindings.term(variable.as_ref()).is_some()),
            Filter::Not(inner) => inner.evaluate(bindings).map(|value| !value),
            Filter::And(inner) => {
                let mut error = false;
                for filter in inner {
                    match filter.evaluate(bindings) {
                        Some(false) => return Some(false),
                        Some(true) => {}
                        None => error = true,
                    }
                }
                (!error).then_some(true)
            }
            Filter::Or(inner) => {
                let mut error = false;
                for filter in inner {
                    match filter.evaluate(bindings) {
                        Some(true) => return Some(true),
                        Some(false) => {}
                        None => error = true,
                    }
                }
                (!error).then_some(false)
            }
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::SameTerm(lhs, rhs) => write!(f, "sameTerm({lhs}, {rhs})"),
            Filter::Bound(variable) => write!(f, "bound({variable})"),
            Filter::Not(inner) => write!(f, "!({inner})"),
            Filter::And(inner) => write!(f, "({})", inner.iter().join(" && ")),
            Filter::Or(inner) => write!(f, "({})", inner.iter().join(" || ")),
        }
    }
}
