use crate::NotAVariableError;
use oxrdf::{BlankNode, Literal, NamedNode, NamedNodeRef, Term, Variable, VariableRef};
use std::fmt::{Display, Formatter};

/// A single position of a constraint. Either a [Variable] that is bound during resolution or a
/// fixed [Term].
///
/// Fixed terms are only ever compared for equality. Two literals with the same lexical form but a
/// different language tag or datatype are different elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstraintElement {
    /// A variable, compared by name.
    Variable(Variable),
    /// A fixed term.
    Term(Term),
}

impl ConstraintElement {
    /// Creates a variable element without validating the name.
    pub fn variable_unchecked(name: impl Into<String>) -> Self {
        Self::Variable(Variable::new_unchecked(name))
    }

    /// Returns `true` if this element is a variable.
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    /// Returns the variable of this element, if any.
    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Self::Variable(variable) => Some(variable),
            Self::Term(_) => None,
        }
    }

    /// Returns the fixed term of this element, if any.
    pub fn as_term(&self) -> Option<&Term> {
        match self {
            Self::Variable(_) => None,
            Self::Term(term) => Some(term),
        }
    }

    /// Returns the IRI of this element if it is a fixed named node.
    ///
    /// Models are addressed by IRI, so this is how callers check whether a model position can be
    /// mapped to a model type.
    pub fn as_named_node(&self) -> Option<NamedNodeRef<'_>> {
        match self {
            Self::Term(Term::NamedNode(nn)) => Some(nn.as_ref()),
            _ => None,
        }
    }

    /// Returns `true` if this element is the variable `variable`.
    pub fn is_variable_named(&self, variable: VariableRef<'_>) -> bool {
        self.as_variable()
            .is_some_and(|candidate| candidate.as_ref() == variable)
    }
}

impl Display for ConstraintElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintElement::Variable(variable) => variable.fmt(f),
            ConstraintElement::Term(term) => term.fmt(f),
        }
    }
}

impl From<Variable> for ConstraintElement {
    fn from(value: Variable) -> Self {
        Self::Variable(value)
    }
}

impl From<VariableRef<'_>> for ConstraintElement {
    fn from(value: VariableRef<'_>) -> Self {
        Self::Variable(value.into_owned())
    }
}

impl From<Term> for ConstraintElement {
    fn from(value: Term) -> Self {
        Self::Term(value)
    }
}

impl From<NamedNode> for ConstraintElement {
    fn from(value: NamedNode) -> Self {
        Self::Term(Term::NamedNode(value))
    }
}

impl From<NamedNodeRef<'_>> for ConstraintElement {
    fn from(value: NamedNodeRef<'_>) -> Self {
        Self::Term(Term::NamedNode(value.into_owned()))
    }
}

impl From<BlankNode> for ConstraintElement {
    fn from(value: BlankNode) -> Self {
        Self::Term(Term::BlankNode(value))
    }
}

impl From<Literal> for ConstraintElement {
    fn from(value: Literal) -> Self {
        Self::Term(Term::Literal(value))
    }
}

impl TryFrom<ConstraintElement> for Variable {
    type Error = NotAVariableError;

    fn try_from(value: ConstraintElement) -> Result<Self, Self::Error> {
        match value {
            ConstraintElement::Variable(variable) => Ok(variable),
            term @ ConstraintElement::Term(_) => Err(NotAVariableError(term)),
        }
    }
}
