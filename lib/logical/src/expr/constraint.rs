use std::fmt;
use triad_model::{ConstraintElement, InvalidPositionError, Variable};

/// An atomic constraint that matches the statements `subject predicate object` in `model`.
///
/// Each of the four positions is either a variable or a fixed term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constraint {
    elements: [ConstraintElement; 4],
}

impl Constraint {
    pub const SUBJECT: usize = 0;
    pub const PREDICATE: usize = 1;
    pub const OBJECT: usize = 2;
    pub const MODEL: usize = 3;

    /// Creates a new [Constraint].
    pub fn new(
        subject: impl Into<ConstraintElement>,
        predicate: impl Into<ConstraintElement>,
        object: impl Into<ConstraintElement>,
        model: impl Into<ConstraintElement>,
    ) -> Self {
        Self {
            elements: [
                subject.into(),
                predicate.into(),
                object.into(),
                model.into(),
            ],
        }
    }

    /// Creates a new [Constraint] from its positions in the order subject, predicate, object and
    /// model.
    pub fn from_elements(elements: [ConstraintElement; 4]) -> Self {
        Self { elements }
    }

    pub fn subject(&self) -> &ConstraintElement {
        &self.elements[Self::SUBJECT]
    }

    pub fn predicate(&self) -> &ConstraintElement {
        &self.elements[Self::PREDICATE]
    }

    pub fn object(&self) -> &ConstraintElement {
        &self.elements[Self::OBJECT]
    }

    pub fn model(&self) -> &ConstraintElement {
        &self.elements[Self::MODEL]
    }

    /// Returns the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not in `0..4`.
    pub fn element(&self, index: usize) -> Result<&ConstraintElement, InvalidPositionError> {
        self.elements.get(index).ok_or(InvalidPositionError(index))
    }

    pub fn elements(&self) -> &[ConstraintElement; 4] {
        &self.elements
    }

    pub fn into_elements(self) -> [ConstraintElement; 4] {
        self.elements
    }

    /// Returns the distinct variables of this constraint in position order.
    pub fn variables(&self) -> Vec<&Variable> {
        let mut result: Vec<&Variable> = Vec::with_capacity(4);
        for variable in self.elements.iter().filter_map(ConstraintElement::as_variable) {
            if !result.contains(&variable) {
                result.push(variable);
            }
        }
        result
    }

    /// Returns `true` if any variable occurs in more than one position.
    pub fn is_repeating(&self) -> bool {
        let variables = self
            .elements
            .iter()
            .filter(|element| element.is_variable())
            .count();
        variables != self.variables().len()
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [subject, predicate, object, model] = &self.elements;
        write!(f, "[{subject} {predicate} {object} {model}]")
    }
}
