use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use triad_model::{NamedNodeRef, Variable};

/// A constraint defined by a resolver backend.
///
/// Transformations produce such constraints if a backend can answer a larger part of a query in one
/// request. The constraint is opaque to all other transformations.
pub trait ExtensionConstraint: fmt::Debug + Send + Sync {
    /// Returns the constraint as [Any] so that it can be downcast to a concrete type.
    fn as_any(&self) -> &dyn Any;

    /// A short name used when printing the constraint.
    fn name(&self) -> &str;

    /// The model this constraint is answered from, if it is fixed.
    fn model(&self) -> Option<NamedNodeRef<'_>>;

    /// The distinct variables bound by this constraint.
    fn variables(&self) -> Vec<Variable>;

    /// Writes a single-line description of this constraint.
    fn fmt_for_explain(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    /// Compares with another extension. Constraints of different types are never equal.
    fn dyn_eq(&self, other: &dyn ExtensionConstraint) -> bool;

    fn dyn_hash(&self, state: &mut dyn Hasher);
}

/// Wraps an [ExtensionConstraint] such that it can be placed in a
/// [ConstraintExpression](crate::ConstraintExpression).
#[derive(Debug, Clone)]
pub struct Extension {
    pub node: Arc<dyn ExtensionConstraint>,
}

impl Extension {
    pub fn new(node: Arc<dyn ExtensionConstraint>) -> Self {
        Self { node }
    }

    /// Returns the inner constraint if it has type `T`.
    pub fn downcast_ref<T: ExtensionConstraint + 'static>(&self) -> Option<&T> {
        self.node.as_any().downcast_ref::<T>()
    }
}

impl PartialEq for Extension {
    fn eq(&self, other: &Self) -> bool {
        self.node.dyn_eq(other.node.as_ref())
    }
}

impl Eq for Extension {}

impl Hash for Extension {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.dyn_hash(state);
    }
}
