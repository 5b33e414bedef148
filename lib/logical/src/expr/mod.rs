mod constraint;
mod expression;
mod extension;
mod filter;

pub use constraint::Constraint;
pub use expression::ConstraintExpression;
pub use extension::{Extension, ExtensionConstraint};
pub use filter::{Bindings, Filter};
