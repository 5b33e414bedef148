mod constraint_element;
mod error;
mod node_id;

pub use constraint_element::ConstraintElement;
pub use error::*;
pub use node_id::NodeId;

// Re-export some oxrdf types.
pub use oxrdf::vocab;
pub use oxrdf::{
    BlankNode, BlankNodeRef, IriParseError, Literal, LiteralRef, NamedNode, NamedNodeRef, Term,
    TermRef, Variable, VariableNameParseError, VariableRef,
};
