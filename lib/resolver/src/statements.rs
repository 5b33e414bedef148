use triad_common::{Cursor, TuplesResult};
use triad_model::{NodeId, VariableRef};

/// The variable of the subject column of [Statements].
pub const SUBJECT: VariableRef<'static> = VariableRef::new_unchecked("subject");
/// The variable of the predicate column of [Statements].
pub const PREDICATE: VariableRef<'static> = VariableRef::new_unchecked("predicate");
/// The variable of the object column of [Statements].
pub const OBJECT: VariableRef<'static> = VariableRef::new_unchecked("object");

/// A [Cursor] over triples of a single graph.
///
/// The columns are always [SUBJECT], [PREDICATE] and [OBJECT], in this order.
pub trait Statements: Cursor {
    fn subject(&self) -> TuplesResult<NodeId>;

    fn predicate(&self) -> TuplesResult<NodeId>;

    fn object(&self) -> TuplesResult<NodeId>;

    /// Copies these statements. The copy starts before the first triple.
    fn boxed_clone(&self) -> Box<dyn Statements>;
}
