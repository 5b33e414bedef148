use crate::memory::MemoryTuples;
use crate::{Statements, OBJECT, PREDICATE, SUBJECT};
use std::sync::Arc;
use triad_common::{Cursor, Tuples, TuplesResult};
use triad_logical::Constraint;
use triad_model::{NodeId, Variable};

/// [Statements] backed by a materialized list of triples.
#[derive(Debug)]
pub struct MemoryStatements {
    tuples: MemoryTuples,
}

impl MemoryStatements {
    pub fn new(triples: impl IntoIterator<Item = [NodeId; 3]>) -> Self {
        let variables = [SUBJECT, PREDICATE, OBJECT].map(|variable| variable.into_owned());
        let rows = triples.into_iter().map(|triple| -> Box<[NodeId]> { Box::new(triple) });
        Self {
            tuples: MemoryTuples::from_checked_rows(Arc::from(variables), rows),
        }
    }

    fn value(&self, position: usize) -> TuplesResult<NodeId> {
        self.tuples.column_value(position)
    }
}

impl Cursor for MemoryStatements {
    fn variables(&self) -> &[Variable] {
        self.tuples.variables()
    }

    fn before_first(&mut self) -> TuplesResult<()> {
        self.tuples.before_first()
    }

    fn next(&mut self) -> TuplesResult<bool> {
        self.tuples.next()
    }

    fn row_count(&self) -> TuplesResult<u64> {
        self.tuples.row_count()
    }

    fn row_upper_bound(&self) -> TuplesResult<u64> {
        self.tuples.row_upper_bound()
    }

    fn close(&mut self) -> TuplesResult<()> {
        self.tuples.close()
    }
}

impl Statements for MemoryStatements {
    fn subject(&self) -> TuplesResult<NodeId> {
        self.value(Constraint::SUBJECT)
    }

    fn predicate(&self) -> TuplesResult<NodeId> {
        self.value(Constraint::PREDICATE)
    }

    fn object(&self) -> TuplesResult<NodeId> {
        self.value(Constraint::OBJECT)
    }

    fn boxed_clone(&self) -> Box<dyn Statements> {
        Box::new(Self {
            tuples: self.tuples.copy(),
        })
    }
}
