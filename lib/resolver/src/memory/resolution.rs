use crate::memory::MemoryTuples;
use crate::Resolution;
use std::sync::Arc;
use triad_common::{Cursor, Tuples, TuplesResult};
use triad_logical::Constraint;
use triad_model::{NodeId, Variable};

/// A [Resolution] whose solutions have been materialized.
///
/// The columns bind the distinct variables of the constraint in position order.
#[derive(Debug)]
pub struct MemoryResolution {
    constraint: Arc<Constraint>,
    tuples: MemoryTuples,
    complete: bool,
}

impl MemoryResolution {
    /// Creates a new [MemoryResolution] with one row per solution of `constraint`.
    ///
    /// # Errors
    ///
    /// Returns an error if a row does not bind every variable of the constraint.
    pub fn try_new(
        constraint: Constraint,
        rows: impl IntoIterator<Item = Vec<NodeId>>,
        complete: bool,
    ) -> TuplesResult<Self> {
        let variables = constraint
            .variables()
            .into_iter()
            .cloned()
            .collect::<Vec<Variable>>();
        let tuples = MemoryTuples::try_new(variables, rows)?;
        Ok(Self {
            constraint: Arc::new(constraint),
            tuples,
            complete,
        })
    }
}

impl Cursor for MemoryResolution {
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

impl Tuples for MemoryResolution {
    fn column_value(&self, column: usize) -> TuplesResult<NodeId> {
        self.tuples.column_value(column)
    }

    fn is_column_ever_unbound(&self, column: usize) -> TuplesResult<bool> {
        self.tuples.is_column_ever_unbound(column)
    }

    fn has_no_duplicates(&self) -> TuplesResult<bool> {
        self.tuples.has_no_duplicates()
    }

    fn boxed_clone(&self) -> Box<dyn Tuples> {
        Box::new(Self {
            constraint: Arc::clone(&self.constraint),
            tuples: self.tuples.copy(),
            complete: self.complete,
        })
    }
}

impl Resolution for MemoryResolution {
    fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    fn is_complete(&self) -> bool {
        self.complete
    }
}
