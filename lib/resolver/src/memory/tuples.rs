use rustc_hash::FxHashSet;
use std::sync::Arc;
use triad_common::error::TuplesError;
use triad_common::tuples::check_column;
use triad_common::{Cursor, Tuples, TuplesResult};
use triad_model::{NodeId, Variable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    BeforeFirst,
    Row(usize),
    AfterLast,
}

/// [Tuples] backed by a materialized list of rows.
#[derive(Debug)]
pub struct MemoryTuples {
    variables: Arc<[Variable]>,
    rows: Arc<[Box<[NodeId]>]>,
    position: Position,
    closed: bool,
}

impl MemoryTuples {
    /// Creates new [MemoryTuples] whose columns bind `variables`.
    ///
    /// # Errors
    ///
    /// Returns [TuplesError::RowWidthMismatch] if a row does not have one value per variable.
    pub fn try_new(
        variables: impl Into<Arc<[Variable]>>,
        rows: impl IntoIterator<Item = Vec<NodeId>>,
    ) -> TuplesResult<Self> {
        let variables = variables.into();
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(row, values)| {
                if values.len() == variables.len() {
                    Ok(values.into_boxed_slice())
                } else {
                    Err(TuplesError::RowWidthMismatch {
                        row,
                        expected: variables.len(),
                        actual: values.len(),
                    })
                }
            })
            .collect::<TuplesResult<Arc<[_]>>>()?;

        Ok(Self {
            variables,
            rows,
            position: Position::BeforeFirst,
            closed: false,
        })
    }

    /// Creates [MemoryTuples] from rows whose width is known to match `variables`.
    pub(crate) fn from_checked_rows(
        variables: Arc<[Variable]>,
        rows: impl IntoIterator<Item = Box<[NodeId]>>,
    ) -> Self {
        Self {
            variables,
            rows: rows.into_iter().collect(),
            position: Position::BeforeFirst,
            closed: false,
        }
    }

    /// Creates [MemoryTuples] without any row.
    pub fn empty(variables: impl Into<Arc<[Variable]>>) -> Self {
        Self {
            variables: variables.into(),
            rows: Arc::new([]),
            position: Position::BeforeFirst,
            closed: false,
        }
    }

    /// Returns the current row.
    pub(crate) fn current_row(&self) -> TuplesResult<&[NodeId]> {
        self.ensure_open()?;
        match self.position {
            Position::Row(index) => Ok(self.rows[index].as_ref()),
            Position::BeforeFirst | Position::AfterLast => Err(TuplesError::NotOnRow),
        }
    }

    pub(crate) fn copy(&self) -> Self {
        Self {
            variables: Arc::clone(&self.variables),
            rows: Arc::clone(&self.rows),
            position: Position::BeforeFirst,
            closed: false,
        }
    }

    fn ensure_open(&self) -> TuplesResult<()> {
        if self.closed {
            Err(TuplesError::Closed)
        } else {
            Ok(())
        }
    }
}

impl Cursor for MemoryTuples {
    fn variables(&self) -> &[Variable] {
        &self.variables
    }

    fn before_first(&mut self) -> TuplesResult<()> {
        self.ensure_open()?;
        self.position = Position::BeforeFirst;
        Ok(())
    }

    fn next(&mut self) -> TuplesResult<bool> {
        self.ensure_open()?;
        let next = match self.position {
            Position::BeforeFirst => 0,
            Position::Row(index) => index + 1,
            Position::AfterLast => return Ok(false),
        };

        if next < self.rows.len() {
            self.position = Position::Row(next);
            Ok(true)
        } else {
            self.position = Position::AfterLast;
            Ok(false)
        }
    }

    fn row_count(&self) -> TuplesResult<u64> {
        self.ensure_open()?;
        Ok(self.rows.len() as u64)
    }

    fn row_upper_bound(&self) -> TuplesResult<u64> {
        self.row_count()
    }

    fn close(&mut self) -> TuplesResult<()> {
        self.closed = true;
        Ok(())
    }
}

impl Tuples for MemoryTuples {
    fn column_value(&self, column: usize) -> TuplesResult<NodeId> {
        check_column(column, self.variables.len())?;
        Ok(self.current_row()?[column])
    }

    fn is_column_ever_unbound(&self, column: usize) -> TuplesResult<bool> {
        self.ensure_open()?;
        check_column(column, self.variables.len())?;
        Ok(self.rows.iter().any(|row| row[column].is_none()))
    }

    fn has_no_duplicates(&self) -> TuplesResult<bool> {
        self.ensure_open()?;
        let mut seen = FxHashSet::default();
        Ok(self.rows.iter().all(|row| seen.insert(row)))
    }

    fn boxed_clone(&self) -> Box<dyn Tuples> {
        Box::new(self.copy())
    }
}
