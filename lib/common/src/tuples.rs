use crate::error::TuplesError;
use crate::TuplesResult;
use std::fmt::Debug;
use triad_model::{NodeId, Variable, VariableRef};

/// A cheap classification of the number of rows of a [Cursor].
///
/// Planners use it to short-circuit joins without materializing a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowCardinality {
    Zero,
    One,
    Many,
}

impl RowCardinality {
    /// Classifies an exact row count.
    pub fn from_row_count(count: u64) -> Self {
        match count {
            0 => RowCardinality::Zero,
            1 => RowCardinality::One,
            _ => RowCardinality::Many,
        }
    }
}

/// A lazy, forward-only stream of rows.
///
/// A freshly created cursor is positioned *before* the first row. [Cursor::next] must be called
/// before any value can be read. Once [Cursor::close] has been called, the cursor cannot be used
/// anymore. Closing is idempotent.
pub trait Cursor: Debug + Send {
    /// The variables bound by the columns of this cursor, in column order.
    fn variables(&self) -> &[Variable];

    /// Returns the column that binds `variable`.
    fn column_index(&self, variable: VariableRef<'_>) -> Option<usize> {
        self.variables()
            .iter()
            .position(|candidate| candidate.as_ref() == variable)
    }

    /// Resets the cursor to the position before the first row.
    fn before_first(&mut self) -> TuplesResult<()>;

    /// Advances the cursor. Returns `false` once there are no further rows.
    fn next(&mut self) -> TuplesResult<bool>;

    /// The exact number of rows. May be expensive for lazily evaluated cursors.
    fn row_count(&self) -> TuplesResult<u64>;

    /// An upper bound of the number of rows. Callers must not treat it as exact.
    fn row_upper_bound(&self) -> TuplesResult<u64>;

    /// Classifies the number of rows without materializing the cursor if possible.
    fn row_cardinality(&self) -> TuplesResult<RowCardinality> {
        match self.row_upper_bound()? {
            0 => Ok(RowCardinality::Zero),
            _ => Ok(RowCardinality::from_row_count(self.row_count()?)),
        }
    }

    /// Releases all resources held by the cursor.
    fn close(&mut self) -> TuplesResult<()>;
}

/// A [Cursor] whose rows are node ids.
pub trait Tuples: Cursor {
    /// Returns the value of `column` in the current row.
    ///
    /// Returns [TuplesError::NotOnRow] if the cursor is not positioned on a row.
    fn column_value(&self, column: usize) -> TuplesResult<NodeId>;

    /// Returns `true` if `column` may contain [NodeId::NONE].
    fn is_column_ever_unbound(&self, column: usize) -> TuplesResult<bool>;

    /// Returns `true` if no row occurs twice.
    fn has_no_duplicates(&self) -> TuplesResult<bool>;

    /// Copies the configuration of these tuples. The copy starts before the first row,
    /// regardless of the position of `self`.
    fn boxed_clone(&self) -> Box<dyn Tuples>;
}

/// Checks that `column` is a valid column for a cursor with `width` columns.
pub fn check_column(column: usize, width: usize) -> TuplesResult<()> {
    if column < width {
        Ok(())
    } else {
        Err(TuplesError::ColumnOutOfBounds { column, width })
    }
}
