use triad_common::Tuples;
use triad_logical::Constraint;

/// The [Tuples] that satisfy a single [Constraint].
///
/// The columns of a resolution bind the variables of its constraint.
pub trait Resolution: Tuples {
    /// The constraint that has been resolved.
    fn constraint(&self) -> &Constraint;

    /// Returns `true` if the resolution contains every solution of the constraint. An incomplete
    /// resolution must be joined with further resolutions of the same constraint.
    fn is_complete(&self) -> bool;
}
