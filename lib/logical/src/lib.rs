pub mod expr;
pub mod transform;
mod transformed;

pub use expr::{
    Bindings, Constraint, ConstraintExpression, Extension, ExtensionConstraint, Filter,
};
pub use transform::{
    CompoundConstraintBuilder, ConjunctiveTransformer, DuplicateVariableTransformer,
    GroupedConstraint, GroupedConstraintBuilder, LocalQuery, ModelGrouping, MutableLocalQuery,
    PredicateGroups, StaticModelTypes, SubjectGroups, SymbolicTransformation,
    TransformationContext, TransformationPipeline, VarFreq,
};
pub use transformed::Transformed;
