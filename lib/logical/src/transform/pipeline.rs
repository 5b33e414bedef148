use crate::transform::{
    ConjunctiveTransformer, DuplicateVariableTransformer, GroupedConstraintBuilder,
    MutableLocalQuery, SymbolicTransformation, TransformationContext,
};
use std::sync::Arc;
use tracing::{debug, trace};
use triad_common::TransformationResult;
use triad_model::NamedNode;

/// An ordered list of [SymbolicTransformation]s that is applied to a query.
#[derive(Debug, Default, Clone)]
pub struct TransformationPipeline {
    transformations: Vec<Arc<dyn SymbolicTransformation>>,
}

impl TransformationPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the default pipeline. It groups the constraints of models of type `model_type` and
    /// eliminates repeated variables afterward.
    pub fn with_default_transformations(model_type: NamedNode) -> Self {
        Self::new()
            .with_transformation(Arc::new(ConjunctiveTransformer::new(
                model_type,
                GroupedConstraintBuilder,
            )))
            .with_transformation(Arc::new(DuplicateVariableTransformer::new()))
    }

    /// Appends `transformation` to the pipeline.
    #[must_use]
    pub fn with_transformation(mut self, transformation: Arc<dyn SymbolicTransformation>) -> Self {
        self.transformations.push(transformation);
        self
    }

    pub fn transformations(&self) -> &[Arc<dyn SymbolicTransformation>] {
        &self.transformations
    }

    /// Applies the transformations in order until none of them changes the query. Whenever a
    /// transformation changes the query, the pipeline starts over with the first one, so an
    /// earlier transformation sees the output of a later one.
    ///
    /// The transformations must converge. Returns whether any transformation changed the query.
    /// The first error aborts the pipeline.
    pub fn run(
        &self,
        context: &dyn TransformationContext,
        query: &mut dyn MutableLocalQuery,
    ) -> TransformationResult<bool> {
        let mut changed = false;
        let mut index = 0;
        while let Some(transformation) = self.transformations.get(index) {
            if transformation.transform(context, query)? {
                debug!(
                    transformation = transformation.name(),
                    "Applied symbolic transformation"
                );
                trace!(expression = %query.constraint_expression(), "Transformed expression");
                changed = true;
                index = 0;
            } else {
                index += 1;
            }
        }
        Ok(changed)
    }
}
