use crate::test_utils::{constraint, create_context, iri, target_type, var};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use triad_common::TransformationResult;
use triad_logical::{
    ConstraintExpression, DuplicateVariableTransformer, LocalQuery, MutableLocalQuery,
    SymbolicTransformation, TransformationContext, TransformationPipeline, Transformed,
};
use triad_model::NamedNode;

/// Replaces the predicate `from` of a top-level constraint with `to`.
#[derive(Debug)]
struct RenamePredicate {
    from: NamedNode,
    to: NamedNode,
    applied: AtomicUsize,
}

impl RenamePredicate {
    fn new(from: NamedNode, to: NamedNode) -> Arc<Self> {
        Arc::new(Self {
            from,
            to,
            applied: AtomicUsize::new(0),
        })
    }

    fn applied(&self) -> usize {
        self.applied.load(Ordering::Relaxed)
    }
}

impl SymbolicTransformation for RenamePredicate {
    fn name(&self) -> &str {
        "rename_predicate"
    }

    fn rewrite(
        &self,
        _context: &dyn TransformationContext,
        expression: ConstraintExpression,
    ) -> TransformationResult<Transformed<ConstraintExpression>> {
        match expression {
            ConstraintExpression::Constraint(c)
                if c.predicate().as_named_node() == Some(self.from.as_ref()) =>
            {
                self.applied.fetch_add(1, Ordering::Relaxed);
                Ok(Transformed::yes(constraint(
                    c.subject().clone(),
                    self.to.clone(),
                    c.object().clone(),
                    c.model().clone(),
                )))
            }
            expression => Ok(Transformed::no(expression)),
        }
    }
}

#[test]
fn test_default_pipeline() -> TransformationResult<()> {
    let mut query = LocalQuery::new(ConstraintExpression::conjunction([
        constraint(var("x"), iri("p1"), var("a"), iri("m1")),
        constraint(var("x"), iri("p2"), var("b"), iri("m1")),
        constraint(var("y"), iri("p1"), var("y"), iri("m3")),
    ]));

    let changed = TransformationPipeline::with_default_transformations(target_type())
        .run(&create_context(), &mut query)?;

    assert!(changed);
    insta::assert_snapshot!(query.constraint_expression(), @r"
    Conjunction
      Filter: sameTerm(?y, ?y*1)
        Constraint: [?y <http://example.com/p1> ?y*1 <http://example.com/m3>]
      Grouped: <http://example.com/m1> ?x {<http://example.com/p1>: [?a], <http://example.com/p2>: [?b]}
    ");

    Ok(())
}

#[test]
fn test_unchanged_query_is_not_replaced() -> TransformationResult<()> {
    let expression = ConstraintExpression::conjunction([
        constraint(var("x"), iri("p1"), var("a"), iri("m3")),
        constraint(var("x"), iri("p2"), var("b"), var("g")),
    ]);
    let mut query = LocalQuery::new(expression.clone());

    let changed = TransformationPipeline::with_default_transformations(target_type())
        .run(&create_context(), &mut query)?;

    assert!(!changed);
    assert_eq!(query.into_constraint_expression(), expression);

    Ok(())
}

#[test]
fn test_single_transformation_reports_change() -> TransformationResult<()> {
    let mut query = LocalQuery::new(constraint(var("x"), iri("p1"), var("x"), iri("m3")));
    let transformation = DuplicateVariableTransformer::new();

    assert!(transformation.transform(&create_context(), &mut query)?);
    assert!(!transformation.transform(&create_context(), &mut query)?);

    Ok(())
}

#[test]
fn test_pipeline_aborts_on_error() {
    let mut query = LocalQuery::new(constraint(var("x"), iri("p1"), var("a"), iri("missing")));
    let pipeline = TransformationPipeline::new()
        .with_transformation(Arc::new(DuplicateVariableTransformer::new()))
        .with_transformation(Arc::new(triad_logical::ConjunctiveTransformer::new(
            target_type(),
            triad_logical::GroupedConstraintBuilder,
        )));

    let result = pipeline.run(&create_context(), &mut query);

    assert!(result.is_err());
    assert_eq!(pipeline.transformations().len(), 2);
}

#[test]
fn test_later_transformation_enables_earlier_one() -> TransformationResult<()> {
    let mut query = LocalQuery::new(constraint(var("x"), iri("p1"), var("a"), iri("m3")));
    let second_to_third = RenamePredicate::new(iri("p2"), iri("p3"));
    let first_to_second = RenamePredicate::new(iri("p1"), iri("p2"));
    let pipeline = TransformationPipeline::new()
        .with_transformation(second_to_third.clone())
        .with_transformation(first_to_second.clone());

    let changed = pipeline.run(&create_context(), &mut query)?;

    assert!(changed);
    assert_eq!(first_to_second.applied(), 1);
    assert_eq!(second_to_third.applied(), 1);
    assert_eq!(
        query.into_constraint_expression(),
        constraint(var("x"), iri("p3"), var("a"), iri("m3"))
    );

    Ok(())
}
