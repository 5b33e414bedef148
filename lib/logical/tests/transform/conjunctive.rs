use crate::test_utils::{
    constraint, create_context, create_dataset, evaluate, iri, project_sorted, target_type, var,
};
use proptest::prelude::*;
use std::fmt;
use triad_common::error::TransformationError;
use triad_common::TransformationResult;
use triad_logical::{
    CompoundConstraintBuilder, ConjunctiveTransformer, ConstraintExpression, Filter,
    GroupedConstraint, GroupedConstraintBuilder, ModelGrouping,
};
use triad_model::ConstraintElement;

fn create_transformer() -> ConjunctiveTransformer<GroupedConstraintBuilder> {
    ConjunctiveTransformer::new(target_type(), GroupedConstraintBuilder)
}

#[test]
fn test_group_shared_subject() -> TransformationResult<()> {
    let expression = ConstraintExpression::conjunction([
        constraint(var("x"), iri("p1"), iri("o1"), iri("m1")),
        constraint(var("x"), iri("p2"), iri("o2"), iri("m1")),
        constraint(var("x"), iri("p1"), iri("o1"), iri("m3")),
    ]);

    let result = create_transformer().transform_expression(&create_context(), expression)?;

    assert!(result.transformed);
    insta::assert_snapshot!(result.data, @r"
    Conjunction
      Constraint: [?x <http://example.com/p1> <http://example.com/o1> <http://example.com/m3>]
      Grouped: <http://example.com/m1> ?x {<http://example.com/p1>: [<http://example.com/o1>], <http://example.com/p2>: [<http://example.com/o2>]}
    ");

    Ok(())
}

#[test]
fn test_group_keeps_subject_kinds_apart() -> TransformationResult<()> {
    let expression = ConstraintExpression::conjunction([
        constraint(iri("s1"), iri("p1"), var("a"), iri("m1")),
        constraint(var("x"), iri("p1"), var("b"), iri("m1")),
        constraint(var("x"), iri("p1"), var("c"), iri("m1")),
        constraint(var("y"), iri("p2"), var("d"), iri("m2")),
    ]);

    let result = create_transformer().transform_expression(&create_context(), expression)?;

    let ConstraintExpression::Conjunction(operands) = &result.data else {
        panic!("Expected a conjunction, got {}", result.data);
    };
    let groupings = operands
        .iter()
        .map(|operand| match operand {
            ConstraintExpression::Extension(extension) => extension
                .downcast_ref::<GroupedConstraint>()
                .unwrap()
                .grouping()
                .clone(),
            _ => panic!("Unexpected residual {operand}"),
        })
        .collect::<Vec<_>>();

    assert_eq!(groupings.len(), 2);
    assert_eq!(groupings[0].model(), iri("m1").as_ref());
    assert_eq!(groupings[0].by_fixed_subject().constraint_count(), 1);
    assert_eq!(groupings[0].by_variable_subject().constraint_count(), 2);
    assert_eq!(
        groupings[0]
            .by_variable_subject()
            .get(&ConstraintElement::from(var("x")))
            .and_then(|predicates| predicates.objects(&ConstraintElement::from(iri("p1"))))
            .map(<[ConstraintElement]>::len),
        Some(2)
    );
    assert_eq!(groupings[1].model(), iri("m2").as_ref());

    Ok(())
}

#[test]
fn test_no_matching_model_returns_input() -> TransformationResult<()> {
    let expression = ConstraintExpression::conjunction([
        constraint(var("x"), iri("p1"), iri("o1"), iri("m3")),
        constraint(var("x"), iri("p2"), iri("o2"), var("g")),
    ]);

    let result =
        create_transformer().transform_expression(&create_context(), expression.clone())?;

    assert!(!result.transformed);
    assert_eq!(result.data, expression);

    Ok(())
}

#[test]
fn test_lone_constraint_is_grouped() -> TransformationResult<()> {
    let expression = constraint(var("x"), iri("p1"), iri("o1"), iri("m2"));

    let result = create_transformer().transform_expression(&create_context(), expression)?;

    assert!(result.transformed);
    insta::assert_snapshot!(result.data, @r"
    Conjunction
      Grouped: <http://example.com/m2> ?x {<http://example.com/p1>: [<http://example.com/o1>]}
    ");

    Ok(())
}

#[test]
fn test_lone_constraint_unchanged() -> TransformationResult<()> {
    let expression = constraint(var("x"), iri("p1"), iri("o1"), iri("m3"));

    let result =
        create_transformer().transform_expression(&create_context(), expression.clone())?;

    assert!(!result.transformed);
    assert_eq!(result.data, expression);

    Ok(())
}

#[test]
fn test_nested_conjunctions_are_flattened() -> TransformationResult<()> {
    let expression = ConstraintExpression::conjunction([
        constraint(var("x"), iri("p1"), var("a"), iri("m1")),
        ConstraintExpression::conjunction([
            constraint(var("x"), iri("p2"), var("b"), iri("m1")),
            constraint(var("x"), iri("p2"), var("c"), iri("m3")),
        ]),
    ]);

    let result = create_transformer().transform_expression(&create_context(), expression)?;

    insta::assert_snapshot!(result.data, @r"
    Conjunction
      Constraint: [?x <http://example.com/p2> ?c <http://example.com/m3>]
      Grouped: <http://example.com/m1> ?x {<http://example.com/p1>: [?a], <http://example.com/p2>: [?b]}
    ");

    Ok(())
}

#[test]
fn test_disjunction_branches_are_not_merged() -> TransformationResult<()> {
    let expression = ConstraintExpression::disjunction([
        ConstraintExpression::conjunction([
            constraint(var("x"), iri("p1"), var("a"), iri("m1")),
            constraint(var("x"), iri("p2"), var("b"), iri("m1")),
        ]),
        constraint(var("x"), iri("p1"), var("a"), iri("m3")),
    ]);

    let result = create_transformer().transform_expression(&create_context(), expression)?;

    assert!(result.transformed);
    insta::assert_snapshot!(result.data, @r"
    Disjunction
      Conjunction
        Grouped: <http://example.com/m1> ?x {<http://example.com/p1>: [?a], <http://example.com/p2>: [?b]}
      Constraint: [?x <http://example.com/p1> ?a <http://example.com/m3>]
    ");

    Ok(())
}

#[test]
fn test_nested_disjunction_change_is_kept() -> TransformationResult<()> {
    let expression = ConstraintExpression::conjunction([
        constraint(var("x"), iri("p1"), var("a"), iri("m3")),
        ConstraintExpression::disjunction([
            constraint(var("x"), iri("p2"), var("b"), iri("m1")),
            constraint(var("x"), iri("p2"), var("b"), iri("m3")),
        ]),
    ]);

    let result = create_transformer().transform_expression(&create_context(), expression)?;

    assert!(result.transformed);
    insta::assert_snapshot!(result.data, @r"
    Conjunction
      Constraint: [?x <http://example.com/p1> ?a <http://example.com/m3>]
      Disjunction
        Conjunction
          Grouped: <http://example.com/m1> ?x {<http://example.com/p2>: [?b]}
        Constraint: [?x <http://example.com/p2> ?b <http://example.com/m3>]
    ");

    Ok(())
}

#[test]
fn test_filter_inner_is_transformed() -> TransformationResult<()> {
    let expression = ConstraintExpression::filter(
        ConstraintExpression::conjunction([
            constraint(var("x"), iri("p1"), var("a"), iri("m1")),
            constraint(var("x"), iri("p2"), var("b"), iri("m1")),
        ]),
        Filter::Bound(var("a")),
    );

    let result = create_transformer().transform_expression(&create_context(), expression)?;

    insta::assert_snapshot!(result.data, @r"
    Filter: bound(?a)
      Conjunction
        Grouped: <http://example.com/m1> ?x {<http://example.com/p1>: [?a], <http://example.com/p2>: [?b]}
    ");

    Ok(())
}

#[test]
fn test_unknown_model_fails() {
    let expression = ConstraintExpression::conjunction([constraint(
        var("x"),
        iri("p1"),
        iri("o1"),
        iri("unknown"),
    )]);

    let result = create_transformer().transform_expression(&create_context(), expression);

    match result {
        Err(TransformationError::ModelTypeLookup(error)) => {
            assert_eq!(error.model(), &iri("unknown"));
        }
        other => panic!("Expected a lookup error, got {other:?}"),
    }
}

#[derive(Debug)]
struct FailingBuilder;

#[derive(Debug)]
struct BuilderFailure;

impl fmt::Display for BuilderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("backend refused grouping")
    }
}

impl std::error::Error for BuilderFailure {}

impl CompoundConstraintBuilder for FailingBuilder {
    fn build(&self, _grouping: ModelGrouping) -> TransformationResult<ConstraintExpression> {
        Err(TransformationError::Other(Box::new(BuilderFailure)))
    }
}

#[test]
fn test_builder_failure_propagates() {
    let transformer = ConjunctiveTransformer::new(target_type(), FailingBuilder);
    let expression = constraint(var("x"), iri("p1"), iri("o1"), iri("m1"));

    let error = transformer
        .transform_expression(&create_context(), expression)
        .unwrap_err();

    assert_eq!(error.to_string(), "backend refused grouping");
}

const MODELS: &[&str] = &["m1", "m2", "m3"];

fn element_strategy(
    variables: &'static [&'static str],
    iris: &'static [&'static str],
) -> BoxedStrategy<ConstraintElement> {
    prop_oneof![
        proptest::sample::select(variables).prop_map(|name| ConstraintElement::from(var(name))),
        proptest::sample::select(iris).prop_map(|suffix| ConstraintElement::from(iri(suffix))),
    ]
    .boxed()
}

fn constraint_strategy() -> BoxedStrategy<ConstraintExpression> {
    (
        element_strategy(&["x", "y"], &["s1", "s2"]),
        element_strategy(&["p"], &["p1", "p2"]),
        element_strategy(&["x", "y", "z"], &["o1", "o2", "s1"]),
        prop_oneof![
            4 => proptest::sample::select(MODELS)
                .prop_map(|suffix| ConstraintElement::from(iri(suffix))),
            1 => Just(ConstraintElement::from(var("g"))),
        ],
    )
        .prop_map(|(subject, predicate, object, model)| {
            constraint(subject, predicate, object, model)
        })
        .boxed()
}

fn expression_strategy() -> BoxedStrategy<ConstraintExpression> {
    let conjunction = proptest::collection::vec(constraint_strategy(), 1..4)
        .prop_map(ConstraintExpression::conjunction)
        .boxed();
    prop_oneof![
        3 => conjunction.clone(),
        1 => (conjunction.clone(), conjunction).prop_map(|(lhs, rhs)| {
            ConstraintExpression::conjunction([
                lhs,
                ConstraintExpression::disjunction([rhs.clone(), rhs]),
            ])
        }),
    ]
    .boxed()
}

proptest! {
    #[test]
    fn prop_grouping_preserves_solutions(expression in expression_strategy()) {
        let dataset = create_dataset();
        let variables = expression.variables();

        let result = create_transformer()
            .transform_expression(&create_context(), expression.clone())
            .unwrap();

        prop_assert_eq!(
            project_sorted(&evaluate(&dataset, &expression), &variables),
            project_sorted(&evaluate(&dataset, &result.data), &variables)
        );
    }

    #[test]
    fn prop_grouping_is_idempotent(expression in expression_strategy()) {
        let transformer = create_transformer();

        let first = transformer.transform_expression(&create_context(), expression).unwrap();
        let second = transformer
            .transform_expression(&create_context(), first.data.clone())
            .unwrap();

        prop_assert!(!second.transformed);
        prop_assert_eq!(second.data, first.data);
    }
}
