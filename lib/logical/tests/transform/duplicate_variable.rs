use crate::test_utils::{constraint, create_dataset, evaluate, iri, project_sorted, var};
use proptest::prelude::*;
use triad_common::TransformationResult;
use triad_logical::{
    CompoundConstraintBuilder, Constraint, ConstraintExpression, DuplicateVariableTransformer,
    GroupedConstraint, GroupedConstraintBuilder, ModelGrouping,
};
use triad_model::ConstraintElement;

#[test]
fn test_single_repetition() -> TransformationResult<()> {
    let expression = constraint(var("x"), iri("p"), var("x"), iri("m"));

    let result = DuplicateVariableTransformer::new().transform_expression(expression)?;

    assert!(result.transformed);
    insta::assert_snapshot!(result.data, @r"
    Filter: sameTerm(?x, ?x*1)
      Constraint: [?x <http://example.com/p> ?x*1 <http://example.com/m>]
    ");

    Ok(())
}

#[test]
fn test_triple_repetition() -> TransformationResult<()> {
    let expression = constraint(var("x"), var("x"), var("x"), iri("m"));

    let result = DuplicateVariableTransformer::new().transform_expression(expression)?;

    insta::assert_snapshot!(result.data, @r"
    Filter: (sameTerm(?x, ?x*1) && sameTerm(?x, ?x*2))
      Constraint: [?x ?x*1 ?x*2 <http://example.com/m>]
    ");

    Ok(())
}

#[test]
fn test_two_repeated_variables() -> TransformationResult<()> {
    let expression = constraint(var("x"), var("g"), var("x"), var("g"));

    let result = DuplicateVariableTransformer::new().transform_expression(expression)?;

    insta::assert_snapshot!(result.data, @r"
    Filter: (sameTerm(?x, ?x*1) && sameTerm(?g, ?g*1))
      Constraint: [?x ?g ?x*1 ?g*1]
    ");

    Ok(())
}

#[test]
fn test_distinct_variables_unchanged() -> TransformationResult<()> {
    let expression = ConstraintExpression::conjunction([
        constraint(var("s"), iri("p"), var("o"), iri("m")),
        constraint(var("o"), iri("p"), var("s"), iri("m")),
    ]);

    let result = DuplicateVariableTransformer::new().transform_expression(expression.clone())?;

    assert!(!result.transformed);
    assert_eq!(result.data, expression);

    Ok(())
}

#[test]
fn test_recurses_into_all_wrappers() -> TransformationResult<()> {
    let repeated = || constraint(var("x"), iri("p"), var("x"), iri("m"));
    let plain = || constraint(var("s"), iri("p"), var("o"), iri("m"));
    let expression = ConstraintExpression::difference(
        ConstraintExpression::optional_join(plain(), repeated(), None),
        ConstraintExpression::in_model(
            ConstraintExpression::disjunction([plain(), repeated()]),
            iri("n"),
        ),
    );

    let result = DuplicateVariableTransformer::new().transform_expression(expression)?;

    assert!(result.transformed);
    insta::assert_snapshot!(result.data, @r"
    Difference
      OptionalJoin
        Constraint: [?s <http://example.com/p> ?o <http://example.com/m>]
        Filter: sameTerm(?x, ?x*1)
          Constraint: [?x <http://example.com/p> ?x*1 <http://example.com/m>]
      In: <http://example.com/n>
        Disjunction
          Constraint: [?s <http://example.com/p> ?o <http://example.com/m>]
          Filter: sameTerm(?x, ?x*1)
            Constraint: [?x <http://example.com/p> ?x*1 <http://example.com/m>]
    ");

    Ok(())
}

#[test]
fn test_extension_passes_through() -> TransformationResult<()> {
    let mut grouping = ModelGrouping::new(iri("m"));
    grouping.push(&Constraint::new(var("x"), iri("p"), var("x"), iri("m")));
    let expression = GroupedConstraintBuilder.build(grouping)?;

    let result = DuplicateVariableTransformer::new().transform_expression(expression.clone())?;

    assert!(!result.transformed);
    assert_eq!(result.data, expression);
    let ConstraintExpression::Extension(extension) = &result.data else {
        panic!("Expected an extension");
    };
    assert!(extension.downcast_ref::<GroupedConstraint>().is_some());

    Ok(())
}

const VARIABLES: &[&str] = &["x", "y", "z"];
const TERMS: &[&str] = &["s1", "p1", "m1"];

fn repeating_constraint_strategy() -> BoxedStrategy<Constraint> {
    let element = prop_oneof![
        3 => proptest::sample::select(VARIABLES)
            .prop_map(|name| ConstraintElement::from(var(name))),
        1 => proptest::sample::select(TERMS)
            .prop_map(|suffix| ConstraintElement::from(iri(suffix))),
    ]
    .boxed();
    proptest::array::uniform4(element)
        .prop_map(Constraint::from_elements)
        .prop_filter("constraint must repeat a variable", Constraint::is_repeating)
        .boxed()
}

proptest! {
    #[test]
    fn prop_adds_one_test_per_repetition(constraint in repeating_constraint_strategy()) {
        let variable_positions = constraint
            .elements()
            .iter()
            .filter(|element| element.is_variable())
            .count();
        let expected_tests = variable_positions - constraint.variables().len();

        let result = DuplicateVariableTransformer::new()
            .transform_expression(ConstraintExpression::Constraint(constraint))
            .unwrap();

        let ConstraintExpression::Filter { inner, filter } = result.data else {
            panic!("Expected a filter");
        };
        let ConstraintExpression::Constraint(rewritten) = *inner else {
            panic!("Expected a constraint");
        };
        prop_assert!(result.transformed);
        prop_assert!(filter.is_same_term_only());
        prop_assert_eq!(filter.same_term_count(), expected_tests);
        prop_assert!(!rewritten.is_repeating());
    }

    #[test]
    fn prop_preserves_solutions(constraint in repeating_constraint_strategy()) {
        let dataset = create_dataset();
        let expression = ConstraintExpression::Constraint(constraint);
        let variables = expression.variables();

        let result = DuplicateVariableTransformer::new()
            .transform_expression(expression.clone())
            .unwrap();

        prop_assert_eq!(
            project_sorted(&evaluate(&dataset, &expression), &variables),
            project_sorted(&evaluate(&dataset, &result.data), &variables)
        );
    }
}
