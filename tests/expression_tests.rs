use mongo_expr::{
    AND, ExprError, Expression, OR, Value, and, exists, field, identity, identity_str, not_exists,
    or,
};
use uuid::Uuid;

fn a() -> Expression {
    field("a", 1)
}

fn b() -> Expression {
    field("b", "two")
}

fn c() -> Expression {
    field("c", field("$gt", 3))
}

fn operands(expr: &Expression, op: &str) -> Vec<Expression> {
    match expr.get(op) {
        Some(Value::Set(items)) => items
            .iter()
            .map(|v| v.as_expression().cloned().expect("operand is an expression"))
            .collect(),
        other => panic!("expected a set under {}, got {:?}", op, other),
    }
}

// ============================================================================
// Merge identity
// ============================================================================

#[test]
fn test_and_of_nothing_is_empty() {
    assert_eq!(and([]), Expression::empty());
    assert!(or(Vec::new()).is_empty());
}

#[test]
fn test_and_of_one_is_that_expression() {
    assert_eq!(and([a()]), a());
    assert_eq!(or([c()]), c());
}

#[test]
fn test_single_operand_is_not_normalized() {
    // one input is returned untouched, even when it is empty
    assert_eq!(and([Expression::empty()]), Expression::empty());
    let nested = field(AND, field("x", 1));
    assert_eq!(and([nested.clone()]), nested);
}

#[test]
fn test_empty_operands_are_skipped() {
    assert_eq!(and([Expression::empty(), a()]), a());
    assert_eq!(or([a(), Expression::empty(), Expression::empty()]), a());
}

#[test]
fn test_all_empty_operands_give_empty_combinator() {
    let merged = and([Expression::empty(), Expression::empty()]);
    assert!(operands(&merged, AND).is_empty());
    assert_eq!(merged.to_string(), r#"{"$and":[]}"#);
}

// ============================================================================
// Flattening and dedup
// ============================================================================

#[test]
fn test_nested_and_is_flattened() {
    let nested = and([and([a(), b()]), c()]);
    let flat = and([a(), b(), c()]);
    assert_eq!(nested, flat);
    assert_eq!(operands(&nested, AND).len(), 3);
}

#[test]
fn test_flattening_on_the_right() {
    assert_eq!(and([a(), and([b(), c()])]), and([a(), b(), c()]));
}

#[test]
fn test_or_inside_and_is_kept_nested() {
    let inner = or([a(), b()]);
    let merged = and([inner.clone(), c()]);
    let parts = operands(&merged, AND);
    assert_eq!(parts.len(), 2);
    assert!(parts.contains(&inner));
}

#[test]
fn test_duplicate_operands_collapse() {
    assert_eq!(and([a(), a()]), a());
    assert_eq!(or([b(), b(), b()]), b());
}

#[test]
fn test_duplicates_collapse_regardless_of_construction_order() {
    let x = field("x", 1);
    let dup = field("k", field("k2", true));
    let first = or([x.clone(), dup.clone(), field("k", field("k2", true))]);
    let second = or([field("k", field("k2", true)), x.clone()]);
    assert_eq!(first, second);
    assert_eq!(operands(&first, OR).len(), 2);
}

#[test]
fn test_nested_expression_value_is_decomposed() {
    // {$and: {a: 1, b: "two"}} splices as two single-key operands
    let mut inner = a();
    inner.append(b());
    let nested = field(AND, inner);
    assert_eq!(and([nested, c()]), and([a(), b(), c()]));
}

#[test]
fn test_nested_sequence_value_is_spliced() {
    let nested = field(AND, vec![Value::from(a()), Value::from(b())]);
    assert_eq!(and([nested, c()]), and([a(), b(), c()]));
}

#[test]
fn test_spliced_empty_children_are_skipped() {
    let nested = field(AND, Value::set([Expression::empty(), a()]));
    let merged = and([nested, b()]);
    assert_eq!(merged, and([a(), b()]));
    assert!(!operands(&merged, AND).contains(&Expression::empty()));
}

#[test]
fn test_nested_scalar_operand_is_kept() {
    let odd = field(AND, 5);
    let merged = and([odd.clone(), a()]);
    let parts = operands(&merged, AND);
    assert_eq!(parts.len(), 2);
    assert!(parts.contains(&odd));
}

#[test]
fn test_chaining_and_or() {
    assert_eq!(a().and(b()).and(c()), and([a(), b(), c()]));
    assert_eq!(a().or(a()), a());
}

#[test]
fn test_identity_token_operands_match_string_form() {
    let token = Uuid::new_v4();
    let mut both = identity("owner", token, false);
    both.append(a());
    let merged = and([field(AND, both), a()]);
    assert_eq!(merged, and([identity_str("owner", token), a()]));
}

// ============================================================================
// Equality
// ============================================================================

#[test]
fn test_combinator_arms_compare_as_sets() {
    assert_eq!(and([a(), b()]), and([b(), a()]));
    assert_eq!(or([a(), b(), c()]), or([c(), a(), b()]));
}

#[test]
fn test_key_order_is_ignored() {
    let mut left = a();
    left.append(b());
    let mut right = b();
    right.append(a());
    assert_eq!(left, right);
}

#[test]
fn test_equality_is_symmetric() {
    let mut bigger = a();
    bigger.append(b());
    assert_ne!(a(), bigger);
    assert_ne!(bigger, a());
}

#[test]
fn test_and_never_equals_or() {
    assert_ne!(and([a(), b()]), or([a(), b()]));
}

#[test]
fn test_sequence_values_compare_as_sets() {
    assert_eq!(field("tags", vec!["x", "y"]), field("tags", vec!["y", "x"]));
    assert_ne!(field("tags", vec!["x", "y"]), field("tags", "x"));
}

// ============================================================================
// Overlay
// ============================================================================

#[test]
fn test_append_last_write_wins() {
    let mut e1 = field("a", 1);
    e1.append(field("a", 2));
    assert_eq!(e1, field("a", 2));
}

#[test]
fn test_append_keeps_key_position() {
    let mut e = field("a", 1);
    e.append(field("b", 2)).append(field("a", 3));
    let keys: Vec<&str> = e.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["a", "b"]);
    assert_eq!(e.to_string(), r#"{"a":3,"b":2}"#);
}

// ============================================================================
// Single-field operators
// ============================================================================

#[test]
fn test_gt_wraps_value() {
    let e = field("age", 21).gt().unwrap();
    assert_eq!(e, field("age", field("$gt", 21)));
}

#[test]
fn test_every_single_field_operator() {
    let base = field("n", 1);
    let cases = [
        (base.gte(), "$gte"),
        (base.lt(), "$lt"),
        (base.lte(), "$lte"),
        (base.ne(), "$ne"),
        (base.not(), "$not"),
        (base.exists(), "$exists"),
        (base.elem_match(), "$elemMatch"),
    ];
    for (result, op) in cases {
        assert_eq!(result.unwrap(), field("n", field(op, 1)), "operator {}", op);
    }
}

#[test]
fn test_operator_on_empty_is_noop() {
    assert_eq!(Expression::empty().gt().unwrap(), Expression::empty());
}

#[test]
fn test_operator_on_two_entries_fails() {
    let mut e = a();
    e.append(b());
    match e.gt() {
        Err(ExprError::InvalidShape { op, entries }) => {
            assert_eq!(op, "$gt");
            assert_eq!(entries, 2);
        }
        other => panic!("expected InvalidShape, got {:?}", other),
    }
}

#[test]
fn test_exists_helpers() {
    assert_eq!(exists("email"), field("email", true).exists().unwrap());
    assert_eq!(not_exists("email"), field("email", false).exists().unwrap());
}

#[test]
fn test_elem_match_on_wraps_whole_expression() {
    let cond = field("qty", 5).gt().unwrap().with(field("sku", "x"));
    let e = cond.elem_match_on("items");
    assert_eq!(e, field("items", field("$elemMatch", cond)));
}

#[test]
fn test_id_accessor() {
    let token = Uuid::new_v4();
    let e = field(Expression::ID_KEY, token);
    assert_eq!(e.id(), Some(&Value::from(token)));
    assert!(a().id().is_none());
}
