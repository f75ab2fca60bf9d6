// tests/store_tests.rs

use std::{collections::HashMap, sync::Arc, thread};

use rule_ast::ast::{AstNode, LogicalOp};
use rule_ast::parser::ParseError;
use rule_ast::store::{MAX_RULE_DEPTH, RuleError, RuleStore};
use rule_ast::value::Value;

fn bindings(pairs: Vec<(&str, Value)>) -> HashMap<String, Value> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn store_with_two_rules() -> RuleStore {
    let store = RuleStore::new();
    store.create("r1", "age > 30").unwrap();
    store.create("r2", "department = 'Sales'").unwrap();
    store
}

// ============================================================================
// Create
// ============================================================================

#[test]
fn test_create_returns_and_stores_root() {
    let store = RuleStore::new();
    let root = store.create("adult", "age >= 18").unwrap();

    assert_eq!(*root, AstNode::operand("age >= 18"));
    assert!(Arc::ptr_eq(&root, &store.lookup("adult").unwrap()));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_create_overwrites() {
    let store = RuleStore::new();
    store.create("r", "a = 1").unwrap();
    let second = store.create("r", "b = 2").unwrap();

    assert_eq!(store.len(), 1);
    assert!(Arc::ptr_eq(&second, &store.lookup("r").unwrap()));
    assert_eq!(*second, AstNode::operand("b == 2"));
}

#[test]
fn test_create_parse_failure_leaves_store_untouched() {
    let store = RuleStore::new();
    store.create("r", "a = 1").unwrap();

    let err = store.create("r", "(a = 1 AND b = 2").unwrap_err();
    assert_eq!(
        err,
        RuleError::Parse(ParseError::MismatchedParentheses { position: 0 })
    );
    assert_eq!(*store.lookup("r").unwrap(), AstNode::operand("a == 1"));
}

#[test]
fn test_lookup_missing() {
    assert!(RuleStore::new().lookup("nope").is_none());
    assert!(RuleStore::new().is_empty());
}

// ============================================================================
// Combine
// ============================================================================

#[test]
fn test_combine_shares_subtrees() {
    let store = store_with_two_rules();
    let combined = store.combine("r1", "r2", "AND", "r3").unwrap();

    let AstNode::Operator { op, left, right } = &*combined else {
        panic!("expected operator node, got {:?}", combined);
    };
    assert_eq!(*op, LogicalOp::And);
    assert!(Arc::ptr_eq(left, &store.lookup("r1").unwrap()));
    assert!(Arc::ptr_eq(right, &store.lookup("r2").unwrap()));
}

#[test]
fn test_combine_is_idempotent() {
    let store = store_with_two_rules();
    let first = store.combine("r1", "r2", "AND", "r3").unwrap();
    let second = store.combine("r1", "r2", "AND", "r3").unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(store.len(), 3);
}

#[test]
fn test_combine_existing_name_is_not_overwritten() {
    let store = store_with_two_rules();
    let original = store.lookup("r2").unwrap();

    let returned = store.combine("r1", "r1", "OR", "r2").unwrap();
    assert!(Arc::ptr_eq(&returned, &original));
}

#[test]
fn test_combine_missing_rule() {
    let store = store_with_two_rules();

    assert_eq!(
        store.combine("r1", "missing", "AND", "r3").unwrap_err(),
        RuleError::RuleNotFound("missing".to_string())
    );
    assert_eq!(
        store.combine("missing", "r2", "AND", "r3").unwrap_err(),
        RuleError::RuleNotFound("missing".to_string())
    );
    assert!(store.lookup("r3").is_none());
    assert_eq!(store.names(), vec!["r1".to_string(), "r2".to_string()]);
}

#[test]
fn test_combine_missing_rule_even_when_target_exists() {
    let store = store_with_two_rules();
    assert_eq!(
        store.combine("r1", "missing", "AND", "r2").unwrap_err(),
        RuleError::RuleNotFound("missing".to_string())
    );
}

#[test]
fn test_combine_operator_case_insensitive() {
    let store = store_with_two_rules();
    let combined = store.combine("r1", "r2", "or", "either").unwrap();
    assert!(matches!(&*combined, AstNode::Operator { op: LogicalOp::Or, .. }));
}

#[test]
fn test_combine_invalid_operator() {
    let store = store_with_two_rules();
    assert_eq!(
        store.combine("r1", "r2", "XOR", "r3").unwrap_err(),
        RuleError::InvalidOperator("XOR".to_string())
    );
    assert!(store.lookup("r3").is_none());
}

#[test]
fn test_redefining_a_source_does_not_change_combined_rule() {
    let store = store_with_two_rules();
    store.combine("r1", "r2", "AND", "r3").unwrap();
    store.create("r1", "age < 10").unwrap();

    let data = bindings(vec![("age", Value::Integer(40)), ("department", Value::from("Sales"))]);
    assert!(store.evaluate("r3", &data).unwrap());
    assert!(!store.evaluate("r1", &data).unwrap());
}

#[test]
fn test_combined_rule_serializes_both_children() {
    let store = store_with_two_rules();
    let combined = store.combine("r1", "r2", "OR", "r3").unwrap();
    let json = serde_json::to_value(combined.to_serializable()).unwrap();

    assert_eq!(json["type"], "operator");
    assert_eq!(json["value"], "OR");
    assert_eq!(json["left"]["value"], "age > 30");
    assert_eq!(json["right"]["value"], "department == 'Sales'");
}

// ============================================================================
// Depth Limit
// ============================================================================

#[test]
fn test_combine_chain_stops_at_depth_limit() {
    let store = RuleStore::new();
    store.create("r0", "a > 0").unwrap();

    for i in 1..MAX_RULE_DEPTH {
        let root = store
            .combine(&format!("r{}", i - 1), "r0", "AND", &format!("r{}", i))
            .unwrap();
        assert_eq!(root.depth(), i + 1);
    }

    let last = format!("r{}", MAX_RULE_DEPTH - 1);
    let err = store.combine(&last, "r0", "AND", "too_deep").unwrap_err();
    assert_eq!(
        err,
        RuleError::NestingTooDeep {
            name: "too_deep".to_string(),
            depth: MAX_RULE_DEPTH + 1,
            max: MAX_RULE_DEPTH,
        }
    );
    assert!(store.lookup("too_deep").is_none());
    assert_eq!(store.len(), MAX_RULE_DEPTH);

    let data = bindings(vec![("a", Value::Integer(1))]);
    assert!(store.evaluate(&last, &data).unwrap());
    assert!(!store
        .evaluate(&last, &bindings(vec![("a", Value::Integer(0))]))
        .unwrap());
}

#[test]
fn test_long_combine_chain_never_grows_past_limit() {
    let store = RuleStore::new();
    store.create("r0", "a > 0").unwrap();

    let mut refused = 0;
    for i in 1..=200_000 {
        let prev = format!("r{}", i - 1);
        let name = format!("r{}", i);
        match store.combine(&prev, "r0", "AND", &name) {
            Ok(_) => {}
            Err(RuleError::NestingTooDeep { .. }) => refused += 1,
            // later links have no source once the chain is refused
            Err(RuleError::RuleNotFound(missing)) => {
                assert_eq!(missing, format!("r{}", MAX_RULE_DEPTH));
                refused += 1;
            }
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    assert_eq!(refused, 200_000 - (MAX_RULE_DEPTH - 1));
    let data = bindings(vec![("a", Value::Integer(1))]);
    assert!(store.evaluate(&format!("r{}", MAX_RULE_DEPTH - 1), &data).unwrap());
}

#[test]
fn test_custom_depth_limit_applies_to_create() {
    let store = RuleStore::with_max_depth(3);
    store.create("ok", "((a > 1 AND b > 1) OR c > 1)").unwrap();

    let err = store
        .create("deep", "(((a > 1 AND b > 1) OR c > 1) AND d > 1)")
        .unwrap_err();
    assert_eq!(
        err,
        RuleError::NestingTooDeep {
            name: "deep".to_string(),
            depth: 4,
            max: 3,
        }
    );
    assert_eq!(store.names(), vec!["ok".to_string()]);
    assert_eq!(
        err.to_string(),
        "Rule 'deep' would be 4 levels deep (limit is 3)"
    );
}

// ============================================================================
// Evaluate
// ============================================================================

#[test]
fn test_evaluate_combined() {
    let store = store_with_two_rules();
    store.combine("r1", "r2", "AND", "r3").unwrap();

    let yes = bindings(vec![("age", Value::Integer(45)), ("department", Value::from("Sales"))]);
    let no = bindings(vec![("age", Value::Integer(45)), ("department", Value::from("HR"))]);
    assert!(store.evaluate("r3", &yes).unwrap());
    assert!(!store.evaluate("r3", &no).unwrap());
}

#[test]
fn test_evaluate_missing_rule() {
    assert_eq!(
        RuleStore::new().evaluate("ghost", &HashMap::new()).unwrap_err(),
        RuleError::RuleNotFound("ghost".to_string())
    );
}

#[test]
fn test_evaluate_unbound_variable() {
    let store = store_with_two_rules();
    let err = store.evaluate("r1", &HashMap::new()).unwrap_err();
    assert_eq!(err.to_string(), "Evaluation error: Unbound variable: 'age' is not in the supplied data");
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_create_and_evaluate() {
    let store = RuleStore::new();
    store.create("base", "n >= 0").unwrap();

    thread::scope(|s| {
        for t in 0..8 {
            let store = &store;
            s.spawn(move || {
                for i in 0..50 {
                    let name = format!("rule_{}_{}", t, i);
                    store.create(&name, &format!("n > {}", i)).unwrap();
                    store.combine("base", &name, "AND", &format!("{}_combined", name)).unwrap();

                    let data = bindings(vec![("n", Value::Integer(100))]);
                    assert!(store.evaluate(&name, &data).unwrap());
                }
            });
        }
    });

    assert_eq!(store.len(), 1 + 8 * 50 * 2);
}
