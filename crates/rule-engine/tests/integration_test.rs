//! 规则引擎集成测试
//!
//! 测试规则创建、存储、批量评估的完整工作流。

use rule_engine::{
    Action, Condition, NewRule, Record, Rule, RuleError, RuleMatcher, RulePatch, RuleQuery,
    RuleRepository, RuleStore, parse_records,
};
use serde_json::{Value, json};

fn records(value: Value) -> Vec<Record> {
    parse_records(&value).unwrap()
}

fn new_rule(json: Value) -> NewRule {
    serde_json::from_value(json).unwrap()
}

/// 两名用户和两条单条件规则
fn setup_store() -> RuleStore {
    let store = RuleStore::new();

    store
        .create(new_rule(json!({
            "ruleName": "AgeCheck",
            "conditions": [{ "field": "age", "operator": ">=", "value": 20 }],
            "actions": [{ "type": "notify" }]
        })))
        .unwrap();

    store
        .create(new_rule(json!({
            "ruleName": "ScoreCheck",
            "conditions": [{ "field": "score", "operator": ">", "value": 80 }],
            "actions": [{ "actionType": "reward", "parameters": { "points": 10 } }]
        })))
        .unwrap();

    store
}

// ==================== 完整工作流测试 ====================

#[test]
fn test_full_workflow_with_store() {
    let store = setup_store();
    let matcher = RuleMatcher::new();

    let batch = records(json!([
        { "name": "Alice", "age": 25, "score": 85 },
        { "name": "Bob", "age": 19, "score": 65 }
    ]));

    let results = matcher.evaluate_batch(&batch, &store.enabled_rules()).unwrap();
    assert_eq!(results.len(), 2);

    assert_eq!(results[0].matched_rules, vec!["AgeCheck", "ScoreCheck"]);
    assert!(results[0].is_valid);

    // Bob 的年龄和分数都不满足
    assert!(results[1].matched_rules.is_empty());
    assert!(!results[1].is_valid);
}

#[test]
fn test_two_users_two_rules() {
    let store = setup_store();
    let matcher = RuleMatcher::new();

    let batch = records(json!([
        { "name": "Alice", "age": 25, "score": 85 },
        { "name": "Bob", "age": 20, "score": 65 }
    ]));

    let results = matcher.evaluate_batch(&batch, &store.enabled_rules()).unwrap();

    let output = serde_json::to_value(&results).unwrap();
    assert_eq!(
        output,
        json!([
            {
                "name": "Alice", "age": 25, "score": 85,
                "matchedRules": ["AgeCheck", "ScoreCheck"],
                "isValid": true
            },
            {
                "name": "Bob", "age": 20, "score": 65,
                "matchedRules": ["AgeCheck"],
                "isValid": true
            }
        ])
    );
}

#[test]
fn test_disabled_rule_is_not_evaluated() {
    let store = setup_store();
    let score_check = store
        .list(&RuleQuery {
            name: Some("^scorecheck$".to_string()),
            ..Default::default()
        })
        .unwrap()
        .rules
        .remove(0);

    store
        .update(
            &score_check.id,
            RulePatch {
                enabled: Some(false),
                ..Default::default()
            },
        )
        .unwrap();

    let batch = records(json!([{ "age": 25, "score": 99 }]));
    let results = RuleMatcher::new()
        .evaluate_batch(&batch, &store.enabled_rules())
        .unwrap();

    assert_eq!(results[0].matched_rules, vec!["AgeCheck"]);
}

#[test]
fn test_evaluation_is_idempotent() {
    let store = setup_store();
    let matcher = RuleMatcher::new();
    let rules = store.enabled_rules();

    let batch = records(json!([
        { "age": 30, "score": 90 },
        { "age": "abc", "score": null },
        { "other": true }
    ]));

    let first = matcher.evaluate_batch(&batch, &rules).unwrap();
    let second = matcher.evaluate_batch(&batch, &rules).unwrap();
    assert_eq!(first, second);

    // 原始记录保持不变
    for (result, record) in first.iter().zip(batch.iter()) {
        assert_eq!(&result.record, record);
    }
}

#[test]
fn test_mixed_logic_and_nested_fields() {
    let store = RuleStore::new();
    store
        .create(new_rule(json!({
            "name": "BigSpenderOrVip",
            "logic": "or",
            "conditions": [
                { "field": "order.amount", "operator": "gte", "value": 1000 },
                { "field": "user.vip", "operator": "==", "value": "true" }
            ],
            "actions": [{ "type": "badge" }]
        })))
        .unwrap();

    let batch = records(json!([
        { "order": { "amount": 1500 }, "user": { "vip": false } },
        { "order": { "amount": 100 }, "user": { "vip": "true" } },
        { "order": { "amount": 100 }, "user": { "vip": false } },
        { "order": {} }
    ]));

    let results = RuleMatcher::new()
        .evaluate_batch(&batch, &store.enabled_rules())
        .unwrap();

    let valid: Vec<bool> = results.iter().map(|r| r.is_valid).collect();
    assert_eq!(valid, vec![true, true, false, false]);
}

#[test]
fn test_imported_rule_with_unknown_operator_fails_closed() {
    let store = RuleStore::new();
    let legacy: Rule = serde_json::from_value(json!({
        "name": "Legacy",
        "conditions": [{ "field": "age", "operator": "between", "value": 10 }],
        "actions": [{ "type": "notify" }]
    }))
    .unwrap();
    let healthy = Rule::new("Adult", vec![Condition::new("age", ">=", 18)])
        .with_action(Action::new("notify"));

    store.import(vec![legacy, healthy]);

    let batch = records(json!([{ "age": 42 }]));
    let results = RuleMatcher::new()
        .with_trace()
        .evaluate_batch(&batch, &store.enabled_rules())
        .unwrap();

    assert_eq!(results[0].matched_rules, vec!["Adult"]);
    assert_eq!(results[0].diagnostics.len(), 1);
    assert_eq!(results[0].diagnostics[0].rule, "Legacy");
}

#[test]
fn test_create_rejects_unknown_operator() {
    let store = RuleStore::new();
    let result = store.create(new_rule(json!({
        "name": "Broken",
        "conditions": [{ "field": "age", "operator": "~=", "value": 10 }],
        "actions": [{ "type": "notify" }]
    })));

    assert!(matches!(result, Err(RuleError::InvalidRule { .. })));
}

#[test]
fn test_empty_batch_is_rejected() {
    let store = setup_store();
    let matcher = RuleMatcher::new();

    assert!(matches!(
        matcher.evaluate_batch(&[], &store.enabled_rules()),
        Err(RuleError::InvalidInput(_))
    ));
    assert!(matches!(
        parse_records(&json!([])),
        Err(RuleError::InvalidInput(_))
    ));
    assert!(matches!(
        parse_records(&json!({ "age": 1 })),
        Err(RuleError::InvalidInput(_))
    ));
}

#[test]
fn test_large_batch_parallel_matches_serial() {
    let store = setup_store();
    let rules = store.enabled_rules();

    let batch: Vec<Record> = (0..2_000)
        .map(|i| {
            json!({ "id": i, "age": i % 40, "score": i % 100 })
                .as_object()
                .cloned()
                .unwrap()
        })
        .collect();

    let serial = RuleMatcher::new().evaluate_batch(&batch, &rules).unwrap();
    let parallel = RuleMatcher::new()
        .with_parallelism(4, 500)
        .evaluate_batch(&batch, &rules)
        .unwrap();

    assert_eq!(serial, parallel);
}
