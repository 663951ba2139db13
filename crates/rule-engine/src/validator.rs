//! 规则校验器
//!
//! 在规则进入存储前校验结构：名称、条件、逻辑操作符和动作。
//! 未知的操作符和逻辑操作符在这里被拒绝。

use crate::error::{Result, RuleError};
use crate::models::{Action, Condition, Rule};
use serde_json::Value;

/// 规则校验器
pub struct RuleValidator;

impl RuleValidator {
    /// 校验规则结构
    pub fn validate(rule: &Rule) -> Result<()> {
        if rule.name.trim().is_empty() {
            return Err(RuleError::invalid_rule("name", "规则名称不能为空"));
        }

        if rule.conditions.is_empty() {
            return Err(RuleError::invalid_rule("conditions", "条件列表不能为空"));
        }

        for (i, cond) in rule.conditions.iter().enumerate() {
            Self::validate_condition(cond, &format!("conditions[{}]", i))?;
        }

        if !rule.logic.is_supported() {
            return Err(RuleError::invalid_rule(
                "logic",
                format!("不支持的逻辑操作符 '{}'，仅支持 AND / OR", rule.logic),
            ));
        }

        if rule.actions.is_empty() {
            return Err(RuleError::invalid_rule("actions", "动作列表不能为空"));
        }

        for (i, action) in rule.actions.iter().enumerate() {
            Self::validate_action(action, &format!("actions[{}]", i))?;
        }

        Ok(())
    }

    fn validate_condition(cond: &Condition, path: &str) -> Result<()> {
        if cond.field.trim().is_empty() {
            return Err(RuleError::invalid_rule(
                format!("{}.field", path),
                "字段名不能为空",
            ));
        }

        if !cond.operator.is_supported() {
            return Err(RuleError::invalid_rule(
                format!("{}.operator", path),
                format!("不支持的操作符 '{}'", cond.operator),
            ));
        }

        if cond.value.is_null() {
            return Err(RuleError::invalid_rule(
                format!("{}.value", path),
                "条件值不能为空",
            ));
        }

        if matches!(cond.value, Value::Array(_) | Value::Object(_)) {
            return Err(RuleError::invalid_rule(
                format!("{}.value", path),
                "条件值必须是标量（数字、字符串或布尔）",
            ));
        }

        Ok(())
    }

    fn validate_action(action: &Action, path: &str) -> Result<()> {
        if action.action_type.trim().is_empty() {
            return Err(RuleError::invalid_rule(
                format!("{}.type", path),
                "动作类型不能为空",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_rule() -> Rule {
        Rule::new("AgeCheck", vec![Condition::new("age", ">=", 20)])
            .with_action(Action::new("notify").with_parameter("channel", "email"))
    }

    fn invalid_path(rule: &Rule) -> String {
        match RuleValidator::validate(rule) {
            Err(RuleError::InvalidRule { path, .. }) => path,
            other => panic!("expected InvalidRule, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_rule() {
        assert!(RuleValidator::validate(&valid_rule()).is_ok());
    }

    #[test]
    fn test_blank_name() {
        let mut rule = valid_rule();
        rule.name = "  ".to_string();
        assert_eq!(invalid_path(&rule), "name");
    }

    #[test]
    fn test_empty_conditions() {
        let mut rule = valid_rule();
        rule.conditions.clear();
        assert_eq!(invalid_path(&rule), "conditions");
    }

    #[test]
    fn test_empty_actions() {
        let mut rule = valid_rule();
        rule.actions.clear();
        assert_eq!(invalid_path(&rule), "actions");
    }

    #[test]
    fn test_unsupported_operator_rejected() {
        let mut rule = valid_rule();
        rule.conditions.push(Condition::new("score", "=>", 80));
        assert_eq!(invalid_path(&rule), "conditions[1].operator");
    }

    #[test]
    fn test_unsupported_logic_rejected() {
        let rule = valid_rule().with_logic("NAND");
        assert_eq!(invalid_path(&rule), "logic");
    }

    #[test]
    fn test_condition_value_must_be_scalar() {
        let mut rule = valid_rule();
        rule.conditions[0].value = json!(null);
        assert_eq!(invalid_path(&rule), "conditions[0].value");

        rule.conditions[0].value = json!([1, 2]);
        assert_eq!(invalid_path(&rule), "conditions[0].value");
    }

    #[test]
    fn test_blank_field_and_action_type() {
        let mut rule = valid_rule();
        rule.conditions[0].field = String::new();
        assert_eq!(invalid_path(&rule), "conditions[0].field");

        let mut rule = valid_rule();
        rule.actions[0].action_type = " ".to_string();
        assert_eq!(invalid_path(&rule), "actions[0].type");
    }
}
