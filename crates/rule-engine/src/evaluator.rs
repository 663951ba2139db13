//! 条件评估器
//!
//! 对单条记录评估单个条件。字段缺失、操作符不支持、值不可比较都按
//! 不匹配处理，只记录日志，不会中断整批评估。
//!
//! 比较策略：
//! - `==` / `!=`：宽松相等。数字与数字按数值比较；字符串、布尔、null 同类型
//!   直接比较；数字、数字字符串、布尔混合时统一转为数值（布尔为 1/0）；
//!   null 只等于 null；数组和对象按结构比较。
//! - `>` `<` `>=` `<=`：数字按数值、字符串按字典序；数字与数字字符串混合时
//!   按数值比较；其他组合不可比较，结果为 false。

use crate::models::{Condition, Record, lookup_field};
use crate::operators::Operator;
use serde_json::Value;
use std::cmp::Ordering;
use tracing::{debug, warn};

/// 单个条件的评估结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOutcome {
    Matched,
    NotMatched,
    /// 记录中没有该字段
    MissingField,
    UnsupportedOperator,
    /// 两侧的值无法排序比较
    Incomparable,
}

impl ConditionOutcome {
    pub fn is_match(self) -> bool {
        matches!(self, Self::Matched)
    }

    fn from_bool(matched: bool) -> Self {
        if matched { Self::Matched } else { Self::NotMatched }
    }
}

/// 条件评估器
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// 评估条件，返回是否匹配
    pub fn evaluate(record: &Record, condition: &Condition) -> bool {
        Self::evaluate_detailed(record, condition).is_match()
    }

    /// 评估条件，返回带失败原因的结果
    pub fn evaluate_detailed(record: &Record, condition: &Condition) -> ConditionOutcome {
        let Some(field_value) = lookup_field(record, &condition.field) else {
            debug!(field = %condition.field, "记录中不存在字段，条件按不匹配处理");
            return ConditionOutcome::MissingField;
        };

        let outcome = Self::compare(field_value, &condition.operator, &condition.value);

        match outcome {
            ConditionOutcome::UnsupportedOperator => {
                warn!(
                    field = %condition.field,
                    operator = %condition.operator,
                    "不支持的操作符，条件按不匹配处理"
                );
            }
            ConditionOutcome::Incomparable => {
                debug!(
                    field = %condition.field,
                    operator = %condition.operator,
                    actual = %field_value,
                    expected = %condition.value,
                    "值不可比较，条件按不匹配处理"
                );
            }
            _ => {}
        }

        outcome
    }

    /// 用操作符比较字段值和期望值
    pub fn compare(field_value: &Value, operator: &Operator, expected: &Value) -> ConditionOutcome {
        match operator {
            Operator::Eq => ConditionOutcome::from_bool(Self::loose_eq(field_value, expected)),
            Operator::Neq => ConditionOutcome::from_bool(!Self::loose_eq(field_value, expected)),
            Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte => {
                match Self::partial_order(field_value, expected) {
                    Some(ordering) => {
                        let matched = match operator {
                            Operator::Gt => ordering == Ordering::Greater,
                            Operator::Gte => ordering != Ordering::Less,
                            Operator::Lt => ordering == Ordering::Less,
                            _ => ordering != Ordering::Greater,
                        };
                        ConditionOutcome::from_bool(matched)
                    }
                    None => ConditionOutcome::Incomparable,
                }
            }
            Operator::Unsupported(_) => ConditionOutcome::UnsupportedOperator,
        }
    }

    /// 宽松相等
    pub fn loose_eq(left: &Value, right: &Value) -> bool {
        match (left, right) {
            (Value::Null, Value::Null) => true,
            (Value::Null, _) | (_, Value::Null) => false,
            (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => {
                left == right
            }
            _ => match (Self::coerce_number(left), Self::coerce_number(right)) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// 排序比较，不可比较时返回 None
    pub fn partial_order(left: &Value, right: &Value) -> Option<Ordering> {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Number(a), Value::String(b)) => a.as_f64()?.partial_cmp(&Self::parse_numeric(b)?),
            (Value::String(a), Value::Number(b)) => Self::parse_numeric(a)?.partial_cmp(&b.as_f64()?),
            _ => None,
        }
    }

    /// 相等比较时的数值转换
    fn coerce_number(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::String(s) => Self::parse_numeric(s),
            _ => None,
        }
    }

    /// 解析十进制数字字符串，空串和非有限值视为非数字
    fn parse_numeric(s: &str) -> Option<f64> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
    }
}
