//! 规则操作符定义
//!
//! 操作符和逻辑操作符都是封闭枚举。存储中读到的未知取值保留在
//! `Unsupported` 中，评估时按不匹配处理，创建规则时由校验器拒绝。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 条件比较操作符
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Gt,
    Lt,
    Gte,
    Lte,
    Eq,
    Neq,
    /// 无法识别的操作符原文
    Unsupported(String),
}

impl Operator {
    /// 解析操作符，支持符号形式和单词形式（`>=` / `gte`）
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            ">" | "gt" => Self::Gt,
            "<" | "lt" => Self::Lt,
            ">=" | "gte" => Self::Gte,
            "<=" | "lte" => Self::Lte,
            "==" | "eq" => Self::Eq,
            "!=" | "neq" => Self::Neq,
            _ => Self::Unsupported(raw.to_string()),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }

    /// 排序类操作符（> < >= <=）
    pub fn is_ordering(&self) -> bool {
        matches!(self, Self::Gt | Self::Lt | Self::Gte | Self::Lte)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::Eq => "==",
            Self::Neq => "!=",
            Self::Unsupported(raw) => raw,
        }
    }
}

impl From<String> for Operator {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for Operator {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 逻辑操作符
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
    Unsupported(String),
}

impl LogicalOperator {
    /// 大小写不敏感解析
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("AND") {
            Self::And
        } else if trimmed.eq_ignore_ascii_case("OR") {
            Self::Or
        } else {
            Self::Unsupported(raw.to_string())
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Unsupported(raw) => raw,
        }
    }
}

impl From<String> for LogicalOperator {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for LogicalOperator {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<LogicalOperator> for String {
    fn from(op: LogicalOperator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_symbol_and_word_forms() {
        assert_eq!(Operator::parse(">"), Operator::Gt);
        assert_eq!(Operator::parse("gte"), Operator::Gte);
        assert_eq!(Operator::parse("!="), Operator::Neq);
        assert_eq!(Operator::parse(" == "), Operator::Eq);
    }

    #[test]
    fn test_unknown_operator_is_preserved() {
        let op = Operator::parse("=~");
        assert!(!op.is_supported());
        assert_eq!(op.to_string(), "=~");
    }

    #[test]
    fn test_operator_serde_uses_symbols() {
        let json = serde_json::to_string(&Operator::Lte).unwrap();
        assert_eq!(json, "\"<=\"");

        let parsed: Operator = serde_json::from_str("\"lt\"").unwrap();
        assert_eq!(parsed, Operator::Lt);

        let unknown: Operator = serde_json::from_str("\"between\"").unwrap();
        assert_eq!(unknown, Operator::Unsupported("between".to_string()));
    }

    #[test]
    fn test_logical_operator_case_insensitive() {
        assert_eq!(LogicalOperator::parse("and"), LogicalOperator::And);
        assert_eq!(LogicalOperator::parse("Or"), LogicalOperator::Or);
        assert!(!LogicalOperator::parse("XOR").is_supported());
        assert_eq!(LogicalOperator::default(), LogicalOperator::And);
    }

    #[test]
    fn test_logical_operator_serializes_uppercase() {
        let parsed: LogicalOperator = serde_json::from_str("\"or\"").unwrap();
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"OR\"");
    }
}
