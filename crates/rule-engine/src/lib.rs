//! 规则评估引擎
//!
//! 对 JSON 记录批量评估条件规则：
//! - 六种比较操作符和宽松相等
//! - AND / OR 短路求值
//! - 字段缺失、未知操作符按不匹配处理
//! - 线程安全的内存规则存储

pub mod error;
pub mod evaluator;
pub mod matcher;
pub mod models;
pub mod operators;
pub mod store;
pub mod validator;

pub use error::{Result, RuleError};
pub use evaluator::{ConditionEvaluator, ConditionOutcome};
pub use matcher::{MatcherConfig, RuleMatcher};
pub use models::{
    Action, Condition, Diagnostic, DiagnosticKind, EvaluationResult, NewRule, Record, Rule,
    RulePatch, lookup_field, parse_records,
};
pub use operators::{LogicalOperator, Operator};
pub use store::{BulkCreateError, BulkCreateOutcome, RulePage, RuleQuery, RuleRepository, RuleStore};
pub use validator::RuleValidator;
