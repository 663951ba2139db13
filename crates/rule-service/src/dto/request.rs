//! 请求 DTO 定义
//!
//! REST API 的请求参数和请求体结构。字段名兼容 `ruleName` / `isEnabled` 写法。

use rule_engine::{Action, Condition, LogicalOperator, NewRule, RuleQuery};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 创建规则请求
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRuleRequest {
    #[serde(default, alias = "ruleName")]
    #[validate(length(max = 100, message = "规则名称不能超过100个字符"))]
    pub name: String,
    #[validate(length(max = 500, message = "规则描述不能超过500个字符"))]
    pub description: Option<String>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    pub logic: Option<LogicalOperator>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(alias = "isEnabled")]
    pub enabled: Option<bool>,
}

impl From<CreateRuleRequest> for NewRule {
    fn from(req: CreateRuleRequest) -> Self {
        NewRule {
            name: req.name,
            description: req.description,
            conditions: req.conditions,
            logic: req.logic,
            actions: req.actions,
            enabled: req.enabled,
        }
    }
}

/// 批量创建规则请求
///
/// 长度限制对整个请求生效；名称为空、条件为空、重名等按单条记录报告。
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct BulkCreateRulesRequest {
    #[validate(length(min = 1, message = "rules 必须是非空数组"), nested)]
    pub rules: Vec<CreateRuleRequest>,
}

/// 规则列表查询参数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRulesQuery {
    /// 名称过滤（大小写不敏感的正则）
    #[serde(alias = "ruleName")]
    pub name: Option<String>,
    #[serde(alias = "isEnabled")]
    pub enabled: Option<bool>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

impl From<ListRulesQuery> for RuleQuery {
    fn from(query: ListRulesQuery) -> Self {
        RuleQuery {
            name: query.name,
            enabled: query.enabled,
            page: query.page,
            limit: query.limit,
        }
    }
}

/// 批量评估请求
///
/// `objects` 保留原始 JSON，由评估服务检查是否为非空对象数组。
#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    #[serde(default)]
    pub objects: serde_json::Value,
}

/// 评估查询参数
#[derive(Debug, Default, Deserialize)]
pub struct EvaluateQuery {
    /// 在结果中附带诊断信息
    #[serde(default)]
    pub trace: bool,
}

/// 创建数据对象请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateObjectRequest {
    #[validate(length(min = 1, max = 200, message = "名称长度必须在1-200个字符之间"))]
    pub name: String,
    pub age: Option<serde_json::Number>,
    #[serde(rename = "type")]
    pub object_type: Option<String>,
}
