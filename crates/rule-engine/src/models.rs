//! 规则引擎领域模型

use crate::error::{Result, RuleError};
use crate::operators::{LogicalOperator, Operator};
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

/// 待评估的记录：字段名到值的映射
pub type Record = Map<String, Value>;

/// 评估结果中追加的派生字段
pub const MATCHED_RULES_FIELD: &str = "matchedRules";
pub const IS_VALID_FIELD: &str = "isValid";
const DIAGNOSTICS_FIELD: &str = "diagnostics";

/// 条件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: Value,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: impl Into<Operator>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

/// 动作：引擎只负责报告匹配，从不执行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type", alias = "actionType")]
    pub action_type: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl Action {
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            parameters: Map::new(),
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

fn new_rule_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_enabled() -> bool {
    true
}

/// 规则定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default = "new_rule_id")]
    pub id: String,
    #[serde(alias = "ruleName")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub logic: LogicalOperator,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default = "default_enabled", alias = "isEnabled")]
    pub enabled: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Rule {
    pub fn new(name: impl Into<String>, conditions: Vec<Condition>) -> Self {
        let now = Utc::now();
        Self {
            id: new_rule_id(),
            name: name.into(),
            description: None,
            conditions,
            logic: LogicalOperator::And,
            actions: Vec::new(),
            enabled: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_logic(mut self, logic: impl Into<LogicalOperator>) -> Self {
        self.logic = logic.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// 创建规则的输入
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRule {
    #[serde(default, alias = "ruleName")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub logic: Option<LogicalOperator>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default, alias = "isEnabled")]
    pub enabled: Option<bool>,
}

impl NewRule {
    /// 补全默认值并生成规则实体（名称去除首尾空白）
    pub fn into_rule(self) -> Rule {
        let now = Utc::now();
        Rule {
            id: new_rule_id(),
            name: self.name.trim().to_string(),
            description: self.description,
            conditions: self.conditions,
            logic: self.logic.unwrap_or_default(),
            actions: self.actions,
            enabled: self.enabled.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }
}

/// 区分“字段缺失”和“显式 null”
fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// 更新规则的输入，仅包含需要修改的字段
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulePatch {
    #[serde(default, alias = "ruleName")]
    pub name: Option<String>,
    /// `Some(None)` 表示清空描述
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub conditions: Option<Vec<Condition>>,
    #[serde(default)]
    pub logic: Option<LogicalOperator>,
    #[serde(default)]
    pub actions: Option<Vec<Action>>,
    #[serde(default, alias = "isEnabled")]
    pub enabled: Option<bool>,
}

impl RulePatch {
    /// 将变更应用到规则上
    pub fn apply_to(self, rule: &mut Rule) -> Result<()> {
        if let Some(name) = self.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(RuleError::invalid_rule("name", "规则名称不能为空"));
            }
            rule.name = name.to_string();
        }
        if let Some(description) = self.description {
            rule.description = description;
        }
        if let Some(conditions) = self.conditions {
            rule.conditions = conditions;
        }
        if let Some(logic) = self.logic {
            rule.logic = logic;
        }
        if let Some(actions) = self.actions {
            rule.actions = actions;
        }
        if let Some(enabled) = self.enabled {
            rule.enabled = enabled;
        }
        rule.updated_at = Utc::now();
        Ok(())
    }
}

/// 将 JSON 值解析为记录批次
///
/// 要求为非空数组，且每个元素都是对象。
pub fn parse_records(value: &Value) -> Result<Vec<Record>> {
    let items = value
        .as_array()
        .ok_or_else(|| RuleError::InvalidInput("'objects' 必须是非空数组".to_string()))?;

    if items.is_empty() {
        return Err(RuleError::InvalidInput("'objects' 必须是非空数组".to_string()));
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_object().cloned().ok_or_else(|| {
                RuleError::InvalidInput(format!("objects[{}] 必须是 JSON 对象", i))
            })
        })
        .collect()
}

/// 查找记录中的字段
///
/// 优先按字面键查找；找不到且包含点号时按路径查找（如 "order.items.0.price"）。
pub fn lookup_field<'a>(record: &'a Record, field: &str) -> Option<&'a Value> {
    if let Some(value) = record.get(field) {
        return Some(value);
    }

    if !field.contains('.') {
        return None;
    }

    let mut parts = field.split('.');
    let mut current = record.get(parts.next()?)?;

    for part in parts {
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(arr) => {
                let index: usize = part.parse().ok()?;
                arr.get(index)?
            }
            _ => return None,
        };
    }

    Some(current)
}

/// 评估过程中发现的数据质量问题
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    MissingField { field: String },
    UnsupportedOperator { operator: String },
    Incomparable { field: String },
    EmptyConditions,
    UnsupportedLogic { logic: String },
}

impl DiagnosticKind {
    /// 指标标签
    pub fn label(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "missing_field",
            Self::UnsupportedOperator { .. } => "unsupported_operator",
            Self::Incomparable { .. } => "incomparable",
            Self::EmptyConditions => "empty_conditions",
            Self::UnsupportedLogic { .. } => "unsupported_logic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub rule: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<usize>,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

/// 单条记录的评估结果
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    /// 原始记录，不做修改
    pub record: Record,
    /// 按规则顺序排列的匹配规则名
    pub matched_rules: Vec<String>,
    pub is_valid: bool,
    /// 仅在开启追踪时填充
    pub diagnostics: Vec<Diagnostic>,
}

impl EvaluationResult {
    pub fn new(record: Record, matched_rules: Vec<String>) -> Self {
        let is_valid = !matched_rules.is_empty();
        Self {
            record,
            matched_rules,
            is_valid,
            diagnostics: Vec::new(),
        }
    }
}

impl Serialize for EvaluationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in &self.record {
            // 派生字段覆盖记录中的同名字段
            if key == MATCHED_RULES_FIELD || key == IS_VALID_FIELD {
                continue;
            }
            if key == DIAGNOSTICS_FIELD && !self.diagnostics.is_empty() {
                continue;
            }
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry(MATCHED_RULES_FIELD, &self.matched_rules)?;
        map.serialize_entry(IS_VALID_FIELD, &self.is_valid)?;
        if !self.diagnostics.is_empty() {
            map.serialize_entry(DIAGNOSTICS_FIELD, &self.diagnostics)?;
        }
        map.end()
    }
}
