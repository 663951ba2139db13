//! 规则存储管理
//!
//! `RuleRepository` 抽象了按键查找和遍历的规则集合；`RuleStore` 是基于
//! DashMap 的线程安全内存实现，按插入顺序返回规则。

use crate::error::{Result, RuleError};
use crate::models::{NewRule, Rule, RulePatch};
use crate::validator::RuleValidator;
use dashmap::DashMap;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, instrument, warn};

/// 规则列表查询条件
#[derive(Debug, Clone)]
pub struct RuleQuery {
    /// 名称过滤（大小写不敏感的正则）
    pub name: Option<String>,
    pub enabled: Option<bool>,
    pub page: i64,
    pub limit: i64,
}

impl Default for RuleQuery {
    fn default() -> Self {
        Self {
            name: None,
            enabled: None,
            page: 1,
            limit: 10,
        }
    }
}

/// 分页后的规则列表
#[derive(Debug, Clone, Serialize)]
pub struct RulePage {
    pub total: usize,
    pub page: i64,
    pub limit: i64,
    pub rules: Vec<Rule>,
}

/// 批量创建中单条失败的记录
#[derive(Debug, Clone, Serialize)]
pub struct BulkCreateError {
    pub index: usize,
    pub name: String,
    pub message: String,
}

/// 批量创建结果
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreateOutcome {
    pub created_rules: Vec<Rule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<BulkCreateError>,
}

/// 规则仓储
pub trait RuleRepository: Send + Sync {
    /// 创建规则，名称必须唯一
    fn create(&self, new_rule: NewRule) -> Result<Rule>;

    fn get(&self, id: &str) -> Option<Rule>;

    /// 更新规则（不重新检查名称唯一性）
    fn update(&self, id: &str, patch: RulePatch) -> Result<Rule>;

    fn delete(&self, id: &str) -> Result<()>;

    fn list(&self, query: &RuleQuery) -> Result<RulePage>;

    /// 按插入顺序返回所有启用的规则
    fn enabled_rules(&self) -> Vec<Rule>;

    /// 批量创建，单条失败不影响其他规则
    fn create_bulk(&self, new_rules: Vec<NewRule>) -> BulkCreateOutcome {
        let mut outcome = BulkCreateOutcome::default();

        for (index, new_rule) in new_rules.into_iter().enumerate() {
            let name = new_rule.name.clone();
            match self.create(new_rule) {
                Ok(rule) => outcome.created_rules.push(rule),
                Err(e) => outcome.errors.push(BulkCreateError {
                    index,
                    name,
                    message: e.to_string(),
                }),
            }
        }

        if !outcome.errors.is_empty() {
            warn!(
                failed = outcome.errors.len(),
                created = outcome.created_rules.len(),
                "批量创建部分失败"
            );
        }

        outcome
    }
}

#[derive(Debug, Clone)]
struct StoredRule {
    seq: u64,
    rule: Rule,
}

/// 内存规则存储
#[derive(Clone, Default)]
pub struct RuleStore {
    rules: Arc<DashMap<String, StoredRule>>,
    sequence: Arc<AtomicU64>,
    /// 串行化写操作，保证名称唯一性检查和插入是原子的
    write_lock: Arc<parking_lot::Mutex<()>>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 原样导入已有规则，不做校验
    ///
    /// 用于加载来自外部存储的数据，其中可能含有未知操作符或空条件，
    /// 评估时这些规则按不匹配处理。
    #[instrument(skip(self, rules), fields(count = rules.len()))]
    pub fn import(&self, rules: Vec<Rule>) -> usize {
        let _guard = self.write_lock.lock();
        let count = rules.len();

        for rule in rules {
            let seq = self.next_seq();
            self.rules.insert(rule.id.clone(), StoredRule { seq, rule });
        }

        info!("已导入 {} 条规则", count);
        count
    }

    fn next_seq(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    /// 按插入顺序返回所有规则
    fn ordered(&self) -> Vec<Rule> {
        let mut entries: Vec<StoredRule> = self.rules.iter().map(|e| e.value().clone()).collect();
        entries.sort_by_key(|e| e.seq);
        entries.into_iter().map(|e| e.rule).collect()
    }

    fn name_exists(&self, name: &str) -> bool {
        self.rules.iter().any(|e| e.rule.name == name)
    }

    fn compile_name_filter(pattern: &str) -> Result<Regex> {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| RuleError::InvalidQuery(format!("无效的名称过滤 '{}': {}", pattern, e)))
    }
}

impl RuleRepository for RuleStore {
    #[instrument(skip(self, new_rule), fields(rule_name = %new_rule.name.trim()))]
    fn create(&self, new_rule: NewRule) -> Result<Rule> {
        let rule = new_rule.into_rule();
        RuleValidator::validate(&rule)?;

        let _guard = self.write_lock.lock();

        if self.name_exists(&rule.name) {
            warn!("规则名称已存在: {}", rule.name);
            return Err(RuleError::DuplicateName(rule.name));
        }

        let seq = self.next_seq();
        self.rules.insert(
            rule.id.clone(),
            StoredRule {
                seq,
                rule: rule.clone(),
            },
        );

        info!(rule_id = %rule.id, "规则已创建");
        Ok(rule)
    }

    fn get(&self, id: &str) -> Option<Rule> {
        self.rules.get(id).map(|e| e.rule.clone())
    }

    #[instrument(skip(self, patch))]
    fn update(&self, id: &str, patch: RulePatch) -> Result<Rule> {
        let _guard = self.write_lock.lock();

        let Some(mut entry) = self.rules.get_mut(id) else {
            warn!("更新不存在的规则: {}", id);
            return Err(RuleError::RuleNotFound(id.to_string()));
        };

        let mut updated = entry.rule.clone();
        patch.apply_to(&mut updated)?;
        RuleValidator::validate(&updated)?;

        entry.rule = updated.clone();

        info!("规则已更新: {}", id);
        Ok(updated)
    }

    #[instrument(skip(self))]
    fn delete(&self, id: &str) -> Result<()> {
        let _guard = self.write_lock.lock();

        if self.rules.remove(id).is_some() {
            info!("规则已删除: {}", id);
            Ok(())
        } else {
            warn!("删除不存在的规则: {}", id);
            Err(RuleError::RuleNotFound(id.to_string()))
        }
    }

    fn list(&self, query: &RuleQuery) -> Result<RulePage> {
        if query.page <= 0 || query.limit <= 0 {
            return Err(RuleError::InvalidQuery("page 和 limit 必须为正整数".to_string()));
        }

        let name_filter = query
            .name
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(Self::compile_name_filter)
            .transpose()?;

        let matched: Vec<Rule> = self
            .ordered()
            .into_iter()
            .filter(|rule| query.enabled.is_none_or(|enabled| rule.enabled == enabled))
            .filter(|rule| name_filter.as_ref().is_none_or(|re| re.is_match(&rule.name)))
            .collect();

        let total = matched.len();
        let skip = usize::try_from((query.page - 1).saturating_mul(query.limit)).unwrap_or(usize::MAX);
        let take = usize::try_from(query.limit).unwrap_or(usize::MAX);

        Ok(RulePage {
            total,
            page: query.page,
            limit: query.limit,
            rules: matched.into_iter().skip(skip).take(take).collect(),
        })
    }

    fn enabled_rules(&self) -> Vec<Rule> {
        self.ordered().into_iter().filter(|r| r.enabled).collect()
    }
}
