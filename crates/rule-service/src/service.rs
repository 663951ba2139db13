//! 评估服务
//!
//! 组合规则仓储和匹配器，完成一次批量评估请求。

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use rule_engine::{EvaluationResult, Rule, RuleMatcher, RuleRepository, RuleStore, parse_records};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::error::{Result, ServiceError};

/// 批量评估服务
pub struct EvaluationService {
    repository: Arc<dyn RuleRepository>,
    matcher: RuleMatcher,
}

impl EvaluationService {
    pub fn new(repository: Arc<dyn RuleRepository>, matcher: RuleMatcher) -> Self {
        Self {
            repository,
            matcher,
        }
    }

    /// 使用所有启用规则评估一批记录
    ///
    /// 先校验输入，再加载规则；没有启用规则时返回 `NoEnabledRules`。
    /// `trace` 为 true 时强制附带诊断信息。
    #[instrument(skip(self, objects))]
    pub async fn evaluate(&self, objects: &Value, trace: bool) -> Result<Vec<EvaluationResult>> {
        let records = parse_records(objects)?;

        let rules = self.repository.enabled_rules();
        if rules.is_empty() {
            warn!("没有启用的规则，无法评估");
            return Err(ServiceError::NoEnabledRules);
        }

        let matcher = if trace {
            self.matcher.clone().with_trace()
        } else {
            self.matcher.clone()
        };

        let record_count = records.len();
        let rule_count = rules.len();

        // 大批量评估可能占用多个线程，避免阻塞异步运行时
        let results = tokio::task::spawn_blocking(move || matcher.evaluate_batch(&records, &rules))
            .await
            .map_err(|e| ServiceError::Internal(format!("评估任务异常退出: {}", e)))??;

        let valid = results.iter().filter(|r| r.is_valid).count();
        info!(records = record_count, rules = rule_count, valid, "批量评估完成");

        Ok(results)
    }
}

/// 从 JSON 文件导入规则
///
/// 文件内容为规则数组。导入不做校验，未知操作符在评估时按不匹配处理。
pub async fn load_seed_rules(store: &RuleStore, path: &Path) -> anyhow::Result<usize> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("读取规则文件失败: {}", path.display()))?;

    let rules: Vec<Rule> = serde_json::from_str(&content)
        .with_context(|| format!("解析规则文件失败: {}", path.display()))?;

    Ok(store.import(rules))
}
