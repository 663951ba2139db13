//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;

use rule_engine::{MatcherConfig, RuleMatcher, RuleRepository};
use rule_shared::config::EvaluationConfig;

use crate::models::ObjectStore;
use crate::service::EvaluationService;

/// Axum 应用共享状态
///
/// 规则仓储、评估服务和数据对象存储，通过 Arc 在 handler 间共享
#[derive(Clone)]
pub struct AppState {
    pub rules: Arc<dyn RuleRepository>,
    pub evaluation: Arc<EvaluationService>,
    pub objects: Arc<ObjectStore>,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(rules: Arc<dyn RuleRepository>, matcher: RuleMatcher) -> Self {
        let evaluation = Arc::new(EvaluationService::new(rules.clone(), matcher));
        Self {
            rules,
            evaluation,
            objects: Arc::new(ObjectStore::new()),
        }
    }
}

/// 由配置构建匹配器
pub fn build_matcher(config: &EvaluationConfig) -> RuleMatcher {
    RuleMatcher::with_config(MatcherConfig {
        trace_enabled: config.trace_enabled,
        parallel_threshold: config.parallel_threshold,
        worker_threads: config.worker_threads.max(1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_matcher_from_config() {
        let matcher = build_matcher(&EvaluationConfig {
            trace_enabled: true,
            parallel_threshold: 50,
            worker_threads: 0,
        });

        assert!(matcher.config().trace_enabled);
        assert_eq!(matcher.config().parallel_threshold, 50);
        assert_eq!(matcher.config().worker_threads, 1);
    }
}
