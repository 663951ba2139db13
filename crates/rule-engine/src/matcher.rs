//! 规则匹配器
//!
//! 按规则的逻辑操作符组合条件（短路求值），并对一批记录逐条评估。
//! 记录之间相互独立，批量较大时可按块并行，输出顺序始终与输入一致。

use crate::error::{Result, RuleError};
use crate::evaluator::{ConditionEvaluator, ConditionOutcome};
use crate::models::{Condition, Diagnostic, DiagnosticKind, EvaluationResult, Record, Rule};
use crate::operators::LogicalOperator;
use std::time::Instant;
use tracing::{debug, warn};

/// 匹配器配置
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// 是否在结果中附带诊断信息
    pub trace_enabled: bool,
    /// 记录数达到该阈值时启用并行评估
    pub parallel_threshold: usize,
    /// 并行评估的线程数，1 表示串行
    pub worker_threads: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            trace_enabled: false,
            parallel_threshold: 1000,
            worker_threads: 1,
        }
    }
}

/// 收集单条记录评估过程中的诊断信息
struct DiagnosticSink {
    enabled: bool,
    entries: Vec<Diagnostic>,
}

impl DiagnosticSink {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: Vec::new(),
        }
    }

    fn push(&mut self, rule: &Rule, condition: Option<usize>, kind: DiagnosticKind) {
        metrics::counter!("rule_evaluation_anomalies_total", "kind" => kind.label()).increment(1);

        if self.enabled {
            self.entries.push(Diagnostic {
                rule: rule.name.clone(),
                condition,
                kind,
            });
        }
    }
}

/// 规则匹配器
#[derive(Debug, Clone, Default)]
pub struct RuleMatcher {
    config: MatcherConfig,
}

impl RuleMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// 启用诊断追踪
    pub fn with_trace(mut self) -> Self {
        self.config.trace_enabled = true;
        self
    }

    /// 设置并行线程数和启用阈值
    pub fn with_parallelism(mut self, worker_threads: usize, parallel_threshold: usize) -> Self {
        self.config.worker_threads = worker_threads.max(1);
        self.config.parallel_threshold = parallel_threshold;
        self
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// 判断记录是否匹配规则
    pub fn matches_rule(&self, record: &Record, rule: &Rule) -> bool {
        let mut sink = DiagnosticSink::new(false);
        self.match_rule(record, rule, &mut sink)
    }

    /// 评估单条记录，返回附带匹配规则的结果
    pub fn evaluate_record(&self, record: &Record, rules: &[Rule]) -> EvaluationResult {
        let mut sink = DiagnosticSink::new(self.config.trace_enabled);

        let matched_rules: Vec<String> = rules
            .iter()
            .filter(|rule| self.match_rule(record, rule, &mut sink))
            .map(|rule| {
                metrics::counter!("rule_matches_total", "rule_id" => rule.id.clone()).increment(1);
                rule.name.clone()
            })
            .collect();

        let mut result = EvaluationResult::new(record.clone(), matched_rules);
        result.diagnostics = sink.entries;
        result
    }

    /// 批量评估记录
    ///
    /// `rules` 应为调用方已筛选的启用规则，这里不再过滤。
    pub fn evaluate_batch(&self, records: &[Record], rules: &[Rule]) -> Result<Vec<EvaluationResult>> {
        if records.is_empty() {
            return Err(RuleError::InvalidInput("待评估记录不能为空".to_string()));
        }

        let start = Instant::now();

        let results = if self.should_parallelize(records.len()) {
            self.evaluate_parallel(records, rules)
        } else {
            records
                .iter()
                .map(|record| self.evaluate_record(record, rules))
                .collect()
        };

        let elapsed = start.elapsed();
        metrics::counter!("rule_evaluations_total").increment(records.len() as u64);
        metrics::histogram!("rule_batch_evaluation_duration_seconds").record(elapsed.as_secs_f64());

        debug!(
            records = records.len(),
            rules = rules.len(),
            valid = results.iter().filter(|r| r.is_valid).count(),
            elapsed_ms = elapsed.as_millis() as u64,
            "批量评估完成"
        );

        Ok(results)
    }

    fn should_parallelize(&self, len: usize) -> bool {
        self.config.worker_threads > 1 && len >= self.config.parallel_threshold.max(2)
    }

    /// 按连续块分配给作用域线程，按块顺序拼接结果
    fn evaluate_parallel(&self, records: &[Record], rules: &[Rule]) -> Vec<EvaluationResult> {
        let workers = self.config.worker_threads.min(records.len()).max(1);
        let chunk_size = records.len().div_ceil(workers);

        std::thread::scope(|scope| {
            let handles: Vec<_> = records
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|record| self.evaluate_record(record, rules))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        })
    }

    fn match_rule(&self, record: &Record, rule: &Rule, sink: &mut DiagnosticSink) -> bool {
        if rule.conditions.is_empty() {
            warn!(rule = %rule.name, rule_id = %rule.id, "规则没有任何条件，按不匹配处理");
            sink.push(rule, None, DiagnosticKind::EmptyConditions);
            return false;
        }

        match &rule.logic {
            LogicalOperator::And => {
                // AND: 遇到不匹配立即返回
                for (i, condition) in rule.conditions.iter().enumerate() {
                    if !self.check_condition(record, rule, i, condition, sink) {
                        return false;
                    }
                }
                true
            }
            LogicalOperator::Or => {
                // OR: 遇到匹配立即返回
                for (i, condition) in rule.conditions.iter().enumerate() {
                    if self.check_condition(record, rule, i, condition, sink) {
                        return true;
                    }
                }
                false
            }
            LogicalOperator::Unsupported(logic) => {
                warn!(rule = %rule.name, logic = %logic, "不支持的逻辑操作符，按不匹配处理");
                sink.push(
                    rule,
                    None,
                    DiagnosticKind::UnsupportedLogic {
                        logic: logic.clone(),
                    },
                );
                false
            }
        }
    }

    fn check_condition(
        &self,
        record: &Record,
        rule: &Rule,
        index: usize,
        condition: &Condition,
        sink: &mut DiagnosticSink,
    ) -> bool {
        let outcome = ConditionEvaluator::evaluate_detailed(record, condition);

        let anomaly = match outcome {
            ConditionOutcome::MissingField => Some(DiagnosticKind::MissingField {
                field: condition.field.clone(),
            }),
            ConditionOutcome::UnsupportedOperator => Some(DiagnosticKind::UnsupportedOperator {
                operator: condition.operator.to_string(),
            }),
            ConditionOutcome::Incomparable => Some(DiagnosticKind::Incomparable {
                field: condition.field.clone(),
            }),
            ConditionOutcome::Matched | ConditionOutcome::NotMatched => None,
        };

        if let Some(kind) = anomaly {
            sink.push(rule, Some(index), kind);
        }

        outcome.is_match()
    }
}
