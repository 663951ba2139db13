//! 规则管理 API 处理器
//!
//! 实现规则的创建、批量创建、查询、更新和删除。

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rule_engine::{BulkCreateOutcome, NewRule, Rule, RulePage, RulePatch, RuleQuery};
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    dto::{ApiResponse, BulkCreateRulesRequest, CreateRuleRequest, ListRulesQuery},
    error::ServiceError,
    extract::{AppJson, AppQuery},
    state::AppState,
};

/// 创建规则
///
/// POST /api/rules
#[instrument(skip(state, req), fields(rule_name = %req.name))]
pub async fn create_rule(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateRuleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Rule>>), ServiceError> {
    req.validate()?;

    let rule = state.rules.create(NewRule::from(req))?;

    info!(rule_id = %rule.id, "Rule created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(rule, "规则创建成功")),
    ))
}

/// 批量创建规则
///
/// POST /api/rules/bulk
///
/// 单条失败不影响其他规则，失败项在 `errors` 中返回。
#[instrument(skip(state, req), fields(count = req.rules.len()))]
pub async fn bulk_create_rules(
    State(state): State<AppState>,
    AppJson(req): AppJson<BulkCreateRulesRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BulkCreateOutcome>>), ServiceError> {
    req.validate()?;

    let new_rules = req.rules.into_iter().map(NewRule::from).collect();
    let outcome = state.rules.create_bulk(new_rules);

    info!(
        created = outcome.created_rules.len(),
        failed = outcome.errors.len(),
        "Bulk rule creation completed"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(outcome, "批量创建完成")),
    ))
}

/// 获取规则列表
///
/// GET /api/rules
pub async fn list_rules(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListRulesQuery>,
) -> Result<Json<ApiResponse<RulePage>>, ServiceError> {
    let page = state.rules.list(&RuleQuery::from(query))?;
    Ok(Json(ApiResponse::success(page)))
}

/// 获取所有启用的规则
///
/// GET /api/rules/enabled
pub async fn list_enabled_rules(State(state): State<AppState>) -> Json<ApiResponse<Vec<Rule>>> {
    Json(ApiResponse::success(state.rules.enabled_rules()))
}

/// 获取规则详情
///
/// GET /api/rules/{id}
pub async fn get_rule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Rule>>, ServiceError> {
    let rule = state
        .rules
        .get(&id)
        .ok_or(ServiceError::RuleNotFound(id))?;

    Ok(Json(ApiResponse::success(rule)))
}

/// 更新规则
///
/// PUT /api/rules/{id}
#[instrument(skip(state, patch))]
pub async fn update_rule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<RulePatch>,
) -> Result<Json<ApiResponse<Rule>>, ServiceError> {
    let rule = state.rules.update(&id, patch)?;

    info!("Rule updated");

    Ok(Json(ApiResponse::success_with_message(rule, "规则更新成功")))
}

/// 删除规则
///
/// DELETE /api/rules/{id}
#[instrument(skip(state))]
pub async fn delete_rule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ServiceError> {
    state.rules.delete(&id)?;

    info!("Rule deleted");

    Ok(Json(ApiResponse::success_empty("规则已删除")))
}
