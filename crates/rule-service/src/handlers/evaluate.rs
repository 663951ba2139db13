//! 规则评估 API 处理器

use axum::{Json, extract::State};

use crate::{
    dto::{ApiResponse, EvaluateQuery, EvaluateRequest, EvaluateResponse},
    error::ServiceError,
    extract::{AppJson, AppQuery},
    state::AppState,
};

/// 使用所有启用规则评估一批对象
///
/// POST /api/rules/evaluate?trace=true
pub async fn evaluate_objects(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<EvaluateQuery>,
    AppJson(req): AppJson<EvaluateRequest>,
) -> Result<Json<ApiResponse<EvaluateResponse>>, ServiceError> {
    let matching_objects = state.evaluation.evaluate(&req.objects, query.trace).await?;

    Ok(Json(ApiResponse::success(EvaluateResponse { matching_objects })))
}
