//! HTTP 请求处理器模块
//!
//! 包含所有 REST API 端点的处理器实现

pub mod evaluate;
pub mod object;
pub mod rule;

use axum::{Json, extract::OriginalUri};
use serde_json::{Value, json};

use crate::error::ServiceError;

/// 欢迎信息
///
/// GET /
pub async fn welcome() -> &'static str {
    "Welcome to the Rule Engine API"
}

/// 存活探针
///
/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "rule-service"
    }))
}

/// 未匹配路由
pub async fn not_found(OriginalUri(uri): OriginalUri) -> ServiceError {
    ServiceError::NotFound(uri.path().to_string())
}
