//! 请求体校验中间件
//!
//! 在进入 handler 之前检查请求体：
//! - GET 请求不应携带请求体
//! - POST / PUT 请求体不能为空（空白或 `{}` 都视为空）
//!
//! JSON 语法错误由 `AppJson` 提取器统一处理。

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::Method,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::error::ServiceError;

/// 请求体大小上限
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub async fn validate_request_body(request: Request, next: Next) -> Result<Response, ServiceError> {
    let (parts, body) = request.into_parts();

    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| ServiceError::PayloadTooLarge)?;

    match parts.method {
        Method::GET if has_content(&bytes) => {
            debug!(uri = %parts.uri, "GET 请求携带了请求体");
            return Err(ServiceError::BodyNotAllowed);
        }
        Method::POST | Method::PUT if !has_content(&bytes) || is_empty_object(&bytes) => {
            debug!(method = %parts.method, uri = %parts.uri, "请求体为空");
            return Err(ServiceError::EmptyBody);
        }
        _ => {}
    }

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

fn has_content(bytes: &Bytes) -> bool {
    bytes.iter().any(|b| !b.is_ascii_whitespace())
}

fn is_empty_object(bytes: &Bytes) -> bool {
    serde_json::from_slice::<serde_json::Value>(bytes)
        .map(|v| v.as_object().is_some_and(|m| m.is_empty()))
        .unwrap_or(false)
}
