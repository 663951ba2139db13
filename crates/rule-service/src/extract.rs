//! 请求提取器
//!
//! 包装 axum 的 Json / Query，使解析失败也返回统一的错误响应结构。

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ServiceError;

/// JSON 请求体
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ServiceError))]
pub struct AppJson<T>(pub T);

/// 查询参数
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ServiceError))]
pub struct AppQuery<T>(pub T);
