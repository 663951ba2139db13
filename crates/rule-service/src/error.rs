//! 规则服务错误类型定义

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rule_engine::RuleError;
use serde_json::json;

/// 规则服务错误类型
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    // 请求错误
    #[error("参数验证失败: {0}")]
    Validation(String),
    #[error("JSON 格式无效: {0}")]
    InvalidJson(String),
    #[error("不支持的内容类型: {0}")]
    UnsupportedMediaType(String),
    #[error("请求体不能为空")]
    EmptyBody,
    #[error("GET 请求不应包含请求体")]
    BodyNotAllowed,
    #[error("请求体过大")]
    PayloadTooLarge,
    #[error("无效输入: {0}")]
    InvalidInput(String),
    #[error("无效的查询参数: {0}")]
    InvalidQuery(String),
    #[error("{0}")]
    InvalidRule(String),

    // 资源不存在
    #[error("规则不存在: {0}")]
    RuleNotFound(String),
    #[error("没有可用的启用规则")]
    NoEnabledRules,
    #[error("资源不存在: {0}")]
    NotFound(String),

    // 业务冲突
    #[error("规则名称已存在: {0}")]
    DuplicateRuleName(String),

    // 系统错误
    #[error("内部错误: {0}")]
    Internal(String),
}

impl ServiceError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::InvalidJson(_)
            | Self::EmptyBody
            | Self::BodyNotAllowed
            | Self::InvalidInput(_)
            | Self::InvalidQuery(_)
            | Self::InvalidRule(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            Self::RuleNotFound(_) | Self::NoEnabledRules | Self::NotFound(_) => {
                StatusCode::NOT_FOUND
            }

            Self::DuplicateRuleName(_) => StatusCode::CONFLICT,

            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidJson(_) => "INVALID_JSON",
            Self::UnsupportedMediaType(_) => "UNSUPPORTED_MEDIA_TYPE",
            Self::EmptyBody => "EMPTY_BODY",
            Self::BodyNotAllowed => "BODY_NOT_ALLOWED",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InvalidQuery(_) => "INVALID_QUERY",
            Self::InvalidRule(_) => "INVALID_RULE",
            Self::RuleNotFound(_) => "RULE_NOT_FOUND",
            Self::NoEnabledRules => "NO_ENABLED_RULES",
            Self::NotFound(_) => "NOT_FOUND",
            Self::DuplicateRuleName(_) => "DUPLICATE_RULE_NAME",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志
        let message = match &self {
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 从规则引擎错误转换
impl From<RuleError> for ServiceError {
    fn from(err: RuleError) -> Self {
        match err {
            RuleError::InvalidInput(msg) => Self::InvalidInput(msg),
            RuleError::InvalidRule { .. } => Self::InvalidRule(err.to_string()),
            RuleError::DuplicateName(name) => Self::DuplicateRuleName(name),
            RuleError::RuleNotFound(id) => Self::RuleNotFound(id),
            RuleError::InvalidQuery(msg) => Self::InvalidQuery(msg),
            RuleError::JsonError(e) => Self::Internal(format!("JSON 处理错误: {}", e)),
        }
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// 请求体无法解析为 JSON 或结构不符
impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonSyntaxError(e) => Self::InvalidJson(e.body_text()),
            JsonRejection::JsonDataError(e) => Self::Validation(e.body_text()),
            JsonRejection::MissingJsonContentType(e) => Self::UnsupportedMediaType(e.body_text()),
            other if other.status() == StatusCode::PAYLOAD_TOO_LARGE => Self::PayloadTooLarge,
            other => Self::InvalidJson(other.body_text()),
        }
    }
}

impl From<QueryRejection> for ServiceError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidQuery(rejection.body_text())
    }
}

/// 服务层 Result 类型别名
pub type Result<T> = std::result::Result<T, ServiceError>;
