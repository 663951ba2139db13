//! 响应 DTO 定义

use rule_engine::EvaluationResult;
use serde::Serialize;

/// API 统一响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self::success_with_message(data, "操作成功")
    }

    /// 创建成功响应（自定义消息）
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// 创建成功响应（无数据）
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: message.into(),
            data: None,
        }
    }
}

/// 批量评估响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResponse {
    pub matching_objects: Vec<EvaluationResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_serialization() {
        let body = serde_json::to_value(ApiResponse::success(vec![1, 2])).unwrap();
        assert_eq!(
            body,
            json!({ "success": true, "code": "SUCCESS", "message": "操作成功", "data": [1, 2] })
        );
    }

    #[test]
    fn test_empty_response_omits_data() {
        let body = serde_json::to_value(ApiResponse::success_empty("规则已删除")).unwrap();
        assert!(body.get("data").is_none());
        assert_eq!(body["message"], "规则已删除");
    }
}
