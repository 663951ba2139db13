//! 规则引擎错误类型

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    /// 顶层输入结构不合法（非数组、空数组、元素不是对象）
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("规则校验失败: {path} - {message}")]
    InvalidRule { path: String, message: String },

    #[error("规则名称已存在: {0}")]
    DuplicateName(String),

    #[error("规则未找到: {0}")]
    RuleNotFound(String),

    #[error("无效的查询参数: {0}")]
    InvalidQuery(String),

    #[error("JSON 序列化错误: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl RuleError {
    pub(crate) fn invalid_rule(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRule {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RuleError>;
