//! 数据传输对象
//!
//! 包含所有请求和响应的数据结构

pub mod request;
pub mod response;

pub use request::{
    BulkCreateRulesRequest, CreateObjectRequest, CreateRuleRequest, EvaluateQuery,
    EvaluateRequest, ListRulesQuery,
};
pub use response::{ApiResponse, EvaluateResponse};
