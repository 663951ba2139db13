//! 规则评估服务
//!
//! 提供规则管理和批量评估的 REST API。
//!
//! ## 核心功能
//!
//! - **规则管理**：规则的创建、批量创建、查询、更新和删除
//! - **批量评估**：使用所有启用规则评估一批 JSON 对象
//! - **数据对象**：简单的对象保存和列表
//!
//! ## 模块结构
//!
//! - `dto`: 请求和响应的数据传输对象
//! - `error`: 错误类型定义
//! - `extract`: 统一错误响应的请求提取器
//! - `handlers`: HTTP 请求处理器
//! - `middleware`: 请求体校验
//! - `models`: 服务自有的实体模型
//! - `routes`: 路由配置
//! - `service`: 评估服务
//! - `state`: 应用状态

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
pub mod state;

pub use dto::{
    ApiResponse, BulkCreateRulesRequest, CreateObjectRequest, CreateRuleRequest, EvaluateQuery,
    EvaluateRequest, EvaluateResponse, ListRulesQuery,
};
pub use error::{Result, ServiceError};
pub use models::{DataObject, ObjectStore};
pub use service::{EvaluationService, load_seed_rules};
pub use state::{AppState, build_matcher};
