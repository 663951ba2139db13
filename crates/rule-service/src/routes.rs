//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use rule_shared::{config::CorsConfig, observability::middleware as obs_middleware};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::{
    handlers,
    middleware::{MAX_BODY_BYTES, validate_request_body},
    state::AppState,
};

/// 构建规则管理路由
///
/// 包含规则 CRUD、批量创建和评估
fn rule_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/rules",
            post(handlers::rule::create_rule).get(handlers::rule::list_rules),
        )
        .route("/rules/bulk", post(handlers::rule::bulk_create_rules))
        .route("/rules/enabled", get(handlers::rule::list_enabled_rules))
        // 兼容旧路径
        .route("/rules/enabledRules", get(handlers::rule::list_enabled_rules))
        .route("/rules/evaluate", post(handlers::evaluate::evaluate_objects))
        .route(
            "/rules/{id}",
            get(handlers::rule::get_rule)
                .put(handlers::rule::update_rule)
                .delete(handlers::rule::delete_rule),
        )
}

/// 构建数据对象路由
fn object_routes() -> Router<AppState> {
    Router::new().route(
        "/objects",
        post(handlers::object::create_object).get(handlers::object::list_objects),
    )
}

/// 构建完整的 API 路由（不含 /api 前缀）
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(rule_routes()).merge(object_routes())
}

/// 构建应用
///
/// 中间件自外向内：request_id -> http_tracing -> 请求体校验。
/// JSON 提取器的大小上限与请求体校验一致。
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::welcome))
        .route("/health", get(handlers::health_check))
        .nest("/api", api_routes())
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::from_fn(validate_request_body))
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}

/// 由配置构建 CORS 层
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allows_any() {
        info!("CORS allowed_origins: * (all origins)");
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.trim().parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "忽略无效的 CORS 来源");
                None
            }
        })
        .collect();

    info!("CORS allowed_origins: {}", config.allowed_origins.join(","));
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rule_engine::{RuleMatcher, RuleStore};
    use std::sync::Arc;

    #[test]
    fn test_routes_construction() {
        let _rule = rule_routes();
        let _object = object_routes();
        let _api = api_routes();

        let state = AppState::new(Arc::new(RuleStore::new()), RuleMatcher::new());
        let _app = app(state);
    }

    #[test]
    fn test_cors_layer_construction() {
        let _any = cors_layer(&CorsConfig::default());
        let _listed = cors_layer(&CorsConfig {
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "bad\norigin".to_string(),
            ],
        });
    }
}
