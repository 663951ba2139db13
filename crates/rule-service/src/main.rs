//! 规则评估服务
//!
//! 提供规则管理和批量评估的 REST API。

use std::{path::Path, sync::Arc};

use rule_engine::RuleStore;
use rule_service::{
    routes,
    service::load_seed_rules,
    state::{AppState, build_matcher},
};
use rule_shared::{config::AppConfig, observability};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // 从 config/ 目录和 RULE_ 前缀环境变量加载配置
    let config = AppConfig::load("rule-service")?;
    let guard = observability::init(&config.service_name, &config.observability).await?;

    info!(
        environment = %config.environment,
        metrics = guard.metrics_enabled(),
        "Starting rule-service on {}",
        config.server_addr()
    );

    let store = RuleStore::new();
    if let Some(seed_file) = &config.rules.seed_file {
        let count = load_seed_rules(&store, Path::new(seed_file)).await?;
        info!(count, seed_file = %seed_file, "Seed rules imported");
    }

    if config.is_production() && config.cors.allows_any() {
        warn!("生产环境允许任意 CORS 来源，请配置 cors.allowed_origins");
    }

    let state = AppState::new(Arc::new(store), build_matcher(&config.evaluation));
    let app = routes::app(state).layer(routes::cors_layer(&config.cors));

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    // 收到 SIGTERM 或 Ctrl+C 后停止接收新连接，等待已有请求处理完毕
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// 监听关闭信号
///
/// 信号处理器注册失败时只记录警告，对应分支永不触发。
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("注册 Ctrl+C 处理器失败: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("注册 SIGTERM 处理器失败: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}
