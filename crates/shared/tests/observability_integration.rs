//! 可观测性模块集成测试
//!
//! 测试 metrics、logging 配置和 middleware 模块的核心功能。

// ============================================================================
// 指标记录测试
// ============================================================================

mod metrics_tests {
    use rule_shared::observability::metrics::record_http_request;

    #[test]
    fn test_record_http_request() {
        record_http_request("GET", "/api/rules", 200, 0.05);
        record_http_request("POST", "/api/rules", 201, 0.12);
        record_http_request("PUT", "/api/rules/{id}", 200, 0.08);
        record_http_request("DELETE", "/api/rules/{id}", 200, 0.03);
        record_http_request("POST", "/api/rules/evaluate", 404, 0.01);
        record_http_request("POST", "/api/rules", 500, 0.25);
    }

    #[test]
    fn test_metrics_with_edge_cases() {
        // 空字符串
        record_http_request("", "", 0, 0.0);

        // 超长路径
        let long_path = "/api/".to_string() + &"x".repeat(1000);
        record_http_request("GET", &long_path, 200, 0.01);

        // 极端持续时间
        record_http_request("GET", "/api/slow", 200, 999.99);
    }
}

// ============================================================================
// 日志配置测试
// ============================================================================

mod logging_tests {
    use rule_shared::config::ObservabilityConfig;
    use rule_shared::observability::tracing::LogFormat;

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.metrics_port, 9090);
        assert_eq!(config.log_level, "info");
        assert_eq!(LogFormat::parse(&config.log_format), LogFormat::Pretty);
        assert!(config.metrics_enabled);
    }

    #[test]
    fn test_custom_config() {
        let config = ObservabilityConfig {
            log_level: "debug".to_string(),
            log_format: "json".to_string(),
            metrics_enabled: false,
            metrics_port: 9091,
        };

        assert_eq!(LogFormat::parse(&config.log_format), LogFormat::Json);
        assert_eq!(config.metrics_port, 9091);
    }
}

// ============================================================================
// 中间件测试
// ============================================================================

mod middleware_tests {
    use rule_shared::observability::middleware::RequestId;

    #[test]
    fn test_request_id_creation() {
        let id = RequestId("test-id-123".to_string());
        assert_eq!(id.as_str(), "test-id-123");
    }

    #[test]
    fn test_request_id_clone() {
        let id1 = RequestId("req-a".to_string());
        let id2 = id1.clone();
        assert_eq!(id1.as_str(), id2.as_str());
    }
}

// ============================================================================
// Guard 测试
// ============================================================================

mod guard_tests {
    use rule_shared::observability::ObservabilityGuard;

    #[test]
    fn test_empty_guard() {
        // 创建和 drop 空 guard 都不应 panic
        let guard = ObservabilityGuard::empty();
        assert!(!guard.metrics_enabled());
        drop(guard);
    }
}
