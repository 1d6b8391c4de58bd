//! 可观测性模块
//!
//! 提供 Prometheus 文本指标、结构化日志和健康检查。

use axum::{
    Json, Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::config::LoggingConfig;
use crate::storage::{StorageFactory, Stores};

// ===== Simple Metrics =====

/// 简单应用指标
#[derive(Debug, Default)]
pub struct AppMetrics {
    pub http_requests_total: AtomicU64,
    pub http_request_duration_ms_sum: AtomicU64,
    pub students_added_total: AtomicU64,
    pub students_deleted_total: AtomicU64,
    pub movements_recorded_total: AtomicU64,
    pub logins_rejected_total: AtomicU64,
    pub errors_total: AtomicU64,
}

impl AppMetrics {
    /// 记录 HTTP 请求
    pub fn record_http_request(&self, duration_ms: u64) {
        self.http_requests_total.fetch_add(1, Ordering::Relaxed);
        self.http_request_duration_ms_sum
            .fetch_add(duration_ms, Ordering::Relaxed);
    }

    pub fn record_student_added(&self) {
        self.students_added_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_students_deleted(&self, count: usize) {
        self.students_deleted_total
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_movement(&self) {
        self.movements_recorded_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_login_rejected(&self) {
        self.logins_rejected_total.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录错误
    pub fn record_error(&self) {
        self.errors_total.fetch_add(1, Ordering::Relaxed);
    }

    /// 生成 Prometheus 格式指标
    pub fn gather(&self) -> String {
        let requests = self.http_requests_total.load(Ordering::Relaxed);
        format!(
            r#"# HELP http_requests_total Total HTTP requests
# TYPE http_requests_total counter
http_requests_total {}
# HELP http_request_duration_seconds HTTP request duration in seconds
# TYPE http_request_duration_seconds summary
http_request_duration_seconds_sum {}
http_request_duration_seconds_count {}
# HELP students_added_total Students added
# TYPE students_added_total counter
students_added_total {}
# HELP students_deleted_total Student records removed
# TYPE students_deleted_total counter
students_deleted_total {}
# HELP movements_recorded_total Entry and exit movements recorded
# TYPE movements_recorded_total counter
movements_recorded_total {}
# HELP logins_rejected_total Rejected admin and student logins
# TYPE logins_rejected_total counter
logins_rejected_total {}
# HELP errors_total Responses with a server error status
# TYPE errors_total counter
errors_total {}
"#,
            requests,
            self.http_request_duration_ms_sum.load(Ordering::Relaxed) as f64 / 1000.0,
            requests,
            self.students_added_total.load(Ordering::Relaxed),
            self.students_deleted_total.load(Ordering::Relaxed),
            self.movements_recorded_total.load(Ordering::Relaxed),
            self.logins_rejected_total.load(Ordering::Relaxed),
            self.errors_total.load(Ordering::Relaxed),
        )
    }
}

// ===== Health Check =====

/// 健康检查状态
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: f64,
    pub checks: Vec<HealthCheck>,
}

/// 单个健康检查项
#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: String,
    pub message: Option<String>,
    pub latency_ms: Option<u64>,
}

/// 可观测性状态
#[derive(Clone)]
pub struct ObservabilityState {
    pub metrics: Arc<AppMetrics>,
    pub stores: Stores,
    pub start_time: DateTime<Utc>,
    pub version: String,
}

impl ObservabilityState {
    pub fn new(version: String, metrics: Arc<AppMetrics>, stores: Stores) -> Self {
        Self {
            metrics,
            stores,
            start_time: Utc::now(),
            version,
        }
    }

    /// 获取应用正常运行时间
    pub fn uptime_seconds(&self) -> f64 {
        (Utc::now() - self.start_time).num_seconds() as f64
    }

    /// 探测存储
    pub async fn check_storage(&self) -> HealthCheck {
        let start = Instant::now();
        let result = StorageFactory::health_check(&self.stores).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(()) => HealthCheck {
                name: "storage".to_string(),
                status: "healthy".to_string(),
                message: Some(format!(
                    "{}, {}",
                    self.stores.students.describe(),
                    self.stores.logs.describe()
                )),
                latency_ms: Some(latency_ms),
            },
            Err(e) => HealthCheck {
                name: "storage".to_string(),
                status: "unhealthy".to_string(),
                message: Some(e.to_string()),
                latency_ms: Some(latency_ms),
            },
        }
    }
}

// ===== Health Check Handlers =====

/// 获取完整健康状态
pub async fn health_check(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    let checks = vec![state.check_storage().await];
    let all_healthy = checks.iter().all(|c| c.status == "healthy");

    let health_status = HealthStatus {
        status: if all_healthy { "healthy" } else { "unhealthy" }.to_string(),
        timestamp: Utc::now().to_rfc3339(),
        version: state.version.clone(),
        uptime_seconds: state.uptime_seconds(),
        checks,
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(health_status))
}

/// 简单存活检查
pub async fn liveness() -> impl IntoResponse {
    "OK"
}

/// 就绪检查
pub async fn readiness(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    if state.check_storage().await.status == "healthy" {
        (StatusCode::OK, "Ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Not Ready")
    }
}

/// Prometheus 指标端点
pub async fn metrics(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    (StatusCode::OK, state.metrics.gather())
}

/// 版本信息端点
pub async fn version(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "version": state.version,
        "uptime_seconds": state.uptime_seconds(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// 创建可观测性路由
pub fn create_observability_router(state: Arc<ObservabilityState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
        .route("/metrics", get(metrics))
        .route("/version", get(version))
        .with_state(state)
}

// ===== Structured Logging =====

/// 初始化结构化日志
///
/// `RUST_LOG` 优先于配置中的级别。配置了日志目录时按天滚动写文件，
/// 返回的 guard 需要保持到进程退出。
pub fn init_tracing(config: &LoggingConfig) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (writer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "hostel.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stdout), None),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_target(true)
        .with_line_number(true);

    // 重复初始化（例如测试中）时忽略
    let _ = if config.structured {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    guard
}

// ===== Request Metrics Middleware =====

/// 记录请求指标的中间件
pub async fn metrics_middleware(
    State(metrics): State<Arc<AppMetrics>>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();

    let response = next.run(req).await;

    metrics.record_http_request(start.elapsed().as_millis() as u64);
    if response.status().is_server_error() {
        metrics.record_error();
    }

    response
}
