//! 路由定义
//!
//! 集中管理所有 API 路由，将路径映射到对应的 handlers：
//! - 健康检查：/health
//! - 层级数据：/hierarchy, /hierarchy/{node_id}
//! - 状态：/quality, /connection
//! - 运行配置：/config, /refresh
//! - 告警与指标：/alerts, /metrics

use super::AppState;
use super::handlers::*;
use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{get, post},
};

/// 创建 API 路由
///
/// 由调用方同时挂在 / 与 /api/ 下
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/hierarchy", get(list_hierarchy))
        .route("/hierarchy/:node_id", get(get_hierarchy_node))
        .route("/quality", get(get_quality))
        .route("/connection", get(get_connection))
        .route("/config", get(get_config).put(update_config))
        .route("/refresh", post(refresh))
        .route("/alerts", get(list_alerts))
        .route("/metrics", get(get_metrics))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}
