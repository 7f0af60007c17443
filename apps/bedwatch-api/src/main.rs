//! 床位看板 HTTP 服务：组装数据源、实时服务与告警任务，并暴露只读接口。

mod handlers;
mod middleware;
mod routes;
mod snapshots;
mod utils;

use axum::{Router, middleware::from_fn};
use bedwatch_alerts::{DEFAULT_RULES, spawn_alert_monitor};
use bedwatch_config::AppConfig;
use bedwatch_realtime::{RealtimeConfig, RealtimeService, ServiceOptions};
use bedwatch_storage::{
    AlertStore, BedStore, InMemoryAlertStore, InMemoryBedStore, PgAlertStore, PgBedStore,
    connect_pool,
};
use bedwatch_telemetry::init_tracing;
use domain::now_epoch_ms;
use snapshots::LatestHierarchy;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub service: RealtimeService,
    pub snapshots: Arc<LatestHierarchy>,
    pub alert_store: Arc<dyn AlertStore>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    init_tracing();

    let (bed_store, alert_store): (Arc<dyn BedStore>, Arc<dyn AlertStore>) =
        match &config.database_url {
            Some(database_url) => {
                let pool = connect_pool(database_url).await?;
                (
                    Arc::new(PgBedStore::new(pool.clone())),
                    Arc::new(PgAlertStore::new(pool)),
                )
            }
            None => {
                info!(target: "bedwatch.api", "demo_store_enabled");
                (
                    Arc::new(InMemoryBedStore::with_demo_beds(now_epoch_ms())),
                    Arc::new(InMemoryAlertStore::new()),
                )
            }
        };

    let service = RealtimeService::with_config(
        bed_store,
        ServiceOptions {
            organization_id: config.organization_id.clone(),
            organization_name: config.organization_name.clone(),
            potential_discharge_days: config.potential_discharge_days,
        },
        realtime_config(&config),
    );
    let snapshots = LatestHierarchy::attach(&service);
    let monitor = config.alerts_enabled.then(|| {
        spawn_alert_monitor(&service, alert_store.clone(), DEFAULT_RULES.to_vec())
    });
    service.start();

    let app = build_app(AppState {
        service: service.clone(),
        snapshots,
        alert_store,
    });
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!(target: "bedwatch.api", addr = %config.http_addr, "http_listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    service.stop();
    if let Some(monitor) = monitor {
        monitor.shutdown().await;
    }
    Ok(())
}

fn realtime_config(config: &AppConfig) -> RealtimeConfig {
    RealtimeConfig {
        refresh_interval: Duration::from_millis(config.refresh_interval_ms),
        enable_variations: config.enable_variations,
        variation_intensity: config.variation_intensity,
        simulate_errors: config.simulate_errors,
        batch_size: config.batch_size,
    }
}

/// 组装路由（同时挂在 / 与 /api 下）与中间件。
pub fn build_app(state: AppState) -> Router {
    let api = routes::create_api_router();
    Router::new()
        .merge(api.clone())
        .nest("/api", api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 注入 request_id/trace_id
        .layer(from_fn(middleware::request_context))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!(target: "bedwatch.api", "shutdown_requested"),
        // 无法监听信号时保持运行
        Err(err) => {
            tracing::warn!(target: "bedwatch.api", error = %err, "shutdown_signal_unavailable");
            std::future::pending::<()>().await;
        }
    }
}
