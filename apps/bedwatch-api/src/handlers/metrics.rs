//! Telemetry 指标快照。
//!
//! - GET /metrics

use crate::utils::response::{metrics_to_dto, ok};
use axum::response::Response;
use bedwatch_telemetry::metrics;

pub async fn get_metrics() -> Response {
    ok(metrics_to_dto(metrics().snapshot()))
}
