//! 运行配置 handlers
//!
//! - GET /config
//! - PUT /config
//! - POST /refresh

use crate::AppState;
use crate::utils::response::{bad_request_error, config_to_dto, ok};
use api_contract::{RefreshResultDto, UpdateRealtimeConfigRequest};
use axum::{Json, extract::State, response::Response};
use bedwatch_realtime::{CycleOutcome, RealtimeConfigUpdate};
use domain::VariationIntensity;
use std::time::Duration;

pub async fn get_config(State(state): State<AppState>) -> Response {
    ok(config_to_dto(&state.service.get_config(), state.service.is_running()))
}

/// 部分更新；运行中的服务按新配置重启调度。
pub async fn update_config(
    State(state): State<AppState>,
    Json(req): Json<UpdateRealtimeConfigRequest>,
) -> Response {
    let update = match to_update(req) {
        Ok(update) => update,
        Err(response) => return response,
    };
    let config = state.service.update_config(update);
    ok(config_to_dto(&config, state.service.is_running()))
}

/// 立即执行一次周期。
pub async fn refresh(State(state): State<AppState>) -> Response {
    let data = match state.service.refresh_now().await {
        CycleOutcome::Published(hierarchy) => RefreshResultDto {
            outcome: "published".to_string(),
            node_count: hierarchy.nodes.len(),
            excluded_records: hierarchy.excluded_records,
            error: None,
        },
        CycleOutcome::Failed(err) => RefreshResultDto {
            outcome: "failed".to_string(),
            node_count: 0,
            excluded_records: 0,
            error: Some(err.to_string()),
        },
        CycleOutcome::Discarded => RefreshResultDto {
            outcome: "discarded".to_string(),
            node_count: 0,
            excluded_records: 0,
            error: None,
        },
    };
    ok(data)
}

fn to_update(req: UpdateRealtimeConfigRequest) -> Result<RealtimeConfigUpdate, Response> {
    let variation_intensity = match req.variation_intensity {
        Some(value) => Some(
            value
                .parse::<VariationIntensity>()
                .map_err(|err| bad_request_error(err.to_string()))?,
        ),
        None => None,
    };
    if req.refresh_interval == Some(0) {
        return Err(bad_request_error("refreshInterval must be positive"));
    }
    if req.batch_size == Some(0) {
        return Err(bad_request_error("batchSize must be positive"));
    }
    Ok(RealtimeConfigUpdate {
        refresh_interval: req.refresh_interval.map(Duration::from_millis),
        enable_variations: req.enable_variations,
        variation_intensity,
        simulate_errors: req.simulate_errors,
        batch_size: req.batch_size,
    })
}
