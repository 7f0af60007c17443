//! 质量与连接状态 handlers
//!
//! - GET /quality
//! - GET /connection

use crate::AppState;
use crate::utils::response::{connection_to_dto, ok, quality_to_dto};
use axum::{extract::State, response::Response};

pub async fn get_quality(State(state): State<AppState>) -> Response {
    ok(quality_to_dto(&state.service.quality_metrics()))
}

pub async fn get_connection(State(state): State<AppState>) -> Response {
    ok(connection_to_dto(&state.service.connection_status()))
}
