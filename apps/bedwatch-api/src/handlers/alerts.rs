//! 告警查询 handlers
//!
//! - GET /alerts?limit=

use crate::AppState;
use crate::utils::response::{alert_to_dto, ok, storage_error};
use api_contract::{AlertDto, AlertQuery};
use axum::{
    extract::{Query, State},
    response::Response,
};

const DEFAULT_ALERT_LIMIT: usize = 50;

pub async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertQuery>,
) -> Response {
    let limit = query.limit.unwrap_or(DEFAULT_ALERT_LIMIT);
    match state.alert_store.list_alerts(limit).await {
        Ok(records) => {
            let data: Vec<AlertDto> = records.into_iter().map(alert_to_dto).collect();
            ok(data)
        }
        Err(err) => storage_error(err),
    }
}
