//! 层级查询 handlers
//!
//! - GET /hierarchy?level=
//! - GET /hierarchy/{node_id}

use crate::AppState;
use crate::utils::response::{bad_request_error, node_to_dto, not_found_error, ok};
use api_contract::{HierarchyNodeDto, HierarchyQuery};
use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use domain::NodeLevel;

const LEVELS: [NodeLevel; 5] = [
    NodeLevel::Organization,
    NodeLevel::Hospital,
    NodeLevel::Department,
    NodeLevel::Ward,
    NodeLevel::Room,
];

/// 最近一次发布的节点列表（先序，根在前），可按层过滤。
pub async fn list_hierarchy(
    State(state): State<AppState>,
    Query(query): Query<HierarchyQuery>,
) -> Response {
    let level = match query.level.as_deref().map(parse_level) {
        Some(Ok(level)) => Some(level),
        Some(Err(response)) => return response,
        None => None,
    };
    let nodes = state.snapshots.nodes();
    let data: Vec<HierarchyNodeDto> = nodes
        .iter()
        .filter(|node| level.is_none_or(|level| node.level == level))
        .map(node_to_dto)
        .collect();
    ok(data)
}

/// 单个节点及其直接子节点。
pub async fn get_hierarchy_node(
    State(state): State<AppState>,
    Path(node_id): Path<String>,
) -> Response {
    let nodes = state.snapshots.nodes();
    let Some(node) = nodes.iter().find(|node| node.id == node_id) else {
        return not_found_error();
    };
    let mut data = vec![node_to_dto(node)];
    data.extend(
        nodes
            .iter()
            .filter(|child| child.parent_id.as_deref() == Some(node_id.as_str()))
            .map(node_to_dto),
    );
    ok(data)
}

fn parse_level(value: &str) -> Result<NodeLevel, Response> {
    let value = value.trim();
    LEVELS
        .into_iter()
        .find(|level| level.as_str().eq_ignore_ascii_case(value))
        .ok_or_else(|| bad_request_error(format!("unknown level: {value}")))
}
