//! HTTP 响应辅助函数和 DTO 转换
//!
//! - 错误响应：bad_request_error, not_found_error, storage_error
//! - DTO 转换：node_to_dto, quality_to_dto, connection_to_dto, config_to_dto, alert_to_dto, metrics_to_dto

use api_contract::{
    AlertDto, ApiResponse, BedSummaryDto, ConnectionStatusDto, HierarchyNodeDto,
    MetricsSnapshotDto, PatientSummaryDto, QualityMetricsDto, RealtimeConfigDto,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bedwatch_realtime::RealtimeConfig;
use bedwatch_storage::{AlertRecord, StorageError};
use bedwatch_telemetry::MetricsSnapshot;
use domain::{ConnectionStatus, HierarchyNode, QualityMetrics};

/// 成功响应
pub fn ok<T: serde::Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("INVALID.REQUEST", message.into())),
    )
        .into_response()
}

/// 资源未找到错误响应
pub fn not_found_error() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("RESOURCE.NOT_FOUND", "not found")),
    )
        .into_response()
}

/// 存储错误响应
pub fn storage_error(err: StorageError) -> Response {
    let message = err.to_string();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("INTERNAL.ERROR", message)),
    )
        .into_response()
}

/// HierarchyNode 转 HierarchyNodeDto
pub fn node_to_dto(node: &HierarchyNode) -> HierarchyNodeDto {
    let counters = node.counters;
    HierarchyNodeDto {
        id: node.id.clone(),
        level: node.level.as_str().to_string(),
        parent_id: node.parent_id.clone(),
        organization_name: node.organization_name.clone(),
        hospital_name: node.hospital_name.clone(),
        department_name: node.department_name.clone(),
        ward_name: node.ward_name.clone(),
        has_children: node.has_children,
        total_beds: counters.total,
        planned_beds: counters.planned,
        occupied_beds: counters.occupied,
        assigned_beds: counters.assigned,
        dirty_beds: counters.dirty,
        available_beds: counters.available,
        net_available_beds: counters.net_available,
        confirmed_discharge: counters.confirmed_discharge,
        potential_discharge: counters.potential_discharge,
        transfer_orders: counters.transfer_orders,
        occupancy_rate: node.occupancy_rate,
        projected_rate: node.projected_rate,
        last_updated: node.last_updated_ms,
        beds: node
            .beds
            .iter()
            .map(|bed| BedSummaryDto {
                bed_id: bed.bed_id.clone(),
                room_number: bed.room_number.clone(),
                bed_number: bed.bed_number.clone(),
                status: bed.status.as_str().to_string(),
                updated_at: bed.updated_at_ms,
            })
            .collect(),
        patients: node
            .patients
            .iter()
            .map(|patient| PatientSummaryDto {
                initials: patient.initials.clone(),
                medical_record_number: patient.medical_record_number.clone(),
                length_of_stay_days: patient.length_of_stay_days,
                bed_location: patient.bed_location.clone(),
                admitted_at: patient.admitted_at_ms,
                priority: patient.priority.as_str().to_string(),
            })
            .collect(),
    }
}

/// QualityMetrics 转 QualityMetricsDto
pub fn quality_to_dto(quality: &QualityMetrics) -> QualityMetricsDto {
    QualityMetricsDto {
        freshness: quality.freshness,
        completeness: quality.completeness,
        accuracy: quality.accuracy,
        last_updated: quality.last_updated_ms,
        stale_records: quality.stale_records,
        error_count: quality.error_count,
    }
}

/// ConnectionStatus 转 ConnectionStatusDto
pub fn connection_to_dto(status: &ConnectionStatus) -> ConnectionStatusDto {
    ConnectionStatusDto {
        is_connected: status.is_connected,
        latency: status.latency_ms,
        last_sync: status.last_sync_ms,
        sync_errors: status.sync_errors,
        state: status.state.as_str().to_string(),
    }
}

/// RealtimeConfig 转 RealtimeConfigDto
pub fn config_to_dto(config: &RealtimeConfig, is_running: bool) -> RealtimeConfigDto {
    RealtimeConfigDto {
        refresh_interval: config.refresh_interval.as_millis() as u64,
        enable_variations: config.enable_variations,
        variation_intensity: config.variation_intensity.as_str().to_string(),
        simulate_errors: config.simulate_errors,
        batch_size: config.batch_size,
        is_running,
    }
}

/// AlertRecord 转 AlertDto
pub fn alert_to_dto(record: AlertRecord) -> AlertDto {
    AlertDto {
        alert_id: record.alert_id,
        rule_code: record.rule_code,
        severity: record.severity,
        subject_id: record.subject_id,
        subject_label: record.subject_label,
        message: record.message,
        value: record.value,
        threshold: record.threshold,
        raised_at: record.raised_at_ms,
    }
}

/// MetricsSnapshot 转 MetricsSnapshotDto
pub fn metrics_to_dto(snapshot: MetricsSnapshot) -> MetricsSnapshotDto {
    MetricsSnapshotDto {
        cycles_started: snapshot.cycles_started,
        cycles_published: snapshot.cycles_published,
        fetch_failures: snapshot.fetch_failures,
        cycles_discarded: snapshot.cycles_discarded,
        subscriber_failures: snapshot.subscriber_failures,
        fetch_latency_ms_total: snapshot.fetch_latency_ms_total,
        fetch_latency_ms_count: snapshot.fetch_latency_ms_count,
        alerts_raised: snapshot.alerts_raised,
        alert_insert_failures: snapshot.alert_insert_failures,
    }
}
