//! 稳定的 DTO 与 API 响应契约。
//!
//! 字段统一 camelCase；时间戳为 epoch 毫秒。

use serde::{Deserialize, Serialize};

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 层级节点。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyNodeDto {
    pub id: String,
    pub level: String,
    pub parent_id: Option<String>,
    pub organization_name: String,
    pub hospital_name: Option<String>,
    pub department_name: Option<String>,
    pub ward_name: Option<String>,
    pub has_children: bool,
    pub total_beds: u32,
    pub planned_beds: u32,
    pub occupied_beds: u32,
    pub assigned_beds: u32,
    pub dirty_beds: u32,
    pub available_beds: u32,
    pub net_available_beds: u32,
    pub confirmed_discharge: u32,
    pub potential_discharge: u32,
    pub transfer_orders: u32,
    pub occupancy_rate: u8,
    pub projected_rate: u8,
    pub last_updated: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub beds: Vec<BedSummaryDto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub patients: Vec<PatientSummaryDto>,
}

/// 层级查询参数。
#[derive(Debug, Default, Deserialize)]
pub struct HierarchyQuery {
    /// organization / hospital / department / ward
    pub level: Option<String>,
}

/// 病区内的床位摘要。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BedSummaryDto {
    pub bed_id: String,
    pub room_number: Option<String>,
    pub bed_number: Option<String>,
    pub status: String,
    pub updated_at: i64,
}

/// 病区内的患者摘要。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummaryDto {
    pub initials: String,
    pub medical_record_number: String,
    pub length_of_stay_days: u32,
    pub bed_location: String,
    pub admitted_at: i64,
    pub priority: String,
}

/// 数据质量指标。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetricsDto {
    pub freshness: u8,
    pub completeness: u8,
    pub accuracy: u8,
    pub last_updated: i64,
    pub stale_records: u32,
    pub error_count: u64,
}

/// 连接状态。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatusDto {
    pub is_connected: bool,
    pub latency: u64,
    pub last_sync: Option<i64>,
    pub sync_errors: u64,
    pub state: String,
}

/// 实时服务配置。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeConfigDto {
    /// 毫秒。
    pub refresh_interval: u64,
    pub enable_variations: bool,
    pub variation_intensity: String,
    pub simulate_errors: bool,
    pub batch_size: usize,
    pub is_running: bool,
}

/// 配置部分更新请求体。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRealtimeConfigRequest {
    #[serde(alias = "refresh_interval")]
    pub refresh_interval: Option<u64>,
    #[serde(alias = "enable_variations")]
    pub enable_variations: Option<bool>,
    #[serde(alias = "variation_intensity")]
    pub variation_intensity: Option<String>,
    #[serde(alias = "simulate_errors")]
    pub simulate_errors: Option<bool>,
    #[serde(alias = "batch_size")]
    pub batch_size: Option<usize>,
}

/// 手动刷新结果。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResultDto {
    /// published / failed / discarded
    pub outcome: String,
    pub node_count: usize,
    pub excluded_records: usize,
    pub error: Option<String>,
}

/// 告警查询参数。
#[derive(Debug, Default, Deserialize)]
pub struct AlertQuery {
    pub limit: Option<usize>,
}

/// 告警记录。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertDto {
    pub alert_id: String,
    pub rule_code: String,
    pub severity: String,
    pub subject_id: String,
    pub subject_label: String,
    pub message: String,
    pub value: i64,
    pub threshold: i64,
    pub raised_at: i64,
}

/// Telemetry 计数快照。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
    pub cycles_started: u64,
    pub cycles_published: u64,
    pub fetch_failures: u64,
    pub cycles_discarded: u64,
    pub subscriber_failures: u64,
    pub fetch_latency_ms_total: u64,
    pub fetch_latency_ms_count: u64,
    pub alerts_raised: u64,
    pub alert_insert_failures: u64,
}
