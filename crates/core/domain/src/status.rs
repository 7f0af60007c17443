/// 数据质量指标（启发式）。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QualityMetrics {
    pub freshness: u8,
    pub completeness: u8,
    pub accuracy: u8,
    pub last_updated_ms: i64,
    pub stale_records: u32,
    /// 服务生命周期内累计，不随周期重置。
    pub error_count: u64,
}

/// 连接状态标签。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    Healthy,
    Warning,
    Error,
    #[default]
    Offline,
}

impl ConnectionState {
    /// 延迟不超过该值视为健康。
    pub const HEALTHY_LATENCY_MS: u64 = 1_000;

    /// 由连通性与延迟推导状态标签。
    pub fn derive(is_connected: bool, latency_ms: u64, sync_errors: u64) -> Self {
        match (is_connected, sync_errors) {
            (true, _) if latency_ms <= Self::HEALTHY_LATENCY_MS => ConnectionState::Healthy,
            (true, _) => ConnectionState::Warning,
            (false, 0) => ConnectionState::Offline,
            (false, _) => ConnectionState::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Healthy => "healthy",
            ConnectionState::Warning => "warning",
            ConnectionState::Error => "error",
            ConnectionState::Offline => "offline",
        }
    }
}

/// 与数据源的连接状态。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectionStatus {
    pub is_connected: bool,
    pub latency_ms: u64,
    pub last_sync_ms: Option<i64>,
    pub sync_errors: u64,
    pub state: ConnectionState,
}
