//! 数据质量与连接状态跟踪。
//!
//! 指标来自每个轮询周期的结果（耗时、成败、节点时间戳），不校验业务数据
//! 本身的正确性。freshness/completeness/accuracy 都是启发式百分比。

use bedwatch_hierarchy::{Hierarchy, occupancy_rate};
use domain::{ConnectionState, ConnectionStatus, HierarchyNode, NodeLevel, QualityMetrics};

/// 超过该时长未更新的节点/床位视为过期。
pub const STALE_AFTER_MS: i64 = 300_000;

/// 延迟不超过该值时连接状态为 healthy。
pub const HEALTHY_LATENCY_MS: u64 = ConnectionState::HEALTHY_LATENCY_MS;

/// 跨周期保存质量指标与连接状态。
///
/// `error_count` 在实例生命周期内单调递增；`sync_errors` 在成功后清零。
#[derive(Debug, Clone, Default)]
pub struct QualityTracker {
    quality: QualityMetrics,
    connection: ConnectionStatus,
}

impl QualityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次成功拉取。
    pub fn record_success(
        &mut self,
        hierarchy: &Hierarchy,
        latency_ms: u64,
        now_ms: i64,
    ) -> (QualityMetrics, ConnectionStatus) {
        self.quality = QualityMetrics {
            freshness: freshness(&hierarchy.nodes, now_ms),
            completeness: percentage(hierarchy.included_records, hierarchy.total_records),
            accuracy: percentage(hierarchy.consistent_records, hierarchy.included_records),
            last_updated_ms: now_ms,
            stale_records: stale_records(&hierarchy.nodes, now_ms),
            error_count: self.quality.error_count,
        };
        self.connection = ConnectionStatus {
            is_connected: true,
            latency_ms,
            last_sync_ms: Some(now_ms),
            sync_errors: 0,
            state: ConnectionState::derive(true, latency_ms, 0),
        };
        self.snapshot()
    }

    /// 记录一次失败拉取。
    pub fn record_failure(&mut self, now_ms: i64) -> (QualityMetrics, ConnectionStatus) {
        self.quality = QualityMetrics {
            freshness: 0,
            completeness: 0,
            accuracy: 0,
            last_updated_ms: now_ms,
            stale_records: self.quality.stale_records,
            error_count: self.quality.error_count.saturating_add(1),
        };
        let sync_errors = self.connection.sync_errors.saturating_add(1);
        self.connection = ConnectionStatus {
            is_connected: false,
            latency_ms: self.connection.latency_ms,
            last_sync_ms: self.connection.last_sync_ms,
            sync_errors,
            state: ConnectionState::derive(false, self.connection.latency_ms, sync_errors),
        };
        self.snapshot()
    }

    /// 调度停止后连接状态回到 offline。
    pub fn mark_offline(&mut self) {
        self.connection.is_connected = false;
        self.connection.state = ConnectionState::Offline;
    }

    pub fn quality(&self) -> &QualityMetrics {
        &self.quality
    }

    pub fn connection(&self) -> &ConnectionStatus {
        &self.connection
    }

    fn snapshot(&self) -> (QualityMetrics, ConnectionStatus) {
        (self.quality.clone(), self.connection.clone())
    }
}

/// 100 − 过期节点百分比；没有节点时为 0。
pub fn freshness(nodes: &[HierarchyNode], now_ms: i64) -> u8 {
    if nodes.is_empty() {
        return 0;
    }
    let stale = nodes
        .iter()
        .filter(|node| is_stale(node.last_updated_ms, now_ms))
        .count();
    100 - percentage(stale, nodes.len())
}

/// 病区床位中过期的数量。
pub fn stale_records(nodes: &[HierarchyNode], now_ms: i64) -> u32 {
    let count = nodes
        .iter()
        .filter(|node| node.level == NodeLevel::Ward)
        .flat_map(|node| node.beds.iter())
        .filter(|bed| is_stale(bed.updated_at_ms, now_ms))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn is_stale(updated_at_ms: i64, now_ms: i64) -> bool {
    now_ms.saturating_sub(updated_at_ms) > STALE_AFTER_MS
}

/// 分母为 0 时视为 100%。
fn percentage(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let part = u32::try_from(part).unwrap_or(u32::MAX);
    let total = u32::try_from(total).unwrap_or(u32::MAX);
    occupancy_rate(part, total)
}
