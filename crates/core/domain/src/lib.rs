//! 床位看板共享领域模型。
//!
//! - `data`：存储层输出的扁平床位记录（含科室/患者/就诊联表数据）
//! - `hierarchy`：组织 → 医院 → 科室 → 病区 的层级节点
//! - `status`：数据质量指标与连接状态

pub mod data;
pub mod hierarchy;
pub mod status;

pub use data::{
    BedRecord, BedStatus, DepartmentRef, PatientPriority, PatientRef, VariationIntensity, VisitRef,
};
pub use hierarchy::{BedCounters, BedSummary, HierarchyNode, NodeLevel, PatientSummary};
pub use status::{ConnectionState, ConnectionStatus, QualityMetrics};

/// 无法识别的枚举取值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl std::fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

/// 当前 Unix 时间戳（毫秒）。
pub fn now_epoch_ms() -> i64 {
    let now = std::time::SystemTime::now();
    let duration = now
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    duration.as_millis() as i64
}
