//! 告警规则评估与落库。
//!
//! 规则是静态表，按层级节点或质量指标求值；同一规则 + 对象只在条件开始成立时
//! 触发一次，条件解除后可再次触发。

pub mod evaluator;
pub mod monitor;
pub mod rules;

pub use evaluator::{Alert, AlertEvaluator};
pub use monitor::{AlertMonitor, persist_alert, spawn_alert_monitor};
pub use rules::{AlertMetric, AlertRule, AlertSeverity, Comparison, DEFAULT_RULES};

#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("storage error: {0}")]
    Storage(#[from] bedwatch_storage::StorageError),
}
