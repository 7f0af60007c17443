//! 实时床位层级服务。
//!
//! 定时执行「拉取 → 构建层级 → 计算质量/连接状态 → 发布」周期，并把结果
//! 同步推送给三组订阅者（数据、质量、连接）。
//!
//! - `config`：运行配置与部分更新
//! - `subscribers`：订阅者注册表（按身份退订、回调失败隔离）
//! - `simulation`：演示用的确定性扰动与模拟故障
//! - `service`：轮询调度（Stopped ⇄ Running）与单次周期

pub mod config;
pub mod service;
pub mod simulation;
pub mod subscribers;

pub use config::{RealtimeConfig, RealtimeConfigUpdate};
pub use service::{CycleOutcome, RealtimeService, ServiceOptions};
pub use subscribers::{SubscriberList, Subscription};

/// 单个周期的错误（只进入日志与跟踪状态，不会抛给订阅者）。
#[derive(Debug, Clone, thiserror::Error)]
pub enum RealtimeError {
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("simulated fetch failure on cycle {0}")]
    Simulated(u64),
}
