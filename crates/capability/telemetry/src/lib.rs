//! 追踪初始化、请求 ID 生成与进程级计数指标。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
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

/// 进程级计数指标。
pub struct TelemetryMetrics {
    cycles_started: AtomicU64,
    cycles_published: AtomicU64,
    fetch_failures: AtomicU64,
    cycles_discarded: AtomicU64,
    subscriber_failures: AtomicU64,
    fetch_latency_ms_total: AtomicU64,
    fetch_latency_ms_count: AtomicU64,
    alerts_raised: AtomicU64,
    alert_insert_failures: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            cycles_started: AtomicU64::new(0),
            cycles_published: AtomicU64::new(0),
            fetch_failures: AtomicU64::new(0),
            cycles_discarded: AtomicU64::new(0),
            subscriber_failures: AtomicU64::new(0),
            fetch_latency_ms_total: AtomicU64::new(0),
            fetch_latency_ms_count: AtomicU64::new(0),
            alerts_raised: AtomicU64::new(0),
            alert_insert_failures: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            cycles_started: self.cycles_started.load(Ordering::Relaxed),
            cycles_published: self.cycles_published.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            cycles_discarded: self.cycles_discarded.load(Ordering::Relaxed),
            subscriber_failures: self.subscriber_failures.load(Ordering::Relaxed),
            fetch_latency_ms_total: self.fetch_latency_ms_total.load(Ordering::Relaxed),
            fetch_latency_ms_count: self.fetch_latency_ms_count.load(Ordering::Relaxed),
            alerts_raised: self.alerts_raised.load(Ordering::Relaxed),
            alert_insert_failures: self.alert_insert_failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录轮询周期开始次数。
pub fn record_cycle_started() {
    metrics().cycles_started.fetch_add(1, Ordering::Relaxed);
}

/// 记录成功发布的周期次数。
pub fn record_cycle_published() {
    metrics().cycles_published.fetch_add(1, Ordering::Relaxed);
}

/// 记录拉取失败次数。
pub fn record_fetch_failure() {
    metrics().fetch_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录停止后被丢弃的周期次数。
pub fn record_cycle_discarded() {
    metrics().cycles_discarded.fetch_add(1, Ordering::Relaxed);
}

/// 记录订阅回调失败次数。
pub fn record_subscriber_failure() {
    metrics().subscriber_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录拉取延迟（毫秒）。
pub fn record_fetch_latency_ms(latency_ms: u64) {
    let metrics = metrics();
    metrics
        .fetch_latency_ms_total
        .fetch_add(latency_ms, Ordering::Relaxed);
    metrics
        .fetch_latency_ms_count
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录新触发的告警次数。
pub fn record_alert_raised() {
    metrics().alerts_raised.fetch_add(1, Ordering::Relaxed);
}

/// 记录告警写入失败次数。
pub fn record_alert_insert_failure() {
    metrics()
        .alert_insert_failures
        .fetch_add(1, Ordering::Relaxed);
}
