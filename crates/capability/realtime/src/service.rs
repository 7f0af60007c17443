use crate::RealtimeError;
use crate::config::{RealtimeConfig, RealtimeConfigUpdate};
use crate::simulation::{apply_variations, should_fail};
use crate::subscribers::{SubscriberList, Subscription};
use bedwatch_hierarchy::{Hierarchy, HierarchyOptions, build_hierarchy};
use bedwatch_quality::QualityTracker;
use bedwatch_storage::{BedQuery, BedStore};
use bedwatch_telemetry::{
    record_cycle_discarded, record_cycle_published, record_cycle_started, record_fetch_failure,
    record_fetch_latency_ms,
};
use domain::{BedRecord, ConnectionStatus, HierarchyNode, QualityMetrics, now_epoch_ms};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// 组织级参数（构建层级时使用）。
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub organization_id: String,
    pub organization_name: String,
    pub potential_discharge_days: u32,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            organization_id: "org".to_string(),
            organization_name: "Hospital Network".to_string(),
            potential_discharge_days: 5,
        }
    }
}

/// 单个周期的结果。
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    Published(Hierarchy),
    Failed(RealtimeError),
    /// 调度在拉取期间被停止或重启，结果被丢弃。
    Discarded,
}

struct RunningLoop {
    generation: u64,
    stop_tx: watch::Sender<bool>,
    _task: JoinHandle<()>,
}

struct ServiceInner {
    store: Arc<dyn BedStore>,
    options: ServiceOptions,
    config: RwLock<RealtimeConfig>,
    tracker: Mutex<QualityTracker>,
    data: Arc<SubscriberList<[HierarchyNode]>>,
    quality: Arc<SubscriberList<QualityMetrics>>,
    connection: Arc<SubscriberList<ConnectionStatus>>,
    running: Mutex<Option<RunningLoop>>,
    generation: AtomicU64,
    /// 代次校验、tracker 更新与三路发布在此锁内完成；stop 也需持有它。
    publishing: Mutex<()>,
    cycles: AtomicU64,
}

/// 实时床位层级服务。
///
/// 克隆共享同一个实例；不同实例之间互不影响。
#[derive(Clone)]
pub struct RealtimeService {
    inner: Arc<ServiceInner>,
}

impl RealtimeService {
    pub fn new(store: Arc<dyn BedStore>, options: ServiceOptions) -> Self {
        Self::with_config(store, options, RealtimeConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn BedStore>,
        options: ServiceOptions,
        config: RealtimeConfig,
    ) -> Self {
        Self {
            inner: Arc::new(ServiceInner {
                store,
                options,
                config: RwLock::new(config.sanitized()),
                tracker: Mutex::new(QualityTracker::new()),
                data: SubscriberList::new("data"),
                quality: SubscriberList::new("quality"),
                connection: SubscriberList::new("connection"),
                running: Mutex::new(None),
                generation: AtomicU64::new(0),
                publishing: Mutex::new(()),
                cycles: AtomicU64::new(0),
            }),
        }
    }

    /// 开始轮询：立即执行一次周期，之后按 refresh_interval 重复。已在运行时不做任何事。
    ///
    /// 需要在 tokio 运行时内调用。
    pub fn start(&self) {
        let mut running = lock(&self.inner.running);
        if running.is_some() {
            return;
        }
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (stop_tx, stop_rx) = watch::channel(false);
        let task = tokio::spawn(run_loop(Arc::downgrade(&self.inner), generation, stop_rx));
        *running = Some(RunningLoop {
            generation,
            stop_tx,
            _task: task,
        });
        info!(
            target: "bedwatch.realtime",
            generation,
            refresh_interval_ms = self.inner.config().refresh_interval.as_millis() as u64,
            "scheduler_started"
        );
    }

    /// 停止轮询。正在进行的拉取会完成，但结果不再发布。
    ///
    /// 返回后不会再有调度周期的发布；正在发布的周期会先完成。
    /// 不要在订阅回调中调用。
    pub fn stop(&self) {
        let Some(running) = lock(&self.inner.running).take() else {
            return;
        };
        {
            let _publishing = lock(&self.inner.publishing);
            self.inner.generation.fetch_add(1, Ordering::SeqCst);
            lock(&self.inner.tracker).mark_offline();
        }
        let _ = running.stop_tx.send(true);
        info!(
            target: "bedwatch.realtime",
            generation = running.generation,
            "scheduler_stopped"
        );
    }

    pub fn restart(&self) {
        self.stop();
        self.start();
    }

    pub fn is_running(&self) -> bool {
        lock(&self.inner.running).is_some()
    }

    pub fn get_config(&self) -> RealtimeConfig {
        self.inner.config()
    }

    /// 合并配置更新；运行中时按新配置重启调度。
    pub fn update_config(&self, update: RealtimeConfigUpdate) -> RealtimeConfig {
        let config = {
            let mut current = self
                .inner
                .config
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            *current = current.clone().merge(update);
            current.clone()
        };
        info!(
            target: "bedwatch.realtime",
            refresh_interval_ms = config.refresh_interval.as_millis() as u64,
            enable_variations = config.enable_variations,
            variation_intensity = config.variation_intensity.as_str(),
            simulate_errors = config.simulate_errors,
            batch_size = config.batch_size,
            "config_updated"
        );
        if self.is_running() {
            self.restart();
        }
        config
    }

    pub fn subscribe_to_data<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&[HierarchyNode]) + Send + Sync + 'static,
    {
        self.inner.data.subscribe(callback)
    }

    pub fn subscribe_to_quality<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&QualityMetrics) + Send + Sync + 'static,
    {
        self.inner.quality.subscribe(callback)
    }

    pub fn subscribe_to_connection<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ConnectionStatus) + Send + Sync + 'static,
    {
        self.inner.connection.subscribe(callback)
    }

    /// 立即执行一次周期并发布结果，不影响调度状态。
    pub async fn refresh_now(&self) -> CycleOutcome {
        self.inner.run_cycle(None).await
    }

    pub fn quality_metrics(&self) -> QualityMetrics {
        lock(&self.inner.tracker).quality().clone()
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        lock(&self.inner.tracker).connection().clone()
    }
}

impl ServiceInner {
    fn config(&self) -> RealtimeConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// 手动刷新（`None`）从不过期。
    fn is_stale(&self, generation: Option<u64>) -> bool {
        generation.is_some_and(|generation| !self.is_current(generation))
    }

    fn discard(&self, cycle: u64, generation: Option<u64>) -> CycleOutcome {
        record_cycle_discarded();
        info!(target: "bedwatch.realtime", cycle, generation, "cycle_discarded");
        CycleOutcome::Discarded
    }

    /// `generation` 为 `None` 时是手动刷新，总是发布。
    async fn run_cycle(&self, generation: Option<u64>) -> CycleOutcome {
        let cycle = self.cycles.fetch_add(1, Ordering::SeqCst) + 1;
        let config = self.config();
        record_cycle_started();

        let started = Instant::now();
        let fetched = self.fetch(&config, cycle).await;
        let latency_ms = started.elapsed().as_millis() as u64;

        if self.is_stale(generation) {
            return self.discard(cycle, generation);
        }

        let now_ms = now_epoch_ms();
        match fetched {
            Ok(mut beds) => {
                let varied = if config.enable_variations {
                    apply_variations(&mut beds, config.variation_intensity, cycle)
                } else {
                    0
                };
                let mut options = HierarchyOptions::new(
                    self.options.organization_id.clone(),
                    self.options.organization_name.clone(),
                    now_ms,
                );
                options.potential_discharge_days = self.options.potential_discharge_days;
                let hierarchy = build_hierarchy(&beds, &options);
                let _publishing = lock(&self.publishing);
                if self.is_stale(generation) {
                    return self.discard(cycle, generation);
                }
                let (quality, connection) =
                    lock(&self.tracker).record_success(&hierarchy, latency_ms, now_ms);
                record_fetch_latency_ms(latency_ms);
                self.publish(&hierarchy.nodes, &quality, &connection);
                record_cycle_published();
                info!(
                    target: "bedwatch.realtime",
                    cycle,
                    records = hierarchy.total_records,
                    excluded = hierarchy.excluded_records,
                    nodes = hierarchy.nodes.len(),
                    varied,
                    latency_ms,
                    "cycle_published"
                );
                CycleOutcome::Published(hierarchy)
            }
            Err(err) => {
                let _publishing = lock(&self.publishing);
                if self.is_stale(generation) {
                    return self.discard(cycle, generation);
                }
                record_fetch_failure();
                let (quality, connection) = lock(&self.tracker).record_failure(now_ms);
                warn!(
                    target: "bedwatch.realtime",
                    cycle,
                    sync_errors = connection.sync_errors,
                    error = %err,
                    "cycle_fetch_failed"
                );
                self.publish(&[], &quality, &connection);
                CycleOutcome::Failed(err)
            }
        }
    }

    async fn fetch(
        &self,
        config: &RealtimeConfig,
        cycle: u64,
    ) -> Result<Vec<BedRecord>, RealtimeError> {
        if config.simulate_errors && should_fail(cycle) {
            return Err(RealtimeError::Simulated(cycle));
        }
        let query = BedQuery {
            limit: config.batch_size,
        };
        self.store
            .list_beds(&query)
            .await
            .map_err(|err| RealtimeError::Fetch(err.to_string()))
    }

    fn publish(
        &self,
        nodes: &[HierarchyNode],
        quality: &QualityMetrics,
        connection: &ConnectionStatus,
    ) {
        self.data.publish(nodes);
        self.quality.publish(quality);
        self.connection.publish(connection);
    }
}

async fn run_loop(inner: Weak<ServiceInner>, generation: u64, mut stop_rx: watch::Receiver<bool>) {
    loop {
        let interval = {
            let Some(inner) = inner.upgrade() else {
                break;
            };
            inner.run_cycle(Some(generation)).await;
            if !inner.is_current(generation) {
                break;
            }
            inner.config().refresh_interval
        };
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = stop_rx.changed() => break,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
