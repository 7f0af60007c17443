use async_trait::async_trait;
use bedwatch_realtime::{
    CycleOutcome, RealtimeConfig, RealtimeConfigUpdate, RealtimeError, RealtimeService,
    ServiceOptions,
};
use bedwatch_storage::{BedQuery, BedStore, InMemoryBedStore, StorageError};
use domain::{
    BedRecord, BedStatus, ConnectionState, DepartmentRef, HierarchyNode, VariationIntensity,
    now_epoch_ms,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// 可控制延迟与失败的床位存储。
struct ScriptedStore {
    inner: InMemoryBedStore,
    delay: Duration,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl ScriptedStore {
    fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryBedStore::with_demo_beds(now_epoch_ms()),
            delay,
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        })
    }

    fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BedStore for ScriptedStore {
    async fn list_beds(&self, query: &BedQuery) -> Result<Vec<BedRecord>, StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::new("connection refused"));
        }
        self.inner.list_beds(query).await
    }
}

/// 返回大量床位的存储，构建层级需要一段时间。
struct BulkStore {
    beds: Vec<BedRecord>,
    returned: AtomicBool,
}

impl BulkStore {
    fn new(count: usize) -> Arc<Self> {
        let beds = (0..count)
            .map(|index| BedRecord {
                bed_id: format!("bed-{index}"),
                status: Some(BedStatus::Available),
                department: Some(DepartmentRef {
                    department_id: format!("D{}", index % 40),
                    name: format!("Dept {}", index % 40),
                    hospital_id: Some(format!("h{}", index % 4)),
                    hospital_name: None,
                }),
                room_number: Some(format!("{}", index % 300)),
                bed_number: Some(format!("{index}")),
                patient: None,
                visit: None,
                updated_at_ms: 0,
            })
            .collect();
        Arc::new(Self {
            beds,
            returned: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl BedStore for BulkStore {
    async fn list_beds(&self, _query: &BedQuery) -> Result<Vec<BedRecord>, StorageError> {
        let beds = self.beds.clone();
        self.returned.store(true, Ordering::SeqCst);
        Ok(beds)
    }
}

fn config(refresh_ms: u64) -> RealtimeConfig {
    RealtimeConfig {
        refresh_interval: Duration::from_millis(refresh_ms),
        ..RealtimeConfig::default()
    }
}

fn service(store: Arc<ScriptedStore>, refresh_ms: u64) -> RealtimeService {
    RealtimeService::with_config(store, ServiceOptions::default(), config(refresh_ms))
}

fn data_channel(service: &RealtimeService) -> mpsc::UnboundedReceiver<(Instant, usize)> {
    let (tx, rx) = mpsc::unbounded_channel();
    // 句柄丢弃后回调仍保持注册
    let _subscription = service.subscribe_to_data(move |nodes| {
        let _ = tx.send((Instant::now(), nodes.len()));
    });
    rx
}

fn drain<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> Vec<T> {
    let mut items = Vec::new();
    while let Ok(item) = rx.try_recv() {
        items.push(item);
    }
    items
}

#[tokio::test(start_paused = true)]
async fn start_publishes_immediately_then_on_interval() {
    let store = ScriptedStore::new(Duration::ZERO);
    let service = service(store.clone(), 1_000);
    let mut rx = data_channel(&service);

    service.start();
    tokio::time::sleep(Duration::from_millis(3_500)).await;

    let published = drain(&mut rx);
    assert_eq!(published.len(), 4);
    assert!(published.iter().all(|(_, nodes)| *nodes > 0));
    assert_eq!(store.calls(), 4);
    assert!(service.is_running());
    service.stop();
}

#[tokio::test(start_paused = true)]
async fn start_is_idempotent() {
    let store = ScriptedStore::new(Duration::ZERO);
    let service = service(store.clone(), 1_000);
    let mut rx = data_channel(&service);

    service.start();
    service.start();
    service.clone().start();
    tokio::time::sleep(Duration::from_millis(3_500)).await;

    assert_eq!(drain(&mut rx).len(), 4);
    assert_eq!(store.calls(), 4);
    service.stop();
}

#[tokio::test(start_paused = true)]
async fn stop_halts_publications_and_goes_offline() {
    let store = ScriptedStore::new(Duration::ZERO);
    let service = service(store.clone(), 1_000);
    let mut rx = data_channel(&service);

    service.start();
    rx.recv().await.expect("first publication");
    assert_eq!(service.connection_status().state, ConnectionState::Healthy);

    service.stop();
    service.stop();
    assert!(!service.is_running());
    assert_eq!(service.connection_status().state, ConnectionState::Offline);
    assert!(!service.connection_status().is_connected);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(drain(&mut rx).is_empty());
    assert_eq!(store.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn stop_discards_in_flight_fetch() {
    let store = ScriptedStore::new(Duration::from_millis(2_000));
    let service = service(store.clone(), 1_000);
    let mut rx = data_channel(&service);

    service.start();
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(store.calls(), 1);
    service.stop();

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(drain(&mut rx).is_empty());
    assert_eq!(store.calls(), 1);
    assert_eq!(service.quality_metrics().last_updated_ms, 0);
    assert_eq!(service.connection_status().state, ConnectionState::Offline);
}

#[tokio::test(start_paused = true)]
async fn restart_discards_results_of_previous_loop() {
    let store = ScriptedStore::new(Duration::from_millis(2_000));
    let service = service(store.clone(), 10_000);
    let mut rx = data_channel(&service);

    service.start();
    tokio::time::sleep(Duration::from_millis(500)).await;
    service.restart();
    tokio::time::sleep(Duration::from_millis(2_500)).await;

    // 旧循环在 2000ms 完成但被丢弃，新循环在 2500ms 发布
    assert_eq!(drain(&mut rx).len(), 1);
    assert_eq!(store.calls(), 2);
    service.stop();
}

#[tokio::test(start_paused = true)]
async fn update_config_reschedules_with_new_interval() {
    let store = ScriptedStore::new(Duration::ZERO);
    let service = service(store, 60_000);
    let mut rx = data_channel(&service);

    service.start();
    rx.recv().await.expect("first publication");
    tokio::time::sleep(Duration::from_millis(1_000)).await;

    let updated_at = Instant::now();
    let config = service.update_config(RealtimeConfigUpdate {
        refresh_interval: Some(Duration::from_millis(5_000)),
        ..Default::default()
    });
    assert_eq!(config.refresh_interval, Duration::from_millis(5_000));
    assert!(service.is_running());

    let (second, _) = rx.recv().await.expect("publication after update");
    assert!(second.duration_since(updated_at) <= Duration::from_millis(5_000));

    let (third, _) = rx.recv().await.expect("next tick");
    let gap = third.duration_since(second);
    assert!(gap >= Duration::from_millis(5_000));
    assert!(gap < Duration::from_millis(5_100));
    service.stop();
}

#[tokio::test]
async fn update_config_does_not_start_stopped_service() {
    let service = service(ScriptedStore::new(Duration::ZERO), 1_000);
    let config = service.update_config(RealtimeConfigUpdate {
        batch_size: Some(3),
        ..Default::default()
    });
    assert_eq!(config.batch_size, 3);
    assert_eq!(service.get_config().batch_size, 3);
    assert!(!service.is_running());
}

#[tokio::test]
async fn batch_size_limits_fetched_records() {
    let service = service(ScriptedStore::new(Duration::ZERO), 1_000);
    service.update_config(RealtimeConfigUpdate {
        batch_size: Some(5),
        ..Default::default()
    });
    match service.refresh_now().await {
        CycleOutcome::Published(hierarchy) => assert_eq!(hierarchy.total_records, 5),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_failure_publishes_empty_data_and_error_state() {
    let store = ScriptedStore::new(Duration::ZERO);
    let service = service(store.clone(), 1_000);
    let data: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
    let _data_sub = {
        let data = data.clone();
        service.subscribe_to_data(move |nodes| data.lock().expect("lock").push(nodes.len()))
    };
    let connected = Arc::new(Mutex::new(Vec::new()));
    let _connection_sub = {
        let connected = connected.clone();
        service.subscribe_to_connection(move |status| {
            connected.lock().expect("lock").push(status.is_connected)
        })
    };

    assert!(matches!(service.refresh_now().await, CycleOutcome::Published(_)));
    store.set_failing(true);
    assert!(matches!(
        service.refresh_now().await,
        CycleOutcome::Failed(RealtimeError::Fetch(_))
    ));

    let data = data.lock().expect("lock").clone();
    assert_eq!(data.len(), 2);
    assert!(data[0] > 0);
    assert_eq!(data[1], 0);
    assert_eq!(connected.lock().expect("lock").as_slice(), &[true, false]);

    let status = service.connection_status();
    assert_eq!(status.state, ConnectionState::Error);
    assert_eq!(status.sync_errors, 1);
    assert!(status.last_sync_ms.is_some());
    let quality = service.quality_metrics();
    assert_eq!(quality.error_count, 1);
    assert_eq!(quality.freshness, 0);

    store.set_failing(false);
    service.refresh_now().await;
    let status = service.connection_status();
    assert_eq!(status.state, ConnectionState::Healthy);
    assert_eq!(status.sync_errors, 0);
    assert_eq!(service.quality_metrics().error_count, 1);
    assert_eq!(service.quality_metrics().completeness, 100);
}

#[tokio::test]
async fn publishes_data_then_quality_then_connection() {
    let service = service(ScriptedStore::new(Duration::ZERO), 1_000);
    let order: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));
    let _connection = {
        let order = order.clone();
        service.subscribe_to_connection(move |_| order.lock().expect("lock").push("connection"))
    };
    let _quality = {
        let order = order.clone();
        service.subscribe_to_quality(move |_| order.lock().expect("lock").push("quality"))
    };
    let _data = {
        let order = order.clone();
        service.subscribe_to_data(move |_| order.lock().expect("lock").push("data"))
    };

    service.refresh_now().await;
    assert_eq!(
        order.lock().expect("lock").as_slice(),
        &["data", "quality", "connection"]
    );
}

#[tokio::test]
async fn unsubscribed_callback_receives_nothing() {
    let service = service(ScriptedStore::new(Duration::ZERO), 1_000);
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let first_sub = {
        let first = first.clone();
        service.subscribe_to_data(move |_| {
            first.fetch_add(1, Ordering::SeqCst);
        })
    };
    let _second_sub = {
        let second = second.clone();
        service.subscribe_to_data(move |_| {
            second.fetch_add(1, Ordering::SeqCst);
        })
    };

    service.refresh_now().await;
    first_sub.unsubscribe();
    service.refresh_now().await;

    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn panicking_subscriber_does_not_block_others() {
    let service = service(ScriptedStore::new(Duration::ZERO), 1_000);
    let _bad = service.subscribe_to_data(|_: &[HierarchyNode]| panic!("dashboard crashed"));
    let received = Arc::new(AtomicUsize::new(0));
    let _good = {
        let received = received.clone();
        service.subscribe_to_data(move |nodes| {
            received.store(nodes.len(), Ordering::SeqCst);
        })
    };
    let quality_seen = Arc::new(AtomicBool::new(false));
    let _quality = {
        let quality_seen = quality_seen.clone();
        service.subscribe_to_quality(move |_| quality_seen.store(true, Ordering::SeqCst))
    };

    assert!(matches!(service.refresh_now().await, CycleOutcome::Published(_)));
    assert!(received.load(Ordering::SeqCst) > 0);
    assert!(quality_seen.load(Ordering::SeqCst));
    assert!(bedwatch_telemetry::metrics().snapshot().subscriber_failures >= 1);
}

#[tokio::test]
async fn simulated_errors_fail_every_tenth_cycle() {
    let service = RealtimeService::with_config(
        ScriptedStore::new(Duration::ZERO),
        ServiceOptions::default(),
        RealtimeConfig {
            simulate_errors: true,
            ..RealtimeConfig::default()
        },
    );
    for _ in 0..9 {
        assert!(matches!(service.refresh_now().await, CycleOutcome::Published(_)));
    }
    assert!(matches!(
        service.refresh_now().await,
        CycleOutcome::Failed(RealtimeError::Simulated(10))
    ));
    assert!(matches!(service.refresh_now().await, CycleOutcome::Published(_)));
}

#[tokio::test]
async fn variations_keep_occupancy_stable() {
    let service = RealtimeService::with_config(
        ScriptedStore::new(Duration::ZERO),
        ServiceOptions::default(),
        RealtimeConfig {
            enable_variations: true,
            variation_intensity: VariationIntensity::High,
            ..RealtimeConfig::default()
        },
    );
    let mut roots = Vec::new();
    for _ in 0..3 {
        match service.refresh_now().await {
            CycleOutcome::Published(hierarchy) => {
                roots.push(hierarchy.root().expect("root").counters);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
    for counters in &roots[1..] {
        assert_eq!(counters.total, roots[0].total);
        assert_eq!(counters.occupied, roots[0].occupied);
        assert_eq!(
            counters.available + counters.assigned,
            roots[0].available + roots[0].assigned
        );
    }
}

#[tokio::test]
async fn instances_are_independent() {
    let store = ScriptedStore::new(Duration::ZERO);
    let first = service(store.clone(), 1_000);
    let second = service(store, 1_000);
    let hits = Arc::new(AtomicUsize::new(0));
    let _sub = {
        let hits = hits.clone();
        first.subscribe_to_data(move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    };

    second.refresh_now().await;
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(first.quality_metrics().last_updated_ms, 0);

    first.refresh_now().await;
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stop_while_cycle_is_building_leaves_service_offline() {
    let store = BulkStore::new(200_000);
    let service =
        RealtimeService::with_config(store.clone(), ServiceOptions::default(), config(60_000));
    let published = Arc::new(AtomicUsize::new(0));
    let _sub = {
        let published = published.clone();
        service.subscribe_to_data(move |_| {
            published.fetch_add(1, Ordering::SeqCst);
        })
    };

    service.start();
    while !store.returned.load(Ordering::SeqCst) {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    tokio::time::sleep(Duration::from_millis(5)).await;
    service.stop();

    let after_stop = published.load(Ordering::SeqCst);
    let status = service.connection_status();
    assert!(!status.is_connected);
    assert_eq!(status.state, ConnectionState::Offline);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(published.load(Ordering::SeqCst), after_stop);
    assert_eq!(service.connection_status().state, ConnectionState::Offline);
}
