use crate::AlertError;
use crate::evaluator::{Alert, AlertEvaluator};
use crate::rules::AlertRule;
use bedwatch_realtime::{RealtimeService, Subscription};
use bedwatch_storage::{AlertRecord, AlertStore};
use bedwatch_telemetry::{record_alert_insert_failure, record_alert_raised};
use domain::{HierarchyNode, QualityMetrics, now_epoch_ms};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

enum Snapshot {
    Nodes(Vec<HierarchyNode>),
    Quality(QualityMetrics),
}

/// 后台告警任务句柄。
pub struct AlertMonitor {
    subscriptions: Vec<Subscription>,
    task: JoinHandle<()>,
}

impl AlertMonitor {
    /// 退订并等待后台任务处理完剩余快照后退出。
    pub async fn shutdown(self) {
        for subscription in self.subscriptions {
            subscription.unsubscribe();
        }
        if let Err(err) = self.task.await {
            warn!(target: "bedwatch.alerts", error = %err, "alert_monitor_join_failed");
        }
    }
}

/// 订阅数据与质量快照，在后台任务中评估规则并写入告警。
///
/// 回调只负责把快照投递到通道，不阻塞发布。
pub fn spawn_alert_monitor(
    service: &RealtimeService,
    store: Arc<dyn AlertStore>,
    rules: Vec<AlertRule>,
) -> AlertMonitor {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let data_tx = tx.clone();
    let data = service.subscribe_to_data(move |nodes| {
        let _ = data_tx.send(Snapshot::Nodes(nodes.to_vec()));
    });
    let quality = service.subscribe_to_quality(move |quality| {
        let _ = tx.send(Snapshot::Quality(quality.clone()));
    });

    let task = tokio::spawn(async move {
        let mut evaluator = AlertEvaluator::new(rules);
        while let Some(snapshot) = rx.recv().await {
            let alerts = match snapshot {
                Snapshot::Nodes(nodes) => evaluator.evaluate_nodes(&nodes),
                Snapshot::Quality(quality) => evaluator.evaluate_quality(&quality),
            };
            for alert in alerts {
                // 写入失败只记录，不重试
                if let Err(err) = persist_alert(store.as_ref(), &alert, now_epoch_ms()).await {
                    record_alert_insert_failure();
                    warn!(
                        target: "bedwatch.alerts",
                        rule_code = alert.rule.code,
                        subject_id = %alert.subject_id,
                        error = %err,
                        "alert_insert_failed"
                    );
                }
            }
        }
        info!(target: "bedwatch.alerts", "alert_monitor_stopped");
    });

    AlertMonitor {
        subscriptions: vec![data, quality],
        task,
    }
}

/// 将告警写入存储。
pub async fn persist_alert(
    store: &dyn AlertStore,
    alert: &Alert,
    raised_at_ms: i64,
) -> Result<AlertRecord, AlertError> {
    let record = AlertRecord {
        alert_id: uuid::Uuid::new_v4().to_string(),
        rule_code: alert.rule.code.to_string(),
        severity: alert.rule.severity.as_str().to_string(),
        subject_id: alert.subject_id.clone(),
        subject_label: alert.subject_label.clone(),
        message: alert.message.clone(),
        value: alert.value,
        threshold: alert.rule.threshold,
        raised_at_ms,
    };
    let record = store.insert_alert(record).await?;
    record_alert_raised();
    info!(
        target: "bedwatch.alerts",
        alert_id = %record.alert_id,
        rule_code = %record.rule_code,
        severity = %record.severity,
        subject_id = %record.subject_id,
        value = record.value,
        "alert_raised"
    );
    Ok(record)
}
