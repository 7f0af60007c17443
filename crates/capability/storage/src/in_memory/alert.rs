//! 告警内存实现

use crate::error::StorageError;
use crate::models::AlertRecord;
use crate::traits::AlertStore;
use std::sync::RwLock;

/// 告警内存存储
pub struct InMemoryAlertStore {
    alerts: RwLock<Vec<AlertRecord>>,
}

impl InMemoryAlertStore {
    pub fn new() -> Self {
        Self {
            alerts: RwLock::new(Vec::new()),
        }
    }

    /// 告警数量（用于测试）
    pub fn len(&self) -> usize {
        self.alerts.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryAlertStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AlertStore for InMemoryAlertStore {
    async fn insert_alert(&self, record: AlertRecord) -> Result<AlertRecord, StorageError> {
        let mut alerts = self
            .alerts
            .write()
            .map_err(|_| StorageError::new("lock failed").with_operation("insert_alert"))?;
        if alerts.iter().any(|item| item.alert_id == record.alert_id) {
            return Err(StorageError::new("alert already exists").with_operation("insert_alert"));
        }
        alerts.push(record.clone());
        Ok(record)
    }

    async fn list_alerts(&self, limit: usize) -> Result<Vec<AlertRecord>, StorageError> {
        let alerts = self
            .alerts
            .read()
            .map_err(|_| StorageError::new("lock failed").with_operation("list_alerts"))?;
        let mut items = alerts.clone();
        // 同一时间戳保持后写入者在前
        items.reverse();
        items.sort_by(|a, b| b.raised_at_ms.cmp(&a.raised_at_ms));
        if limit > 0 && items.len() > limit {
            items.truncate(limit);
        }
        Ok(items)
    }
}
