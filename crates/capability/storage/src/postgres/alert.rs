//! Postgres 告警存储实现

use crate::error::StorageError;
use crate::models::AlertRecord;
use crate::traits::AlertStore;
use sqlx::{PgPool, Row};

pub struct PgAlertStore {
    pub pool: PgPool,
}

impl PgAlertStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl AlertStore for PgAlertStore {
    async fn insert_alert(&self, record: AlertRecord) -> Result<AlertRecord, StorageError> {
        sqlx::query(
            "insert into alerts \
             (alert_id, rule_code, severity, subject_id, subject_label, message, value, threshold, raised_at) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, to_timestamp($9 / 1000.0))",
        )
        .bind(&record.alert_id)
        .bind(&record.rule_code)
        .bind(&record.severity)
        .bind(&record.subject_id)
        .bind(&record.subject_label)
        .bind(&record.message)
        .bind(record.value)
        .bind(record.threshold)
        .bind(record.raised_at_ms as f64)
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::from(err).with_operation("insert_alert"))?;
        Ok(record)
    }

    async fn list_alerts(&self, limit: usize) -> Result<Vec<AlertRecord>, StorageError> {
        // limit 为 0 时不限制条数（LIMIT NULL）
        let limit = (limit > 0).then(|| i64::try_from(limit).unwrap_or(i64::MAX));
        let rows = sqlx::query(
            "select alert_id, rule_code, severity, subject_id, subject_label, message, value, threshold, \
             (extract(epoch from raised_at) * 1000)::bigint as raised_at_ms \
             from alerts \
             order by raised_at desc \
             limit $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| StorageError::from(err).with_operation("list_alerts"))?;
        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(AlertRecord {
                alert_id: row.try_get("alert_id")?,
                rule_code: row.try_get("rule_code")?,
                severity: row.try_get("severity")?,
                subject_id: row.try_get("subject_id")?,
                subject_label: row.try_get("subject_label")?,
                message: row.try_get("message")?,
                value: row.try_get("value")?,
                threshold: row.try_get("threshold")?,
                raised_at_ms: row.try_get("raised_at_ms")?,
            });
        }
        Ok(items)
    }
}
