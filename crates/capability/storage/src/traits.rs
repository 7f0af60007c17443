//! 存储接口 Trait 定义
//!
//! - BedStore：床位联表查询（实时服务的数据来源）
//! - AlertStore：告警写入与查询
//!
//! 设计原则：
//! - 所有接口返回 StorageError
//! - 使用 async_trait 支持动态分发

use crate::error::StorageError;
use crate::models::{AlertRecord, BedQuery};
use async_trait::async_trait;
use domain::BedRecord;

/// 床位存储接口
///
/// 返回已联表科室、患者、就诊信息的扁平床位记录。
#[async_trait]
pub trait BedStore: Send + Sync {
    /// 查询床位（最多 `query.limit` 条）
    async fn list_beds(&self, query: &BedQuery) -> Result<Vec<BedRecord>, StorageError>;
}

/// 告警存储接口
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// 写入一条告警
    async fn insert_alert(&self, record: AlertRecord) -> Result<AlertRecord, StorageError>;

    /// 查询最近的告警（按触发时间倒序，limit 为 0 时返回全部）
    async fn list_alerts(&self, limit: usize) -> Result<Vec<AlertRecord>, StorageError>;
}
