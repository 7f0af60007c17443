//! 数据模型
//!
//! - 查询参数：BedQuery
//! - 告警模型：AlertRecord

/// 床位查询参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BedQuery {
    /// 单次最多返回的床位数（对应运行配置 batch_size）。
    pub limit: usize,
}

impl Default for BedQuery {
    fn default() -> Self {
        Self { limit: 500 }
    }
}

/// 告警记录。
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRecord {
    pub alert_id: String,
    pub rule_code: String,
    pub severity: String,
    pub subject_id: String,
    pub subject_label: String,
    pub message: String,
    pub value: i64,
    pub threshold: i64,
    pub raised_at_ms: i64,
}
