use domain::{HierarchyNode, NodeLevel, QualityMetrics};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Info => "info",
            AlertSeverity::Warning => "warning",
            AlertSeverity::Critical => "critical",
        }
    }
}

/// 规则读取的指标。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertMetric {
    OccupancyRate,
    AvailableBeds,
    PotentialDischarge,
    TransferOrders,
    Freshness,
    Completeness,
}

impl AlertMetric {
    pub fn label(&self) -> &'static str {
        match self {
            AlertMetric::OccupancyRate => "occupancy rate",
            AlertMetric::AvailableBeds => "available beds",
            AlertMetric::PotentialDischarge => "potential discharges",
            AlertMetric::TransferOrders => "transfer orders",
            AlertMetric::Freshness => "data freshness",
            AlertMetric::Completeness => "data completeness",
        }
    }

    /// 质量类指标不针对节点求值。
    pub fn is_quality(&self) -> bool {
        matches!(self, AlertMetric::Freshness | AlertMetric::Completeness)
    }

    pub fn node_value(&self, node: &HierarchyNode) -> Option<i64> {
        let value = match self {
            AlertMetric::OccupancyRate => u32::from(node.occupancy_rate),
            AlertMetric::AvailableBeds => node.counters.available,
            AlertMetric::PotentialDischarge => node.counters.potential_discharge,
            AlertMetric::TransferOrders => node.counters.transfer_orders,
            AlertMetric::Freshness | AlertMetric::Completeness => return None,
        };
        Some(i64::from(value))
    }

    pub fn quality_value(&self, quality: &QualityMetrics) -> Option<i64> {
        match self {
            AlertMetric::Freshness => Some(i64::from(quality.freshness)),
            AlertMetric::Completeness => Some(i64::from(quality.completeness)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    AtLeast,
    AtMost,
    Below,
}

impl Comparison {
    pub fn matches(&self, value: i64, threshold: i64) -> bool {
        match self {
            Comparison::AtLeast => value >= threshold,
            Comparison::AtMost => value <= threshold,
            Comparison::Below => value < threshold,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::AtLeast => ">=",
            Comparison::AtMost => "<=",
            Comparison::Below => "<",
        }
    }
}

/// 告警规则。`level` 为 `None` 时规则作用于质量指标。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertRule {
    pub code: &'static str,
    pub metric: AlertMetric,
    pub level: Option<NodeLevel>,
    pub comparison: Comparison,
    pub threshold: i64,
    pub severity: AlertSeverity,
}

impl AlertRule {
    pub fn applies_to(&self, node: &HierarchyNode) -> bool {
        !self.metric.is_quality() && self.level.is_none_or(|level| level == node.level)
    }
}

pub const DEFAULT_RULES: &[AlertRule] = &[
    AlertRule {
        code: "OCCUPANCY.CRITICAL",
        metric: AlertMetric::OccupancyRate,
        level: Some(NodeLevel::Department),
        comparison: Comparison::AtLeast,
        threshold: 95,
        severity: AlertSeverity::Critical,
    },
    AlertRule {
        code: "OCCUPANCY.HIGH",
        metric: AlertMetric::OccupancyRate,
        level: Some(NodeLevel::Department),
        comparison: Comparison::AtLeast,
        threshold: 85,
        severity: AlertSeverity::Warning,
    },
    AlertRule {
        code: "CAPACITY.EXHAUSTED",
        metric: AlertMetric::AvailableBeds,
        level: Some(NodeLevel::Ward),
        comparison: Comparison::AtMost,
        threshold: 0,
        severity: AlertSeverity::Warning,
    },
    AlertRule {
        code: "DISCHARGE.BACKLOG",
        metric: AlertMetric::PotentialDischarge,
        level: Some(NodeLevel::Department),
        comparison: Comparison::AtLeast,
        threshold: 5,
        severity: AlertSeverity::Info,
    },
    AlertRule {
        code: "TRANSFER.PENDING",
        metric: AlertMetric::TransferOrders,
        level: Some(NodeLevel::Department),
        comparison: Comparison::AtLeast,
        threshold: 3,
        severity: AlertSeverity::Info,
    },
    AlertRule {
        code: "QUALITY.STALE",
        metric: AlertMetric::Freshness,
        level: None,
        comparison: Comparison::Below,
        threshold: 80,
        severity: AlertSeverity::Warning,
    },
    AlertRule {
        code: "QUALITY.INCOMPLETE",
        metric: AlertMetric::Completeness,
        level: None,
        comparison: Comparison::Below,
        threshold: 90,
        severity: AlertSeverity::Warning,
    },
];
