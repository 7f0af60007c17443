use crate::rules::AlertRule;
use domain::{HierarchyNode, QualityMetrics};
use std::collections::HashSet;

/// 质量类告警的对象 ID。
const QUALITY_SUBJECT: &str = "quality";

/// 新触发的告警（尚未落库）。
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub rule: AlertRule,
    pub subject_id: String,
    pub subject_label: String,
    pub message: String,
    pub value: i64,
}

/// 边沿触发的规则评估器。
///
/// 节点类与质量类规则各自维护活跃集合，互不清除。
#[derive(Debug, Clone)]
pub struct AlertEvaluator {
    rules: Vec<AlertRule>,
    active_nodes: HashSet<(&'static str, String)>,
    active_quality: HashSet<&'static str>,
}

impl AlertEvaluator {
    pub fn new(rules: Vec<AlertRule>) -> Self {
        Self {
            rules,
            active_nodes: HashSet::new(),
            active_quality: HashSet::new(),
        }
    }

    pub fn rules(&self) -> &[AlertRule] {
        &self.rules
    }

    /// 按节点求值，返回新开始成立的告警。
    ///
    /// 空节点列表（拉取失败的周期）不改变活跃集合。
    pub fn evaluate_nodes(&mut self, nodes: &[HierarchyNode]) -> Vec<Alert> {
        if nodes.is_empty() {
            return Vec::new();
        }
        let mut firing = HashSet::new();
        let mut raised = Vec::new();
        for rule in &self.rules {
            for node in nodes.iter().filter(|node| rule.applies_to(node)) {
                let Some(value) = rule.metric.node_value(node) else {
                    continue;
                };
                if !rule.comparison.matches(value, rule.threshold) {
                    continue;
                }
                let key = (rule.code, node.id.clone());
                if !self.active_nodes.contains(&key) {
                    let label = subject_label(node);
                    raised.push(Alert {
                        rule: *rule,
                        subject_id: node.id.clone(),
                        message: message(rule, &label, value),
                        subject_label: label,
                        value,
                    });
                }
                firing.insert(key);
            }
        }
        self.active_nodes = firing;
        raised
    }

    /// 按质量指标求值，返回新开始成立的告警。
    pub fn evaluate_quality(&mut self, quality: &QualityMetrics) -> Vec<Alert> {
        let mut firing = HashSet::new();
        let mut raised = Vec::new();
        for rule in &self.rules {
            let Some(value) = rule.metric.quality_value(quality) else {
                continue;
            };
            if !rule.comparison.matches(value, rule.threshold) {
                continue;
            }
            if !self.active_quality.contains(rule.code) {
                raised.push(Alert {
                    rule: *rule,
                    subject_id: QUALITY_SUBJECT.to_string(),
                    subject_label: "Data quality".to_string(),
                    message: message(rule, "Data quality", value),
                    value,
                });
            }
            firing.insert(rule.code);
        }
        self.active_quality = firing;
        raised
    }
}

impl Default for AlertEvaluator {
    fn default() -> Self {
        Self::new(crate::rules::DEFAULT_RULES.to_vec())
    }
}

fn subject_label(node: &HierarchyNode) -> String {
    node.ward_name
        .as_ref()
        .zip(node.department_name.as_ref())
        .map(|(ward, department)| format!("{department} / {ward}"))
        .or_else(|| node.department_name.clone())
        .or_else(|| node.hospital_name.clone())
        .unwrap_or_else(|| node.organization_name.clone())
}

fn message(rule: &AlertRule, label: &str, value: i64) -> String {
    format!(
        "{label}: {} is {value} ({} {})",
        rule.metric.label(),
        rule.comparison.symbol(),
        rule.threshold
    )
}
