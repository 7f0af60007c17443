use crate::data::{BedStatus, PatientPriority};

/// 层级节点所在的层。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeLevel {
    Organization,
    Hospital,
    Department,
    Ward,
    Room,
}

impl NodeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeLevel::Organization => "organization",
            NodeLevel::Hospital => "hospital",
            NodeLevel::Department => "department",
            NodeLevel::Ward => "ward",
            NodeLevel::Room => "room",
        }
    }
}

/// 床位计数器，父节点的每一项都等于子节点之和。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BedCounters {
    pub total: u32,
    pub planned: u32,
    pub occupied: u32,
    pub assigned: u32,
    pub dirty: u32,
    pub available: u32,
    pub net_available: u32,
    pub confirmed_discharge: u32,
    pub potential_discharge: u32,
    pub transfer_orders: u32,
}

impl BedCounters {
    /// 累加另一组计数（用于逐层汇总）。
    pub fn add(&mut self, other: &BedCounters) {
        self.total += other.total;
        self.planned += other.planned;
        self.occupied += other.occupied;
        self.assigned += other.assigned;
        self.dirty += other.dirty;
        self.available += other.available;
        self.net_available += other.net_available;
        self.confirmed_discharge += other.confirmed_discharge;
        self.potential_discharge += other.potential_discharge;
        self.transfer_orders += other.transfer_orders;
    }
}

/// 病区内的床位摘要。
#[derive(Debug, Clone, PartialEq)]
pub struct BedSummary {
    pub bed_id: String,
    pub room_number: Option<String>,
    pub bed_number: Option<String>,
    pub status: BedStatus,
    pub updated_at_ms: i64,
}

/// 病区内的患者摘要（只保留姓名首字母）。
#[derive(Debug, Clone, PartialEq)]
pub struct PatientSummary {
    pub initials: String,
    pub medical_record_number: String,
    pub length_of_stay_days: u32,
    pub bed_location: String,
    pub admitted_at_ms: i64,
    pub priority: PatientPriority,
}

/// 层级树中的一个节点。
///
/// 每个轮询周期整体重建，不做原地修改。
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyNode {
    pub id: String,
    pub level: NodeLevel,
    pub parent_id: Option<String>,
    pub organization_name: String,
    pub hospital_name: Option<String>,
    pub department_name: Option<String>,
    pub ward_name: Option<String>,
    pub has_children: bool,
    pub counters: BedCounters,
    /// 0..=100 的整数百分比。
    pub occupancy_rate: u8,
    pub projected_rate: u8,
    pub last_updated_ms: i64,
    pub beds: Vec<BedSummary>,
    pub patients: Vec<PatientSummary>,
}

impl HierarchyNode {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
