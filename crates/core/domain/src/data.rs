use crate::UnknownVariant;
use std::str::FromStr;

/// 床位状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BedStatus {
    Available,
    Occupied,
    Reserved,
    Maintenance,
}

impl BedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BedStatus::Available => "AVAILABLE",
            BedStatus::Occupied => "OCCUPIED",
            BedStatus::Reserved => "RESERVED",
            BedStatus::Maintenance => "MAINTENANCE",
        }
    }
}

impl FromStr for BedStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(BedStatus::Available),
            "OCCUPIED" => Ok(BedStatus::Occupied),
            "RESERVED" => Ok(BedStatus::Reserved),
            "MAINTENANCE" => Ok(BedStatus::Maintenance),
            _ => Err(UnknownVariant {
                kind: "bed status",
                value: value.to_string(),
            }),
        }
    }
}

/// 患者优先级。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PatientPriority {
    #[default]
    Routine,
    Urgent,
    Critical,
}

impl PatientPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatientPriority::Routine => "routine",
            PatientPriority::Urgent => "urgent",
            PatientPriority::Critical => "critical",
        }
    }
}

impl FromStr for PatientPriority {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "routine" | "normal" | "low" => Ok(PatientPriority::Routine),
            "urgent" | "high" => Ok(PatientPriority::Urgent),
            "critical" => Ok(PatientPriority::Critical),
            _ => Err(UnknownVariant {
                kind: "patient priority",
                value: value.to_string(),
            }),
        }
    }
}

/// 演示数据的扰动强度。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VariationIntensity {
    Low,
    #[default]
    Medium,
    High,
}

impl VariationIntensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariationIntensity::Low => "low",
            VariationIntensity::Medium => "medium",
            VariationIntensity::High => "high",
        }
    }
}

impl FromStr for VariationIntensity {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(VariationIntensity::Low),
            "medium" => Ok(VariationIntensity::Medium),
            "high" => Ok(VariationIntensity::High),
            _ => Err(UnknownVariant {
                kind: "variation intensity",
                value: value.to_string(),
            }),
        }
    }
}

/// 联表得到的科室信息。
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentRef {
    pub department_id: String,
    pub name: String,
    pub hospital_id: Option<String>,
    pub hospital_name: Option<String>,
}

/// 联表得到的患者信息。
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRef {
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    pub medical_record_number: String,
}

/// 联表得到的就诊信息。
#[derive(Debug, Clone, PartialEq)]
pub struct VisitRef {
    pub visit_id: String,
    pub admitted_at_ms: i64,
    pub expected_discharge_at_ms: Option<i64>,
    pub transfer_requested: bool,
    pub priority: PatientPriority,
}

/// 存储层返回的扁平床位记录。
///
/// `status` 为 `None` 表示存储中的取值无法识别，`department` 为 `None`
/// 表示科室联表缺失；两者都视为畸形记录，不参与层级汇总。
#[derive(Debug, Clone, PartialEq)]
pub struct BedRecord {
    pub bed_id: String,
    pub status: Option<BedStatus>,
    pub department: Option<DepartmentRef>,
    pub room_number: Option<String>,
    pub bed_number: Option<String>,
    pub patient: Option<PatientRef>,
    pub visit: Option<VisitRef>,
    pub updated_at_ms: i64,
}

impl BedRecord {
    /// 患者与就诊均已关联。
    pub fn has_linked_stay(&self) -> bool {
        self.patient.is_some() && self.visit.is_some()
    }
}
