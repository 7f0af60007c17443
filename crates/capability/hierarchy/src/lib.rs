//! 扁平床位记录 → 组织层级树。
//!
//! 层级：组织 → 医院 → 科室 → 病区。病区按房间号分组，缺少房间号的
//! 床位归入合成病区 `unassigned`。每一层的计数都等于其直接子节点之和，
//! 输出按深度优先先序排列，父节点总在子节点之前。节点 id 唯一：同一科室的
//! 记录联到不同医院时，以首次出现的医院为准。
//!
//! 构建过程不会失败：缺少科室联表或状态无法识别的记录被排除，只体现在
//! `Hierarchy::excluded_records` 中；空输入返回一个计数全为 0 的根节点。

mod rates;

pub use rates::{length_of_stay_days, occupancy_rate, patient_initials};

use domain::{
    BedCounters, BedRecord, BedStatus, BedSummary, DepartmentRef, HierarchyNode, NodeLevel,
    PatientSummary,
};
use std::collections::BTreeMap;

const DAY_MS: i64 = 86_400_000;
const DEFAULT_HOSPITAL_ID: &str = "main";
const DEFAULT_HOSPITAL_NAME: &str = "Main Hospital";
const UNASSIGNED_WARD_KEY: &str = "unassigned";
const UNASSIGNED_WARD_NAME: &str = "Unassigned";

/// 构建参数。
#[derive(Debug, Clone)]
pub struct HierarchyOptions {
    pub organization_id: String,
    pub organization_name: String,
    /// 计算住院天数、出院预估时使用的当前时间。
    pub now_ms: i64,
    /// 住院天数达到该值的在院患者计入 potential_discharge。
    pub potential_discharge_days: u32,
}

impl HierarchyOptions {
    pub fn new(
        organization_id: impl Into<String>,
        organization_name: impl Into<String>,
        now_ms: i64,
    ) -> Self {
        Self {
            organization_id: organization_id.into(),
            organization_name: organization_name.into(),
            now_ms,
            potential_discharge_days: 5,
        }
    }
}

/// 一次构建的结果。
#[derive(Debug, Clone, PartialEq)]
pub struct Hierarchy {
    /// 根节点在前，父节点总在子节点之前。
    pub nodes: Vec<HierarchyNode>,
    pub total_records: usize,
    pub included_records: usize,
    pub excluded_records: usize,
    /// 状态与患者/就诊关联一致的记录数（占用 ⇔ 已关联）。
    pub consistent_records: usize,
}

impl Hierarchy {
    pub fn root(&self) -> Option<&HierarchyNode> {
        self.nodes.first()
    }

    pub fn node(&self, id: &str) -> Option<&HierarchyNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn nodes_at(&self, level: NodeLevel) -> impl Iterator<Item = &HierarchyNode> {
        self.nodes.iter().filter(move |node| node.level == level)
    }

    pub fn children_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a HierarchyNode> {
        self.nodes
            .iter()
            .filter(move |node| node.parent_id.as_deref() == Some(id))
    }
}

/// 通过校验、可参与汇总的床位。
struct ValidBed<'a> {
    record: &'a BedRecord,
    status: BedStatus,
    department: &'a DepartmentRef,
}

type WardGroup<'a> = BTreeMap<String, Vec<ValidBed<'a>>>;

struct DepartmentGroup<'a> {
    name: String,
    wards: WardGroup<'a>,
}

struct HospitalGroup<'a> {
    name: String,
    departments: BTreeMap<String, DepartmentGroup<'a>>,
}

/// 子树：节点本身 + 先序排列的后代。
struct Subtree {
    node: HierarchyNode,
    descendants: Vec<HierarchyNode>,
}

/// 构建层级树。
pub fn build_hierarchy(records: &[BedRecord], options: &HierarchyOptions) -> Hierarchy {
    let mut hospitals: BTreeMap<String, HospitalGroup<'_>> = BTreeMap::new();
    // 科室 → 首次出现时联表的医院
    let mut department_hospitals: BTreeMap<String, String> = BTreeMap::new();
    let mut included_records = 0;
    let mut consistent_records = 0;

    for record in records {
        let (Some(status), Some(department)) = (record.status, record.department.as_ref()) else {
            continue;
        };
        included_records += 1;
        if (status == BedStatus::Occupied) == record.has_linked_stay() {
            consistent_records += 1;
        }

        let hospital_id = department_hospitals
            .entry(department.department_id.clone())
            .or_insert_with(|| {
                department
                    .hospital_id
                    .clone()
                    .unwrap_or_else(|| DEFAULT_HOSPITAL_ID.to_string())
            })
            .clone();
        let hospital = hospitals
            .entry(hospital_id.clone())
            .or_insert_with(|| HospitalGroup {
                name: department.hospital_name.clone().unwrap_or_else(|| {
                    if department.hospital_id.is_some() {
                        hospital_id.clone()
                    } else {
                        DEFAULT_HOSPITAL_NAME.to_string()
                    }
                }),
                departments: BTreeMap::new(),
            });
        let department_group = hospital
            .departments
            .entry(department.department_id.clone())
            .or_insert_with(|| DepartmentGroup {
                name: department.name.clone(),
                wards: BTreeMap::new(),
            });
        department_group
            .wards
            .entry(ward_key(record))
            .or_default()
            .push(ValidBed {
                record,
                status,
                department,
            });
    }

    let mut root_counters = BedCounters::default();
    let mut root_updated: Option<i64> = None;
    let mut descendants = Vec::new();
    for (hospital_id, hospital) in &hospitals {
        let subtree = hospital_subtree(hospital_id, hospital, options);
        root_counters.add(&subtree.node.counters);
        root_updated = Some(
            root_updated.map_or(subtree.node.last_updated_ms, |ts| {
                ts.max(subtree.node.last_updated_ms)
            }),
        );
        descendants.push(subtree.node);
        descendants.extend(subtree.descendants);
    }

    let root = finish_node(
        NodeDraft {
            id: options.organization_id.clone(),
            level: NodeLevel::Organization,
            parent_id: None,
            organization_name: options.organization_name.clone(),
            hospital_name: None,
            department_name: None,
            ward_name: None,
            has_children: !hospitals.is_empty(),
            counters: root_counters,
            last_updated_ms: root_updated.unwrap_or(options.now_ms),
        },
        Vec::new(),
        Vec::new(),
    );

    let mut nodes = Vec::with_capacity(descendants.len() + 1);
    nodes.push(root);
    nodes.extend(descendants);

    Hierarchy {
        nodes,
        total_records: records.len(),
        included_records,
        excluded_records: records.len() - included_records,
        consistent_records,
    }
}

fn ward_key(record: &BedRecord) -> String {
    match record.room_number.as_deref().map(str::trim) {
        Some(room) if !room.is_empty() => room.to_string(),
        _ => UNASSIGNED_WARD_KEY.to_string(),
    }
}

fn hospital_subtree(
    hospital_id: &str,
    hospital: &HospitalGroup<'_>,
    options: &HierarchyOptions,
) -> Subtree {
    let id = format!("hospital:{hospital_id}");
    let mut counters = BedCounters::default();
    let mut last_updated_ms = i64::MIN;
    let mut descendants = Vec::new();
    for (department_id, department) in &hospital.departments {
        let subtree = department_subtree(department_id, department, &id, hospital, options);
        counters.add(&subtree.node.counters);
        last_updated_ms = last_updated_ms.max(subtree.node.last_updated_ms);
        descendants.push(subtree.node);
        descendants.extend(subtree.descendants);
    }
    let node = finish_node(
        NodeDraft {
            id,
            level: NodeLevel::Hospital,
            parent_id: Some(options.organization_id.clone()),
            organization_name: options.organization_name.clone(),
            hospital_name: Some(hospital.name.clone()),
            department_name: None,
            ward_name: None,
            has_children: !hospital.departments.is_empty(),
            counters,
            last_updated_ms,
        },
        Vec::new(),
        Vec::new(),
    );
    Subtree { node, descendants }
}

fn department_subtree(
    department_id: &str,
    department: &DepartmentGroup<'_>,
    parent_id: &str,
    hospital: &HospitalGroup<'_>,
    options: &HierarchyOptions,
) -> Subtree {
    let id = format!("department:{department_id}");
    let mut counters = BedCounters::default();
    let mut last_updated_ms = i64::MIN;
    let mut descendants = Vec::with_capacity(department.wards.len());
    for (ward_key, beds) in &department.wards {
        let ward = ward_node(
            &format!("ward:{department_id}:{ward_key}"),
            ward_key,
            beds,
            &id,
            hospital,
            department,
            options,
        );
        counters.add(&ward.counters);
        last_updated_ms = last_updated_ms.max(ward.last_updated_ms);
        descendants.push(ward);
    }
    let node = finish_node(
        NodeDraft {
            id,
            level: NodeLevel::Department,
            parent_id: Some(parent_id.to_string()),
            organization_name: options.organization_name.clone(),
            hospital_name: Some(hospital.name.clone()),
            department_name: Some(department.name.clone()),
            ward_name: None,
            has_children: !department.wards.is_empty(),
            counters,
            last_updated_ms,
        },
        Vec::new(),
        Vec::new(),
    );
    Subtree { node, descendants }
}

fn ward_node(
    id: &str,
    ward_key: &str,
    beds: &[ValidBed<'_>],
    parent_id: &str,
    hospital: &HospitalGroup<'_>,
    department: &DepartmentGroup<'_>,
    options: &HierarchyOptions,
) -> HierarchyNode {
    let mut counters = BedCounters::default();
    let mut last_updated_ms = i64::MIN;
    let mut bed_summaries = Vec::with_capacity(beds.len());
    let mut patients = Vec::new();

    for bed in beds {
        let record = bed.record;
        counters.total += 1;
        match bed.status {
            BedStatus::Available => counters.available += 1,
            BedStatus::Occupied => counters.occupied += 1,
            BedStatus::Reserved => counters.assigned += 1,
            BedStatus::Maintenance => counters.dirty += 1,
        }
        last_updated_ms = last_updated_ms.max(record.updated_at_ms);

        if bed.status == BedStatus::Occupied {
            if let Some(visit) = record.visit.as_ref() {
                let stay_days = length_of_stay_days(visit.admitted_at_ms, options.now_ms);
                let confirmed = visit
                    .expected_discharge_at_ms
                    .is_some_and(|at| at <= options.now_ms + DAY_MS);
                if confirmed {
                    counters.confirmed_discharge += 1;
                } else if stay_days >= options.potential_discharge_days {
                    counters.potential_discharge += 1;
                }
                if visit.transfer_requested {
                    counters.transfer_orders += 1;
                }
                if let Some(patient) = record.patient.as_ref() {
                    patients.push(PatientSummary {
                        initials: patient_initials(&patient.first_name, &patient.last_name),
                        medical_record_number: patient.medical_record_number.clone(),
                        length_of_stay_days: stay_days,
                        bed_location: bed_location(bed.department, record),
                        admitted_at_ms: visit.admitted_at_ms,
                        priority: visit.priority,
                    });
                }
            }
        }

        bed_summaries.push(BedSummary {
            bed_id: record.bed_id.clone(),
            room_number: record.room_number.clone(),
            bed_number: record.bed_number.clone(),
            status: bed.status,
            updated_at_ms: record.updated_at_ms,
        });
    }
    counters.planned = counters.total - counters.dirty;
    counters.net_available =
        (counters.available + counters.confirmed_discharge).saturating_sub(counters.transfer_orders);

    let ward_name = if ward_key == UNASSIGNED_WARD_KEY {
        UNASSIGNED_WARD_NAME.to_string()
    } else {
        ward_key.to_string()
    };
    finish_node(
        NodeDraft {
            id: id.to_string(),
            level: NodeLevel::Ward,
            parent_id: Some(parent_id.to_string()),
            organization_name: options.organization_name.clone(),
            hospital_name: Some(hospital.name.clone()),
            department_name: Some(department.name.clone()),
            ward_name: Some(ward_name),
            has_children: false,
            counters,
            last_updated_ms,
        },
        bed_summaries,
        patients,
    )
}

fn bed_location(department: &DepartmentRef, record: &BedRecord) -> String {
    let spot = match (record.room_number.as_deref(), record.bed_number.as_deref()) {
        (Some(room), Some(bed)) => format!("{room}-{bed}"),
        (Some(room), None) => room.to_string(),
        (None, Some(bed)) => bed.to_string(),
        (None, None) => UNASSIGNED_WARD_KEY.to_string(),
    };
    format!("{} {}", department.name, spot)
}

struct NodeDraft {
    id: String,
    level: NodeLevel,
    parent_id: Option<String>,
    organization_name: String,
    hospital_name: Option<String>,
    department_name: Option<String>,
    ward_name: Option<String>,
    has_children: bool,
    counters: BedCounters,
    last_updated_ms: i64,
}

fn finish_node(
    draft: NodeDraft,
    beds: Vec<BedSummary>,
    patients: Vec<PatientSummary>,
) -> HierarchyNode {
    let counters = draft.counters;
    let projected = (counters.occupied + counters.assigned).saturating_sub(counters.confirmed_discharge);
    HierarchyNode {
        id: draft.id,
        level: draft.level,
        parent_id: draft.parent_id,
        organization_name: draft.organization_name,
        hospital_name: draft.hospital_name,
        department_name: draft.department_name,
        ward_name: draft.ward_name,
        has_children: draft.has_children,
        counters,
        occupancy_rate: occupancy_rate(counters.occupied, counters.total),
        projected_rate: occupancy_rate(projected, counters.total),
        last_updated_ms: draft.last_updated_ms,
        beds,
        patients,
    }
}
