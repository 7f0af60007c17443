//! 床位内存实现
//!
//! 用于本地演示和测试；`with_demo_beds` 生成一组固定的演示数据。

use crate::error::StorageError;
use crate::models::BedQuery;
use crate::traits::BedStore;
use domain::{BedRecord, BedStatus, DepartmentRef, PatientPriority, PatientRef, VisitRef};
use std::sync::RwLock;

const DAY_MS: i64 = 86_400_000;

/// 床位内存存储
pub struct InMemoryBedStore {
    beds: RwLock<Vec<BedRecord>>,
}

impl InMemoryBedStore {
    pub fn new() -> Self {
        Self::with_beds(Vec::new())
    }

    pub fn with_beds(beds: Vec<BedRecord>) -> Self {
        Self {
            beds: RwLock::new(beds),
        }
    }

    /// 创建带演示数据的存储（两家医院、四个科室）
    pub fn with_demo_beds(now_ms: i64) -> Self {
        Self::with_beds(demo_beds(now_ms))
    }

    /// 整体替换床位数据
    pub fn replace_beds(&self, beds: Vec<BedRecord>) -> Result<(), StorageError> {
        let mut current = self
            .beds
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        *current = beds;
        Ok(())
    }

    /// 按 bed_id 插入或更新
    pub fn upsert_bed(&self, bed: BedRecord) -> Result<(), StorageError> {
        let mut beds = self
            .beds
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        match beds.iter_mut().find(|item| item.bed_id == bed.bed_id) {
            Some(existing) => *existing = bed,
            None => beds.push(bed),
        }
        Ok(())
    }

    /// 床位数量（用于测试）
    pub fn len(&self) -> usize {
        self.beds.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryBedStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl BedStore for InMemoryBedStore {
    async fn list_beds(&self, query: &BedQuery) -> Result<Vec<BedRecord>, StorageError> {
        let beds = self
            .beds
            .read()
            .map_err(|_| StorageError::new("lock failed").with_operation("list_beds"))?;
        Ok(beds.iter().take(query.limit).cloned().collect())
    }
}

struct DemoDepartment {
    department_id: &'static str,
    name: &'static str,
    hospital_id: &'static str,
    hospital_name: &'static str,
    rooms: &'static [&'static str],
}

const DEMO_DEPARTMENTS: &[DemoDepartment] = &[
    DemoDepartment {
        department_id: "cardiology",
        name: "Cardiology",
        hospital_id: "main",
        hospital_name: "Main Hospital",
        rooms: &["101", "102"],
    },
    DemoDepartment {
        department_id: "surgery",
        name: "General Surgery",
        hospital_id: "main",
        hospital_name: "Main Hospital",
        rooms: &["201", "202", "203"],
    },
    DemoDepartment {
        department_id: "icu",
        name: "Intensive Care",
        hospital_id: "main",
        hospital_name: "Main Hospital",
        rooms: &["ICU-1"],
    },
    DemoDepartment {
        department_id: "emergency",
        name: "Emergency",
        hospital_id: "north",
        hospital_name: "North Campus",
        rooms: &["ER-A", "ER-B"],
    },
];

const DEMO_NAMES: &[(&str, &str)] = &[
    ("Alice", "Morgan"),
    ("Ben", "Carter"),
    ("Chloe", "Diaz"),
    ("Daniel", "Evans"),
    ("Emma", "Fischer"),
    ("Farid", "Ghani"),
    ("Grace", "Hall"),
    ("Hugo", "Ibsen"),
    ("Iris", "Jones"),
    ("Jon", "Kim"),
];

const BEDS_PER_ROOM: usize = 4;

fn demo_beds(now_ms: i64) -> Vec<BedRecord> {
    let mut beds = Vec::new();
    let mut seq = 0usize;
    for department in DEMO_DEPARTMENTS {
        for room in department.rooms {
            for slot in 0..BEDS_PER_ROOM {
                seq += 1;
                let bed_number = ((b'A' + slot as u8) as char).to_string();
                // 约 2/3 占用，其余轮流为空闲/预留/维护
                let status = match seq % 6 {
                    0 => BedStatus::Available,
                    1 | 2 | 3 | 4 => BedStatus::Occupied,
                    _ if seq % 12 == 5 => BedStatus::Reserved,
                    _ => BedStatus::Maintenance,
                };
                let (patient, visit) = if status == BedStatus::Occupied {
                    let (first_name, last_name) = DEMO_NAMES[seq % DEMO_NAMES.len()];
                    let stay_days = (seq % 9) as i64;
                    let patient = PatientRef {
                        patient_id: format!("patient-{seq:03}"),
                        first_name: first_name.to_string(),
                        last_name: last_name.to_string(),
                        medical_record_number: format!("MRN{:06}", 100_000 + seq),
                    };
                    let visit = VisitRef {
                        visit_id: format!("visit-{seq:03}"),
                        admitted_at_ms: now_ms - stay_days * DAY_MS,
                        expected_discharge_at_ms: (seq % 5 == 0).then_some(now_ms + DAY_MS / 2),
                        transfer_requested: seq % 11 == 0,
                        priority: match seq % 7 {
                            0 => PatientPriority::Critical,
                            3 => PatientPriority::Urgent,
                            _ => PatientPriority::Routine,
                        },
                    };
                    (Some(patient), Some(visit))
                } else {
                    (None, None)
                };
                beds.push(BedRecord {
                    bed_id: format!("bed-{seq:03}"),
                    status: Some(status),
                    department: Some(DepartmentRef {
                        department_id: department.department_id.to_string(),
                        name: department.name.to_string(),
                        hospital_id: Some(department.hospital_id.to_string()),
                        hospital_name: Some(department.hospital_name.to_string()),
                    }),
                    room_number: Some(room.to_string()),
                    bed_number: Some(bed_number),
                    patient,
                    visit,
                    updated_at_ms: now_ms,
                });
            }
        }
    }
    beds
}
