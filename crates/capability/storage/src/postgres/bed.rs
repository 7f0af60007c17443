//! Postgres 床位存储实现

use crate::error::StorageError;
use crate::models::BedQuery;
use crate::traits::BedStore;
use domain::{BedRecord, BedStatus, DepartmentRef, PatientPriority, PatientRef, VisitRef};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::warn;

pub struct PgBedStore {
    pub pool: PgPool,
}

impl PgBedStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl BedStore for PgBedStore {
    async fn list_beds(&self, query: &BedQuery) -> Result<Vec<BedRecord>, StorageError> {
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
        let rows = sqlx::query(
            "select b.bed_id, b.status, b.room_number, b.bed_number, \
             (extract(epoch from b.updated_at) * 1000)::bigint as updated_at_ms, \
             d.department_id, d.name as department_name, \
             h.hospital_id, h.name as hospital_name, \
             p.patient_id, p.first_name, p.last_name, p.medical_record_number, \
             v.visit_id, v.transfer_requested, v.priority, \
             (extract(epoch from v.admitted_at) * 1000)::bigint as admitted_at_ms, \
             (extract(epoch from v.expected_discharge_at) * 1000)::bigint as expected_discharge_at_ms \
             from beds b \
             left join departments d on d.department_id = b.department_id \
             left join hospitals h on h.hospital_id = d.hospital_id \
             left join visits v on v.visit_id = b.current_visit_id \
             left join patients p on p.patient_id = v.patient_id \
             order by b.bed_id \
             limit $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| StorageError::from(err).with_operation("list_beds"))?;
        let mut beds = Vec::with_capacity(rows.len());
        for row in rows {
            beds.push(bed_from_row(&row).map_err(|err| err.with_operation("list_beds"))?);
        }
        Ok(beds)
    }
}

fn bed_from_row(row: &PgRow) -> Result<BedRecord, StorageError> {
    let bed_id: String = row.try_get("bed_id")?;
    let raw_status: String = row.try_get("status")?;
    let status = match raw_status.parse::<BedStatus>() {
        Ok(status) => Some(status),
        Err(err) => {
            warn!(target: "bedwatch.storage", bed_id = %bed_id, error = %err, "bed_status_unrecognized");
            None
        }
    };

    let department_id: Option<String> = row.try_get("department_id")?;
    let department = match department_id {
        Some(department_id) => Some(DepartmentRef {
            department_id,
            name: row.try_get("department_name")?,
            hospital_id: row.try_get("hospital_id")?,
            hospital_name: row.try_get("hospital_name")?,
        }),
        None => None,
    };

    let patient_id: Option<String> = row.try_get("patient_id")?;
    let patient = match patient_id {
        Some(patient_id) => Some(PatientRef {
            patient_id,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            medical_record_number: row.try_get("medical_record_number")?,
        }),
        None => None,
    };

    let visit_id: Option<String> = row.try_get("visit_id")?;
    let admitted_at_ms: Option<i64> = row.try_get("admitted_at_ms")?;
    let visit = match (visit_id, admitted_at_ms) {
        (Some(visit_id), Some(admitted_at_ms)) => {
            let priority: Option<String> = row.try_get("priority")?;
            Some(VisitRef {
                visit_id,
                admitted_at_ms,
                expected_discharge_at_ms: row.try_get("expected_discharge_at_ms")?,
                transfer_requested: row
                    .try_get::<Option<bool>, _>("transfer_requested")?
                    .unwrap_or(false),
                priority: priority
                    .and_then(|value| value.parse::<PatientPriority>().ok())
                    .unwrap_or_default(),
            })
        }
        _ => None,
    };

    Ok(BedRecord {
        bed_id,
        status,
        department,
        room_number: row.try_get("room_number")?,
        bed_number: row.try_get("bed_number")?,
        patient,
        visit,
        updated_at_ms: row.try_get("updated_at_ms")?,
    })
}
