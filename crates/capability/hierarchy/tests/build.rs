use bedwatch_hierarchy::{HierarchyOptions, build_hierarchy};
use domain::{
    BedRecord, BedStatus, DepartmentRef, NodeLevel, PatientPriority, PatientRef, VisitRef,
};

const DAY_MS: i64 = 86_400_000;
const NOW_MS: i64 = 100 * DAY_MS;

fn options() -> HierarchyOptions {
    HierarchyOptions::new("org", "Hospital Network", NOW_MS)
}

fn department(department_id: &str, hospital_id: Option<&str>) -> DepartmentRef {
    DepartmentRef {
        department_id: department_id.to_string(),
        name: format!("Dept {department_id}"),
        hospital_id: hospital_id.map(str::to_string),
        hospital_name: hospital_id.map(|id| format!("Hospital {id}")),
    }
}

fn bed(bed_id: &str, status: BedStatus, department_id: &str, room: Option<&str>) -> BedRecord {
    BedRecord {
        bed_id: bed_id.to_string(),
        status: Some(status),
        department: Some(department(department_id, Some("h1"))),
        room_number: room.map(str::to_string),
        bed_number: Some(bed_id.to_string()),
        patient: None,
        visit: None,
        updated_at_ms: NOW_MS,
    }
}

fn occupied(bed_id: &str, department_id: &str, room: Option<&str>, stay_days: i64) -> BedRecord {
    let mut record = bed(bed_id, BedStatus::Occupied, department_id, room);
    record.patient = Some(PatientRef {
        patient_id: format!("p-{bed_id}"),
        first_name: "John".to_string(),
        last_name: "Smith".to_string(),
        medical_record_number: format!("MRN-{bed_id}"),
    });
    record.visit = Some(VisitRef {
        visit_id: format!("v-{bed_id}"),
        admitted_at_ms: NOW_MS - stay_days * DAY_MS,
        expected_discharge_at_ms: None,
        transfer_requested: false,
        priority: PatientPriority::Routine,
    });
    record
}

#[test]
fn single_room_scenario() {
    let records = vec![
        occupied("b1", "D1", Some("101"), 2),
        occupied("b2", "D1", Some("101"), 3),
        bed("b3", BedStatus::Available, "D1", Some("101")),
    ];
    let hierarchy = build_hierarchy(&records, &options());

    let wards: Vec<_> = hierarchy.nodes_at(NodeLevel::Ward).collect();
    assert_eq!(wards.len(), 1);
    let ward = wards[0];
    assert_eq!(ward.id, "ward:D1:101");
    assert_eq!(ward.ward_name.as_deref(), Some("101"));
    assert_eq!(ward.counters.total, 3);
    assert_eq!(ward.counters.occupied, 2);
    assert_eq!(ward.counters.available, 1);
    assert_eq!(ward.occupancy_rate, 67);
    assert_eq!(ward.patients.len(), 2);
    assert_eq!(ward.beds.len(), 3);
    assert_eq!(ward.patients[0].initials, "J.S.");
    assert_eq!(ward.patients[0].length_of_stay_days, 2);
    assert_eq!(ward.patients[0].bed_location, "Dept D1 101-b1");
}

#[test]
fn empty_input_yields_zeroed_root() {
    let hierarchy = build_hierarchy(&[], &options());
    assert_eq!(hierarchy.nodes.len(), 1);
    let root = &hierarchy.nodes[0];
    assert_eq!(root.level, NodeLevel::Organization);
    assert!(root.parent_id.is_none());
    assert!(!root.has_children);
    assert_eq!(root.counters, Default::default());
    assert_eq!(root.occupancy_rate, 0);
    assert_eq!(root.last_updated_ms, NOW_MS);
    assert_eq!(hierarchy.total_records, 0);
}

fn mixed_records() -> Vec<BedRecord> {
    let mut records = vec![
        occupied("b1", "D1", Some("101"), 1),
        bed("b2", BedStatus::Reserved, "D1", Some("102")),
        occupied("b3", "D2", None, 8),
        bed("b4", BedStatus::Maintenance, "D2", Some("201")),
        bed("b5", BedStatus::Available, "D2", Some("201")),
    ];
    let mut other = occupied("b6", "D3", Some("301"), 0);
    other.department = Some(department("D3", Some("h2")));
    records.push(other);
    let mut orphan = occupied("b7", "D1", Some("101"), 1);
    orphan.department = Some(department("D4", None));
    records.push(orphan);
    records
}

#[test]
fn counters_roll_up_at_every_level() {
    let hierarchy = build_hierarchy(&mixed_records(), &options());
    for node in &hierarchy.nodes {
        let children: Vec<_> = hierarchy.children_of(&node.id).collect();
        assert_eq!(node.has_children, !children.is_empty(), "node {}", node.id);
        if children.is_empty() {
            continue;
        }
        let mut sum = domain::BedCounters::default();
        for child in &children {
            sum.add(&child.counters);
        }
        assert_eq!(node.counters, sum, "node {}", node.id);
    }

    let root = hierarchy.root().expect("root");
    let ward_occupied: u32 = hierarchy
        .nodes_at(NodeLevel::Ward)
        .map(|ward| ward.counters.occupied)
        .sum();
    assert_eq!(root.counters.occupied, ward_occupied);
    assert_eq!(root.counters.total, 7);
}

#[test]
fn parents_precede_children() {
    let hierarchy = build_hierarchy(&mixed_records(), &options());
    let roots: Vec<_> = hierarchy.nodes.iter().filter(|node| node.is_root()).collect();
    assert_eq!(roots.len(), 1);
    for (index, node) in hierarchy.nodes.iter().enumerate() {
        if let Some(parent_id) = node.parent_id.as_deref() {
            let parent_index = hierarchy
                .nodes
                .iter()
                .position(|candidate| candidate.id == parent_id)
                .expect("parent present");
            assert!(parent_index < index, "{} before {}", parent_id, node.id);
        }
    }
}

#[test]
fn departments_without_hospital_use_default() {
    let hierarchy = build_hierarchy(&mixed_records(), &options());
    let hospital = hierarchy.node("hospital:main").expect("default hospital");
    assert_eq!(hospital.hospital_name.as_deref(), Some("Main Hospital"));
    assert_eq!(hospital.counters.total, 1);
    assert!(hierarchy.node("department:D4").is_some());
}

#[test]
fn missing_room_goes_to_unassigned_ward() {
    let hierarchy = build_hierarchy(&mixed_records(), &options());
    let ward = hierarchy.node("ward:D2:unassigned").expect("synthetic ward");
    assert_eq!(ward.ward_name.as_deref(), Some("Unassigned"));
    assert_eq!(ward.counters.occupied, 1);
}

#[test]
fn malformed_records_are_excluded() {
    let mut records = vec![
        bed("b1", BedStatus::Available, "D1", Some("101")),
        bed("b2", BedStatus::Occupied, "D1", Some("101")),
    ];
    let mut no_department = bed("b3", BedStatus::Occupied, "D1", Some("101"));
    no_department.department = None;
    records.push(no_department);
    let mut unknown_status = bed("b4", BedStatus::Available, "D1", Some("101"));
    unknown_status.status = None;
    records.push(unknown_status);

    let hierarchy = build_hierarchy(&records, &options());
    assert_eq!(hierarchy.total_records, 4);
    assert_eq!(hierarchy.included_records, 2);
    assert_eq!(hierarchy.excluded_records, 2);
    // b2 is occupied without a linked patient
    assert_eq!(hierarchy.consistent_records, 1);

    let root = hierarchy.root().expect("root");
    assert_eq!(root.counters.total, 2);
    let ward = hierarchy.node("ward:D1:101").expect("ward");
    assert_eq!(ward.counters.occupied, 1);
    assert!(ward.patients.is_empty());
}

#[test]
fn rates_stay_within_bounds() {
    let hierarchy = build_hierarchy(&mixed_records(), &options());
    for node in &hierarchy.nodes {
        assert!(node.occupancy_rate <= 100);
        assert!(node.projected_rate <= 100);
        if node.counters.total == 0 {
            assert_eq!(node.occupancy_rate, 0);
        }
    }
}

#[test]
fn discharge_and_transfer_counters() {
    let mut confirmed = occupied("b1", "D1", Some("101"), 1);
    if let Some(visit) = confirmed.visit.as_mut() {
        visit.expected_discharge_at_ms = Some(NOW_MS + DAY_MS / 2);
    }
    let long_stay = occupied("b2", "D1", Some("101"), 6);
    let mut transfer = occupied("b3", "D1", Some("101"), 1);
    if let Some(visit) = transfer.visit.as_mut() {
        visit.transfer_requested = true;
    }
    let free = bed("b4", BedStatus::Available, "D1", Some("101"));
    let reserved = bed("b5", BedStatus::Reserved, "D1", Some("101"));
    let dirty = bed("b6", BedStatus::Maintenance, "D1", Some("101"));

    let hierarchy = build_hierarchy(
        &[confirmed, long_stay, transfer, free, reserved, dirty],
        &options(),
    );
    let ward = hierarchy.node("ward:D1:101").expect("ward");
    assert_eq!(ward.counters.confirmed_discharge, 1);
    assert_eq!(ward.counters.potential_discharge, 1);
    assert_eq!(ward.counters.transfer_orders, 1);
    assert_eq!(ward.counters.planned, 5);
    assert_eq!(ward.counters.assigned, 1);
    assert_eq!(ward.counters.dirty, 1);
    // available 1 + confirmed 1 - transfers 1
    assert_eq!(ward.counters.net_available, 1);
    // (occupied 3 + reserved 1 - confirmed 1) / 6
    assert_eq!(ward.projected_rate, 50);
    assert_eq!(ward.occupancy_rate, 50);
}

#[test]
fn last_updated_tracks_newest_bed() {
    let mut older = bed("b1", BedStatus::Available, "D1", Some("101"));
    older.updated_at_ms = NOW_MS - 10_000;
    let mut newer = bed("b2", BedStatus::Available, "D2", Some("201"));
    newer.updated_at_ms = NOW_MS - 5_000;
    let hierarchy = build_hierarchy(&[older, newer], &options());
    assert_eq!(
        hierarchy.node("ward:D1:101").expect("ward").last_updated_ms,
        NOW_MS - 10_000
    );
    assert_eq!(hierarchy.root().expect("root").last_updated_ms, NOW_MS - 5_000);
}

#[test]
fn department_with_conflicting_hospital_joins_is_emitted_once() {
    let mut unjoined = bed("b2", BedStatus::Available, "D1", Some("101"));
    unjoined.department = Some(department("D1", None));
    let records = vec![bed("b1", BedStatus::Available, "D1", Some("101")), unjoined];
    let hierarchy = build_hierarchy(&records, &options());

    let ids: Vec<&str> = hierarchy.nodes.iter().map(|node| node.id.as_str()).collect();
    assert_eq!(ids, ["org", "hospital:h1", "department:D1", "ward:D1:101"]);
    let ward = hierarchy.node("ward:D1:101").expect("ward");
    assert_eq!(ward.counters.total, 2);
    assert_eq!(hierarchy.root().expect("root").counters.total, 2);
    assert_eq!(hierarchy.excluded_records, 0);
}
