// ==========================================
// 库存层级仓储集成测试
// ==========================================
// 测试目标: InventoryRepository 写入与追溯查询
// ==========================================

mod test_helpers;

use paper_roll_hierarchy::config::AllocationConfig;
use paper_roll_hierarchy::domain::types::RollType;
use paper_roll_hierarchy::engine::{HierarchyBuilder, JumboAllocator};
use paper_roll_hierarchy::repository::{InventoryRepository, RepositoryError};
use paper_roll_hierarchy::{CutRollRecord, HierarchyPlan};

use rusqlite::params;
use test_helpers::{create_test_db, golden_roll, natural_roll, open_shared_connection};

fn plan_for(records: Vec<CutRollRecord>) -> (HierarchyPlan, Vec<CutRollRecord>) {
    let config = AllocationConfig::default();
    let report = JumboAllocator::new(config)
        .unwrap()
        .allocate_with_report(records);
    let plan = HierarchyBuilder::new(&config).build(report.allocations.iter());
    (plan, report.skipped)
}

#[test]
fn test_insert_hierarchy_with_four_roll_numbers() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let repo = InventoryRepository::new(&db_path).unwrap();

    let records: Vec<CutRollRecord> = (1..=4).map(|n| golden_roll(Some(n), 24.0)).collect();
    let (plan, skipped) = plan_for(records);
    let persisted = repo.insert_hierarchy(&plan, &skipped, None).unwrap();

    assert_eq!(persisted.jumbo_ids.len(), 2);

    let first = repo.find_children_of_jumbo(&persisted.jumbo_ids[0]).unwrap();
    let second = repo.find_children_of_jumbo(&persisted.jumbo_ids[1]).unwrap();
    let numbers = |items: &[paper_roll_hierarchy::InventoryItem]| {
        items
            .iter()
            .map(|i| i.individual_roll_number)
            .collect::<Vec<_>>()
    };
    assert_eq!(numbers(&first), vec![Some(1), Some(2), Some(3)]);
    assert_eq!(numbers(&second), vec![Some(4)]);
    assert_eq!(second[0].roll_sequence, Some(1));
}

#[test]
fn test_frontend_ids_and_paper_id_inherited() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let repo = InventoryRepository::new(&db_path).unwrap();

    let (plan, skipped) = plan_for(vec![natural_roll(Some(5), 36.0)]);
    let persisted = repo.insert_hierarchy(&plan, &skipped, Some("op")).unwrap();

    let jumbo = repo.find_by_id(&persisted.jumbo_ids[0]).unwrap().unwrap();
    let roll = repo.find_by_id(&persisted.intermediate_ids[0]).unwrap().unwrap();
    let cut = repo.find_by_id(&persisted.cut_roll_ids[0]).unwrap().unwrap();

    assert_eq!(jumbo.frontend_id, "INV-001");
    assert_eq!(roll.frontend_id, "INV-002");
    assert_eq!(cut.frontend_id, "INV-003");
    assert_eq!(jumbo.paper_id.as_deref(), Some("paper2"));
    assert_eq!(cut.created_by_id.as_deref(), Some("op"));
    assert_eq!(cut.width_inches, Some(36.0));
    assert!(roll.qr_code.starts_with("VIRTUAL_118_"));
    assert!(roll.barcode_id.starts_with("V118_"));
    assert_eq!(cut.barcode_id, "CR_00001");
    assert!(cut.qr_code.starts_with("PROD_CR_00001_"));
}

#[test]
fn test_lineage_of_unknown_id_is_not_found() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let repo = InventoryRepository::new(&db_path).unwrap();

    assert!(matches!(
        repo.find_lineage("nope"),
        Err(RepositoryError::NotFound { .. })
    ));
    assert!(repo.find_by_id("nope").unwrap().is_none());
}

#[test]
fn test_lineage_of_intermediate_lists_sibling_rolls() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let repo = InventoryRepository::new(&db_path).unwrap();

    let records = (1..=3).map(|n| golden_roll(Some(n), 24.0)).collect();
    let (plan, skipped) = plan_for(records);
    let persisted = repo.insert_hierarchy(&plan, &skipped, None).unwrap();

    let lineage = repo.find_lineage(&persisted.intermediate_ids[0]).unwrap();
    assert_eq!(lineage.item.roll_type, RollType::Intermediate);
    assert!(lineage.parent_intermediate.is_none());
    assert_eq!(
        lineage.parent_jumbo.map(|j| j.id),
        Some(persisted.jumbo_ids[0].clone())
    );
    assert_eq!(lineage.siblings.len(), 2);
}

#[test]
fn test_cut_barcode_sequence_past_five_digits() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    {
        let conn = open_shared_connection(&db_path).unwrap();
        let conn = conn.lock().unwrap();
        for (idx, barcode) in ["CR_99999", "CR_100000"].iter().enumerate() {
            conn.execute(
                "INSERT INTO inventory_master (id, frontend_id, roll_type, status, qr_code, barcode_id, created_at)
                 VALUES (?1, ?2, 'CUT', 'CUTTING', ?3, ?4, '2026-01-01T00:00:00Z')",
                params![
                    format!("seed-{}", idx),
                    format!("INV-90{}", idx),
                    format!("PROD_{}_SEED", barcode),
                    barcode
                ],
            )
            .unwrap();
        }
    }

    let repo = InventoryRepository::new(&db_path).unwrap();
    let (plan, skipped) = plan_for(vec![golden_roll(Some(1), 24.0), golden_roll(Some(2), 18.0)]);
    let persisted = repo.insert_hierarchy(&plan, &skipped, None).expect("条码不应重复");

    let barcodes: Vec<String> = persisted
        .cut_roll_ids
        .iter()
        .map(|id| repo.find_by_id(id).unwrap().unwrap().barcode_id)
        .collect();
    assert_eq!(barcodes, vec!["CR_100001", "CR_100002"]);
}
