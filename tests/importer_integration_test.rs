// ==========================================
// 分切卷导入集成测试
// ==========================================
// 测试目标: JSON / CSV 文件 -> CutRollRecord -> 母卷分配
// ==========================================

use paper_roll_hierarchy::importer::{load_cut_rolls, ImportError};
use paper_roll_hierarchy::{JumboAllocator, PaperSpec, SpecKey};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_json_and_csv_fixtures_load_identically() {
    let from_json = load_cut_rolls(fixture("cut_rolls_golden_natural.json")).unwrap();
    let from_csv = load_cut_rolls(fixture("cut_rolls_golden_natural.csv")).unwrap();

    assert_eq!(from_json.len(), 5);
    assert_eq!(from_csv.len(), 5);

    for (a, b) in from_json.iter().zip(from_csv.iter()) {
        assert_eq!(a.individual_roll_number, b.individual_roll_number);
        assert_eq!(a.paper_spec(), b.paper_spec());
        assert_eq!(a.width, b.width);
    }

    assert_eq!(from_csv[0].source_pending_id.as_deref(), Some("PO-1001"));
    assert_eq!(from_csv[1].source_type, None);
    assert_eq!(from_csv[4].individual_roll_number, None);
}

#[test]
fn test_imported_rolls_allocate_per_spec() {
    let records = load_cut_rolls(fixture("cut_rolls_golden_natural.csv")).unwrap();
    let report = JumboAllocator::default().allocate_with_report(records);

    let golden = SpecKey::from_spec(PaperSpec::new(180, 18.0, "Golden"));
    let natural = SpecKey::from_spec(PaperSpec::new(210, 16.0, "Natural"));

    assert_eq!(report.spec_count(), 2);
    assert_eq!(report.find(&golden).unwrap().jumbo_count, 1);
    assert_eq!(report.find(&natural).unwrap().jumbo_count, 1);
    assert_eq!(report.total_jumbo_rolls, 2);
    assert_eq!(report.skipped.len(), 1, "无卷号的行不参与分组");
}

#[test]
fn test_bad_numeric_cell_reports_row() {
    let result = load_cut_rolls(fixture("cut_rolls_bad_gsm.csv"));
    match result {
        Err(ImportError::TypeConversionError { row, field, .. }) => {
            assert_eq!(row, 2);
            assert_eq!(field, "gsm");
        }
        other => panic!("应为类型转换错误, 实际: {:?}", other),
    }
}

#[test]
fn test_missing_and_unsupported_files() {
    assert!(matches!(
        load_cut_rolls(fixture("does_not_exist.json")),
        Err(ImportError::FileNotFound(_))
    ));
    assert!(matches!(
        load_cut_rolls(fixture("cut_rolls.txt")),
        Err(ImportError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_csv_without_bf_column_rejected() {
    assert!(matches!(
        load_cut_rolls(fixture("cut_rolls_missing_bf.csv")),
        Err(ImportError::MissingColumn(column)) if column == "bf"
    ));
}
