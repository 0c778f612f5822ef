// ==========================================
// 母卷分配场景测试
// ==========================================
// 测试目标: 卷号跨纸种重叠时,每个纸种各自获得母卷
// ==========================================

mod test_helpers;

use paper_roll_hierarchy::config::AllocationConfig;
use paper_roll_hierarchy::engine::{HierarchyBuilder, JumboAllocator};
use paper_roll_hierarchy::logging;
use paper_roll_hierarchy::{CutRollRecord, PaperSpec, SpecKey};
use std::collections::{BTreeSet, HashSet};

use test_helpers::{golden_natural_scenario, golden_roll, natural_roll};

fn golden_key() -> SpecKey {
    SpecKey::from_spec(PaperSpec::new(180, 18.0, "Golden"))
}

fn natural_key() -> SpecKey {
    SpecKey::from_spec(PaperSpec::new(210, 16.0, "Natural"))
}

#[test]
fn test_overlapping_roll_numbers_across_paper_types() {
    logging::init_test();

    let allocations = JumboAllocator::default().allocate(golden_natural_scenario());

    assert_eq!(allocations.len(), 2, "应有 2 个纸种规格");
    for key in [golden_key(), natural_key()] {
        let allocation = allocations.get(&key).expect("规格应存在");
        assert_eq!(allocation.group.distinct_roll_numbers(), 2);
        assert_eq!(allocation.jumbo_count, 1);
    }

    let total: usize = allocations.values().map(|a| a.jumbo_count).sum();
    assert_eq!(total, 2, "总母卷数应为 2");
}

#[test]
fn test_overlapping_roll_numbers_keep_original_metadata() {
    let allocations = JumboAllocator::default().allocate(golden_natural_scenario());

    let golden = &allocations[&golden_key()].group.roll_groups;
    let natural = &allocations[&natural_key()].group.roll_groups;

    assert_eq!(golden[&1][0].width, Some(24.0));
    assert_eq!(golden[&2][0].width, Some(18.0));
    assert_eq!(natural[&1][0].width, Some(36.0));
    assert_eq!(natural[&2][0].width, Some(12.0));
    assert!(golden.values().flatten().all(|r| r.shade.as_deref() == Some("Golden")));
    assert!(natural.values().flatten().all(|r| r.shade.as_deref() == Some("Natural")));
}

#[test]
fn test_group_count_equals_distinct_tracked_triples() {
    let mut records = golden_natural_scenario();
    records.push(CutRollRecord::new(Some(9), Some(120), Some(20.0), Some("White")));
    records.push(CutRollRecord::new(None, Some(300), Some(22.0), Some("Kraft")));
    records.push(golden_roll(Some(7), 30.0));

    let expected: HashSet<PaperSpec> = records
        .iter()
        .filter(|r| r.tracked_roll_number().is_some())
        .map(|r| r.paper_spec())
        .collect();

    let allocations = JumboAllocator::default().allocate(records);
    assert_eq!(allocations.len(), expected.len());
    assert_eq!(allocations.len(), 3, "未跟踪的 Kraft 不应成组");
}

#[test]
fn test_hierarchy_links_cut_rolls_by_spec_and_roll_number() {
    let config = AllocationConfig::default();
    let report = JumboAllocator::new(config)
        .unwrap()
        .allocate_with_report(golden_natural_scenario());
    let plan = HierarchyBuilder::new(&config).build(report.allocations.iter());

    assert_eq!(plan.jumbo_count(), 2);

    let (golden_jumbo, golden_parent) = plan.find_parent(&golden_key(), 1).unwrap();
    let (natural_jumbo, natural_parent) = plan.find_parent(&natural_key(), 1).unwrap();

    assert_ne!(golden_jumbo.key, natural_jumbo.key);
    assert_eq!(golden_parent.cut_rolls[0].shade.as_deref(), Some("Golden"));
    assert_eq!(natural_parent.cut_rolls[0].shade.as_deref(), Some("Natural"));

    let specs_with_jumbos: BTreeSet<&SpecKey> = plan.jumbos.iter().map(|j| &j.key).collect();
    assert_eq!(specs_with_jumbos.len(), report.spec_count());
}

#[test]
fn test_large_batch_jumbo_counts_per_spec() {
    let mut records: Vec<CutRollRecord> = (1..=7).map(|n| golden_roll(Some(n), 24.0)).collect();
    records.extend((1..=4).map(|n| natural_roll(Some(n), 36.0)));
    // 同卷号多刀分切
    records.extend((1..=4).map(|n| natural_roll(Some(n), 12.0)));

    let report = JumboAllocator::default().allocate_with_report(records);

    assert_eq!(report.find(&golden_key()).unwrap().jumbo_count, 3);
    let natural = report.find(&natural_key()).unwrap();
    assert_eq!(natural.jumbo_count, 2);
    assert_eq!(natural.group.record_count(), 8);
    assert_eq!(report.total_jumbo_rolls, 5);
    assert_eq!(report.total_intermediate_rolls, 11);
    assert_eq!(report.conflicts.len(), 4, "卷号 1..=4 在两个规格下重复");
}
