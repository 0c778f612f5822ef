use crate::config::{AllocationConfig, ConfigError};
use crate::domain::allocation::{AllocationReport, JumboAllocation, RollNumberConflict, SpecGroup};
use crate::domain::cut_roll::{CutRollRecord, SpecKey};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// 母卷数量 = ceil(不同卷号数 / 每母卷卷数)
///
/// `rolls_per_jumbo` 为 0 时按 1 处理（配置校验已拒绝 0）
pub fn jumbo_count_for(distinct_roll_numbers: usize, rolls_per_jumbo: u32) -> usize {
    let divisor = rolls_per_jumbo.max(1) as usize;
    distinct_roll_numbers.div_ceil(divisor)
}

// ==========================================
// JumboAllocator - 母卷分配引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct JumboAllocator {
    config: AllocationConfig,
}

impl JumboAllocator {
    /// 创建分配引擎（配置先校验）
    pub fn new(config: AllocationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 按纸种规格分配母卷
    ///
    /// # 步骤
    /// 1. 跳过未跟踪卷号的分切卷
    /// 2. 计算规格键 (gsm, bf, shade[, paper_id])
    /// 3. 规格组内按卷号分组,组内保持插入顺序
    /// 4. 每个规格: ceil(不同卷号数 / rolls_per_jumbo)
    ///
    /// # 返回
    /// 规格键 -> 母卷分配，每个出现过的规格一项
    pub fn allocate<I>(&self, records: I) -> BTreeMap<SpecKey, JumboAllocation>
    where
        I: IntoIterator<Item = CutRollRecord>,
    {
        let (groups, _skipped) = self.partition(records);
        self.finish(groups)
    }

    /// 分配 + 报告（跳过记录、跨规格卷号重复、合计）
    pub fn allocate_with_report<I>(&self, records: I) -> AllocationReport
    where
        I: IntoIterator<Item = CutRollRecord>,
    {
        let (groups, skipped) = self.partition(records);
        let allocations = self.finish(groups);
        let conflicts = find_roll_number_conflicts(&allocations);

        let total_intermediate_rolls: usize = allocations
            .values()
            .map(JumboAllocation::intermediate_roll_count)
            .sum();
        let total_jumbo_rolls: usize = allocations.values().map(|a| a.jumbo_count).sum();

        if conflicts.is_empty() {
            debug!("卷号未跨规格重复");
        } else {
            for conflict in &conflicts {
                info!(
                    roll_number = conflict.roll_number,
                    spec_count = conflict.keys.len(),
                    "卷号跨规格重复,已按规格隔离"
                );
            }
        }

        info!(
            spec_count = allocations.len(),
            total_intermediate_rolls = total_intermediate_rolls,
            total_jumbo_rolls = total_jumbo_rolls,
            skipped = skipped.len(),
            "母卷分配完成"
        );

        AllocationReport {
            allocations: allocations.into_values().collect(),
            skipped,
            conflicts,
            total_intermediate_rolls,
            total_jumbo_rolls,
        }
    }

    /// 两级分组
    fn partition<I>(&self, records: I) -> (BTreeMap<SpecKey, SpecGroup>, Vec<CutRollRecord>)
    where
        I: IntoIterator<Item = CutRollRecord>,
    {
        let policy = self.config.spec_key_policy;
        let mut groups: BTreeMap<SpecKey, SpecGroup> = BTreeMap::new();
        let mut skipped = Vec::new();

        for (idx, record) in records.into_iter().enumerate() {
            let Some(roll_number) = record.tracked_roll_number() else {
                warn!(
                    index = idx,
                    individual_roll_number = ?record.individual_roll_number,
                    "分切卷无卷号,跳过分组"
                );
                skipped.push(record);
                continue;
            };

            let key = record.spec_key(policy);
            let group = groups.entry(key.clone()).or_insert_with(|| {
                debug!(spec = %key, "新规格分组");
                SpecGroup::new(key)
            });
            group.push(roll_number, record);
        }

        (groups, skipped)
    }

    fn finish(&self, groups: BTreeMap<SpecKey, SpecGroup>) -> BTreeMap<SpecKey, JumboAllocation> {
        let rolls_per_jumbo = self.config.rolls_per_jumbo;

        groups
            .into_iter()
            .map(|(key, group)| {
                let jumbo_count = jumbo_count_for(group.distinct_roll_numbers(), rolls_per_jumbo);
                debug!(
                    spec = %key,
                    roll_numbers = group.distinct_roll_numbers(),
                    cut_rolls = group.record_count(),
                    jumbo_count = jumbo_count,
                    "规格母卷数计算"
                );
                let allocation = JumboAllocation {
                    key: key.clone(),
                    group,
                    jumbo_count,
                };
                (key, allocation)
            })
            .collect()
    }
}

/// 找出出现在多个规格下的卷号
fn find_roll_number_conflicts(
    allocations: &BTreeMap<SpecKey, JumboAllocation>,
) -> Vec<RollNumberConflict> {
    let mut by_roll_number: BTreeMap<i64, Vec<SpecKey>> = BTreeMap::new();
    for (key, allocation) in allocations {
        for roll_number in allocation.group.roll_groups.keys() {
            by_roll_number.entry(*roll_number).or_default().push(key.clone());
        }
    }

    by_roll_number
        .into_iter()
        .filter(|(_, keys)| keys.len() > 1)
        .map(|(roll_number, keys)| RollNumberConflict { roll_number, keys })
        .collect()
}
