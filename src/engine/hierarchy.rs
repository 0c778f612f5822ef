// ==========================================
// 纸卷层级系统 - 层级组装引擎
// ==========================================
// 职责: 母卷分配 -> 母卷/中间卷/分切卷 层级方案
// 规则: 规格内卷号升序,每 rolls_per_jumbo 个卷号组成一个母卷
//       中间卷在母卷内的序号从 1 开始
// ==========================================

use crate::config::AllocationConfig;
use crate::domain::allocation::JumboAllocation;
use crate::domain::cut_roll::SpecKey;
use crate::domain::hierarchy::{HierarchyPlan, PlannedIntermediateRoll, PlannedJumbo};
use std::collections::BTreeMap;
use tracing::{debug, info};

// ==========================================
// HierarchyBuilder - 层级组装
// ==========================================
pub struct HierarchyBuilder {
    rolls_per_jumbo: usize,
    jumbo_width_inches: f64,
}

impl HierarchyBuilder {
    pub fn new(config: &AllocationConfig) -> Self {
        Self {
            rolls_per_jumbo: config.rolls_per_jumbo.max(1) as usize,
            jumbo_width_inches: config.jumbo_roll_width_inches,
        }
    }

    /// 覆盖母卷宽度（请求级参数）
    pub fn with_jumbo_width(mut self, width_inches: f64) -> Self {
        self.jumbo_width_inches = width_inches;
        self
    }

    /// 组装层级方案
    ///
    /// 每个规格产生的母卷数与 JumboAllocation::jumbo_count 一致
    pub fn build<'a, I>(&self, allocations: I) -> HierarchyPlan
    where
        I: IntoIterator<Item = &'a JumboAllocation>,
    {
        let mut jumbos = Vec::new();

        for allocation in allocations {
            let roll_groups = &allocation.group.roll_groups;
            let roll_numbers: Vec<i64> = roll_groups.keys().copied().collect();
            let chunks: Vec<&[i64]> = roll_numbers.chunks(self.rolls_per_jumbo).collect();
            let jumbos_in_spec = chunks.len();

            debug_assert_eq!(jumbos_in_spec, allocation.jumbo_count);

            for (idx, chunk) in chunks.into_iter().enumerate() {
                let intermediate_rolls = chunk
                    .iter()
                    .enumerate()
                    .map(|(seq, roll_number)| PlannedIntermediateRoll {
                        individual_roll_number: *roll_number,
                        roll_sequence: seq as u32 + 1,
                        cut_rolls: roll_groups.get(roll_number).cloned().unwrap_or_default(),
                    })
                    .collect();

                let jumbo = PlannedJumbo {
                    key: allocation.key.clone(),
                    jumbo_index: idx + 1,
                    jumbos_in_spec,
                    intermediate_rolls,
                };

                debug!(
                    spec = %jumbo.key,
                    jumbo_index = jumbo.jumbo_index,
                    jumbos_in_spec = jumbos_in_spec,
                    roll_numbers = ?jumbo.roll_numbers(),
                    "母卷分配卷号"
                );
                jumbos.push(jumbo);
            }
        }

        let plan = HierarchyPlan {
            jumbo_width_inches: self.jumbo_width_inches,
            jumbos,
        };

        info!(
            jumbos = plan.jumbo_count(),
            intermediate_rolls = plan.intermediate_roll_count(),
            cut_rolls = plan.cut_roll_count(),
            "层级方案组装完成"
        );

        plan
    }

    /// 校验方案: 每个规格内卷号不重复
    ///
    /// # 返回
    /// 出现重复卷号的规格列表（正常情况下为空）
    pub fn duplicate_roll_numbers(plan: &HierarchyPlan) -> Vec<(SpecKey, i64)> {
        let mut seen: BTreeMap<(SpecKey, i64), usize> = BTreeMap::new();
        for jumbo in &plan.jumbos {
            for roll in &jumbo.intermediate_rolls {
                *seen
                    .entry((jumbo.key.clone(), roll.individual_roll_number))
                    .or_default() += 1;
            }
        }
        seen.into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(key, _)| key)
            .collect()
    }
}
