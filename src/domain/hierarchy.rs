// ==========================================
// 纸卷层级系统 - 母卷层级方案
// ==========================================
// 层级: 母卷 (JUMBO) -> 中间卷 (118" 套卷) -> 分切卷
// 红线: 分切卷按 (规格, 卷号) 关联父中间卷,不得只按卷号
// ==========================================

use crate::domain::cut_roll::{CutRollRecord, SpecKey};
use serde::{Deserialize, Serialize};

// ==========================================
// PlannedIntermediateRoll - 计划中间卷
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedIntermediateRoll {
    pub individual_roll_number: i64,

    /// 在母卷内的序号 (1 起)
    pub roll_sequence: u32,

    pub cut_rolls: Vec<CutRollRecord>,
}

// ==========================================
// PlannedJumbo - 计划母卷
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedJumbo {
    pub key: SpecKey,

    /// 同规格内的母卷序号 (1 起)
    pub jumbo_index: usize,

    /// 本规格母卷总数
    pub jumbos_in_spec: usize,

    pub intermediate_rolls: Vec<PlannedIntermediateRoll>,
}

impl PlannedJumbo {
    pub fn roll_numbers(&self) -> Vec<i64> {
        self.intermediate_rolls
            .iter()
            .map(|r| r.individual_roll_number)
            .collect()
    }
}

// ==========================================
// HierarchyPlan - 层级方案
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyPlan {
    /// 母卷/中间卷宽度 (英寸)
    pub jumbo_width_inches: f64,

    pub jumbos: Vec<PlannedJumbo>,
}

impl HierarchyPlan {
    pub fn jumbo_count(&self) -> usize {
        self.jumbos.len()
    }

    pub fn intermediate_roll_count(&self) -> usize {
        self.jumbos.iter().map(|j| j.intermediate_rolls.len()).sum()
    }

    pub fn cut_roll_count(&self) -> usize {
        self.jumbos
            .iter()
            .flat_map(|j| j.intermediate_rolls.iter())
            .map(|r| r.cut_rolls.len())
            .sum()
    }

    /// 查找分切卷的父中间卷
    ///
    /// # 返回
    /// (母卷, 中间卷)，未找到返回 None
    pub fn find_parent(
        &self,
        key: &SpecKey,
        roll_number: i64,
    ) -> Option<(&PlannedJumbo, &PlannedIntermediateRoll)> {
        self.jumbos
            .iter()
            .filter(|j| &j.key == key)
            .find_map(|j| {
                j.intermediate_rolls
                    .iter()
                    .find(|r| r.individual_roll_number == roll_number)
                    .map(|r| (j, r))
            })
    }

    /// 指定规格的全部母卷
    pub fn jumbos_for<'a>(&'a self, key: &'a SpecKey) -> impl Iterator<Item = &'a PlannedJumbo> + 'a {
        self.jumbos.iter().filter(move |j| &j.key == key)
    }
}
