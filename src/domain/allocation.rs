// ==========================================
// 纸卷层级系统 - 分组与母卷分配模型
// ==========================================
// 职责: SpecGroup (规格 -> 卷号 -> 分切卷) 与 JumboAllocation
// 红线: 同卷号不同规格的记录不得合并
// ==========================================

use crate::domain::cut_roll::{CutRollRecord, SpecKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// SpecGroup - 规格分组
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecGroup {
    /// 分组键
    pub key: SpecKey,

    /// 卷号 -> 分切卷 (组内保持插入顺序)
    pub roll_groups: BTreeMap<i64, Vec<CutRollRecord>>,
}

impl SpecGroup {
    pub fn new(key: SpecKey) -> Self {
        Self {
            key,
            roll_groups: BTreeMap::new(),
        }
    }

    /// 追加分切卷到对应卷号分组
    ///
    /// 重复记录保留，不做去重；计数按不同卷号计算，不会因此虚增
    pub fn push(&mut self, roll_number: i64, record: CutRollRecord) {
        self.roll_groups.entry(roll_number).or_default().push(record);
    }

    /// 不同卷号数量
    pub fn distinct_roll_numbers(&self) -> usize {
        self.roll_groups.len()
    }

    /// 升序卷号列表
    pub fn roll_numbers(&self) -> Vec<i64> {
        self.roll_groups.keys().copied().collect()
    }

    /// 组内分切卷总数
    pub fn record_count(&self) -> usize {
        self.roll_groups.values().map(Vec::len).sum()
    }
}

// ==========================================
// JumboAllocation - 母卷分配
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumboAllocation {
    pub key: SpecKey,
    pub group: SpecGroup,

    /// 所需母卷数 = ceil(不同卷号数 / 每母卷卷数)
    pub jumbo_count: usize,
}

impl JumboAllocation {
    /// 中间卷数量 (每个不同卷号对应一个中间卷)
    pub fn intermediate_roll_count(&self) -> usize {
        self.group.distinct_roll_numbers()
    }
}

// ==========================================
// RollNumberConflict - 跨规格卷号重复
// ==========================================
// 仅提示: 分组已按规格隔离
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollNumberConflict {
    pub roll_number: i64,
    pub keys: Vec<SpecKey>,
}

// ==========================================
// AllocationReport - 分配报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationReport {
    /// 按 SpecKey 升序
    pub allocations: Vec<JumboAllocation>,

    /// 未跟踪卷号被跳过的分切卷
    pub skipped: Vec<CutRollRecord>,

    /// 跨规格重复的卷号
    pub conflicts: Vec<RollNumberConflict>,

    pub total_intermediate_rolls: usize,
    pub total_jumbo_rolls: usize,
}

impl AllocationReport {
    pub fn spec_count(&self) -> usize {
        self.allocations.len()
    }

    pub fn find(&self, key: &SpecKey) -> Option<&JumboAllocation> {
        self.allocations.iter().find(|a| &a.key == key)
    }
}
