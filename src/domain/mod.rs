// ==========================================
// 纸卷层级系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod allocation;
pub mod cut_roll;
pub mod hierarchy;
pub mod inventory;
pub mod types;

// 重导出核心类型
pub use allocation::{AllocationReport, JumboAllocation, RollNumberConflict, SpecGroup};
pub use cut_roll::{BulkFactor, CutRollRecord, PaperSpec, SpecKey};
pub use hierarchy::{HierarchyPlan, PlannedIntermediateRoll, PlannedJumbo};
pub use inventory::{InventoryItem, PersistedHierarchy, RollLineage};
pub use types::{InventoryStatus, RollType, SpecKeyPolicy};
