// ==========================================
// 纸卷层级系统 - 引擎层
// ==========================================
// 职责: 实现业务规则引擎,不拼 SQL
// 红线: Engine 不拼 SQL
// ==========================================

pub mod allocator;
pub mod hierarchy;

// 重导出核心引擎
pub use allocator::{jumbo_count_for, JumboAllocator};
pub use hierarchy::HierarchyBuilder;
