// ==========================================
// 纸卷层级系统 - 母卷分配引擎
// ==========================================
// 红线: 卷号只在同一纸种规格内唯一
// 红线: 同卷号不同规格的分切卷不得合并
// ==========================================
// 职责: 规格 -> 卷号 两级分组 + 母卷数量计算
// 输入: 分切卷记录
// 输出: 规格 -> 母卷分配
// ==========================================
// 注: 纯计算,无状态,无 I/O
// ==========================================

mod core;


pub use self::core::{jumbo_count_for, JumboAllocator};
