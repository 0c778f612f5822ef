// ==========================================
// 纸卷层级系统 - 配置层
// ==========================================
// 职责: 分配常量与覆写管理
// 存储: config_kv 表
// ==========================================

pub mod allocation_config;
pub mod config_manager;

// 重导出核心配置
pub use allocation_config::{
    AllocationConfig, ConfigError, DEFAULT_JUMBO_ROLL_WIDTH_INCHES, DEFAULT_ROLLS_PER_JUMBO,
};
pub use config_manager::{config_keys, ConfigManager};
