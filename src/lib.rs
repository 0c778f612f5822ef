// ==========================================
// 纸卷层级系统 - 核心库
// ==========================================
// 系统定位: 分切卷 -> 母卷层级分配 (按纸种规格隔离卷号)
// 技术栈: Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 分组与层级组装
pub mod engine;

// 配置层 - 分配常量与覆写
pub mod config;

// 导入层 - 外部数据
pub mod importer;

// 数据仓储层 - 数据访问
pub mod repository;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    AllocationReport, BulkFactor, CutRollRecord, HierarchyPlan, InventoryItem, JumboAllocation,
    PaperSpec, RollType, SpecGroup, SpecKey, SpecKeyPolicy,
};

pub use config::{AllocationConfig, ConfigManager, DEFAULT_ROLLS_PER_JUMBO};

pub use engine::{HierarchyBuilder, JumboAllocator};

pub use api::{ProductionApi, StartProductionRequest, StartProductionResponse};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "纸卷层级系统";
