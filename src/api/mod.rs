// ==========================================
// 纸卷层级系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供外部服务调用
// ==========================================

pub mod error;
pub mod production_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use production_api::{
    ProductionApi, ProductionPreview, SpecJumboSummary, StartProductionRequest,
    StartProductionResponse,
};
