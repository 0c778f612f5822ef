// ==========================================
// 纸卷层级系统 - 投产 API
// ==========================================
// 职责: 分切卷 -> 规格分组 -> 母卷层级 -> 落库
// 红线: 不同纸种规格各自生成母卷,不混卷
// ==========================================

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::{AllocationConfig, ConfigManager};
use crate::domain::allocation::{AllocationReport, RollNumberConflict};
use crate::domain::cut_roll::{CutRollRecord, SpecKey};
use crate::domain::hierarchy::HierarchyPlan;
use crate::domain::inventory::{PersistedHierarchy, RollLineage};
use crate::engine::{HierarchyBuilder, JumboAllocator};
use crate::repository::InventoryRepository;

// ==========================================
// 请求 / 响应
// ==========================================

/// 投产请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartProductionRequest {
    /// 选中的分切卷
    pub selected_cut_rolls: Vec<CutRollRecord>,

    /// 母卷宽度（英寸），缺省取配置
    #[serde(default)]
    pub jumbo_roll_width: Option<f64>,

    /// 操作人
    #[serde(default)]
    pub created_by_id: Option<String>,
}

/// 单规格汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecJumboSummary {
    pub key: SpecKey,
    pub spec_label: String,
    pub roll_number_count: usize,
    pub cut_roll_count: usize,
    pub jumbo_count: usize,
}

/// 预览结果（不落库）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionPreview {
    pub report: AllocationReport,
    pub plan: HierarchyPlan,
}

/// 投产响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartProductionResponse {
    pub specs: Vec<SpecJumboSummary>,
    pub total_jumbo_rolls: usize,
    pub total_intermediate_rolls: usize,
    pub skipped_cut_rolls: usize,
    pub conflicts: Vec<RollNumberConflict>,
    pub persisted: PersistedHierarchy,
}

// ==========================================
// ProductionApi - 投产 API
// ==========================================
pub struct ProductionApi {
    inventory_repo: Arc<InventoryRepository>,
    config: AllocationConfig,
}

impl ProductionApi {
    /// 创建新的 ProductionApi 实例
    pub fn new(inventory_repo: Arc<InventoryRepository>, config: AllocationConfig) -> ApiResult<Self> {
        config.validate()?;
        Ok(Self {
            inventory_repo,
            config,
        })
    }

    /// 使用 config_kv 中的分配配置创建
    pub fn from_config_manager(
        inventory_repo: Arc<InventoryRepository>,
        config_manager: &ConfigManager,
    ) -> ApiResult<Self> {
        let config = config_manager.get_allocation_config()?;
        Self::new(inventory_repo, config)
    }

    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    /// 预览分配结果（不落库）
    pub fn preview(&self, request: &StartProductionRequest) -> ApiResult<ProductionPreview> {
        self.validate_request(request)?;

        let allocator = JumboAllocator::new(self.config)?;
        let report = allocator.allocate_with_report(request.selected_cut_rolls.iter().cloned());

        let width = request
            .jumbo_roll_width
            .unwrap_or(self.config.jumbo_roll_width_inches);
        let plan = HierarchyBuilder::new(&self.config)
            .with_jumbo_width(width)
            .build(report.allocations.iter());

        let duplicates = HierarchyBuilder::duplicate_roll_numbers(&plan);
        if !duplicates.is_empty() {
            return Err(ApiError::InternalError(format!(
                "同一规格内出现重复卷号: {:?}",
                duplicates
            )));
        }

        Ok(ProductionPreview { report, plan })
    }

    /// 投产: 分配 + 组装层级 + 落库
    pub fn start_production(
        &self,
        request: StartProductionRequest,
    ) -> ApiResult<StartProductionResponse> {
        info!(
            selected_cut_rolls = request.selected_cut_rolls.len(),
            created_by_id = ?request.created_by_id,
            "开始投产"
        );

        let ProductionPreview { report, plan } = self.preview(&request)?;

        if !report.skipped.is_empty() {
            warn!(
                skipped = report.skipped.len(),
                "部分分切卷无卷号,将不关联父卷"
            );
        }

        // 每个规格都应拿到自己的母卷
        let planned_specs = plan
            .jumbos
            .iter()
            .map(|j| &j.key)
            .collect::<std::collections::BTreeSet<_>>()
            .len();
        if planned_specs != report.spec_count() {
            return Err(ApiError::InternalError(format!(
                "规格数 {} 与母卷覆盖规格数 {} 不一致",
                report.spec_count(),
                planned_specs
            )));
        }

        let persisted = self.inventory_repo.insert_hierarchy(
            &plan,
            &report.skipped,
            request.created_by_id.as_deref(),
        )?;

        let specs = report
            .allocations
            .iter()
            .map(|a| SpecJumboSummary {
                key: a.key.clone(),
                spec_label: a.key.to_string(),
                roll_number_count: a.group.distinct_roll_numbers(),
                cut_roll_count: a.group.record_count(),
                jumbo_count: a.jumbo_count,
            })
            .collect();

        info!(
            specs = report.spec_count(),
            jumbos = persisted.jumbo_ids.len(),
            intermediate_rolls = persisted.intermediate_ids.len(),
            "投产完成"
        );

        Ok(StartProductionResponse {
            specs,
            total_jumbo_rolls: report.total_jumbo_rolls,
            total_intermediate_rolls: report.total_intermediate_rolls,
            skipped_cut_rolls: report.skipped.len(),
            conflicts: report.conflicts,
            persisted,
        })
    }

    /// 卷追溯
    pub fn get_roll_lineage(&self, inventory_id: &str) -> ApiResult<RollLineage> {
        if inventory_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("库存ID不能为空".to_string()));
        }
        Ok(self.inventory_repo.find_lineage(inventory_id)?)
    }

    fn validate_request(&self, request: &StartProductionRequest) -> ApiResult<()> {
        if request.selected_cut_rolls.is_empty() {
            return Err(ApiError::InvalidInput("未选择分切卷".to_string()));
        }
        if let Some(width) = request.jumbo_roll_width {
            if !width.is_finite() || width <= 0.0 {
                return Err(ApiError::InvalidInput(format!(
                    "母卷宽度必须为有限正数: {}",
                    width
                )));
            }
        }
        Ok(())
    }
}
