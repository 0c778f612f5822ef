// ==========================================
// 纸卷层级系统 - 库存主数据模型
// ==========================================
// 对齐: inventory_master 表 (自引用层级字段)
// - parent_jumbo_id / parent_118_roll_id / roll_sequence / individual_roll_number
// - source_type + source_pending_id (关联 pending_order_item)
// ==========================================

use crate::domain::types::{InventoryStatus, RollType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// InventoryItem - 库存卷
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    // ===== 主键 =====
    pub id: String,          // UUID
    pub frontend_id: String, // 展示编号 INV-001

    // ===== 纸种规格 =====
    pub gsm: Option<i32>,
    pub bf: Option<f64>,
    pub shade: Option<String>,
    pub paper_id: Option<String>,

    // ===== 物理属性 =====
    pub width_inches: Option<f64>,
    pub roll_type: RollType,
    pub status: InventoryStatus,
    pub location: Option<String>,

    // ===== 标识 =====
    pub qr_code: String,
    pub barcode_id: String,

    // ===== 层级 =====
    pub parent_jumbo_id: Option<String>,
    pub parent_118_roll_id: Option<String>,
    pub roll_sequence: Option<u32>,
    pub individual_roll_number: Option<i64>,

    // ===== 来源追踪 =====
    pub source_type: Option<String>,
    pub source_pending_id: Option<String>,

    // ===== 审计 =====
    pub created_by_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ==========================================
// RollLineage - 卷追溯视图
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollLineage {
    pub item: InventoryItem,
    pub parent_jumbo: Option<InventoryItem>,
    pub parent_intermediate: Option<InventoryItem>,

    /// 同父卷的其它卷 (不含自身)
    pub siblings: Vec<InventoryItem>,
}

// ==========================================
// PersistedHierarchy - 落库结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedHierarchy {
    pub jumbo_ids: Vec<String>,
    pub intermediate_ids: Vec<String>,
    pub cut_roll_ids: Vec<String>,

    /// 未关联父卷的分切卷ID
    pub unlinked_cut_roll_ids: Vec<String>,
}
