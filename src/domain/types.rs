// ==========================================
// 纸卷层级系统 - 领域类型定义
// ==========================================
// 职责: 卷类型 / 库存状态 / 规格键策略等枚举
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 卷类型 (Roll Type)
// ==========================================
// 层级: JUMBO -> INTERMEDIATE(118") -> CUT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RollType {
    Jumbo,        // 母卷
    Intermediate, // 中间卷 (118" 套卷)
    Cut,          // 分切卷
}

impl fmt::Display for RollType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl RollType {
    /// 从数据库字符串解析，未知值返回 None
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "JUMBO" => Some(RollType::Jumbo),
            "INTERMEDIATE" => Some(RollType::Intermediate),
            "CUT" => Some(RollType::Cut),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            RollType::Jumbo => "JUMBO",
            RollType::Intermediate => "INTERMEDIATE",
            RollType::Cut => "CUT",
        }
    }
}

// ==========================================
// 库存状态 (Inventory Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InventoryStatus {
    Consumed,  // 虚拟母卷/中间卷: 已被分切消耗
    Cutting,   // 分切中
    Available, // 可用库存
}

impl fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl InventoryStatus {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "CONSUMED" => Some(InventoryStatus::Consumed),
            "CUTTING" => Some(InventoryStatus::Cutting),
            "AVAILABLE" => Some(InventoryStatus::Available),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            InventoryStatus::Consumed => "CONSUMED",
            InventoryStatus::Cutting => "CUTTING",
            InventoryStatus::Available => "AVAILABLE",
        }
    }
}

// ==========================================
// 规格键策略 (Spec Key Policy)
// ==========================================
// SpecOnly: 仅 (gsm, bf, shade)
// SpecAndPaperId: (gsm, bf, shade, paper_id)，同名规格不同纸张定义分开成组
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpecKeyPolicy {
    #[default]
    SpecOnly,
    SpecAndPaperId,
}

impl fmt::Display for SpecKeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl SpecKeyPolicy {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "SPEC_ONLY" => Some(SpecKeyPolicy::SpecOnly),
            "SPEC_AND_PAPER_ID" => Some(SpecKeyPolicy::SpecAndPaperId),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            SpecKeyPolicy::SpecOnly => "SPEC_ONLY",
            SpecKeyPolicy::SpecAndPaperId => "SPEC_AND_PAPER_ID",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_type_db_round_trip() {
        for t in [RollType::Jumbo, RollType::Intermediate, RollType::Cut] {
            assert_eq!(RollType::from_db_str(t.to_db_str()), Some(t));
        }
        assert_eq!(RollType::from_db_str("118"), None);
    }

    #[test]
    fn test_spec_key_policy_parse_is_case_insensitive() {
        assert_eq!(
            SpecKeyPolicy::from_db_str(" spec_and_paper_id "),
            Some(SpecKeyPolicy::SpecAndPaperId)
        );
        assert_eq!(SpecKeyPolicy::from_db_str("paper"), None);
        assert_eq!(SpecKeyPolicy::default(), SpecKeyPolicy::SpecOnly);
    }
}
