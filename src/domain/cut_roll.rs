// ==========================================
// 纸卷层级系统 - 分切卷领域模型
// ==========================================
// 职责: 分切卷记录 / 纸种规格 / 分组键
// 红线: 卷号只在同一纸种规格内唯一,不得全局假设唯一
// ==========================================

use crate::domain::types::SpecKeyPolicy;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

// ==========================================
// CutRollRecord - 分切卷记录
// ==========================================
// 来源: 分切方案输出 (selected_cut_rolls)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutRollRecord {
    // ===== 分组依据 =====
    #[serde(default)]
    pub individual_roll_number: Option<i64>, // 分切方案内的卷序号 (非全局唯一)

    #[serde(default)]
    pub gsm: Option<i32>, // 克重

    #[serde(default)]
    pub bf: Option<f64>, // 耐破因子 (bulk factor)

    #[serde(default)]
    pub shade: Option<String>, // 色泽

    #[serde(default)]
    pub paper_id: Option<String>, // 纸张定义ID (仅 SpecAndPaperId 策略参与分组)

    // ===== 透传字段 (不参与分组) =====
    #[serde(default, alias = "width_inches")]
    pub width: Option<f64>, // 宽度 (英寸)

    #[serde(default)]
    pub source_type: Option<String>, // 来源类型 (如 pending_order)

    #[serde(default)]
    pub source_pending_id: Option<String>, // 来源待处理订单项ID

    #[serde(default)]
    pub order_id: Option<String>, // 关联订单ID
}

impl CutRollRecord {
    /// 构造只含分组字段的记录
    pub fn new(
        individual_roll_number: Option<i64>,
        gsm: Option<i32>,
        bf: Option<f64>,
        shade: Option<&str>,
    ) -> Self {
        Self {
            individual_roll_number,
            gsm,
            bf,
            shade: shade.map(|s| s.to_string()),
            paper_id: None,
            width: None,
            source_type: None,
            source_pending_id: None,
            order_id: None,
        }
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_paper_id(mut self, paper_id: &str) -> Self {
        self.paper_id = Some(paper_id.to_string());
        self
    }

    /// 参与分组的卷号
    ///
    /// 缺失、null 或 0 视为"未单独跟踪"，返回 None；负数照常参与分组
    pub fn tracked_roll_number(&self) -> Option<i64> {
        self.individual_roll_number.filter(|n| *n != 0)
    }

    /// 纸种规格
    pub fn paper_spec(&self) -> PaperSpec {
        PaperSpec {
            gsm: self.gsm,
            bf: self.bf.map(BulkFactor::new),
            shade: self.shade.clone(),
        }
    }

    /// 按策略计算分组键
    pub fn spec_key(&self, policy: SpecKeyPolicy) -> SpecKey {
        let paper_id = match policy {
            SpecKeyPolicy::SpecOnly => None,
            SpecKeyPolicy::SpecAndPaperId => self.paper_id.clone(),
        };
        SpecKey {
            spec: self.paper_spec(),
            paper_id,
        }
    }
}

// ==========================================
// BulkFactor - 耐破因子
// ==========================================
// 全序、可哈希的浮点包装: -0.0 归一为 0.0, 比较走 total_cmp
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct BulkFactor(f64);

impl BulkFactor {
    pub fn new(value: f64) -> Self {
        if value == 0.0 {
            Self(0.0)
        } else {
            Self(value)
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for BulkFactor {
    fn from(value: f64) -> Self {
        BulkFactor::new(value)
    }
}

impl From<BulkFactor> for f64 {
    fn from(bf: BulkFactor) -> Self {
        bf.0
    }
}

impl PartialEq for BulkFactor {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for BulkFactor {}

impl PartialOrd for BulkFactor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BulkFactor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for BulkFactor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for BulkFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ==========================================
// PaperSpec - 纸种规格
// ==========================================
// 缺失的字段是独立的"未知"值,不与任何已知值合并
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PaperSpec {
    pub gsm: Option<i32>,
    pub bf: Option<BulkFactor>,
    pub shade: Option<String>,
}

impl PaperSpec {
    pub fn new(gsm: i32, bf: f64, shade: &str) -> Self {
        Self {
            gsm: Some(gsm),
            bf: Some(BulkFactor::new(bf)),
            shade: Some(shade.to_string()),
        }
    }

    /// 是否存在缺失字段
    pub fn is_incomplete(&self) -> bool {
        self.gsm.is_none() || self.bf.is_none() || self.shade.is_none()
    }
}

impl fmt::Display for PaperSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let gsm = self.gsm.map(|g| g.to_string()).unwrap_or_else(|| "?".to_string());
        let bf = self.bf.map(|b| b.to_string()).unwrap_or_else(|| "?".to_string());
        let shade = self.shade.as_deref().unwrap_or("?");
        write!(f, "{}gsm {}bf {}", gsm, bf, shade)
    }
}

// ==========================================
// SpecKey - 分组键
// ==========================================
// 排序: (gsm, bf, shade, paper_id)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpecKey {
    pub spec: PaperSpec,
    pub paper_id: Option<String>,
}

impl SpecKey {
    pub fn from_spec(spec: PaperSpec) -> Self {
        Self {
            spec,
            paper_id: None,
        }
    }
}

impl fmt::Display for SpecKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.paper_id {
            Some(id) => write!(f, "{} [{}]", self.spec, id),
            None => write!(f, "{}", self.spec),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracked_roll_number_filters_absent_and_zero() {
        let mut record = CutRollRecord::new(Some(3), Some(180), Some(18.0), Some("Golden"));
        assert_eq!(record.tracked_roll_number(), Some(3));

        record.individual_roll_number = Some(-1);
        assert_eq!(record.tracked_roll_number(), Some(-1));

        record.individual_roll_number = Some(0);
        assert_eq!(record.tracked_roll_number(), None);

        record.individual_roll_number = None;
        assert_eq!(record.tracked_roll_number(), None);
    }

    #[test]
    fn test_bulk_factor_negative_zero_equals_zero() {
        assert_eq!(BulkFactor::new(-0.0), BulkFactor::new(0.0));
        assert!(BulkFactor::new(16.0) < BulkFactor::new(18.0));
    }

    #[test]
    fn test_missing_spec_field_is_distinct_from_present_value() {
        let known = CutRollRecord::new(Some(1), Some(180), Some(18.0), Some("Golden"));
        let unknown_shade = CutRollRecord::new(Some(1), Some(180), Some(18.0), None);

        assert_ne!(
            known.spec_key(SpecKeyPolicy::SpecOnly),
            unknown_shade.spec_key(SpecKeyPolicy::SpecOnly)
        );
        assert!(unknown_shade.paper_spec().is_incomplete());
    }

    #[test]
    fn test_spec_key_policy_controls_paper_id() {
        let record = CutRollRecord::new(Some(1), Some(210), Some(16.0), Some("Natural"))
            .with_paper_id("paper2");

        assert_eq!(record.spec_key(SpecKeyPolicy::SpecOnly).paper_id, None);
        assert_eq!(
            record.spec_key(SpecKeyPolicy::SpecAndPaperId).paper_id.as_deref(),
            Some("paper2")
        );
    }

    #[test]
    fn test_deserialize_accepts_width_inches_alias() {
        let json = r#"{"individual_roll_number": 2, "width_inches": 18, "gsm": 180, "bf": 18, "shade": "Golden"}"#;
        let record: CutRollRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.width, Some(18.0));
        assert_eq!(record.tracked_roll_number(), Some(2));
        assert_eq!(record.paper_spec(), PaperSpec::new(180, 18.0, "Golden"));
    }

    #[test]
    fn test_display_marks_unknown_fields() {
        let spec = PaperSpec {
            gsm: Some(180),
            bf: None,
            shade: Some("Golden".to_string()),
        };
        assert_eq!(spec.to_string(), "180gsm ?bf Golden");
    }
}
