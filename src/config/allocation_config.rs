// ==========================================
// 纸卷层级系统 - 母卷分配配置
// ==========================================
// 职责: 分配相关的领域常量与校验
// ==========================================

use crate::domain::types::SpecKeyPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 每个母卷包含的中间卷数 (三卷合一母卷)
pub const DEFAULT_ROLLS_PER_JUMBO: u32 = 3;

/// 母卷默认宽度 (英寸)
pub const DEFAULT_JUMBO_ROLL_WIDTH_INCHES: f64 = 118.0;

/// 配置错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("每母卷卷数必须 >= 1: {0}")]
    InvalidRollsPerJumbo(u32),

    #[error("母卷宽度必须为有限正数: {0}")]
    InvalidJumboWidth(f64),

    #[error("配置值无法解析 (key={key}): {value}")]
    UnparsableValue { key: String, value: String },

    #[error("配置存储访问失败: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for ConfigError {
    fn from(err: rusqlite::Error) -> Self {
        ConfigError::Storage(err.to_string())
    }
}

// ==========================================
// AllocationConfig - 分配配置
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationConfig {
    /// 每母卷卷数 (向上取整的除数)
    pub rolls_per_jumbo: u32,

    /// 母卷/中间卷宽度 (英寸)
    pub jumbo_roll_width_inches: f64,

    /// 分组键策略
    pub spec_key_policy: SpecKeyPolicy,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            rolls_per_jumbo: DEFAULT_ROLLS_PER_JUMBO,
            jumbo_roll_width_inches: DEFAULT_JUMBO_ROLL_WIDTH_INCHES,
            spec_key_policy: SpecKeyPolicy::SpecOnly,
        }
    }
}

impl AllocationConfig {
    /// 校验配置
    ///
    /// # 规则
    /// 1. rolls_per_jumbo >= 1
    /// 2. jumbo_roll_width_inches 为有限正数
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rolls_per_jumbo == 0 {
            return Err(ConfigError::InvalidRollsPerJumbo(self.rolls_per_jumbo));
        }
        if !self.jumbo_roll_width_inches.is_finite() || self.jumbo_roll_width_inches <= 0.0 {
            return Err(ConfigError::InvalidJumboWidth(self.jumbo_roll_width_inches));
        }
        Ok(())
    }

    pub fn with_rolls_per_jumbo(mut self, rolls_per_jumbo: u32) -> Self {
        self.rolls_per_jumbo = rolls_per_jumbo;
        self
    }

    pub fn with_jumbo_roll_width(mut self, width_inches: f64) -> Self {
        self.jumbo_roll_width_inches = width_inches;
        self
    }

    pub fn with_spec_key_policy(mut self, policy: SpecKeyPolicy) -> Self {
        self.spec_key_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AllocationConfig::default();
        assert_eq!(config.rolls_per_jumbo, 3);
        assert_eq!(config.jumbo_roll_width_inches, 118.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_rolls_per_jumbo_rejected() {
        let config = AllocationConfig::default().with_rolls_per_jumbo(0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidRollsPerJumbo(0)));
    }

    #[test]
    fn test_non_positive_or_nan_width_rejected() {
        assert!(AllocationConfig::default()
            .with_jumbo_roll_width(0.0)
            .validate()
            .is_err());
        assert!(AllocationConfig::default()
            .with_jumbo_roll_width(f64::NAN)
            .validate()
            .is_err());
    }
}
