// ==========================================
// 纸卷层级系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 缺省: 未配置的键回落到 AllocationConfig::default()
// ==========================================

use crate::config::allocation_config::{AllocationConfig, ConfigError};
use crate::db::open_sqlite_connection;
use crate::domain::types::SpecKeyPolicy;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, ConfigError> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, ConfigError> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| ConfigError::Storage(format!("锁获取失败: {}", e)))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> Result<MutexGuard<'_, Connection>, ConfigError> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::Storage(format!("锁获取失败: {}", e)))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let conn = self.get_conn()?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 写入 global 配置（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        debug!(key = %key, value = %value, "配置已写入");
        Ok(())
    }

    // ===== 母卷分配配置 =====

    /// 读取母卷分配配置
    ///
    /// 缺失的键使用默认值；读取后统一校验
    pub fn get_allocation_config(&self) -> Result<AllocationConfig, ConfigError> {
        let defaults = AllocationConfig::default();

        let rolls_per_jumbo = match self.get_global_config_value(config_keys::ROLLS_PER_JUMBO)? {
            Some(raw) => parse_value::<u32>(config_keys::ROLLS_PER_JUMBO, &raw)?,
            None => defaults.rolls_per_jumbo,
        };

        let jumbo_roll_width_inches =
            match self.get_global_config_value(config_keys::JUMBO_ROLL_WIDTH_INCHES)? {
                Some(raw) => parse_value::<f64>(config_keys::JUMBO_ROLL_WIDTH_INCHES, &raw)?,
                None => defaults.jumbo_roll_width_inches,
            };

        let spec_key_policy = match self.get_global_config_value(config_keys::SPEC_KEY_POLICY)? {
            Some(raw) => SpecKeyPolicy::from_db_str(&raw).ok_or_else(|| {
                ConfigError::UnparsableValue {
                    key: config_keys::SPEC_KEY_POLICY.to_string(),
                    value: raw.clone(),
                }
            })?,
            None => defaults.spec_key_policy,
        };

        let config = AllocationConfig {
            rolls_per_jumbo,
            jumbo_roll_width_inches,
            spec_key_policy,
        };
        config.validate()?;

        info!(
            rolls_per_jumbo = config.rolls_per_jumbo,
            jumbo_roll_width_inches = config.jumbo_roll_width_inches,
            spec_key_policy = %config.spec_key_policy,
            "母卷分配配置已加载"
        );

        Ok(config)
    }

    /// 保存母卷分配配置（先校验再写入）
    pub fn set_allocation_config(&self, config: &AllocationConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.set_global_config_value(
            config_keys::ROLLS_PER_JUMBO,
            &config.rolls_per_jumbo.to_string(),
        )?;
        self.set_global_config_value(
            config_keys::JUMBO_ROLL_WIDTH_INCHES,
            &config.jumbo_roll_width_inches.to_string(),
        )?;
        self.set_global_config_value(
            config_keys::SPEC_KEY_POLICY,
            config.spec_key_policy.to_db_str(),
        )?;
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, ConfigError> {
        let conn = self.get_conn()?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        serde_json::to_string(&json!(config_map)).map_err(|e| ConfigError::Storage(e.to_string()))
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::UnparsableValue {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    // 母卷分配
    pub const ROLLS_PER_JUMBO: &str = "allocation/rolls_per_jumbo";
    pub const JUMBO_ROLL_WIDTH_INCHES: &str = "allocation/jumbo_roll_width_inches";
    pub const SPEC_KEY_POLICY: &str = "allocation/spec_key_policy";
}
