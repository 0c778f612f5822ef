// ==========================================
// 纸卷层级系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约束: rusqlite 错误在此按约束类型归类,上层不解析 SQLite 消息
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 查询结果 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    // ===== 连接与事务 =====
    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    // ===== 层级约束 =====
    /// frontend_id / qr_code / barcode_id 重复
    #[error("库存标识重复: {0}")]
    DuplicateIdentifier(String),

    /// parent_jumbo_id / parent_118_roll_id 指向不存在的行
    #[error("父卷引用无效: {0}")]
    BrokenParentLink(String),

    /// roll_type / status 列出现未知取值
    #[error("库存行字段无法识别 (列 {column}): {message}")]
    UnrecognizedColumnValue { column: usize, message: String },
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    RepositoryError::DuplicateIdentifier(msg)
                } else if msg.contains("FOREIGN KEY") {
                    RepositoryError::BrokenParentLink(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::FromSqlConversionFailure(column, _, source) => {
                RepositoryError::UnrecognizedColumnValue {
                    column,
                    message: source.to_string(),
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "inventory_master".to_string(),
                id: "?".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_failure_maps_to_duplicate_identifier() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT),
            Some("UNIQUE constraint failed: inventory_master.barcode_id".to_string()),
        );
        assert!(matches!(
            RepositoryError::from(err),
            RepositoryError::DuplicateIdentifier(msg) if msg.contains("barcode_id")
        ));
    }

    #[test]
    fn test_foreign_key_failure_maps_to_broken_parent_link() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT),
            Some("FOREIGN KEY constraint failed".to_string()),
        );
        assert!(matches!(
            RepositoryError::from(err),
            RepositoryError::BrokenParentLink(_)
        ));
    }
}
