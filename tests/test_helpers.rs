// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

#![allow(dead_code)]

use paper_roll_hierarchy::db::{init_schema, open_sqlite_connection};
use paper_roll_hierarchy::CutRollRecord;
use rusqlite::Connection;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径非 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开共享连接
pub fn open_shared_connection(db_path: &str) -> Result<Arc<Mutex<Connection>>, Box<dyn Error>> {
    let conn = open_sqlite_connection(db_path)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// 180gsm / 18bf / Golden 分切卷
pub fn golden_roll(roll_number: Option<i64>, width: f64) -> CutRollRecord {
    CutRollRecord::new(roll_number, Some(180), Some(18.0), Some("Golden"))
        .with_width(width)
        .with_paper_id("paper1")
}

/// 210gsm / 16bf / Natural 分切卷
pub fn natural_roll(roll_number: Option<i64>, width: f64) -> CutRollRecord {
    CutRollRecord::new(roll_number, Some(210), Some(16.0), Some("Natural"))
        .with_width(width)
        .with_paper_id("paper2")
}

/// 两种纸卷号重叠的场景: Golden {1,2} + Natural {1,2}
pub fn golden_natural_scenario() -> Vec<CutRollRecord> {
    vec![
        golden_roll(Some(1), 24.0),
        golden_roll(Some(2), 18.0),
        natural_roll(Some(1), 36.0),
        natural_roll(Some(2), 12.0),
    ]
}
