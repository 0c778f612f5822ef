// ==========================================
// 纸卷层级系统 - 库存层级仓储
// ==========================================
// 职责: inventory_master 层级行写入与追溯查询
// 红线: Repository 不含业务逻辑 (层级方案由 HierarchyBuilder 产生)
// 约束: 层级写入在单个事务内完成
// ==========================================

use crate::domain::cut_roll::{CutRollRecord, SpecKey};
use crate::domain::hierarchy::HierarchyPlan;
use crate::domain::inventory::{InventoryItem, PersistedHierarchy, RollLineage};
use crate::domain::types::{InventoryStatus, RollType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

/// 虚拟母卷/中间卷库位
pub const VIRTUAL_LOCATION: &str = "VIRTUAL";

const SELECT_COLUMNS: &str = r#"
    id, frontend_id, gsm, bf, shade, paper_id,
    width_inches, roll_type, status, location,
    qr_code, barcode_id,
    parent_jumbo_id, parent_118_roll_id, roll_sequence, individual_roll_number,
    source_type, source_pending_id,
    created_by_id, created_at
"#;

// ==========================================
// InventoryRepository - 库存层级仓储
// ==========================================
pub struct InventoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl InventoryRepository {
    /// 创建新的 InventoryRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入
    // ==========================================

    /// 写入层级方案
    ///
    /// # 参数
    /// - `plan`: 层级方案
    /// - `unlinked`: 无卷号的分切卷（无父卷写入）
    /// - `created_by_id`: 操作人
    ///
    /// # 返回
    /// 各层新建行的 ID
    pub fn insert_hierarchy(
        &self,
        plan: &HierarchyPlan,
        unlinked: &[CutRollRecord],
        created_by_id: Option<&str>,
    ) -> RepositoryResult<PersistedHierarchy> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut ids = IdSequence::load(&tx)?;
        let mut persisted = PersistedHierarchy::default();

        for jumbo in &plan.jumbos {
            let paper_id = paper_id_for(
                &jumbo.key,
                jumbo.intermediate_rolls.iter().flat_map(|r| r.cut_rolls.iter()),
            );
            let jumbo_item = InventoryItem {
                roll_type: RollType::Jumbo,
                status: InventoryStatus::Consumed,
                location: Some(VIRTUAL_LOCATION.to_string()),
                width_inches: Some(plan.jumbo_width_inches),
                qr_code: format!("VIRTUAL_JUMBO_{}", short_hex()),
                barcode_id: format!("VJB_{}", short_hex()),
                ..ids.blank_item(&jumbo.key, paper_id.clone(), created_by_id)
            };
            insert_item(&tx, &jumbo_item)?;
            debug!(
                frontend_id = %jumbo_item.frontend_id,
                spec = %jumbo.key,
                jumbo_index = jumbo.jumbo_index,
                jumbos_in_spec = jumbo.jumbos_in_spec,
                "母卷已创建"
            );

            for roll in &jumbo.intermediate_rolls {
                let roll_item = InventoryItem {
                    roll_type: RollType::Intermediate,
                    status: InventoryStatus::Consumed,
                    location: Some(VIRTUAL_LOCATION.to_string()),
                    width_inches: Some(plan.jumbo_width_inches),
                    qr_code: format!("VIRTUAL_118_{}", short_hex()),
                    barcode_id: format!("V118_{}", short_hex()),
                    parent_jumbo_id: Some(jumbo_item.id.clone()),
                    roll_sequence: Some(roll.roll_sequence),
                    individual_roll_number: Some(roll.individual_roll_number),
                    ..ids.blank_item(&jumbo.key, paper_id.clone(), created_by_id)
                };
                insert_item(&tx, &roll_item)?;

                for cut in &roll.cut_rolls {
                    let cut_item = ids.cut_item(
                        cut,
                        Some(jumbo_item.id.as_str()),
                        Some(roll_item.id.as_str()),
                        created_by_id,
                    );
                    insert_item(&tx, &cut_item)?;
                    persisted.cut_roll_ids.push(cut_item.id);
                }
                persisted.intermediate_ids.push(roll_item.id);
            }
            persisted.jumbo_ids.push(jumbo_item.id);
        }

        for cut in unlinked {
            let cut_item = ids.cut_item(cut, None, None, created_by_id);
            insert_item(&tx, &cut_item)?;
            persisted.unlinked_cut_roll_ids.push(cut_item.id);
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        info!(
            jumbos = persisted.jumbo_ids.len(),
            intermediate_rolls = persisted.intermediate_ids.len(),
            cut_rolls = persisted.cut_roll_ids.len(),
            unlinked_cut_rolls = persisted.unlinked_cut_roll_ids.len(),
            "层级已落库"
        );

        Ok(persisted)
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 按ID查询
    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<InventoryItem>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM inventory_master WHERE id = ?1", SELECT_COLUMNS);
        let item = conn.query_row(&sql, params![id], map_item).optional()?;
        Ok(item)
    }

    /// 母卷下的中间卷（按 roll_sequence 排序）
    pub fn find_children_of_jumbo(&self, jumbo_id: &str) -> RepositoryResult<Vec<InventoryItem>> {
        self.query_items(
            "parent_jumbo_id = ?1 AND roll_type = 'INTERMEDIATE' ORDER BY roll_sequence",
            jumbo_id,
        )
    }

    /// 中间卷下的分切卷
    pub fn find_cut_rolls_of_intermediate(
        &self,
        intermediate_id: &str,
    ) -> RepositoryResult<Vec<InventoryItem>> {
        self.query_items(
            "parent_118_roll_id = ?1 AND roll_type = 'CUT' ORDER BY rowid",
            intermediate_id,
        )
    }

    /// 卷追溯: 自身 + 父母卷 + 父中间卷 + 同父兄弟卷
    pub fn find_lineage(&self, id: &str) -> RepositoryResult<RollLineage> {
        let item = self.find_by_id(id)?.ok_or_else(|| RepositoryError::NotFound {
            entity: "InventoryItem".to_string(),
            id: id.to_string(),
        })?;

        let parent_jumbo = match &item.parent_jumbo_id {
            Some(pid) => self.find_by_id(pid)?,
            None => None,
        };
        let parent_intermediate = match &item.parent_118_roll_id {
            Some(pid) => self.find_by_id(pid)?,
            None => None,
        };

        let siblings = match (&item.parent_118_roll_id, &item.parent_jumbo_id) {
            (Some(pid), _) => self.find_cut_rolls_of_intermediate(pid)?,
            (None, Some(pid)) => self.find_children_of_jumbo(pid)?,
            (None, None) => Vec::new(),
        }
        .into_iter()
        .filter(|s| s.id != item.id)
        .collect();

        Ok(RollLineage {
            item,
            parent_jumbo,
            parent_intermediate,
            siblings,
        })
    }

    /// 按卷类型计数
    pub fn count_by_roll_type(&self, roll_type: RollType) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM inventory_master WHERE roll_type = ?1",
            params![roll_type.to_db_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn query_items(&self, where_clause: &str, param: &str) -> RepositoryResult<Vec<InventoryItem>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM inventory_master WHERE {}",
            SELECT_COLUMNS, where_clause
        );
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map(params![param], map_item)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }
}

// ==========================================
// 编号生成
// ==========================================
// frontend_id: INV-001 顺序号; 分切卷条码: CR_00001 顺序号
struct IdSequence {
    next_inventory: i64,
    next_cut_barcode: i64,
}

impl IdSequence {
    fn load(tx: &Transaction<'_>) -> RepositoryResult<Self> {
        let count: i64 =
            tx.query_row("SELECT COUNT(*) FROM inventory_master", [], |row| row.get(0))?;

        // 按数值取最大条码号，CR_100000 排在 CR_99999 之后
        let last_cut_number: Option<i64> = tx.query_row(
            "SELECT MAX(CAST(substr(barcode_id, 4) AS INTEGER)) FROM inventory_master WHERE barcode_id LIKE 'CR\\_%' ESCAPE '\\'",
            [],
            |row| row.get(0),
        )?;
        let last_cut_number = last_cut_number.unwrap_or(0);

        Ok(Self {
            next_inventory: count + 1,
            next_cut_barcode: last_cut_number + 1,
        })
    }

    fn next_frontend_id(&mut self) -> String {
        let id = format!("INV-{:03}", self.next_inventory);
        self.next_inventory += 1;
        id
    }

    fn next_cut_barcode(&mut self) -> String {
        let barcode = format!("CR_{:05}", self.next_cut_barcode);
        self.next_cut_barcode += 1;
        barcode
    }

    fn blank_item(
        &mut self,
        key: &SpecKey,
        paper_id: Option<String>,
        created_by_id: Option<&str>,
    ) -> InventoryItem {
        InventoryItem {
            id: Uuid::new_v4().to_string(),
            frontend_id: self.next_frontend_id(),
            gsm: key.spec.gsm,
            bf: key.spec.bf.map(f64::from),
            shade: key.spec.shade.clone(),
            paper_id,
            width_inches: None,
            roll_type: RollType::Cut,
            status: InventoryStatus::Cutting,
            location: None,
            qr_code: String::new(),
            barcode_id: String::new(),
            parent_jumbo_id: None,
            parent_118_roll_id: None,
            roll_sequence: None,
            individual_roll_number: None,
            source_type: None,
            source_pending_id: None,
            created_by_id: created_by_id.map(|s| s.to_string()),
            created_at: Utc::now(),
        }
    }

    fn cut_item(
        &mut self,
        cut: &CutRollRecord,
        parent_jumbo_id: Option<&str>,
        parent_118_roll_id: Option<&str>,
        created_by_id: Option<&str>,
    ) -> InventoryItem {
        let barcode_id = self.next_cut_barcode();
        let key = SpecKey::from_spec(cut.paper_spec());
        InventoryItem {
            width_inches: cut.width,
            qr_code: format!("PROD_{}_{}", barcode_id, short_hex()),
            barcode_id,
            parent_jumbo_id: parent_jumbo_id.map(|s| s.to_string()),
            parent_118_roll_id: parent_118_roll_id.map(|s| s.to_string()),
            individual_roll_number: cut.individual_roll_number,
            source_type: cut.source_type.clone(),
            source_pending_id: cut.source_pending_id.clone(),
            ..self.blank_item(&key, cut.paper_id.clone(), created_by_id)
        }
    }
}

/// 规格键带 paper_id 时用之，否则取组内第一个非空 paper_id
fn paper_id_for<'a, I>(key: &SpecKey, mut cuts: I) -> Option<String>
where
    I: Iterator<Item = &'a CutRollRecord>,
{
    key.paper_id
        .clone()
        .or_else(|| cuts.find_map(|c| c.paper_id.clone()))
}

/// v4 UUID 的前 8 位大写十六进制
fn short_hex() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}

fn insert_item(tx: &Transaction<'_>, item: &InventoryItem) -> RepositoryResult<()> {
    tx.execute(
        r#"
        INSERT INTO inventory_master (
            id, frontend_id, gsm, bf, shade, paper_id,
            width_inches, roll_type, status, location,
            qr_code, barcode_id,
            parent_jumbo_id, parent_118_roll_id, roll_sequence, individual_roll_number,
            source_type, source_pending_id,
            created_by_id, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)
        "#,
        params![
            item.id,
            item.frontend_id,
            item.gsm,
            item.bf,
            item.shade,
            item.paper_id,
            item.width_inches,
            item.roll_type.to_db_str(),
            item.status.to_db_str(),
            item.location,
            item.qr_code,
            item.barcode_id,
            item.parent_jumbo_id,
            item.parent_118_roll_id,
            item.roll_sequence,
            item.individual_roll_number,
            item.source_type,
            item.source_pending_id,
            item.created_by_id,
            item.created_at,
        ],
    )?;
    Ok(())
}

fn map_item(row: &Row<'_>) -> rusqlite::Result<InventoryItem> {
    let roll_type_raw: String = row.get(7)?;
    let roll_type = RollType::from_db_str(&roll_type_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            7,
            Type::Text,
            format!("未知卷类型: {}", roll_type_raw).into(),
        )
    })?;

    let status_raw: String = row.get(8)?;
    let status = InventoryStatus::from_db_str(&status_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            8,
            Type::Text,
            format!("未知库存状态: {}", status_raw).into(),
        )
    })?;

    Ok(InventoryItem {
        id: row.get(0)?,
        frontend_id: row.get(1)?,
        gsm: row.get(2)?,
        bf: row.get(3)?,
        shade: row.get(4)?,
        paper_id: row.get(5)?,
        width_inches: row.get(6)?,
        roll_type,
        status,
        location: row.get(9)?,
        qr_code: row.get(10)?,
        barcode_id: row.get(11)?,
        parent_jumbo_id: row.get(12)?,
        parent_118_roll_id: row.get(13)?,
        roll_sequence: row.get(14)?,
        individual_roll_number: row.get(15)?,
        source_type: row.get(16)?,
        source_pending_id: row.get(17)?,
        created_by_id: row.get(18)?,
        created_at: row.get(19)?,
    })
}
