// ==========================================
// 纸卷层级系统 - 命令行入口
// ==========================================
// 用法:
//   paper-roll-hierarchy <cut_rolls.{json,csv,xlsx}> [db_path]
//
// - 未给 db_path: 只输出分配报告与层级方案 (JSON)
// - 给出 db_path: 读取 config_kv 配置, 并将层级写入 inventory_master
// ==========================================

use anyhow::{bail, Context};
use paper_roll_hierarchy::api::{ProductionApi, StartProductionRequest};
use paper_roll_hierarchy::db::{init_schema, open_sqlite_connection};
use paper_roll_hierarchy::importer::load_cut_rolls;
use paper_roll_hierarchy::repository::InventoryRepository;
use paper_roll_hierarchy::{logging, AllocationConfig, ConfigManager, HierarchyBuilder, JumboAllocator};
use serde_json::json;
use std::sync::{Arc, Mutex};

fn main() -> anyhow::Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let Some(input_path) = args.next() else {
        bail!("用法: paper-roll-hierarchy <cut_rolls.{{json,csv,xlsx}}> [db_path]");
    };
    let db_path = args.next().map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    tracing::info!("{} v{}", paper_roll_hierarchy::APP_NAME, paper_roll_hierarchy::VERSION);

    let records = load_cut_rolls(&input_path)
        .with_context(|| format!("无法加载分切卷文件: {}", input_path))?;

    let output = match db_path {
        None => {
            let config = AllocationConfig::default();
            let report = JumboAllocator::new(config)?.allocate_with_report(records);
            let plan = HierarchyBuilder::new(&config).build(report.allocations.iter());
            json!({ "report": report, "plan": plan })
        }
        Some(db_path) => {
            tracing::info!("使用数据库: {}", db_path);
            let conn = open_sqlite_connection(&db_path)
                .with_context(|| format!("无法打开数据库: {}", db_path))?;
            init_schema(&conn)?;
            let conn = Arc::new(Mutex::new(conn));

            let config_manager = ConfigManager::from_connection(conn.clone())?;
            let repo = Arc::new(InventoryRepository::from_connection(conn));
            let api = ProductionApi::from_config_manager(repo, &config_manager)?;

            let response = api.start_production(StartProductionRequest {
                selected_cut_rolls: records,
                jumbo_roll_width: None,
                created_by_id: None,
            })?;
            json!({ "response": response })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
