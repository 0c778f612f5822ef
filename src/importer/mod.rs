// ==========================================
// 纸卷层级系统 - 导入层
// ==========================================
// 职责: 外部分切卷数据 -> CutRollRecord
// 支持: JSON (接口 payload) / CSV / Excel
// ==========================================

pub mod cut_roll_importer;
pub mod error;
pub mod file_parser;

pub use cut_roll_importer::{load_cut_rolls, map_rows, parse_cut_rolls_json};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRow};
