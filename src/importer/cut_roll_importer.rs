// ==========================================
// 纸卷层级系统 - 分切卷导入
// ==========================================
// 职责: JSON / CSV / Excel -> CutRollRecord
// 规则: 空单元格视为缺失值; 数值解析失败报 TypeConversionError
// ==========================================

use crate::domain::cut_roll::CutRollRecord;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{CsvParser, ExcelParser, FileParser, RawRow};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// 解析分切卷 JSON（数组，字段名与接口 payload 一致）
pub fn parse_cut_rolls_json(json: &str) -> ImportResult<Vec<CutRollRecord>> {
    let records: Vec<CutRollRecord> = serde_json::from_str(json)?;
    Ok(records)
}

/// 按扩展名加载分切卷文件
pub fn load_cut_rolls<P: AsRef<Path>>(file_path: P) -> ImportResult<Vec<CutRollRecord>> {
    let path = file_path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let records = match ext.as_str() {
        "json" => {
            if !path.exists() {
                return Err(ImportError::FileNotFound(path.display().to_string()));
            }
            let content = std::fs::read_to_string(path)?;
            parse_cut_rolls_json(&content)?
        }
        "csv" => map_table(CsvParser.parse_to_raw_records(path)?)?,
        "xlsx" | "xls" => map_table(ExcelParser.parse_to_raw_records(path)?)?,
        _ => return Err(ImportError::UnsupportedFormat(ext)),
    };

    info!(file = %path.display(), records = records.len(), "分切卷文件已加载");
    Ok(records)
}

/// 表格文件必须带的列（规格三元组 + 卷号）
const REQUIRED_COLUMNS: [&str; 4] = ["individual_roll_number", "gsm", "bf", "shade"];

fn map_table(rows: Vec<RawRow>) -> ImportResult<Vec<CutRollRecord>> {
    if let Some(first) = rows.first() {
        if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !first.contains_key(**c)) {
            return Err(ImportError::MissingColumn(missing.to_string()));
        }
    }
    map_rows(rows)
}

/// 原始行 -> 分切卷记录
///
/// 行号从 1 开始（不含表头）
pub fn map_rows(rows: Vec<RawRow>) -> ImportResult<Vec<CutRollRecord>> {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| map_row(idx + 1, row))
        .collect()
}

fn map_row(row_no: usize, row: &RawRow) -> ImportResult<CutRollRecord> {
    let width = match parse_field::<f64>(row_no, row, "width")? {
        Some(w) => Some(w),
        None => parse_field::<f64>(row_no, row, "width_inches")?,
    };

    Ok(CutRollRecord {
        individual_roll_number: parse_field::<i64>(row_no, row, "individual_roll_number")?,
        gsm: parse_field::<i32>(row_no, row, "gsm")?,
        bf: parse_field::<f64>(row_no, row, "bf")?,
        shade: text_field(row, "shade"),
        paper_id: text_field(row, "paper_id"),
        width,
        source_type: text_field(row, "source_type"),
        source_pending_id: text_field(row, "source_pending_id"),
        order_id: text_field(row, "order_id"),
    })
}

fn text_field(row: &RawRow, field: &str) -> Option<String> {
    row.get(field)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

fn parse_field<T>(row_no: usize, row: &RawRow, field: &str) -> ImportResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match text_field(row, field) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| ImportError::TypeConversionError {
                row: row_no,
                field: field.to_string(),
                message: format!("{} ({})", raw, e),
            }),
    }
}
