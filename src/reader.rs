//! 評価シートの読み込み（calamine）
//!
//! 先頭のワークシートを絶対座標 (0,0) から読み、列番号を
//! スプレッドシートの列と一致させたまま `Sheet` に変換する。

use crate::error::{EvalReportError, Result};
use calamine::{open_workbook_auto, Data, DataType, Reader};
use eval_report_common::{CellValue, Sheet};
use std::path::Path;

/// 受け付ける拡張子
pub const ALLOWED_EXTENSIONS: &[&str] = &["xlsx", "xls"];

/// 拡張子チェック（大文字小文字は区別しない）
pub fn is_allowed_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| ALLOWED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// 入力ファイルの事前検証（存在・拡張子・サイズ）
pub fn validate_input(path: &Path, max_bytes: u64) -> Result<()> {
    if !path.exists() {
        return Err(EvalReportError::FileNotFound(path.display().to_string()));
    }

    if !is_allowed_file(path) {
        return Err(EvalReportError::InvalidExtension(path.display().to_string()));
    }

    let size = std::fs::metadata(path)?.len();
    if size > max_bytes {
        return Err(EvalReportError::FileTooLarge {
            size,
            limit: max_bytes,
        });
    }

    Ok(())
}

/// calamine のセル値を変換
pub fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) => match data.as_datetime() {
            Some(dt) => CellValue::DateTime(dt),
            None => CellValue::Text(data.to_string()),
        },
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        // #N/A 等のエラーセルは空扱い
        Data::Error(_) => CellValue::Empty,
    }
}

/// 先頭ワークシートを読み込む
pub fn read_sheet(path: &Path) -> Result<Sheet> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| EvalReportError::Spreadsheet(format!("ファイルを開けません: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| EvalReportError::Spreadsheet("ワークシートがありません".into()))?
        .map_err(|e| EvalReportError::Spreadsheet(format!("ワークシート読み込みエラー: {}", e)))?;

    // 先頭の空行・空列もそのまま残す
    let grid: Vec<Vec<CellValue>> = match range.end() {
        Some((last_row, last_col)) => (0..=last_row)
            .map(|r| {
                (0..=last_col)
                    .map(|c| range.get_value((r, c)).map(cell_value).unwrap_or_default())
                    .collect()
            })
            .collect(),
        None => Vec::new(),
    };

    log::debug!("Read {} rows from {}", grid.len(), path.display());
    let sheet = Sheet::from_grid(grid)?;
    log::info!(
        "Sheet loaded: {} columns, {} data rows",
        sheet.column_count(),
        sheet.rows.len()
    );
    Ok(sheet)
}

/// 検証してから読み込む
pub fn load_sheet(path: &Path, max_bytes: u64) -> Result<Sheet> {
    validate_input(path, max_bytes)?;
    read_sheet(path)
}
