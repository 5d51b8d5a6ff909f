//! シート全体の抽出処理
//!
//! ヘッダー行 → 評価種別 → 列解決 → 行ごとの組み立て、の順に処理し、
//! 結果を `EvaluationBatch` として返す。

use crate::assembler::{assemble_record, ColumnMap, ExtractOptions};
use crate::evaluation_type::EvaluationType;
use crate::types::{EvaluationBatch, Sheet};

/// シートから評価結果を抽出
pub fn extract_evaluations(sheet: &Sheet, options: &ExtractOptions) -> EvaluationBatch {
    let evaluation_type = EvaluationType::classify(&sheet.headers);
    let columns = ColumnMap::resolve(sheet, evaluation_type, options);

    if columns.name.is_none() {
        log::warn!("No name column found; every row will be skipped");
    }

    let records: Vec<_> = sheet
        .rows
        .iter()
        .enumerate()
        .filter_map(|(idx, row)| {
            // シート上の行番号 - 1（ヘッダーが1行目、データは2行目から）
            let id = (idx + 1) as u32;
            assemble_record(id, row, &columns, evaluation_type, options)
        })
        .collect();

    log::info!(
        "Extracted {} evaluations from {} rows",
        records.len(),
        sheet.rows.len()
    );

    EvaluationBatch {
        evaluation_type,
        records,
    }
}
