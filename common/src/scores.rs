//! カテゴリ別スコアの抽出

use crate::evaluation_type::{Category, EvaluationType};
use crate::header::{find_column, MatchMode};
use crate::types::{row_cell, CategoryScores, CellValue};

/// 有効スコアの範囲
pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 5.0;

pub fn is_valid_score(value: f64) -> bool {
    (MIN_SCORE..=MAX_SCORE).contains(&value)
}

/// セル値をスコアに変換（1〜5以外・数値以外は 0 = 未評価）
pub fn score_value(cell: &CellValue) -> f64 {
    let value = match cell {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match value {
        Some(v) if is_valid_score(v) => v,
        _ => 0.0,
    }
}

/// 種別のカテゴリ表を列インデックスに解決したもの
#[derive(Debug, Clone)]
pub struct CategoryColumns {
    pub columns: Vec<(Category, Option<usize>)>,
}

impl CategoryColumns {
    pub fn resolve(evaluation_type: EvaluationType, headers: &[String]) -> Self {
        let columns = evaluation_type
            .categories()
            .map(|spec| {
                let col = find_column(headers, spec.candidates, MatchMode::Partial);
                log::debug!("Category {:?} -> column {:?}", spec.category, col);
                (spec.category, col)
            })
            .collect();
        Self { columns }
    }

    /// 1行分のスコアを読み取る
    pub fn extract(&self, row: &[CellValue]) -> CategoryScores {
        self.columns
            .iter()
            .map(|(category, col)| (*category, score_value(row_cell(row, *col))))
            .collect()
    }
}

/// 種別・ヘッダー・1行からカテゴリ別スコアを抽出
pub fn extract_category_scores(
    evaluation_type: EvaluationType,
    headers: &[String],
    row: &[CellValue],
) -> CategoryScores {
    CategoryColumns::resolve(evaluation_type, headers).extract(row)
}

/// 評価済み（1〜5）のスコアの平均
pub fn rated_average(scores: &CategoryScores) -> Option<f64> {
    let rated: Vec<f64> = scores.values().copied().filter(|v| is_valid_score(*v)).collect();
    if rated.is_empty() {
        None
    } else {
        Some(rated.iter().sum::<f64>() / rated.len() as f64)
    }
}
