//! 評価データの型定義
//!
//! - CellValue / Sheet: 読み込んだスプレッドシート（ヘッダー行 + データ行）
//! - EvaluationRecord: 1行分の評価結果
//! - EvaluationBatch: 1ファイル分の評価結果（アップロード→レポート間で受け渡す）

use crate::error::{Error, Result};
use crate::evaluation_type::{Category, EvaluationType};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// セル値
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    /// 表示用テキスト（整数値の数値は小数点なし）
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// 空白のみのテキストも空とみなす
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// 数値の表示（整数値は小数点なし）
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// スプレッドシート（先頭行をヘッダーとして分離済み）
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    /// ヘッダー行（空欄は `Col_<n>` に置換）
    pub headers: Vec<String>,
    /// データ行（2行目以降）
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// セルの2次元配列から構築（先頭行がヘッダー）
    pub fn from_grid(mut grid: Vec<Vec<CellValue>>) -> Result<Self> {
        if grid.is_empty() {
            return Err(Error::EmptySheet);
        }

        let width = grid.iter().map(|row| row.len()).max().unwrap_or(0);
        if width == 0 {
            return Err(Error::EmptySheet);
        }

        let header_cells = grid.remove(0);
        let headers = (0..width)
            .map(|col| {
                let text = header_cells
                    .get(col)
                    .map(CellValue::display_text)
                    .unwrap_or_default();
                if text.is_empty() {
                    format!("Col_{}", col + 1)
                } else {
                    text
                }
            })
            .collect();

        Ok(Self { headers, rows: grid })
    }

    /// 範囲外は Empty を返す
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

/// 行内のセル取得（範囲外は Empty）
pub fn row_cell(row: &[CellValue], col: Option<usize>) -> &CellValue {
    col.and_then(|c| row.get(c)).unwrap_or(&EMPTY_CELL)
}

/// 評価結果の定性ラベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceLabel {
    Outstanding,
    Satisfactory,
    Acceptable,
    Unsatisfactory,
    Deficient,
}

impl PerformanceLabel {
    /// 平均点からラベルを判定（下限は境界値を含む）
    pub fn from_average(average: f64) -> Self {
        if average >= 4.5 {
            PerformanceLabel::Outstanding
        } else if average >= 3.5 {
            PerformanceLabel::Satisfactory
        } else if average >= 2.5 {
            PerformanceLabel::Acceptable
        } else if average >= 1.5 {
            PerformanceLabel::Unsatisfactory
        } else {
            PerformanceLabel::Deficient
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceLabel::Outstanding => "Outstanding",
            PerformanceLabel::Satisfactory => "Satisfactory",
            PerformanceLabel::Acceptable => "Acceptable",
            PerformanceLabel::Unsatisfactory => "Unsatisfactory",
            PerformanceLabel::Deficient => "Deficient",
        }
    }
}

impl std::fmt::Display for PerformanceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// カテゴリ別スコア（未評価は 0）
pub type CategoryScores = BTreeMap<Category, f64>;

/// 評価結果（1行分）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRecord {
    /// 参照ID（シート行番号 - 1）
    pub id: u32,

    pub name: String,

    #[serde(default)]
    pub role: String,

    #[serde(default)]
    pub area: String,

    #[serde(default)]
    pub supervisor: String,

    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub period: String,

    /// 平均点（小数1桁に丸め済み）
    pub average: f64,

    pub label: PerformanceLabel,

    #[serde(default)]
    pub supervisor_comment: String,

    #[serde(default)]
    pub contributions: String,

    #[serde(default)]
    pub improvement_plan: String,

    pub evaluation_type: EvaluationType,

    #[serde(default)]
    pub scores: CategoryScores,
}

/// 1ファイル分の評価結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationBatch {
    pub evaluation_type: EvaluationType,
    pub records: Vec<EvaluationRecord>,
}

impl EvaluationBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 参照IDで検索
    pub fn find(&self, id: u32) -> Result<&EvaluationRecord> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .ok_or(Error::RecordNotFound(id))
    }
}

/// 解析成功時のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub total: usize,
    #[serde(rename = "evaluaciones")]
    pub evaluations: Vec<EvaluationRecord>,
}

impl From<EvaluationBatch> for UploadResponse {
    fn from(batch: EvaluationBatch) -> Self {
        Self {
            success: true,
            total: batch.records.len(),
            evaluations: batch.records,
        }
    }
}

/// 失敗時のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> EvaluationRecord {
        let mut scores = CategoryScores::new();
        scores.insert(Category::Organization, 4.0);
        scores.insert(Category::Teamwork, 0.0);

        EvaluationRecord {
            id: 1,
            name: "ANA PÉREZ".to_string(),
            role: "ANALISTA".to_string(),
            area: "CALIDAD".to_string(),
            supervisor: "JUAN GÓMEZ".to_string(),
            date: "2024-01-15".to_string(),
            period: "2024".to_string(),
            average: 4.0,
            label: PerformanceLabel::Satisfactory,
            supervisor_comment: String::new(),
            contributions: String::new(),
            improvement_plan: String::new(),
            evaluation_type: EvaluationType::Operative,
            scores,
        }
    }

    #[test]
    fn test_label_boundaries_inclusive() {
        assert_eq!(PerformanceLabel::from_average(4.5), PerformanceLabel::Outstanding);
        assert_eq!(PerformanceLabel::from_average(4.49), PerformanceLabel::Satisfactory);
        assert_eq!(PerformanceLabel::from_average(3.5), PerformanceLabel::Satisfactory);
        assert_eq!(PerformanceLabel::from_average(2.5), PerformanceLabel::Acceptable);
        assert_eq!(PerformanceLabel::from_average(1.5), PerformanceLabel::Unsatisfactory);
        assert_eq!(PerformanceLabel::from_average(1.49), PerformanceLabel::Deficient);
        assert_eq!(PerformanceLabel::from_average(0.0), PerformanceLabel::Deficient);
    }

    #[test]
    fn test_display_text_numbers() {
        assert_eq!(CellValue::Number(2024.0).display_text(), "2024");
        assert_eq!(CellValue::Number(4.5).display_text(), "4.5");
        assert_eq!(CellValue::Empty.display_text(), "");
    }

    #[test]
    fn test_sheet_from_grid_replaces_blank_headers() {
        let grid = vec![
            vec![CellValue::Text("NOMBRE".into()), CellValue::Empty],
            vec![CellValue::Text("ANA".into()), CellValue::Number(4.0), CellValue::Number(3.0)],
        ];
        let sheet = Sheet::from_grid(grid).unwrap();
        assert_eq!(sheet.headers, vec!["NOMBRE", "Col_2", "Col_3"]);
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.cell(0, 2), &CellValue::Number(3.0));
        assert_eq!(sheet.cell(5, 0), &CellValue::Empty);
    }

    #[test]
    fn test_sheet_from_empty_grid() {
        assert!(matches!(Sheet::from_grid(vec![]), Err(Error::EmptySheet)));
        assert!(matches!(Sheet::from_grid(vec![vec![]]), Err(Error::EmptySheet)));
    }

    #[test]
    fn test_record_serialize_camel_case() {
        let json = serde_json::to_string(&sample_record()).expect("シリアライズ失敗");
        assert!(json.contains("\"supervisorComment\":\"\""));
        assert!(json.contains("\"evaluationType\":\"OPERATIVE\""));
        assert!(json.contains("\"label\":\"Satisfactory\""));
        assert!(json.contains("\"organization\":4.0"));
    }

    #[test]
    fn test_upload_response_shape() {
        let batch = EvaluationBatch {
            evaluation_type: EvaluationType::Operative,
            records: vec![sample_record()],
        };
        let response = UploadResponse::from(batch);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["total"], 1);
        assert_eq!(value["evaluaciones"][0]["name"], "ANA PÉREZ");
    }

    #[test]
    fn test_batch_find() {
        let batch = EvaluationBatch {
            evaluation_type: EvaluationType::Operative,
            records: vec![sample_record()],
        };
        assert_eq!(batch.find(1).unwrap().name, "ANA PÉREZ");
        assert!(matches!(batch.find(9), Err(Error::RecordNotFound(9))));
    }
}
