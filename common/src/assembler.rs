//! 行 → 評価結果の組み立て
//!
//! ## 処理フロー
//! 1. シート単位で列を解決（`ColumnMap::resolve`）
//! 2. 行ごとにカテゴリスコア・平均点・ラベル・自由記述・期間を取り出す

use crate::evaluation_type::EvaluationType;
use crate::header::{find_column, normalize_text, MatchMode};
use crate::period::{derive_period, DEFAULT_PERIOD_YEAR};
use crate::scores::{is_valid_score, rated_average, CategoryColumns};
use crate::types::{row_cell, CategoryScores, CellValue, EvaluationRecord, PerformanceLabel, Sheet};

// ============================================
// 候補列名
// ============================================

pub const NAME_CANDIDATES: &[&str] = &["NOMBRE", "COLABORADOR"];
pub const ROLE_CANDIDATES: &[&str] = &["CARGO", "PUESTO"];
pub const AREA_CANDIDATES: &[&str] = &["AREA", "PROCESO", "DEPARTAMENTO"];
pub const SUPERVISOR_CANDIDATES: &[&str] = &["JEFE", "SUPERVISOR", "INMEDIATO"];
pub const DATE_CANDIDATES: &[&str] = &["FECHA", "EVALUACION"];
pub const PERIOD_EXACT_CANDIDATES: &[&str] = &["PERIODO EVALUADO", "PERÍODO EVALUADO"];
pub const PERIOD_CANDIDATES: &[&str] = &["PERIODO", "PERÍODO"];
pub const AVERAGE_EXACT_CANDIDATES: &[&str] = &["PROMEDIO", "PORCENTAJE"];
pub const AVERAGE_CANDIDATES: &[&str] = &["PROMEDIO", "PORCENTAJE", "%"];
pub const COMMENT_CANDIDATES: &[&str] = &[
    "COMENTARIOS DEL JEFE INMEDIATO",
    "COMENTARIO DEL JEFE",
    "FORTALEZAS Y DEBILIDADES",
];
pub const CONTRIBUTION_CANDIDATES: &[&str] =
    &["QUE APORTES HIZO USTED", "QUE APORTES CONSIDERA", "APORTES"];
pub const PLAN_CANDIDATES: &[&str] = &["PLAN DE MEJORA PROPUESTO"];

/// 列名から自由記述と判断できるキーワード
const PROSE_HEADER_KEYWORDS: &[&str] = &[
    "COMENTARIO",
    "APORTES",
    "PLAN DE MEJORA",
    "FORTALEZA",
    "DEBILIDAD",
    "QUE APORTES",
    "ASPECTOS",
    "OBJETIVOS",
    "CONSIDERA",
    "PROPUESTO",
];

/// 列名に含まれていたら数値列とみなすキーワード
const NUMERIC_HEADER_KEYWORDS: &[&str] = &["PORCENTAJE", "%", "PROMEDIO", "CALIFICACION"];

/// 自由記述とみなす最小文字数（サンプリング時）
const PROSE_SAMPLE_MIN_CHARS: usize = 15;
/// 自由記述として採用する最小文字数（行ごと）
const PROSE_VALUE_MIN_CHARS: usize = 5;

/// 抽出オプション
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// 期間が取れない場合の既定年
    pub default_year: String,
    /// 自由記述判定でサンプリングする行数
    pub text_sample_rows: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            default_year: DEFAULT_PERIOD_YEAR.to_string(),
            text_sample_rows: 10,
        }
    }
}

/// シート単位で解決した列の対応
#[derive(Debug, Clone)]
pub struct ColumnMap {
    pub name: Option<usize>,
    pub role: Option<usize>,
    pub area: Option<usize>,
    pub supervisor: Option<usize>,
    pub date: Option<usize>,
    pub period: Option<usize>,
    pub average: Option<usize>,
    /// 自由記述列（自由記述と判定できた列のみ）
    pub comment: Option<usize>,
    pub contributions: Option<usize>,
    pub plan: Option<usize>,
    pub categories: CategoryColumns,
}

impl ColumnMap {
    pub fn resolve(sheet: &Sheet, evaluation_type: EvaluationType, options: &ExtractOptions) -> Self {
        let headers = &sheet.headers;

        let period = find_column(headers, PERIOD_EXACT_CANDIDATES, MatchMode::Exact).or_else(|| {
            find_column(headers, PERIOD_CANDIDATES, MatchMode::Partial)
                .filter(|idx| !normalize_text(&headers[*idx]).contains("ANALISIS"))
        });

        let average = find_column(headers, AVERAGE_EXACT_CANDIDATES, MatchMode::Exact)
            .or_else(|| find_column(headers, AVERAGE_CANDIDATES, MatchMode::Partial));

        let prose = |candidates: &[&str]| {
            find_column(headers, candidates, MatchMode::Partial)
                .filter(|idx| is_prose_column(sheet, *idx, options.text_sample_rows))
        };

        let map = Self {
            name: find_column(headers, NAME_CANDIDATES, MatchMode::Partial),
            role: find_column(headers, ROLE_CANDIDATES, MatchMode::Partial),
            area: find_column(headers, AREA_CANDIDATES, MatchMode::Partial),
            supervisor: find_column(headers, SUPERVISOR_CANDIDATES, MatchMode::Partial),
            date: find_column(headers, DATE_CANDIDATES, MatchMode::Partial),
            period,
            average,
            comment: prose(COMMENT_CANDIDATES),
            contributions: prose(CONTRIBUTION_CANDIDATES),
            plan: prose(PLAN_CANDIDATES),
            categories: CategoryColumns::resolve(evaluation_type, headers),
        };

        log::debug!(
            "Columns resolved: name={:?} role={:?} area={:?} supervisor={:?} date={:?} period={:?} average={:?}",
            map.name, map.role, map.area, map.supervisor, map.date, map.period, map.average
        );
        log::debug!(
            "Text columns: comment={:?} contributions={:?} plan={:?}",
            map.comment, map.contributions, map.plan
        );

        map
    }
}

/// 列が自由記述（文章）か判定
///
/// 列名で明らかな場合はそれに従い、そうでなければ先頭数行の内容で
/// 長い文字列が数値より多いかを見る。
pub fn is_prose_column(sheet: &Sheet, col: usize, sample_rows: usize) -> bool {
    if let Some(header) = sheet.headers.get(col) {
        let name = normalize_text(header);
        if PROSE_HEADER_KEYWORDS.iter().any(|k| name.contains(k))
            && !NUMERIC_HEADER_KEYWORDS.iter().any(|k| name.contains(k))
        {
            return true;
        }
    }

    let mut text_count = 0;
    let mut number_count = 0;

    for row in sheet.rows.iter().take(sample_rows) {
        match row_cell(row, Some(col)) {
            CellValue::Text(s) if s.trim().chars().count() > PROSE_SAMPLE_MIN_CHARS => {
                text_count += 1
            }
            CellValue::Number(n) if *n != 0.0 => number_count += 1,
            _ => {}
        }
    }

    text_count > number_count && text_count > 0
}

/// 平均点の算出元
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AverageSource {
    /// シートの平均/割合列
    Sheet,
    /// 評価済みカテゴリの平均
    Categories,
    /// 行内の 1〜5 の数値すべての平均
    RowScan,
    /// いずれも無し
    None,
}

/// 割合（0〜100）を 1〜5 に換算
pub fn rescale_percentage(value: f64) -> f64 {
    (value / 100.0) * 4.0 + 1.0
}

/// シートの平均/割合列の値を検証（0 は未入力扱い）
fn sheet_average(cell: &CellValue) -> Option<f64> {
    let raw = cell.as_number().filter(|v| *v != 0.0)?;
    let value = if raw > 5.0 { rescale_percentage(raw) } else { raw };
    if (0.0..=5.0).contains(&value) && value != 0.0 {
        Some(value)
    } else {
        None
    }
}

/// 平均点を優先順位に従って算出
///
/// 1. シートの平均/割合列（5 超は 0〜100 とみなして換算）
/// 2. 評価済みカテゴリの平均
/// 3. 行内の 1〜5 の数値の平均
pub fn compute_average(
    row: &[CellValue],
    average_col: Option<usize>,
    scores: &CategoryScores,
) -> (f64, AverageSource) {
    if average_col.is_some() {
        if let Some(value) = sheet_average(row_cell(row, average_col)) {
            return (value, AverageSource::Sheet);
        }
    }

    if let Some(value) = rated_average(scores) {
        return (value, AverageSource::Categories);
    }

    let all: Vec<f64> = row
        .iter()
        .filter_map(CellValue::as_number)
        .filter(|v| is_valid_score(*v))
        .collect();
    if !all.is_empty() {
        return (all.iter().sum::<f64>() / all.len() as f64, AverageSource::RowScan);
    }

    (0.0, AverageSource::None)
}

/// 小数1桁に丸める
///
/// 格納値の10進表現で丸め、ちょうど中間の値は偶数側に寄せる（4.25 → 4.2）。
pub fn round_one_decimal(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// 自由記述の値（十分な長さの文字列のみ・大文字化）
fn prose_value(row: &[CellValue], col: Option<usize>) -> String {
    match row_cell(row, col) {
        // 長さ判定のみ前後の空白を除いて行い、値はそのまま大文字化する
        CellValue::Text(s) if s.trim().chars().count() > PROSE_VALUE_MIN_CHARS => s.to_uppercase(),
        _ => String::new(),
    }
}

/// 評価日の表示形式（日時セルは YYYY-MM-DD、文字列は時刻部分を除去）
fn format_date(cell: &CellValue) -> String {
    match cell {
        CellValue::DateTime(dt) => dt.format("%Y-%m-%d").to_string(),
        other => {
            let text = other.display_text();
            match text.split_once(' ') {
                Some((date, _)) => date.to_string(),
                None => text,
            }
        }
    }
}

/// 1行分の評価結果を組み立てる（氏名が空の行は None）
pub fn assemble_record(
    id: u32,
    row: &[CellValue],
    columns: &ColumnMap,
    evaluation_type: EvaluationType,
    options: &ExtractOptions,
) -> Option<EvaluationRecord> {
    let name_cell = row_cell(row, columns.name);
    if name_cell.is_blank() {
        return None;
    }
    let name = name_cell.display_text().to_uppercase();

    let scores = columns.categories.extract(row);
    let (average, source) = compute_average(row, columns.average, &scores);
    log::debug!("[{}] Average {:.2} from {:?}", name, average, source);

    let date = format_date(row_cell(row, columns.date));
    let explicit_period = columns.period.map(|col| row_cell(row, Some(col)).display_text());
    let period = derive_period(explicit_period.as_deref(), &date, &options.default_year, &name);

    let upper = |col: Option<usize>| row_cell(row, col).display_text().to_uppercase();

    Some(EvaluationRecord {
        id,
        role: upper(columns.role),
        area: upper(columns.area),
        supervisor: upper(columns.supervisor),
        date,
        period,
        average: round_one_decimal(average),
        label: PerformanceLabel::from_average(average),
        supervisor_comment: prose_value(row, columns.comment),
        contributions: prose_value(row, columns.contributions),
        improvement_plan: prose_value(row, columns.plan),
        evaluation_type,
        scores,
        name,
    })
}
