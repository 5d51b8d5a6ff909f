//! 評価レポートの文書モデル
//!
//! 評価結果1件とブランディング情報から、描画バックエンドに依存しない
//! 文書構造（ヘッダー・見出し・セクション・フッター）を組み立てる。
//! PDF / HTML の各バックエンドはこの構造をそのまま描画する。

use crate::evaluation_type::Category;
use crate::scores::is_valid_score;
use crate::types::{format_number, EvaluationRecord};
use serde::{Deserialize, Serialize};

/// 空欄の表示
pub const EMPTY_FIELD: &str = "-";
pub const NO_COMMENT: &str = "NO COMMENTS";
pub const NO_CONTRIBUTIONS: &str = "NO CONTRIBUTIONS RECORDED";
pub const NO_PLAN: &str = "NO IMPROVEMENT PLAN RECORDED";

pub const REPORT_TITLE: &str = "PERFORMANCE EVALUATION RESULTS";
pub const REPORT_SUBTITLE: &str = "Evaluation of employee performance and competencies";

/// 帳票ヘッダーの会社・様式情報
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportBranding {
    pub company_name: String,
    pub form_code: String,
    pub form_version: String,
    pub form_validity: String,
}

impl Default for ReportBranding {
    fn default() -> Self {
        Self {
            company_name: "LABORATORIOS NOVADERMA S.A.".to_string(),
            form_code: "FT-RH-042".to_string(),
            form_version: "1".to_string(),
            form_validity: "2026/02/03".to_string(),
        }
    }
}

const MM_PER_PT: f32 = 25.4 / 72.0;

/// Helvetica 大文字の字幅（em 比）。自由記述は大文字化されるため大文字基準で見積もる
const UPPERCASE_EM_RATIO: f32 = 0.72;

/// A4縦のレイアウト（mm単位）
#[derive(Debug, Clone, Copy)]
pub struct ReportLayout {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    pub header_height_mm: f32,
    pub line_height_mm: f32,
    pub body_font_pt: f32,
    pub title_font_pt: f32,
    pub section_font_pt: f32,
    /// 採点表の点数列の幅
    pub score_column_mm: f32,
    pub logo_width_mm: f32,
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 20.0,
            header_height_mm: 28.0,
            line_height_mm: 5.0,
            body_font_pt: 10.0,
            title_font_pt: 14.0,
            section_font_pt: 11.0,
            score_column_mm: 35.0,
            logo_width_mm: 30.0,
        }
    }
}

impl ReportLayout {
    pub fn content_width_mm(&self) -> f32 {
        self.page_width_mm - self.margin_mm * 2.0
    }

    /// 本文の開始Y座標（printpdf は左下原点）
    pub fn top_y_mm(&self) -> f32 {
        self.page_height_mm - self.margin_mm
    }

    /// 本文を書ける下限Y座標
    pub fn bottom_y_mm(&self) -> f32 {
        self.margin_mm
    }

    /// 1文字あたりの幅の見積もり
    pub fn char_width_mm(&self, font_pt: f32) -> f32 {
        font_pt * MM_PER_PT * UPPERCASE_EM_RATIO
    }

    /// 文字列の描画幅の見積もり
    pub fn text_width_mm(&self, text: &str, font_pt: f32) -> f32 {
        text.chars().count() as f32 * self.char_width_mm(font_pt)
    }

    /// 指定幅に収まる文字数
    pub fn chars_for_width(&self, width_mm: f32, font_pt: f32) -> usize {
        ((width_mm / self.char_width_mm(font_pt)).floor() as usize).max(1)
    }

    /// 本文1行の最大文字数
    pub fn body_chars_per_line(&self) -> usize {
        self.chars_for_width(self.content_width_mm(), self.body_font_pt)
    }

    /// 採点表ラベル列の最大文字数（左右の余白 2mm を除く）
    pub fn table_label_chars(&self) -> usize {
        self.chars_for_width(
            self.content_width_mm() - self.score_column_mm - 4.0,
            self.body_font_pt,
        )
    }
}

/// 採点表の1行
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRow {
    pub category: Category,
    pub label: &'static str,
    pub score: f64,
}

impl ScoreRow {
    /// "4 / 5" 形式
    pub fn display_score(&self) -> String {
        format!("{} / 5", format_number(self.score))
    }
}

/// セクション内の要素
#[derive(Debug, Clone, PartialEq)]
pub enum ReportBlock {
    /// "ラベル: 値" の1行
    Field { label: &'static str, value: String },
    /// 平均点と評価ラベルの枠
    Summary { average: String, label: String },
    /// カテゴリ別の採点表
    ScoreTable(Vec<ScoreRow>),
    /// 見出し付き（または見出しなし）の自由記述
    Paragraph { label: Option<&'static str>, text: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportSection {
    pub title: String,
    pub blocks: Vec<ReportBlock>,
}

/// レポート文書
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub branding: ReportBranding,
    pub title: String,
    pub subtitle: String,
    pub sections: Vec<ReportSection>,
    pub footer: String,
}

impl ReportDocument {
    /// 全ブロックを順に走査
    pub fn blocks(&self) -> impl Iterator<Item = &ReportBlock> {
        self.sections.iter().flat_map(|s| s.blocks.iter())
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value.to_uppercase()
    }
}

/// 評価結果からレポート文書を構築
pub fn build_report(record: &EvaluationRecord, branding: &ReportBranding) -> ReportDocument {
    let identification = ReportSection {
        title: "1. Employee identification".to_string(),
        blocks: vec![
            field("Company", &branding.company_name),
            field("Area / Process", &record.area),
            field("Role", &record.role),
            field("Employee name", &record.name),
            field("Immediate supervisor", &record.supervisor),
            field("Evaluated period", &record.period),
            field("Evaluation date", &record.date),
        ],
    };

    let summary = ReportSection {
        title: "2. Performance summary".to_string(),
        blocks: vec![
            ReportBlock::Summary {
                average: format!("AVERAGE: {:.1}", record.average),
                label: format!("PERFORMANCE: {}", record.label.as_str().to_uppercase()),
            },
            ReportBlock::Paragraph {
                label: Some("Immediate supervisor comment"),
                text: or_placeholder(&record.supervisor_comment, NO_COMMENT),
            },
        ],
    };

    let scores = ReportSection {
        title: "3. Role performance (1 to 5)".to_string(),
        blocks: vec![ReportBlock::ScoreTable(score_rows(record))],
    };

    let contributions = ReportSection {
        title: "4. Contributions".to_string(),
        blocks: vec![ReportBlock::Paragraph {
            label: None,
            text: or_placeholder(&record.contributions, NO_CONTRIBUTIONS),
        }],
    };

    let plan = ReportSection {
        title: "5. Improvement plan".to_string(),
        blocks: vec![ReportBlock::Paragraph {
            label: Some("Improvement action"),
            text: or_placeholder(&record.improvement_plan, NO_PLAN),
        }],
    };

    let footer = format!(
        "This form is the record of the employee's performance and competency evaluation, \
         in line with the internal policies of {} and the guidelines of the Quality Management System.",
        branding.company_name
    );

    ReportDocument {
        branding: branding.clone(),
        title: REPORT_TITLE.to_string(),
        subtitle: REPORT_SUBTITLE.to_string(),
        sections: vec![identification, summary, scores, contributions, plan],
        footer,
    }
}

fn field(label: &'static str, value: &str) -> ReportBlock {
    ReportBlock::Field {
        label,
        value: or_placeholder(value, EMPTY_FIELD),
    }
}

/// 評価済みカテゴリのみ、種別のカテゴリ表の順で並べる
pub fn score_rows(record: &EvaluationRecord) -> Vec<ScoreRow> {
    record
        .evaluation_type
        .categories()
        .filter_map(|spec| {
            let score = record.scores.get(&spec.category).copied().unwrap_or(0.0);
            is_valid_score(score).then(|| ScoreRow {
                category: spec.category,
                label: spec.category.label(record.evaluation_type),
                score,
            })
        })
        .collect()
}

/// 単語単位で折り返す（1単語が幅を超える場合は文字単位で分割）
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();

            if word_len > width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let chars: Vec<char> = word.chars().collect();
                for chunk in chars.chunks(width) {
                    let piece: String = chunk.iter().collect();
                    if chunk.len() == width {
                        lines.push(piece);
                    } else {
                        current_len = chunk.len();
                        current = piece;
                    }
                }
                continue;
            }

            if current.is_empty() {
                current.push_str(word);
                current_len = word_len;
            } else if current_len + 1 + word_len <= width {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
                current_len = word_len;
            }
        }

        if !current.is_empty() || paragraph.trim().is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// ダウンロードファイル名: evaluacion_<名前>_<ID>.pdf
pub fn report_file_name(record: &EvaluationRecord, extension: &str) -> String {
    let safe: String = record
        .name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("evaluacion_{}_{}.{}", safe.replace(' ', "_"), record.id, extension)
}
