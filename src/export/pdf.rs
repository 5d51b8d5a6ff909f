//! printpdf による直接描画
//!
//! A4縦・組み込み Helvetica。本文は字幅の見積もりから決めた文字数で折り返し、
//! 下端に達したら改ページする。

use super::ReportRenderer;
use crate::error::{EvalReportError, Result};
use eval_report_common::report::{wrap_text, ReportBlock, ReportDocument, ReportLayout, ScoreRow};
use printpdf::*;
use std::io::BufWriter;

/// ロゴの解像度
const LOGO_DPI: f32 = 300.0;
const MM_PER_INCH: f32 = 25.4;
/// ヘッダー中央・要約欄の文字の左余白
const CELL_PADDING_MM: f32 = 6.0;
/// ヘッダー右側の様式情報欄
const INFO_COLUMN_MM: f32 = 55.0;

#[derive(Default)]
pub struct PrintPdfRenderer {
    pub layout: ReportLayout,
}

impl ReportRenderer for PrintPdfRenderer {
    fn name(&self) -> &'static str {
        "printpdf"
    }

    fn render(&self, doc: &ReportDocument, logo: Option<&[u8]>) -> Result<Vec<u8>> {
        generate_pdf_bytes(doc, logo, &self.layout)
    }
}

fn pdf_err(context: &str, e: impl std::fmt::Display) -> EvalReportError {
    EvalReportError::PdfGeneration(format!("{}: {}", context, e))
}

/// 描画位置とページを管理する
struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layout: &'a ReportLayout,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
    pages: usize,
}

impl<'a> PageWriter<'a> {
    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(
            Mm(self.layout.page_width_mm),
            Mm(self.layout.page_height_mm),
            "Layer 1",
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = self.layout.top_y_mm();
        self.pages += 1;
        log::debug!("PDF page {} started", self.pages);
    }

    /// 残りが足りなければ改ページ
    fn ensure_space(&mut self, height_mm: f32) {
        if self.y - height_mm < self.layout.bottom_y_mm() {
            self.new_page();
        }
    }

    fn text(&mut self, text: &str, size: f32, x_mm: f32, bold: bool) {
        self.ensure_space(self.layout.line_height_mm);
        self.y -= self.layout.line_height_mm;
        let font = if bold { &self.bold } else { &self.font };
        self.layer.use_text(text, size, Mm(x_mm), Mm(self.y), font);
    }

    fn wrapped(&mut self, text: &str, size: f32, x_mm: f32, width_chars: usize, bold: bool) {
        for line in wrap_text(text, width_chars) {
            self.text(&line, size, x_mm, bold);
        }
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }

    fn rect(&self, x: f32, y_top: f32, width: f32, height: f32) {
        let points = vec![
            (Point::new(Mm(x), Mm(y_top)), false),
            (Point::new(Mm(x + width), Mm(y_top)), false),
            (Point::new(Mm(x + width), Mm(y_top - height)), false),
            (Point::new(Mm(x), Mm(y_top - height)), false),
        ];
        self.layer.add_line(Line {
            points,
            is_closed: true,
        });
    }
}

/// 文書を PDF バイト列に描画
pub fn generate_pdf_bytes(
    report: &ReportDocument,
    logo: Option<&[u8]>,
    layout: &ReportLayout,
) -> Result<Vec<u8>> {
    let (doc, page1, layer1) = PdfDocument::new(
        &report.title,
        Mm(layout.page_width_mm),
        Mm(layout.page_height_mm),
        "Layer 1",
    );

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| pdf_err("フォント追加エラー", e))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| pdf_err("フォント追加エラー", e))?;

    let layer = doc.get_page(page1).get_layer(layer1);
    layer.set_outline_thickness(0.5);
    layer.set_outline_color(Color::Rgb(Rgb::new(0.5, 0.5, 0.5, None)));

    let mut writer = PageWriter {
        doc: &doc,
        layout,
        layer,
        font,
        bold,
        y: layout.top_y_mm(),
        pages: 1,
    };

    draw_header(&mut writer, report, logo);

    writer.gap(4.0);
    writer.text(&report.title, layout.title_font_pt, layout.margin_mm + 30.0, true);
    writer.text(&report.subtitle, layout.body_font_pt, layout.margin_mm + 40.0, false);
    writer.gap(4.0);

    for section in &report.sections {
        writer.ensure_space(layout.line_height_mm * 3.0);
        writer.gap(2.0);
        writer.text(&section.title, layout.section_font_pt, layout.margin_mm, true);
        writer.gap(1.0);
        for block in &section.blocks {
            draw_block(&mut writer, block);
        }
        writer.gap(3.0);
    }

    writer.gap(4.0);
    let footer_font = layout.body_font_pt - 1.0;
    let footer_lines = wrap_text(
        &report.footer,
        layout.chars_for_width(layout.content_width_mm() - 4.0, footer_font),
    );
    let footer_height = footer_lines.len() as f32 * layout.line_height_mm + 4.0;
    writer.ensure_space(footer_height);
    let top = writer.y;
    for line in &footer_lines {
        writer.text(line, footer_font, layout.margin_mm + 2.0, false);
    }
    writer.rect(layout.margin_mm, top + 1.0, layout.content_width_mm(), footer_height);

    let pages = writer.pages;
    drop(writer);

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf).map_err(|e| pdf_err("PDF保存エラー", e))?;
    let bytes = buf.into_inner().map_err(|e| pdf_err("PDFバッファエラー", e))?;

    log::debug!("PDF generated: {} pages, {} bytes", pages, bytes.len());
    Ok(bytes)
}

fn draw_header(writer: &mut PageWriter<'_>, report: &ReportDocument, logo: Option<&[u8]>) {
    let layout = writer.layout;
    let b = &report.branding;
    let top = writer.y;
    let height = layout.header_height_mm;
    let logo_col = layout.logo_width_mm + 6.0;
    let info_col = INFO_COLUMN_MM;
    let x0 = layout.margin_mm;
    let width = layout.content_width_mm();

    writer.rect(x0, top, width, height);
    writer.rect(x0, top, logo_col, height);
    writer.rect(x0 + width - info_col, top, info_col, height);

    if let Some(bytes) = logo {
        if let Err(e) = draw_logo(writer, bytes, x0 + 3.0, top - height + 3.0) {
            log::warn!("Logo skipped: {}", e);
        }
    }

    let center_x = x0 + logo_col + 4.0;
    let name_lines = wrap_text(&b.company_name, company_name_chars(layout));
    writer.y = top - height / 2.0 + 2.0 + (name_lines.len() as f32 - 1.0) * layout.line_height_mm / 2.0;
    for line in &name_lines {
        writer.text(line, layout.section_font_pt, center_x, true);
    }

    let info_x = x0 + width - info_col + 3.0;
    writer.y = top - 4.0;
    writer.text(&format!("Code: {}", b.form_code), layout.body_font_pt - 1.0, info_x, false);
    writer.text(&format!("Version: {}", b.form_version), layout.body_font_pt - 1.0, info_x, false);
    writer.text(&format!("Valid from: {}", b.form_validity), layout.body_font_pt - 1.0, info_x, false);

    writer.y = top - height;
}

/// ロゴ画像を配置（幅をレイアウトのロゴ幅に合わせる）
fn draw_logo(writer: &PageWriter<'_>, bytes: &[u8], x_mm: f32, y_mm: f32) -> Result<()> {
    let decoded = image_crate::load_from_memory(bytes).map_err(|e| pdf_err("ロゴ読み込みエラー", e))?;
    // アルファチャンネルは落とす
    let rgb = image_crate::DynamicImage::ImageRgb8(decoded.to_rgb8());

    let native_width_mm = rgb.width() as f32 / LOGO_DPI * MM_PER_INCH;
    let native_height_mm = rgb.height() as f32 / LOGO_DPI * MM_PER_INCH;
    if native_width_mm <= 0.0 || native_height_mm <= 0.0 {
        return Err(EvalReportError::PdfGeneration("ロゴ画像が空です".into()));
    }

    let max_height_mm = writer.layout.header_height_mm - 6.0;
    let scale = (writer.layout.logo_width_mm / native_width_mm).min(max_height_mm / native_height_mm);

    Image::from_dynamic_image(&rgb).add_to_layer(
        writer.layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x_mm)),
            translate_y: Some(Mm(y_mm)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(LOGO_DPI),
            ..Default::default()
        },
    );
    Ok(())
}

/// 要約欄（平均・評価）の1マスの幅
pub fn summary_cell_width(layout: &ReportLayout) -> f32 {
    layout.content_width_mm() / 2.0
}

/// ヘッダー中央の会社名1行の最大文字数
fn company_name_chars(layout: &ReportLayout) -> usize {
    let width = layout.content_width_mm() - (layout.logo_width_mm + 6.0) - INFO_COLUMN_MM - 8.0;
    layout.chars_for_width(width, layout.section_font_pt)
}

/// 自由記述の段落を本文幅で折り返した行
pub fn paragraph_lines(text: &str, layout: &ReportLayout) -> Vec<String> {
    wrap_text(text, layout.body_chars_per_line())
}

fn draw_block(writer: &mut PageWriter<'_>, block: &ReportBlock) {
    let layout = writer.layout;
    let x = layout.margin_mm;

    match block {
        ReportBlock::Field { label, value } => {
            let line = format!("{}: {}", label, value);
            writer.wrapped(&line, layout.body_font_pt, x, layout.body_chars_per_line(), false);
        }
        ReportBlock::Summary { average, label } => {
            let box_height = layout.line_height_mm * 2.0;
            writer.ensure_space(box_height + 2.0);
            writer.gap(1.0);
            let top = writer.y;
            let half = summary_cell_width(layout);
            writer.rect(x, top, half, box_height);
            writer.rect(x + half, top, half, box_height);
            writer.gap(1.5);
            writer.text(average, layout.section_font_pt, x + CELL_PADDING_MM, true);
            writer.y += layout.line_height_mm;
            writer.text(label, layout.section_font_pt, x + half + CELL_PADDING_MM, true);
            writer.y = top - box_height - 1.0;
        }
        ReportBlock::ScoreTable(rows) => draw_score_table(writer, rows),
        ReportBlock::Paragraph { label, text } => {
            if let Some(label) = label {
                writer.text(&format!("{}:", label), layout.body_font_pt, x, true);
            }
            for line in paragraph_lines(text, layout) {
                writer.text(&line, layout.body_font_pt, x, false);
            }
        }
    }
}

fn draw_score_table(writer: &mut PageWriter<'_>, rows: &[ScoreRow]) {
    let layout = writer.layout;
    let x = layout.margin_mm;

    if rows.is_empty() {
        writer.text("-", layout.body_font_pt, x, false);
        return;
    }

    let width = layout.content_width_mm();
    let score_col = layout.score_column_mm;

    for row in rows {
        let lines = wrap_text(row.label, layout.table_label_chars());
        let height = lines.len() as f32 * layout.line_height_mm + 2.0;
        writer.ensure_space(height);

        let top = writer.y;
        writer.rect(x, top, width - score_col, height);
        writer.rect(x + width - score_col, top, score_col, height);

        writer.gap(0.5);
        for line in &lines {
            writer.text(line, layout.body_font_pt, x + 2.0, true);
        }
        writer.y = top - 0.5;
        writer.text(&row.display_score(), layout.body_font_pt, x + width - score_col + 10.0, false);
        writer.y = top - height;
    }
}
