//! HTMLレポート生成と wkhtmltopdf ブリッジ
//!
//! HTML を一時ファイルに書き出し、外部コマンドで PDF に変換して読み戻す。

use super::ReportRenderer;
use crate::error::{EvalReportError, Result};
use base64::Engine as _;
use eval_report_common::report::{ReportBlock, ReportDocument};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::Command;

const STYLE: &str = r#"
body { font-family: Helvetica, Arial, sans-serif; font-size: 10pt; margin: 20mm; color: #000; }
table.header { width: 100%; border-collapse: collapse; margin-bottom: 12px; }
table.header td { border: 1px solid #999; padding: 4px; text-align: center; }
td.logo img { max-width: 30mm; max-height: 20mm; }
h1 { font-size: 14pt; text-align: center; margin: 8px 0 2px; }
p.subtitle { text-align: center; font-style: italic; margin: 0 0 12px; }
h2 { font-size: 11pt; background: #e6e6e6; padding: 3px 6px; margin: 14px 0 6px; }
p.field { margin: 2px 0; }
table.summary { border-collapse: collapse; margin: 6px auto; }
table.summary td { border: 1px solid #888; background: #d3d3d3; padding: 8px 24px; font-weight: bold; text-align: center; }
table.scores { width: 100%; border-collapse: collapse; }
table.scores td { border: 1px solid #888; padding: 4px 6px; vertical-align: top; }
table.scores td.score { text-align: center; width: 20%; }
div.footer { border: 1px solid #d3d3d3; padding: 5px; margin-top: 20px; }
"#;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// 先頭バイトから画像の MIME を推定
fn image_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8]) {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF8") {
        "image/gif"
    } else {
        "application/octet-stream"
    }
}

/// ロゴを data URI に変換
pub fn logo_data_uri(bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", image_mime(bytes), encoded)
}

/// 文書を単一の HTML に描画
pub fn render_html(doc: &ReportDocument, logo: Option<&[u8]>) -> String {
    let mut html = String::new();
    let b = &doc.branding;

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n",
        escape_html(&doc.title),
        STYLE
    );

    // ヘッダー（ロゴ / 会社名 / 様式情報）
    let logo_cell = match logo {
        Some(bytes) => format!("<img src=\"{}\" alt=\"logo\">", logo_data_uri(bytes)),
        None => escape_html(&b.company_name),
    };
    let _ = write!(
        html,
        "<table class=\"header\"><tr>\
         <td class=\"logo\" rowspan=\"2\">{}</td>\
         <td rowspan=\"2\"><strong>{}</strong></td>\
         <td>Code: {}</td></tr>\
         <tr><td>Version: {} &nbsp; Valid from: {}</td></tr></table>\n",
        logo_cell,
        escape_html(&b.company_name),
        escape_html(&b.form_code),
        escape_html(&b.form_version),
        escape_html(&b.form_validity),
    );

    let _ = writeln!(html, "<h1>{}</h1>", escape_html(&doc.title));
    let _ = writeln!(html, "<p class=\"subtitle\">{}</p>", escape_html(&doc.subtitle));

    for section in &doc.sections {
        let _ = writeln!(html, "<h2>{}</h2>", escape_html(&section.title));
        for block in &section.blocks {
            render_block(&mut html, block);
        }
    }

    let _ = writeln!(html, "<div class=\"footer\">{}</div>", escape_html(&doc.footer));
    html.push_str("</body>\n</html>\n");
    html
}

fn render_block(html: &mut String, block: &ReportBlock) {
    match block {
        ReportBlock::Field { label, value } => {
            let _ = writeln!(
                html,
                "<p class=\"field\"><strong>{}:</strong> {}</p>",
                escape_html(label),
                escape_html(value)
            );
        }
        ReportBlock::Summary { average, label } => {
            let _ = writeln!(
                html,
                "<table class=\"summary\"><tr><td>{}</td><td>{}</td></tr></table>",
                escape_html(average),
                escape_html(label)
            );
        }
        ReportBlock::ScoreTable(rows) => {
            if rows.is_empty() {
                html.push_str("<p>-</p>\n");
                return;
            }
            html.push_str("<table class=\"scores\">\n");
            for row in rows {
                let _ = writeln!(
                    html,
                    "<tr><td><strong>{}:</strong></td><td class=\"score\">{}</td></tr>",
                    escape_html(row.label),
                    escape_html(&row.display_score())
                );
            }
            html.push_str("</table>\n");
        }
        ReportBlock::Paragraph { label, text } => {
            html.push_str("<p>");
            if let Some(label) = label {
                let _ = write!(html, "<strong>{}:</strong><br>", escape_html(label));
            }
            let _ = writeln!(html, "{}</p>", escape_html(text));
        }
    }
}

/// wkhtmltopdf で PDF 化するバックエンド
pub struct WkhtmltopdfRenderer {
    program: String,
}

impl WkhtmltopdfRenderer {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }

    fn temp_paths() -> Result<(PathBuf, PathBuf)> {
        let stamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|e| EvalReportError::HtmlConversion(format!("時刻取得エラー: {}", e)))?
            .as_millis();
        let dir = std::env::temp_dir();
        let base = format!("eval-report-{}-{}", std::process::id(), stamp);
        Ok((
            dir.join(format!("{}.html", base)),
            dir.join(format!("{}.pdf", base)),
        ))
    }
}

impl ReportRenderer for WkhtmltopdfRenderer {
    fn name(&self) -> &'static str {
        "wkhtmltopdf"
    }

    fn render(&self, doc: &ReportDocument, logo: Option<&[u8]>) -> Result<Vec<u8>> {
        let (html_path, pdf_path) = Self::temp_paths()?;
        std::fs::write(&html_path, render_html(doc, logo))
            .map_err(|e| EvalReportError::HtmlConversion(format!("HTML保存エラー: {}", e)))?;

        let output = Command::new(&self.program)
            .arg("--quiet")
            .arg("--encoding")
            .arg("utf-8")
            .arg("--page-size")
            .arg("A4")
            .arg(&html_path)
            .arg(&pdf_path)
            .output();

        let _ = std::fs::remove_file(&html_path);

        let output = output.map_err(|e| {
            EvalReportError::HtmlConversion(format!("{} 起動エラー: {}", self.program, e))
        })?;

        if !output.status.success() {
            let _ = std::fs::remove_file(&pdf_path);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EvalReportError::HtmlConversion(format!(
                "{} 失敗: {}",
                self.program,
                stderr.trim()
            )));
        }

        let bytes = std::fs::read(&pdf_path)
            .map_err(|e| EvalReportError::HtmlConversion(format!("PDF読み込みエラー: {}", e)))?;
        let _ = std::fs::remove_file(&pdf_path);
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("A & B <x> \"q\""), "A &amp; B &lt;x&gt; &quot;q&quot;");
        assert_eq!(escape_html("O'NEIL"), "O&#39;NEIL");
    }

    #[test]
    fn test_logo_data_uri_mime() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A];
        assert!(logo_data_uri(&png).starts_with("data:image/png;base64,"));
        assert!(logo_data_uri(&[0xFF, 0xD8, 0xFF]).starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_missing_program_fails() {
        let renderer = WkhtmltopdfRenderer::new("/nonexistent/wkhtmltopdf-binary");
        let doc = ReportDocument {
            branding: Default::default(),
            title: "T".into(),
            subtitle: "S".into(),
            sections: vec![],
            footer: "F".into(),
        };
        let err = renderer.render(&doc, None).unwrap_err();
        assert!(matches!(err, EvalReportError::HtmlConversion(_)));
    }
}
