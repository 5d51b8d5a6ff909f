pub mod pdf;
pub mod html;

use crate::config::Config;
use crate::error::{EvalReportError, Result};
use eval_report_common::{build_report, report_file_name, EvaluationRecord, ReportDocument};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// レポート描画バックエンド
pub trait ReportRenderer {
    fn name(&self) -> &'static str;

    /// 文書を描画してバイト列を返す
    fn render(&self, doc: &ReportDocument, logo: Option<&[u8]>) -> Result<Vec<u8>>;
}

/// 設定で指定するバックエンド種別
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// HTML → 外部コマンドで PDF 化
    Wkhtmltopdf,
    /// printpdf で直接描画
    Printpdf,
}

impl std::str::FromStr for RendererKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wkhtmltopdf" | "html" => Ok(RendererKind::Wkhtmltopdf),
            "printpdf" | "native" => Ok(RendererKind::Printpdf),
            _ => Err(format!("Unknown renderer: {}. Use wkhtmltopdf or printpdf", s)),
        }
    }
}

/// 順に試し、最初に成功したものを採用する
pub struct RenderChain {
    renderers: Vec<Box<dyn ReportRenderer>>,
}

impl RenderChain {
    pub fn new(renderers: Vec<Box<dyn ReportRenderer>>) -> Self {
        Self { renderers }
    }

    pub fn from_config(config: &Config) -> Self {
        let renderers = config
            .renderers
            .iter()
            .map(|kind| -> Box<dyn ReportRenderer> {
                match kind {
                    RendererKind::Wkhtmltopdf => {
                        Box::new(html::WkhtmltopdfRenderer::new(&config.wkhtmltopdf_path))
                    }
                    RendererKind::Printpdf => Box::new(pdf::PrintPdfRenderer::default()),
                }
            })
            .collect();
        Self::new(renderers)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.renderers.iter().map(|r| r.name()).collect()
    }

    pub fn render(&self, doc: &ReportDocument, logo: Option<&[u8]>) -> Result<Vec<u8>> {
        let mut failures = Vec::new();

        for renderer in &self.renderers {
            match renderer.render(doc, logo) {
                Ok(bytes) => {
                    log::debug!("Rendered with {} ({} bytes)", renderer.name(), bytes.len());
                    return Ok(bytes);
                }
                Err(e) => {
                    log::warn!("Renderer {} failed: {}", renderer.name(), e);
                    failures.push(format!("{}: {}", renderer.name(), e));
                }
            }
        }

        if failures.is_empty() {
            failures.push("レンダラーが設定されていません".to_string());
        }
        Err(EvalReportError::AllRenderersFailed(failures.join("; ")))
    }
}

/// 出力形式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Pdf,
    Html,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Html => "html",
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(ReportFormat::Pdf),
            "html" | "htm" => Ok(ReportFormat::Html),
            _ => Err(format!("Unknown format: {}. Use pdf or html", s)),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// 出力先がディレクトリならレコード名から決めたファイル名を付ける
pub fn output_path_for_record(output: &Path, record: &EvaluationRecord, format: ReportFormat) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(report_file_name(record, format.extension()))
    } else {
        output.to_path_buf()
    }
}

/// 1件分のレポートをバイト列で生成
pub fn render_record(
    record: &EvaluationRecord,
    format: ReportFormat,
    config: &Config,
    chain: &RenderChain,
) -> Result<Vec<u8>> {
    let doc = build_report(record, &config.branding);
    let logo = config.load_logo();

    match format {
        ReportFormat::Pdf => chain.render(&doc, logo.as_deref()),
        ReportFormat::Html => Ok(html::render_html(&doc, logo.as_deref()).into_bytes()),
    }
}

/// 複数件を出力ディレクトリに書き出す（書き出したパスを返す）
pub fn export_records(
    records: &[EvaluationRecord],
    format: ReportFormat,
    output_dir: &Path,
    config: &Config,
) -> Result<Vec<PathBuf>> {
    let chain = RenderChain::from_config(config);
    log::debug!("Renderer order: {:?}", chain.names());

    if records.len() > 1 || output_dir.extension().is_none() {
        std::fs::create_dir_all(output_dir)?;
    }

    let mut written = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let output_path = output_path_for_record(output_dir, record, format);
        println!("- [{}/{}] {} を生成中...", i + 1, records.len(), record.name);

        let bytes = render_record(record, format, config, &chain)?;
        std::fs::write(&output_path, bytes)?;

        println!("✔ {}出力: {}", format.extension().to_uppercase(), output_path.display());
        written.push(output_path);
    }

    Ok(written)
}
