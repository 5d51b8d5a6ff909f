//! レポート出力（PDF/HTML・フォールバック）の統合テスト

use eval_report::config::Config;
use eval_report::error::{EvalReportError, Result};
use eval_report::export::html::{render_html, WkhtmltopdfRenderer};
use eval_report::export::pdf::PrintPdfRenderer;
use eval_report::export::{
    export_records, output_path_for_record, RenderChain, RendererKind, ReportFormat, ReportRenderer,
};
use eval_report_common::types::CategoryScores;
use eval_report_common::{
    build_report, Category, EvaluationRecord, EvaluationType, PerformanceLabel, ReportBranding,
    ReportDocument,
};
use tempfile::tempdir;

fn create_test_record(id: u32, name: &str) -> EvaluationRecord {
    let mut scores = CategoryScores::new();
    scores.insert(Category::Organization, 5.0);
    scores.insert(Category::Leadership, 4.0);
    scores.insert(Category::Management, 0.0);

    EvaluationRecord {
        id,
        name: name.to_string(),
        role: "GERENTE DE PLANTA".to_string(),
        area: "PRODUCCIÓN".to_string(),
        supervisor: "DIRECTOR GENERAL".to_string(),
        date: "2024-06-30".to_string(),
        period: "PRIMER SEMESTRE 2024".to_string(),
        average: 4.5,
        label: PerformanceLabel::Outstanding,
        supervisor_comment: "LIDERA SU EQUIPO CON CLARIDAD Y CONSTANCIA".to_string(),
        contributions: "REDISEÑO DEL PROCESO DE EMPAQUE".to_string(),
        improvement_plan: String::new(),
        evaluation_type: EvaluationType::Directive,
        scores,
    }
}

/// 常に失敗するレンダラー
struct FailingRenderer(&'static str);

impl ReportRenderer for FailingRenderer {
    fn name(&self) -> &'static str {
        self.0
    }

    fn render(&self, _doc: &ReportDocument, _logo: Option<&[u8]>) -> Result<Vec<u8>> {
        Err(EvalReportError::PdfGeneration(format!("{} unavailable", self.0)))
    }
}

fn sample_doc() -> ReportDocument {
    build_report(&create_test_record(1, "ANA PÉREZ"), &ReportBranding::default())
}

#[test]
fn test_printpdf_renderer_output() {
    let bytes = PrintPdfRenderer::default()
        .render(&sample_doc(), None)
        .expect("PDF生成失敗");
    assert!(bytes.starts_with(b"%PDF"), "PDFヘッダーがない");
    assert!(bytes.len() > 500);
}

#[test]
fn test_chain_falls_back_to_next_renderer() {
    let chain = RenderChain::new(vec![
        Box::new(FailingRenderer("first")),
        Box::new(PrintPdfRenderer::default()),
    ]);
    assert_eq!(chain.names(), vec!["first", "printpdf"]);

    let bytes = chain.render(&sample_doc(), None).expect("フォールバック失敗");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_chain_combines_all_errors() {
    let chain = RenderChain::new(vec![
        Box::new(FailingRenderer("first")),
        Box::new(FailingRenderer("second")),
    ]);

    let err = chain.render(&sample_doc(), None).unwrap_err();
    match err {
        EvalReportError::AllRenderersFailed(message) => {
            assert!(message.contains("first: "));
            assert!(message.contains("; second: "));
        }
        other => panic!("想定外のエラー: {:?}", other),
    }
}

#[test]
fn test_missing_converter_falls_back() {
    let chain = RenderChain::new(vec![
        Box::new(WkhtmltopdfRenderer::new("/nonexistent/wkhtmltopdf")),
        Box::new(PrintPdfRenderer::default()),
    ]);
    let bytes = chain.render(&sample_doc(), None).expect("フォールバック失敗");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_html_contains_all_sections() {
    let record = create_test_record(1, "ANA PÉREZ");
    let html = render_html(&build_report(&record, &ReportBranding::default()), None);

    assert!(html.contains("ANA PÉREZ"));
    assert!(html.contains(&record.supervisor_comment));
    assert!(html.contains(&record.contributions));
    assert!(html.contains("NO IMPROVEMENT PLAN RECORDED"));
    assert!(html.contains("Strategic organization and planning"));
    assert!(html.contains("5 / 5"));
    // 未評価カテゴリは表に出ない
    assert!(!html.contains("Efficient resource management"));
    assert!(html.contains("FT-RH-042"));
}

#[test]
fn test_html_embeds_logo() {
    let logo = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    let html = render_html(&sample_doc(), Some(&logo));
    assert!(html.contains("data:image/png;base64,"));
}

#[test]
fn test_export_records_to_directory() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = Config {
        renderers: vec![RendererKind::Printpdf],
        ..Config::default()
    };
    let records = vec![create_test_record(1, "ANA PÉREZ"), create_test_record(4, "JOSÉ D'ÁVILA")];

    let written = export_records(&records, ReportFormat::Pdf, dir.path(), &config).expect("出力失敗");
    assert_eq!(written.len(), 2);
    assert!(dir.path().join("evaluacion_ANA_PÉREZ_1.pdf").exists());
    assert!(dir.path().join("evaluacion_JOSÉ_D_ÁVILA_4.pdf").exists());

    for path in &written {
        let metadata = std::fs::metadata(path).expect("ファイルメタデータ取得失敗");
        assert!(metadata.len() > 0, "PDFファイルが空");
    }
}

#[test]
fn test_export_html_format() {
    let dir = tempdir().expect("Failed to create temp dir");
    let records = vec![create_test_record(2, "ANA PÉREZ")];

    let written =
        export_records(&records, ReportFormat::Html, dir.path(), &Config::default()).expect("出力失敗");
    let content = std::fs::read_to_string(&written[0]).expect("HTML読み込み失敗");
    assert!(written[0].ends_with("evaluacion_ANA_PÉREZ_2.html"));
    assert!(content.contains("LIDERA SU EQUIPO CON CLARIDAD Y CONSTANCIA"));
}

#[test]
fn test_output_path_for_explicit_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let record = create_test_record(1, "ANA");

    let explicit = dir.path().join("reporte.pdf");
    assert_eq!(output_path_for_record(&explicit, &record, ReportFormat::Pdf), explicit);
    assert_eq!(
        output_path_for_record(dir.path(), &record, ReportFormat::Pdf),
        dir.path().join("evaluacion_ANA_1.pdf")
    );
}

#[test]
fn test_renderer_kind_parse() {
    assert_eq!("printpdf".parse::<RendererKind>(), Ok(RendererKind::Printpdf));
    assert_eq!("WKHTMLTOPDF".parse::<RendererKind>(), Ok(RendererKind::Wkhtmltopdf));
    assert!("latex".parse::<RendererKind>().is_err());
    assert_eq!("html".parse::<ReportFormat>(), Ok(ReportFormat::Html));
}
