//! エラーケーステスト
//!
//! 入力不備・解析失敗の分類と終了コードを検証

use eval_report::config::Config;
use eval_report::error::{ErrorCategory, EvalReportError};
use eval_report::{pipeline, reader};
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないファイル
#[test]
fn test_missing_file() {
    let err = pipeline::parse_file(Path::new("/nonexistent/evaluaciones.xlsx"), &Config::default())
        .unwrap_err();
    assert!(matches!(err, EvalReportError::FileNotFound(_)));
    assert_eq!(err.category(), ErrorCategory::Input);
    assert_eq!(err.exit_code(), 2);
}

/// 拡張子が .xlsx / .xls 以外
#[test]
fn test_wrong_extension() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("evaluaciones.csv");
    std::fs::write(&path, "NOMBRE,PROMEDIO\nANA,4\n").expect("ファイル作成失敗");

    let err = pipeline::parse_file(&path, &Config::default()).unwrap_err();
    assert!(matches!(err, EvalReportError::InvalidExtension(_)));
    assert_eq!(err.exit_code(), 2);
}

/// サイズ上限超過
#[test]
fn test_file_too_large() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("grande.xlsx");
    std::fs::write(&path, vec![0u8; 2048]).expect("ファイル作成失敗");

    let err = reader::validate_input(&path, 1024).unwrap_err();
    assert!(matches!(err, EvalReportError::FileTooLarge { size: 2048, limit: 1024 }));
    assert_eq!(err.category(), ErrorCategory::Input);
}

/// 壊れたファイルは解析エラー
#[test]
fn test_corrupt_workbook() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("roto.xlsx");
    std::fs::write(&path, b"this is not a zip archive").expect("ファイル作成失敗");

    let err = pipeline::parse_file(&path, &Config::default()).unwrap_err();
    assert!(matches!(err, EvalReportError::Spreadsheet(_)));
    assert_eq!(err.category(), ErrorCategory::Parse);
    assert_eq!(err.exit_code(), 1);
}

/// 空のワークシート
#[test]
fn test_empty_worksheet() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("vacio.xlsx");
    let mut workbook = Workbook::new();
    workbook.add_worksheet();
    workbook.save(&path).expect("ワークブック保存失敗");

    let err = pipeline::parse_file(&path, &Config::default()).unwrap_err();
    assert!(matches!(
        err,
        EvalReportError::Common(eval_report_common::Error::EmptySheet)
    ));
    assert_eq!(err.category(), ErrorCategory::Parse);
}

/// 壊れた入力JSON
#[test]
fn test_invalid_payload() {
    let err = pipeline::parse_payload("{\"foo\": 1}").unwrap_err();
    assert!(matches!(err, EvalReportError::JsonParse(_)));
}

/// EvalReportErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        EvalReportError::Config("テスト設定エラー".to_string()),
        EvalReportError::FileNotFound("a.xlsx".to_string()),
        EvalReportError::InvalidExtension("a.csv".to_string()),
        EvalReportError::FileTooLarge { size: 10, limit: 5 },
        EvalReportError::Spreadsheet("壊れている".to_string()),
        EvalReportError::PdfGeneration("PDF生成エラー".to_string()),
        EvalReportError::AllRenderersFailed("a: x; b: y".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// 共通ライブラリのエラーはそのまま表示される
#[test]
fn test_common_error_transparent() {
    let err = EvalReportError::from(eval_report_common::Error::RecordNotFound(7));
    assert_eq!(err.to_string(), "Evaluation not found: 7");
    assert_eq!(err.exit_code(), 2);
}
