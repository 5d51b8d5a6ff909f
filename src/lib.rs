//! eval-report: 評価シート解析・評価レポート生成
//!
//! 純粋ロジックは `eval_report_common`、このクレートは
//! ファイル読み込み・設定・レポート描画・CLI を受け持つ。

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod reader;
