use crate::export::ReportFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "eval-report")]
#[command(about = "評価シート解析・評価レポート生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 評価シートを解析してJSONを出力
    Parse {
        /// 評価シート（.xlsx / .xls）
        #[arg(required = true)]
        input: PathBuf,

        /// 出力JSONファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 解析結果JSONから評価レポートを生成
    Report {
        /// parse の出力JSON（またはレコード単体のJSON）
        #[arg(required = true)]
        input: PathBuf,

        /// 対象の参照ID（省略時は全件）
        #[arg(long)]
        id: Option<u32>,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (pdf/html)
        #[arg(short, long, default_value = "pdf")]
        format: ReportFormat,
    },

    /// 解析からレポート出力まで一括実行
    Run {
        /// 評価シート（.xlsx / .xls）
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (pdf/html)
        #[arg(short, long, default_value = "pdf")]
        format: ReportFormat,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 既定値で設定ファイルを作成
        #[arg(long)]
        init: bool,

        /// ロゴ画像を設定
        #[arg(long)]
        set_logo: Option<PathBuf>,

        /// 会社名を設定
        #[arg(long)]
        set_company: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_report_args() {
        let cli = Cli::try_parse_from([
            "eval-report", "report", "out.json", "--id", "4", "--format", "html", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Report { id, format, .. } => {
                assert_eq!(id, Some(4));
                assert_eq!(format, ReportFormat::Html);
            }
            _ => panic!("report コマンドとして解析されていない"),
        }
    }
}
