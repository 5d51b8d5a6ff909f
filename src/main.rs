use anyhow::Context;
use clap::Parser;
use eval_report::error::{EvalReportError, ErrorCategory};
use eval_report::{cli, config, export, pipeline};
use cli::{Cli, Commands};
use config::Config;
use eval_report_common::{ErrorResponse, UploadResponse};
use std::path::Path;

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match run(cli) {
        Ok(()) => 0,
        Err(err) => {
            let code = err
                .downcast_ref::<EvalReportError>()
                .map(EvalReportError::exit_code)
                .unwrap_or(1);
            eprintln!("❌ {:#}", err);
            code
        }
    };

    std::process::exit(code);
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load().context("設定の読み込みに失敗しました")?;

    match cli.command {
        Commands::Parse { input, output } => {
            eprintln!("📊 eval-report - 評価シート解析\n");

            match pipeline::parse_file(&input, &config) {
                Ok(batch) => {
                    eprintln!("✔ {}件の評価を抽出（種別: {}）", batch.len(), batch.evaluation_type);
                    let response = UploadResponse::from(batch);
                    write_json(&response, output.as_deref())?;
                }
                Err(err) => {
                    log::error!("Parse failed for {}: {}", input.display(), err);
                    write_json(&ErrorResponse { error: user_message(&err) }, output.as_deref())?;
                    return Err(err.into());
                }
            }
        }

        Commands::Report { input, id, output, format } => {
            println!("📄 eval-report - レポート生成\n");

            let records = pipeline::load_payload(&input)
                .with_context(|| format!("入力JSONを読み込めません: {}", input.display()))?;
            let records = pipeline::select_records(records, id)?;
            println!("✔ 対象: {}件\n", records.len());

            let output_dir = output.unwrap_or_else(|| config.output_dir.clone());
            let written = export::export_records(&records, format, &output_dir, &config)?;

            println!("\n✅ {}件のレポートを出力しました", written.len());
        }

        Commands::Run { input, output, format } => {
            println!("🚀 eval-report - 一括処理\n");

            println!("[1/2] 評価シートを解析中...");
            let batch = pipeline::parse_file(&input, &config)?;
            println!("✔ {}件の評価を抽出（種別: {}）\n", batch.len(), batch.evaluation_type);

            println!("[2/2] レポートを生成中...");
            let output_dir = output.unwrap_or_else(|| config.output_dir.clone());
            let written = export::export_records(&batch.records, format, &output_dir, &config)?;

            println!("\n✅ 完了（{}件）", written.len());
        }

        Commands::Config { show, init, set_logo, set_company } => {
            let mut config = config;

            if init {
                config.save()?;
                println!("✔ 設定ファイルを作成しました: {}", Config::config_path()?.display());
            }

            if let Some(path) = set_logo {
                config.set_logo(path)?;
                println!("✔ ロゴを設定しました");
            }

            if let Some(name) = set_company {
                config.set_company(name)?;
                println!("✔ 会社名を設定しました");
            }

            if show {
                println!("設定:");
                println!("  会社名: {}", config.branding.company_name);
                println!(
                    "  様式: {} / v{} / {}",
                    config.branding.form_code, config.branding.form_version, config.branding.form_validity
                );
                println!(
                    "  ロゴ: {}",
                    config
                        .logo_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "未設定".into())
                );
                println!("  出力先: {}", config.output_dir.display());
                println!("  レンダラー: {:?}", config.renderers);
                println!("  wkhtmltopdf: {}", config.wkhtmltopdf_path);
                println!("  既定の年: {}", config.default_period_year);
                println!("  サイズ上限: {} bytes", config.max_upload_bytes);
            }
        }
    }

    Ok(())
}

/// 入力不備はそのまま、解析失敗は一般的なメッセージにする
fn user_message(err: &EvalReportError) -> String {
    match err.category() {
        ErrorCategory::Input => err.to_string(),
        _ => "評価シートを処理できませんでした".to_string(),
    }
}

fn write_json<T: serde::Serialize>(value: &T, output: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("出力できません: {}", path.display()))?;
            eprintln!("✔ 結果を保存: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
