use crate::error::{EvalReportError, Result};
use crate::export::RendererKind;
use eval_report_common::period::DEFAULT_PERIOD_YEAR;
use eval_report_common::{ExtractOptions, ReportBranding};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// アップロード上限（16 MiB）
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

pub const OUTPUT_DIR_ENV: &str = "EVAL_REPORT_OUTPUT_DIR";
pub const LOGO_ENV: &str = "EVAL_REPORT_LOGO";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub branding: ReportBranding,
    pub logo_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    /// 試す順番
    pub renderers: Vec<RendererKind>,
    pub wkhtmltopdf_path: String,
    pub default_period_year: String,
    pub max_upload_bytes: u64,
    /// 文章列判定でサンプルする行数
    pub text_sample_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            log::debug!("Config loaded: {}", config_path.display());
            config
        } else {
            Self::default_config()
        };

        Ok(config.with_env_overrides())
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| EvalReportError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("eval-report").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            branding: ReportBranding::default(),
            logo_path: None,
            output_dir: PathBuf::from("."),
            renderers: vec![RendererKind::Wkhtmltopdf, RendererKind::Printpdf],
            wkhtmltopdf_path: "wkhtmltopdf".into(),
            default_period_year: DEFAULT_PERIOD_YEAR.into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            text_sample_rows: 10,
        }
    }

    /// 環境変数を優先
    fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var(OUTPUT_DIR_ENV) {
            if !dir.trim().is_empty() {
                self.output_dir = PathBuf::from(dir);
            }
        }
        if let Ok(logo) = std::env::var(LOGO_ENV) {
            if !logo.trim().is_empty() {
                self.logo_path = Some(PathBuf::from(logo));
            }
        }
        self
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            default_year: self.default_period_year.clone(),
            text_sample_rows: self.text_sample_rows,
        }
    }

    /// ロゴ画像を読み込む（未設定・読めない場合は None）
    pub fn load_logo(&self) -> Option<Vec<u8>> {
        let path = self.logo_path.as_ref()?;
        match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                log::warn!("Logo not readable ({}): {}", path.display(), e);
                None
            }
        }
    }

    pub fn set_logo(&mut self, path: PathBuf) -> Result<()> {
        if !path.exists() {
            return Err(EvalReportError::FileNotFound(path.display().to_string()));
        }
        self.logo_path = Some(path);
        self.save()
    }

    pub fn set_company(&mut self, name: String) -> Result<()> {
        self.branding.company_name = name;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_use_defaults() {
        let config: Config = serde_json::from_str(r#"{"wkhtmltopdf_path": "/opt/wk"}"#).unwrap();
        assert_eq!(config.wkhtmltopdf_path, "/opt/wk");
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.renderers, vec![RendererKind::Wkhtmltopdf, RendererKind::Printpdf]);
        assert_eq!(config.branding.form_code, "FT-RH-042");
    }

    #[test]
    fn test_extract_options_from_config() {
        let config = Config {
            default_period_year: "2030".into(),
            ..Config::default()
        };
        let options = config.extract_options();
        assert_eq!(options.default_year, "2030");
        assert_eq!(options.text_sample_rows, 10);
    }

    #[test]
    fn test_load_logo_missing_file() {
        let config = Config {
            logo_path: Some(PathBuf::from("/nonexistent/logo.png")),
            ..Config::default()
        };
        assert!(config.load_logo().is_none());
    }
}
