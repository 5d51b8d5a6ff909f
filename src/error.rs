use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvalReportError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("対応していないファイル形式です: {0}（.xlsx / .xls のみ）")]
    InvalidExtension(String),

    #[error("ファイルサイズが上限を超えています: {size} bytes（上限 {limit} bytes）")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("スプレッドシート読み込みエラー: {0}")]
    Spreadsheet(String),

    #[error("PDF生成エラー: {0}")]
    PdfGeneration(String),

    #[error("HTML→PDF変換エラー: {0}")]
    HtmlConversion(String),

    #[error("すべてのレンダラーが失敗しました: {0}")]
    AllRenderersFailed(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] eval_report_common::Error),
}

/// エラー分類（終了コード・ログの出し分けに使う）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 入力ファイルの不備（利用者が直せるもの）
    Input,
    /// シートの解析失敗
    Parse,
    /// レポート描画の失敗
    Render,
    Internal,
}

impl EvalReportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EvalReportError::FileNotFound(_)
            | EvalReportError::InvalidExtension(_)
            | EvalReportError::FileTooLarge { .. } => ErrorCategory::Input,
            EvalReportError::Spreadsheet(_) | EvalReportError::JsonParse(_) => ErrorCategory::Parse,
            EvalReportError::Common(eval_report_common::Error::EmptySheet) => ErrorCategory::Parse,
            EvalReportError::Common(eval_report_common::Error::Json(_)) => ErrorCategory::Parse,
            EvalReportError::Common(eval_report_common::Error::RecordNotFound(_)) => {
                ErrorCategory::Input
            }
            EvalReportError::PdfGeneration(_)
            | EvalReportError::HtmlConversion(_)
            | EvalReportError::AllRenderersFailed(_) => ErrorCategory::Render,
            EvalReportError::Config(_) | EvalReportError::Io(_) => ErrorCategory::Internal,
        }
    }

    /// プロセス終了コード（入力不備は 2、それ以外は 1）
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Input => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, EvalReportError>;
