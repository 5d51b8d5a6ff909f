//! Eval Report Common Library
//!
//! 評価シートの列判定・採点・レポート文書モデル（I/Oを含まない純粋ロジック）

pub mod types;
pub mod error;
pub mod header;
pub mod evaluation_type;
pub mod scores;
pub mod period;
pub mod assembler;
pub mod extract;
pub mod report;

pub use types::{CellValue, EvaluationBatch, EvaluationRecord, ErrorResponse, PerformanceLabel, Sheet, UploadResponse};
pub use error::{Error, Result};
pub use header::{find_column, normalize_text, MatchMode};
pub use evaluation_type::{Category, EvaluationType};
pub use scores::extract_category_scores;
pub use period::derive_period;
pub use assembler::{assemble_record, ColumnMap, ExtractOptions};
pub use extract::extract_evaluations;
pub use report::{build_report, report_file_name, wrap_text, ReportBranding, ReportDocument, ReportLayout};
