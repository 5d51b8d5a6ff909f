//! シート解析とレポート対象の選択

use crate::config::Config;
use crate::error::Result;
use crate::reader;
use eval_report_common::{extract_evaluations, EvaluationBatch, EvaluationRecord, UploadResponse};
use serde::Deserialize;
use std::path::Path;

/// ファイルを検証・読み込みし、評価結果を抽出
pub fn parse_file(path: &Path, config: &Config) -> Result<EvaluationBatch> {
    let sheet = reader::load_sheet(path, config.max_upload_bytes)?;
    let batch = extract_evaluations(&sheet, &config.extract_options());
    Ok(batch)
}

/// report コマンドの入力（解析結果 / レコード配列 / 単一レコード）
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Upload(UploadResponse),
    Records(Vec<EvaluationRecord>),
    Single(Box<EvaluationRecord>),
}

pub fn parse_payload(json: &str) -> Result<Vec<EvaluationRecord>> {
    let payload: Payload = serde_json::from_str(json)?;
    Ok(match payload {
        Payload::Upload(response) => response.evaluations,
        Payload::Records(records) => records,
        Payload::Single(record) => vec![*record],
    })
}

pub fn load_payload(path: &Path) -> Result<Vec<EvaluationRecord>> {
    let content = std::fs::read_to_string(path)?;
    parse_payload(&content)
}

/// ID指定があればその1件、なければ全件
pub fn select_records(records: Vec<EvaluationRecord>, id: Option<u32>) -> Result<Vec<EvaluationRecord>> {
    match id {
        Some(id) => {
            let record = records
                .into_iter()
                .find(|r| r.id == id)
                .ok_or(eval_report_common::Error::RecordNotFound(id))?;
            Ok(vec![record])
        }
        None => Ok(records),
    }
}
