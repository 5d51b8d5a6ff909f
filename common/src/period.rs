//! 評価期間の判定
//!
//! 期間列の値は自由記述で、別の設問の回答が紛れ込むことがあるため
//! 禁止語と長さで検証する。使えない場合は評価日から年を取り出す。

use crate::header::normalize_text;
use chrono::{Datelike, NaiveDate};
use regex::Regex;

/// 年が取れない場合の既定値
pub const DEFAULT_PERIOD_YEAR: &str = "2025";

/// 期間として受け付ける最大文字数
pub const MAX_PERIOD_CHARS: usize = 25;

/// 期間の値に含まれていたら不採用とする語
pub const PERIOD_BLACKLIST: &[&str] = &[
    "ANALISIS",
    "COMENTARIO",
    "OBSERVACION",
    "FORTALEZA",
    "DEBILIDAD",
    "APORTES",
    "PLAN",
    "MEJORA",
    "QUE",
    "COMO",
    "CONSIDERA",
    "TRA",
    "BAJO",
    "MEDIO",
    "ALTO",
    "RESPONSABILIDAD",
    "GESTION",
];

/// 評価日の解析フォーマット（先頭から順に試す）
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y", "%Y%m%d", "%d.%m.%Y"];

/// 期間の不採用理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodRejection {
    Empty,
    Blacklisted(&'static str),
    TooLong(usize),
}

/// 期間列の値を検証
pub fn validate_period(raw: &str) -> Result<String, PeriodRejection> {
    let value = raw.trim();
    if value.is_empty() || value == "None" {
        return Err(PeriodRejection::Empty);
    }

    let upper = normalize_text(value);
    if let Some(word) = PERIOD_BLACKLIST.iter().find(|w| upper.contains(*w)) {
        return Err(PeriodRejection::Blacklisted(word));
    }

    let chars = value.chars().count();
    if chars > MAX_PERIOD_CHARS {
        return Err(PeriodRejection::TooLong(chars));
    }

    Ok(value.to_string())
}

/// 日付文字列から年を取り出す
pub fn extract_year(date: &str, default_year: &str) -> String {
    lazy_static::lazy_static! {
        static ref YEAR_RE: Regex = Regex::new(r"(19|20)\d{2}").unwrap();
    }

    let date = date.trim();

    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(date, fmt) {
            log::debug!("Year from date '{}' (format {}): {}", date, fmt, parsed.year());
            return parsed.year().to_string();
        }
    }

    if let Some(m) = YEAR_RE.find(date) {
        log::debug!("Year from date '{}' (pattern): {}", date, m.as_str());
        return m.as_str().to_string();
    }

    log::debug!("No year in date '{}', using default {}", date, default_year);
    default_year.to_string()
}

/// 期間を決定（列の値が有効ならそれ、無効なら評価日の年）
pub fn derive_period(explicit: Option<&str>, date: &str, default_year: &str, subject: &str) -> String {
    if let Some(raw) = explicit {
        match validate_period(raw) {
            Ok(period) => {
                log::debug!("[{}] Period accepted: '{}'", subject, period);
                return period;
            }
            Err(PeriodRejection::Empty) => {}
            Err(reason) => {
                log::debug!("[{}] Period rejected: '{}' ({:?})", subject, raw.trim(), reason);
            }
        }
    }

    extract_year(date, default_year)
}
