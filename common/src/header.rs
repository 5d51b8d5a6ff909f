//! ヘッダー列の特定
//!
//! 人手で作られた評価シートは列名が統一されていないため、
//! 正規化した上で完全一致 → 部分一致の順に候補名を照合する。
//! 部分一致は双方向の包含で判定するヒューリスティックであり、
//! 無関係な列に当たる誤検出は許容している。

/// 照合モード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// 完全一致のみ
    Exact,
    /// 完全一致が無ければ部分一致も許可
    Partial,
}

/// 照合用にテキストを正規化（大文字化・アクセント除去・空白の圧縮）
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        for ch in word.chars() {
            let folded = match ch {
                'Á' | 'À' | 'Ä' | 'Â' | 'Ã' | 'á' | 'à' | 'ä' | 'â' | 'ã' => 'A',
                'É' | 'È' | 'Ë' | 'Ê' | 'é' | 'è' | 'ë' | 'ê' => 'E',
                'Í' | 'Ì' | 'Ï' | 'Î' | 'í' | 'ì' | 'ï' | 'î' => 'I',
                'Ó' | 'Ò' | 'Ö' | 'Ô' | 'Õ' | 'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'O',
                'Ú' | 'Ù' | 'Ü' | 'Û' | 'ú' | 'ù' | 'ü' | 'û' => 'U',
                'Ñ' | 'ñ' => 'N',
                'Ç' | 'ç' => 'C',
                other => other,
            };
            out.extend(folded.to_uppercase());
        }
    }

    out
}

/// 候補名リスト（優先順）に一致する列のインデックスを返す
///
/// 1. 完全一致: 候補を優先順に、各候補で全列を左から走査
/// 2. 部分一致（`MatchMode::Partial` のみ）: 同じ順序で双方向の包含を判定
///
/// 同順位の場合は左側の列を採用する。
pub fn find_column(headers: &[String], candidates: &[&str], mode: MatchMode) -> Option<usize> {
    let headers_norm: Vec<String> = headers.iter().map(|h| normalize_text(h)).collect();
    let candidates_norm: Vec<String> = candidates.iter().map(|c| normalize_text(c)).collect();

    for candidate in &candidates_norm {
        if let Some(idx) = headers_norm.iter().position(|h| h == candidate) {
            return Some(idx);
        }
    }

    if mode == MatchMode::Exact {
        return None;
    }

    for candidate in &candidates_norm {
        if candidate.is_empty() {
            continue;
        }
        let found = headers_norm
            .iter()
            .position(|h| h.contains(candidate.as_str()) || candidate.contains(h.as_str()));
        if found.is_some() {
            return found;
        }
    }

    None
}

/// ヘッダー全体を連結した正規化テキスト（キーワード判定用）
pub fn joined_headers(headers: &[String]) -> String {
    normalize_text(&headers.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Período   evaluado "), "PERIODO EVALUADO");
        assert_eq!(normalize_text("Área / Proceso"), "AREA / PROCESO");
        assert_eq!(normalize_text("compañía"), "COMPANIA");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_exact_match() {
        let h = headers(&["Fecha", "Nombre", "Cargo"]);
        assert_eq!(find_column(&h, &["NOMBRE"], MatchMode::Exact), Some(1));
        assert_eq!(find_column(&h, &["PUESTO"], MatchMode::Exact), None);
    }

    #[test]
    fn test_exact_preferred_over_partial() {
        // 1番目の候補は部分一致しかないが、2番目の候補に完全一致がある
        let h = headers(&["NOMBRE DEL JEFE", "COLABORADOR"]);
        assert_eq!(
            find_column(&h, &["NOMBRE", "COLABORADOR"], MatchMode::Partial),
            Some(1)
        );
    }

    #[test]
    fn test_partial_match_both_directions() {
        let h = headers(&["Col_1", "Nombre completo del colaborador"]);
        assert_eq!(find_column(&h, &["NOMBRE"], MatchMode::Partial), Some(1));

        // 列名が候補に含まれる方向
        let h = headers(&["ID", "PLAN"]);
        assert_eq!(
            find_column(&h, &["PLAN DE MEJORA PROPUESTO"], MatchMode::Partial),
            Some(1)
        );
    }

    #[test]
    fn test_partial_ties_break_on_first_column() {
        let h = headers(&["JEFE INMEDIATO", "NOMBRE JEFE"]);
        assert_eq!(find_column(&h, &["JEFE"], MatchMode::Partial), Some(0));
    }

    #[test]
    fn test_partial_candidate_priority() {
        let h = headers(&["AREA DE TRABAJO", "PROCESO"]);
        // PROCESO は完全一致するので AREA の部分一致より優先
        assert_eq!(
            find_column(&h, &["AREA", "PROCESO"], MatchMode::Partial),
            Some(1)
        );
        let h = headers(&["SUBPROCESO", "AREA DE TRABAJO"]);
        assert_eq!(
            find_column(&h, &["AREA", "PROCESO"], MatchMode::Partial),
            Some(1)
        );
    }

    #[test]
    fn test_accent_insensitive() {
        let h = headers(&["PERÍODO EVALUADO"]);
        assert_eq!(find_column(&h, &["PERIODO EVALUADO"], MatchMode::Exact), Some(0));
    }

    #[test]
    fn test_whitespace_header_matches_any_partial_lookup() {
        // 空白のみのヘッダーは正規化後に空文字となり、どの候補にも含まれる
        let h = headers(&["  ", "NOMBRE"]);
        assert_eq!(find_column(&h, &["CARGO"], MatchMode::Partial), Some(0));
        // 完全一致が優先される
        assert_eq!(find_column(&h, &["NOMBRE"], MatchMode::Partial), Some(1));
        assert_eq!(find_column(&h, &["CARGO"], MatchMode::Exact), None);
    }

    #[test]
    fn test_not_found() {
        let h = headers(&["X", "Y"]);
        assert_eq!(find_column(&h, &["NOMBRE"], MatchMode::Partial), None);
        assert_eq!(find_column(&[], &["NOMBRE"], MatchMode::Partial), None);
    }
}
