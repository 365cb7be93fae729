//! Pattern detection for bulk categorization.
//!
//! When a user categorizes a batch of transactions together, we try to
//! store one wildcard mapping instead of N exact-description entries.
//! This is a deliberately bounded heuristic over small fixed candidate
//! lists, not general substring mining; candidates come from the payment
//! phrasing Brazilian banks actually emit.

use crate::matcher::normalize;

const SUFFIXES: &[&str] = &[
    " - pix | maquininha",
    " | maquininha",
    " maquininha",
    " - pix",
    " pix",
];

const PREFIXES: &[&str] = &[
    "pix ",
    "transferência ",
    "pagamento ",
    "recebimento ",
];

const KEYWORDS: &[&str] = &[
    "transferencia",
    "pagamento",
    "deposito",
    "cheque",
    "recebimento",
];

/// Infer a single wildcard pattern covering every description in the
/// batch, trying suffixes first, then prefixes, then keywords. Each
/// description commits to its first matching candidate within a tier, so
/// a tier only produces a pattern when all descriptions agree on it.
/// Returns None when no candidate covers the whole batch; the caller then
/// falls back to one exact mapping per description.
pub fn detect_pattern(descriptions: &[&str]) -> Option<String> {
    if descriptions.is_empty() {
        return None;
    }
    let normalized: Vec<String> = descriptions.iter().map(|d| normalize(d)).collect();

    if let Some(suffix) = full_coverage(&normalized, SUFFIXES, |desc, cand| desc.ends_with(cand)) {
        return Some(format!("*{suffix}"));
    }
    if let Some(prefix) = full_coverage(&normalized, PREFIXES, |desc, cand| desc.starts_with(cand))
    {
        return Some(format!("{prefix}*"));
    }
    if let Some(keyword) = full_coverage(&normalized, KEYWORDS, |desc, cand| desc.contains(cand)) {
        return Some(format!("*{keyword}*"));
    }
    None
}

/// First candidate that every description picks as its own first match.
fn full_coverage<'a>(
    normalized: &[String],
    candidates: &'a [&'a str],
    hit: impl Fn(&str, &str) -> bool,
) -> Option<&'a str> {
    let mut chosen: Option<&str> = None;
    for desc in normalized {
        let first = candidates.iter().find(|cand| hit(desc, cand))?;
        match chosen {
            None => chosen = Some(first),
            Some(prev) if prev != *first => return None,
            Some(_) => {}
        }
    }
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_suffix_detected() {
        let descs = [
            "Venda Loja A - Pix | Maquininha",
            "Venda Loja B - Pix | Maquininha",
        ];
        assert_eq!(
            detect_pattern(&descs).as_deref(),
            Some("* - pix | maquininha")
        );
    }

    #[test]
    fn test_suffix_has_priority_over_keyword() {
        // Both end with " pix" and contain no listed keyword conflict.
        let descs = ["Recebimento via pix", "Venda no pix"];
        assert_eq!(detect_pattern(&descs).as_deref(), Some("* pix"));
    }

    #[test]
    fn test_common_prefix_detected() {
        let descs = ["Pagamento Fornecedor A", "Pagamento Aluguel Fevereiro"];
        assert_eq!(detect_pattern(&descs).as_deref(), Some("pagamento *"));
    }

    #[test]
    fn test_common_keyword_detected() {
        let descs = [
            "TED Transferencia Enviada",
            "DOC de transferencia recebida",
            "Estorno transferencia 1234",
        ];
        assert_eq!(detect_pattern(&descs).as_deref(), Some("*transferencia*"));
    }

    #[test]
    fn test_partial_coverage_yields_none() {
        let descs = [
            "TED Transferencia Enviada",
            "Compra supermercado central",
        ];
        assert_eq!(detect_pattern(&descs), None);
    }

    #[test]
    fn test_disagreeing_candidates_yield_none() {
        // One commits to " - pix", the other to " maquininha".
        let descs = ["Venda balcão - pix", "Venda cartão maquininha"];
        assert_eq!(detect_pattern(&descs), None);
    }

    #[test]
    fn test_empty_batch() {
        assert_eq!(detect_pattern(&[]), None);
    }

    #[test]
    fn test_single_transaction_still_gets_pattern() {
        assert_eq!(
            detect_pattern(&["Pix recebido João"]).as_deref(),
            Some("pix *")
        );
    }
}
