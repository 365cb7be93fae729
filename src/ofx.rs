use chrono::NaiveDate;

use crate::models::ParsedTransaction;

/// Outcome of parsing one OFX statement. Blocks missing a posted date or
/// amount are dropped without error; only the count is reported.
#[derive(Debug)]
pub struct ParseResult {
    pub transactions: Vec<ParsedTransaction>,
    pub skipped: usize,
}

/// Case-insensitive `<TAG>value</TAG>` extraction. OFX files in the wild
/// mix upper and lower case tags freely. The search copy is lowercased
/// byte-for-byte (ASCII only, tags are ASCII) so its offsets stay valid
/// for slicing the original block; Unicode case mapping can change byte
/// lengths.
fn extract_tag<'a>(block: &'a str, tag: &str) -> Option<&'a str> {
    let lower = block.to_ascii_lowercase();
    let open = format!("<{}>", tag.to_ascii_lowercase());
    let close = format!("</{}>", tag.to_ascii_lowercase());
    let start = lower.find(&open)? + open.len();
    let end = lower[start..].find(&close)? + start;
    Some(&block[start..end])
}

/// Normalize an OFX DTPOSTED value (`YYYYMMDD`, often followed by a time
/// and timezone suffix) to an ISO `YYYY-MM-DD` string. Returns None for
/// values that are too short or not a real calendar date.
fn normalize_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.len() < 8 {
        return None;
    }
    let compact = &raw[..8];
    if !compact.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(compact, "%Y%m%d")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Parse OFX statement text into transaction records.
///
/// The format is treated as tag soup: content is split on `<STMTTRN>`
/// markers and each block is read up to its `</STMTTRN>`. A block yields a
/// record only when both DTPOSTED and TRNAMT are present and valid; MEMO
/// defaults to empty and a missing FITID gets a synthesized `trn-{index}`
/// id, stable across re-parses of the same file.
pub fn parse_content(content: &str) -> ParseResult {
    let mut transactions = Vec::new();
    let mut skipped = 0usize;

    for (i, block) in content.split("<STMTTRN>").enumerate() {
        if i == 0 {
            // Header material before the first transaction marker.
            continue;
        }
        let Some(end) = block.find("</STMTTRN>") else {
            skipped += 1;
            continue;
        };
        let data = &block[..end];

        let date = extract_tag(data, "DTPOSTED").and_then(normalize_date);
        let amount = extract_tag(data, "TRNAMT")
            .and_then(|v| v.trim().parse::<f64>().ok());

        let (Some(date), Some(amount)) = (date, amount) else {
            skipped += 1;
            continue;
        };

        let description = extract_tag(data, "MEMO").unwrap_or("").trim().to_string();
        let fitid = extract_tag(data, "FITID")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| format!("trn-{i}"));

        transactions.push(ParsedTransaction {
            fitid,
            date,
            amount,
            description,
        });
    }

    ParseResult {
        transactions,
        skipped,
    }
}

/// Statement period (`YYYY-MM`) derived from the earliest transaction date.
pub fn derive_period(transactions: &[ParsedTransaction]) -> Option<String> {
    transactions
        .iter()
        .map(|t| t.date.as_str())
        .min()
        .map(|d| d[..7].to_string())
}

const MONTH_NAMES: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho",
    "Julho", "Agosto", "Setembro", "Outubro", "Novembro", "Dezembro",
];

/// Human label for a `YYYY-MM` period, e.g. "Janeiro de 2024".
pub fn period_label(period: &str) -> String {
    let Some((year, month)) = period.split_once('-') else {
        return String::new();
    };
    let Ok(m) = month.parse::<usize>() else {
        return String::new();
    };
    if m == 0 || m > 12 {
        return String::new();
    }
    format!("{} de {}", MONTH_NAMES[m - 1], year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_block() {
        let content = "<OFX><STMTTRN>\
            <DTPOSTED>20240115</DTPOSTED>\
            <TRNAMT>-150.00</TRNAMT>\
            <MEMO>Aluguel Loja</MEMO>\
            </STMTTRN></OFX>";
        let result = parse_content(content);
        assert_eq!(result.skipped, 0);
        assert_eq!(result.transactions.len(), 1);
        let tx = &result.transactions[0];
        assert_eq!(tx.date, "2024-01-15");
        assert_eq!(tx.amount, -150.00);
        assert_eq!(tx.description, "Aluguel Loja");
    }

    #[test]
    fn test_date_with_time_and_timezone_suffix() {
        let content = "<STMTTRN><DTPOSTED>20240115120000[-3:BRT]</DTPOSTED>\
            <TRNAMT>42.50</TRNAMT><MEMO>Venda</MEMO></STMTTRN>";
        let result = parse_content(content);
        assert_eq!(result.transactions[0].date, "2024-01-15");
    }

    #[test]
    fn test_block_missing_date_is_skipped() {
        let content = "<STMTTRN><TRNAMT>-10.00</TRNAMT><MEMO>Sem data</MEMO></STMTTRN>\
            <STMTTRN><DTPOSTED>20240201</DTPOSTED><TRNAMT>5.00</TRNAMT></STMTTRN>";
        let result = parse_content(content);
        assert_eq!(result.transactions.len(), 1);
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_block_missing_amount_is_skipped() {
        let content =
            "<STMTTRN><DTPOSTED>20240201</DTPOSTED><MEMO>Sem valor</MEMO></STMTTRN>";
        let result = parse_content(content);
        assert!(result.transactions.is_empty());
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_invalid_date_is_skipped() {
        let content =
            "<STMTTRN><DTPOSTED>20241340</DTPOSTED><TRNAMT>1.00</TRNAMT></STMTTRN>";
        let result = parse_content(content);
        assert!(result.transactions.is_empty());
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_unterminated_block_is_skipped() {
        let content = "<STMTTRN><DTPOSTED>20240201</DTPOSTED><TRNAMT>1.00</TRNAMT>";
        let result = parse_content(content);
        assert!(result.transactions.is_empty());
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_missing_memo_defaults_to_empty() {
        let content =
            "<STMTTRN><DTPOSTED>20240201</DTPOSTED><TRNAMT>7.00</TRNAMT></STMTTRN>";
        let result = parse_content(content);
        assert_eq!(result.transactions[0].description, "");
    }

    #[test]
    fn test_fitid_kept_or_synthesized() {
        let content = "<STMTTRN><DTPOSTED>20240201</DTPOSTED><TRNAMT>1.00</TRNAMT>\
            <FITID>ABC123</FITID></STMTTRN>\
            <STMTTRN><DTPOSTED>20240202</DTPOSTED><TRNAMT>2.00</TRNAMT></STMTTRN>";
        let result = parse_content(content);
        assert_eq!(result.transactions[0].fitid, "ABC123");
        assert_eq!(result.transactions[1].fitid, "trn-2");
    }

    #[test]
    fn test_non_ascii_memo_keeps_tag_offsets() {
        // 'ẞ' shrinks under Unicode lowercasing; tag positions after the
        // memo must still line up with the original text.
        let content = "<STMTTRN><MEMO>STRAẞE LTDA</MEMO>\
            <DTPOSTED>20240115</DTPOSTED><TRNAMT>-150.00</TRNAMT></STMTTRN>";
        let result = parse_content(content);
        assert_eq!(result.skipped, 0);
        assert_eq!(result.transactions.len(), 1);
        assert_eq!(result.transactions[0].description, "STRAẞE LTDA");
        assert_eq!(result.transactions[0].date, "2024-01-15");
        assert_eq!(result.transactions[0].amount, -150.00);
    }

    #[test]
    fn test_multibyte_memo_at_block_end() {
        let content = "<STMTTRN><DTPOSTED>20240116</DTPOSTED><TRNAMT>10.00</TRNAMT>\
            <MEMO>CAFẞÉ</MEMO></STMTTRN>";
        let result = parse_content(content);
        assert_eq!(result.transactions.len(), 1);
        assert_eq!(result.transactions[0].description, "CAFẞÉ");
    }

    #[test]
    fn test_lowercase_tags() {
        let content = "<STMTTRN><dtposted>20240310</dtposted>\
            <trnamt>-30.00</trnamt><memo>Conta de luz</memo></STMTTRN>";
        let result = parse_content(content);
        assert_eq!(result.transactions.len(), 1);
        assert_eq!(result.transactions[0].description, "Conta de luz");
    }

    #[test]
    fn test_derive_period_uses_earliest_date() {
        let result = parse_content(
            "<STMTTRN><DTPOSTED>20240215</DTPOSTED><TRNAMT>1.00</TRNAMT></STMTTRN>\
             <STMTTRN><DTPOSTED>20240130</DTPOSTED><TRNAMT>2.00</TRNAMT></STMTTRN>",
        );
        assert_eq!(derive_period(&result.transactions).as_deref(), Some("2024-01"));
        assert_eq!(derive_period(&[]), None);
    }

    #[test]
    fn test_period_label() {
        assert_eq!(period_label("2024-01"), "Janeiro de 2024");
        assert_eq!(period_label("2023-12"), "Dezembro de 2023");
        assert_eq!(period_label("garbage"), "");
        assert_eq!(period_label("2024-13"), "");
    }
}
