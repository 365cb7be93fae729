use std::path::Path;

use rusqlite::Connection;
use sha2::{Digest, Sha256};

use crate::error::{DrebookError, Result};
use crate::models::ParsedTransaction;
use crate::ofx;

fn compute_checksum(file_path: &Path) -> Result<String> {
    let data = std::fs::read(file_path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

fn is_duplicate_row(conn: &Connection, row: &ParsedTransaction) -> bool {
    let mut stmt = conn
        .prepare_cached(
            "SELECT 1 FROM transactions WHERE fitid = ?1 AND date = ?2 AND amount = ?3",
        )
        .unwrap();
    stmt.exists(rusqlite::params![row.fitid, row.date, row.amount])
        .unwrap_or(false)
}

pub struct ImportResult {
    pub imported: usize,
    pub skipped_rows: usize,
    pub parse_skipped: usize,
    pub duplicate_file: bool,
    pub period: String,
    pub period_label: String,
}

/// Import one OFX statement file: parse, derive the period from the
/// earliest transaction date, insert the statement record and its rows.
/// The file checksum guards against importing the same statement twice;
/// individual rows already present (same fitid/date/amount) are skipped.
pub fn import_file(conn: &Connection, file_path: &Path) -> Result<ImportResult> {
    let checksum = compute_checksum(file_path)?;
    {
        let mut stmt = conn.prepare("SELECT 1 FROM statements WHERE checksum = ?1")?;
        if stmt.exists([&checksum])? {
            return Ok(ImportResult {
                imported: 0,
                skipped_rows: 0,
                parse_skipped: 0,
                duplicate_file: true,
                period: String::new(),
                period_label: String::new(),
            });
        }
    }

    let content = std::fs::read_to_string(file_path)?;
    let parsed = ofx::parse_content(&content);
    let period = ofx::derive_period(&parsed.transactions).ok_or_else(|| {
        DrebookError::EmptyStatement(file_path.display().to_string())
    })?;
    let period_label = ofx::period_label(&period);

    // All-or-nothing: the statement row carries the duplicate-guard
    // checksum, so it must never outlive a failed row insert.
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO statements (filename, period, period_label, record_count, skipped_count, checksum) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            file_path.file_name().and_then(|n| n.to_str()).unwrap_or(""),
            period,
            period_label,
            parsed.transactions.len() as i64,
            parsed.skipped as i64,
            checksum,
        ],
    )?;
    let statement_id = tx.last_insert_rowid();

    let mut imported = 0usize;
    let mut skipped_rows = 0usize;
    for row in &parsed.transactions {
        if is_duplicate_row(&tx, row) {
            skipped_rows += 1;
            continue;
        }
        tx.execute(
            "INSERT INTO transactions (statement_id, fitid, date, description, amount) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![statement_id, row.fitid, row.date, row.description, row.amount],
        )?;
        imported += 1;
    }
    tx.commit()?;

    Ok(ImportResult {
        imported,
        skipped_rows,
        parse_skipped: parsed.skipped,
        duplicate_file: false,
        period,
        period_label,
    })
}
