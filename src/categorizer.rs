use rusqlite::Connection;

use crate::detector::detect_pattern;
use crate::error::{DrebookError, Result};
use crate::matcher::{normalize, resolve};
use crate::models::Mapping;
use crate::taxonomy::Taxonomy;

/// Mapping table in insertion order, which is also wildcard resolution
/// order.
pub fn load_mappings(conn: &Connection) -> Result<Vec<Mapping>> {
    let mut stmt = conn.prepare(
        "SELECT id, key, group_key, category, is_pattern FROM mappings ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Mapping {
            id: row.get(0)?,
            key: row.get(1)?,
            group_key: row.get(2)?,
            category: row.get(3)?,
            is_pattern: row.get::<_, i64>(4)? != 0,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

fn period_clause(period: Option<&str>) -> (String, Vec<String>) {
    match period {
        Some(p) => ("WHERE date LIKE ?1".to_string(), vec![format!("{p}%")]),
        None => (String::new(), Vec::new()),
    }
}

#[derive(Debug, Clone)]
pub struct UncategorizedTransaction {
    pub id: i64,
    pub date: String,
    pub description: String,
    pub amount: f64,
}

/// Transactions with no mapping match, via the shared resolver — the
/// same matching the DRE uses, so the two views can never disagree.
pub fn uncategorized(
    conn: &Connection,
    period: Option<&str>,
) -> Result<Vec<UncategorizedTransaction>> {
    let mappings = load_mappings(conn)?;
    let (clause, params) = period_clause(period);
    let sql = format!(
        "SELECT id, date, description, amount FROM transactions {clause} ORDER BY date DESC, id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let param_values: Vec<&dyn rusqlite::types::ToSql> = params
        .iter()
        .map(|p| p as &dyn rusqlite::types::ToSql)
        .collect();
    let rows: Vec<UncategorizedTransaction> = stmt
        .query_map(param_values.as_slice(), |row| {
            Ok(UncategorizedTransaction {
                id: row.get(0)?,
                date: row.get(1)?,
                description: row.get(2)?,
                amount: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows
        .into_iter()
        .filter(|t| resolve(&t.description, &mappings).is_none())
        .collect())
}

pub struct UncategorizedSummary {
    pub count: usize,
    pub amount: f64,
}

pub fn uncategorized_summary(
    conn: &Connection,
    period: Option<&str>,
) -> Result<UncategorizedSummary> {
    let rows = uncategorized(conn, period)?;
    let amount = rows.iter().map(|t| t.amount).sum();
    Ok(UncategorizedSummary {
        count: rows.len(),
        amount,
    })
}

pub struct CoverageResult {
    pub covered: usize,
    pub uncategorized: usize,
}

/// How many transactions the current mapping table resolves. Mappings
/// apply retroactively: nothing is rewritten, the resolver just covers
/// more rows.
pub fn coverage(conn: &Connection, period: Option<&str>) -> Result<CoverageResult> {
    let mappings = load_mappings(conn)?;
    let (clause, params) = period_clause(period);
    let sql = format!("SELECT description FROM transactions {clause}");
    let mut stmt = conn.prepare(&sql)?;
    let param_values: Vec<&dyn rusqlite::types::ToSql> = params
        .iter()
        .map(|p| p as &dyn rusqlite::types::ToSql)
        .collect();
    let descriptions: Vec<String> = stmt
        .query_map(param_values.as_slice(), |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let covered = descriptions
        .iter()
        .filter(|d| resolve(d, &mappings).is_some())
        .count();
    Ok(CoverageResult {
        covered,
        uncategorized: descriptions.len() - covered,
    })
}

pub struct AssignResult {
    pub keys: Vec<String>,
    pub pattern: Option<String>,
    pub matched: usize,
}

fn upsert_mapping(
    conn: &Connection,
    key: &str,
    group_key: &str,
    category: &str,
    is_pattern: bool,
) -> Result<()> {
    conn.execute(
        "INSERT INTO mappings (key, group_key, category, is_pattern, last_used) \
         VALUES (?1, ?2, ?3, ?4, datetime('now')) \
         ON CONFLICT(key) DO UPDATE SET \
           group_key = excluded.group_key, \
           category = excluded.category, \
           is_pattern = excluded.is_pattern, \
           last_used = excluded.last_used",
        rusqlite::params![key, group_key, category, is_pattern as i64],
    )?;
    Ok(())
}

/// Bulk categorization: assign a `GROUP.Category` path to a set of
/// transactions. A single wildcard mapping is stored when the detector
/// finds one covering the whole batch; otherwise one exact-description
/// mapping per distinct description. Each stored key gets an audit row.
pub fn assign(
    conn: &Connection,
    taxonomy: &Taxonomy,
    transaction_ids: &[i64],
    category_path: &str,
) -> Result<AssignResult> {
    let (group_key, category) = taxonomy.resolve_path(category_path)?;

    let mut descriptions = Vec::new();
    {
        let mut stmt = conn.prepare("SELECT description FROM transactions WHERE id = ?1")?;
        for id in transaction_ids {
            let desc: Option<String> = stmt.query_row([id], |row| row.get(0)).ok();
            match desc {
                Some(d) => descriptions.push(d),
                None => {
                    return Err(DrebookError::Other(format!("No transaction with ID {id}")))
                }
            }
        }
    }
    if descriptions.is_empty() {
        return Err(DrebookError::Other(
            "No transactions selected for categorization".to_string(),
        ));
    }

    let refs: Vec<&str> = descriptions.iter().map(|d| d.as_str()).collect();
    let pattern = detect_pattern(&refs);

    let mut keys = Vec::new();
    match &pattern {
        Some(p) => {
            upsert_mapping(conn, p, group_key, &category, true)?;
            keys.push(p.clone());
        }
        None => {
            for desc in &descriptions {
                let key = normalize(desc);
                if key.is_empty() || keys.contains(&key) {
                    continue;
                }
                upsert_mapping(conn, &key, group_key, &category, false)?;
                keys.push(key);
            }
        }
    }

    for key in &keys {
        conn.execute(
            "INSERT INTO categorizations (mapping_key, category_path, matched_count) \
             VALUES (?1, ?2, ?3)",
            rusqlite::params![key, category_path, transaction_ids.len() as i64],
        )?;
    }

    Ok(AssignResult {
        keys,
        pattern,
        matched: transaction_ids.len(),
    })
}
