use rusqlite::Connection;

use crate::categorizer::load_mappings;
use crate::dre::{
    build_snapshot, compare_periods, trend_point, CategorizedAmount, DreSnapshot, GroupComparison,
    TrendInput, TrendPoint,
};
use crate::error::Result;
use crate::matcher::resolve;
use crate::models::Mapping;
use crate::taxonomy::Taxonomy;

fn period_rows(conn: &Connection, period: &str) -> Result<Vec<(String, f64)>> {
    let mut stmt =
        conn.prepare("SELECT description, amount FROM transactions WHERE date LIKE ?1")?;
    let rows = stmt
        .query_map([format!("{period}%")], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn categorized_amounts(rows: &[(String, f64)], mappings: &[Mapping]) -> Vec<CategorizedAmount> {
    rows.iter()
        .filter_map(|(description, amount)| {
            resolve(description, mappings).map(|m| CategorizedAmount {
                group_key: m.group_key.clone(),
                category: m.category.clone(),
                amount: *amount,
            })
        })
        .collect()
}

/// DRE for one period, recomputed from the stored transactions and the
/// current mapping table.
pub fn get_dre(conn: &Connection, taxonomy: &Taxonomy, period: &str) -> Result<DreSnapshot> {
    let mappings = load_mappings(conn)?;
    let rows = period_rows(conn, period)?;
    Ok(build_snapshot(taxonomy, &categorized_amounts(&rows, &mappings)))
}

pub fn get_comparison(
    conn: &Connection,
    taxonomy: &Taxonomy,
    current: &str,
    previous: &str,
) -> Result<Vec<GroupComparison>> {
    let cur = get_dre(conn, taxonomy, current)?;
    let prev = get_dre(conn, taxonomy, previous)?;
    Ok(compare_periods(taxonomy, &cur, &prev))
}

/// Periods (YYYY-MM) that actually have transactions, newest first.
pub fn available_periods(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT substr(date, 1, 7) AS period FROM transactions ORDER BY period DESC",
    )?;
    let rows = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Revenue/expense/profit per month for the most recent `months` periods
/// with data, oldest first so the table reads chronologically.
pub fn get_trends(conn: &Connection, taxonomy: &Taxonomy, months: usize) -> Result<Vec<TrendPoint>> {
    let mappings = load_mappings(conn)?;
    let mut periods = available_periods(conn)?;
    periods.truncate(months);
    periods.reverse();

    let mut points = Vec::with_capacity(periods.len());
    for period in &periods {
        let rows = period_rows(conn, period)?;
        let inputs: Vec<TrendInput> = rows
            .iter()
            .map(|(description, amount)| TrendInput {
                amount: *amount,
                group_key: resolve(description, &mappings).map(|m| m.group_key.clone()),
            })
            .collect();
        points.push(trend_point(taxonomy, period, &inputs));
    }
    Ok(points)
}
