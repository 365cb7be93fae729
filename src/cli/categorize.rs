use crate::categorizer::{coverage, uncategorized_summary};
use crate::cli::parse_period_opt;
use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::settings::db_path;

pub fn run(period: Option<String>) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let period = match period {
        Some(_) => Some(parse_period_opt(&period)?),
        None => None,
    };

    let cov = coverage(&conn, period.as_deref())?;
    let summary = uncategorized_summary(&conn, period.as_deref())?;

    if let Some(p) = &period {
        println!("Coverage for {p}");
    } else {
        println!("Coverage (all transactions)");
    }
    println!("{} categorized, {} uncategorized", cov.covered, cov.uncategorized);
    if summary.count > 0 {
        println!(
            "Uncategorized net amount: {} (see `drebook report uncategorized`)",
            money(summary.amount)
        );
    }
    Ok(())
}
