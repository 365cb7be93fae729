use std::path::PathBuf;

use crate::cli::parse_period_opt;
use crate::db::get_connection;
use crate::error::Result;
use crate::export::export_dre_csv;
use crate::settings::db_path;
use crate::taxonomy::Taxonomy;

pub fn dre(period: Option<String>, output: Option<String>) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let period = parse_period_opt(&period)?;
    let taxonomy = Taxonomy::standard();

    let output_path = match output {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(format!("dre-{period}.csv")),
    };

    let rows = export_dre_csv(&conn, &taxonomy, &period, &output_path)?;
    println!("Wrote {} rows to {}", rows, output_path.display());
    Ok(())
}
