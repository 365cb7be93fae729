use std::path::PathBuf;

use crate::categorizer::coverage;
use crate::db::get_connection;
use crate::error::Result;
use crate::importer::import_file;
use crate::settings::db_path;

pub fn run(file: &str) -> Result<()> {
    let file_path = PathBuf::from(file);
    let conn = get_connection(&db_path())?;

    let result = import_file(&conn, &file_path)?;

    if result.duplicate_file {
        println!("This file has already been imported (duplicate checksum).");
        return Ok(());
    }

    println!("Period: {} ({})", result.period_label, result.period);
    println!(
        "{} imported, {} skipped (already present)",
        result.imported, result.skipped_rows
    );
    if result.parse_skipped > 0 {
        println!(
            "{} records skipped by the parser (missing date or amount)",
            result.parse_skipped
        );
    }

    let cov = coverage(&conn, Some(&result.period))?;
    println!(
        "{} categorized by existing mappings, {} uncategorized",
        cov.covered, cov.uncategorized
    );

    Ok(())
}
