use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::settings::db_path;

pub fn run() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let mut stmt = conn.prepare(
        "SELECT id, filename, period, period_label, record_count, skipped_count, imported_at \
         FROM statements ORDER BY period DESC, id DESC",
    )?;
    let rows: Vec<(i64, String, String, String, i64, i64, String)> = stmt
        .query_map([], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
            ))
        })?
        .filter_map(|r| r.ok())
        .collect();

    if rows.is_empty() {
        println!("No statements imported yet. Run `drebook import <file.ofx>`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "ID", "File", "Period", "Records", "Skipped", "Imported at",
    ]);
    for (id, filename, _period, period_label, records, skipped, imported_at) in rows {
        table.add_row(vec![
            Cell::new(id),
            Cell::new(filename),
            Cell::new(period_label),
            Cell::new(records),
            Cell::new(skipped),
            Cell::new(imported_at),
        ]);
    }
    println!("Statements\n{table}");
    Ok(())
}
