use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;
use crate::ofx::period_label;
use crate::reports::get_dre;
use crate::taxonomy::Taxonomy;

/// Write one period's DRE to a CSV file: a row per group in statement
/// order, with a detail row per category under the leaf groups. Amounts
/// are plain decimals so the file loads into a spreadsheet without
/// locale fixups.
pub fn export_dre_csv(
    conn: &Connection,
    taxonomy: &Taxonomy,
    period: &str,
    output_path: &Path,
) -> Result<usize> {
    let snapshot = get_dre(conn, taxonomy, period)?;
    let mut writer = csv::Writer::from_path(output_path)?;

    let label = period_label(period);
    writer.write_record(["Período", label.as_str(), ""])?;
    writer.write_record(["Grupo", "Categoria", "Valor"])?;

    let mut rows = 0usize;
    for group in taxonomy.groups() {
        let key = group.key();
        let total = format!("{:.2}", snapshot.total(key));
        writer.write_record([key, "", total.as_str()])?;
        rows += 1;
        if let Some(result) = snapshot.group(key) {
            for (category, amount) in &result.categories {
                let value = format!("{amount:.2}");
                writer.write_record([key, category.as_str(), value.as_str()])?;
                rows += 1;
            }
        }
    }
    writer.flush()?;
    Ok(rows)
}
