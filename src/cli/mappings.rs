use comfy_table::{Cell, Table};

use crate::categorizer::load_mappings;
use crate::db::get_connection;
use crate::error::{DrebookError, Result};
use crate::matcher::normalize;
use crate::settings::db_path;
use crate::taxonomy::Taxonomy;

pub fn list() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let mappings = load_mappings(&conn)?;

    if mappings.is_empty() {
        println!("No mappings yet. Use `drebook assign` or `drebook mappings add`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Key", "Type", "Group", "Category"]);
    for m in mappings {
        table.add_row(vec![
            Cell::new(m.id.unwrap_or_default()),
            Cell::new(&m.key),
            Cell::new(if m.is_pattern { "pattern" } else { "exact" }),
            Cell::new(&m.group_key),
            Cell::new(&m.category),
        ]);
    }
    println!("Mappings\n{table}");
    Ok(())
}

pub fn add(key: &str, category_path: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let taxonomy = Taxonomy::standard();
    let (group_key, category) = taxonomy.resolve_path(category_path)?;

    // Keys are stored normalized; resolution lowercases descriptions too.
    let key = normalize(key);
    let is_pattern = key.contains('*');
    conn.execute(
        "INSERT INTO mappings (key, group_key, category, is_pattern) VALUES (?1, ?2, ?3, ?4) \
         ON CONFLICT(key) DO UPDATE SET \
           group_key = excluded.group_key, \
           category = excluded.category, \
           is_pattern = excluded.is_pattern",
        rusqlite::params![key, group_key, category, is_pattern as i64],
    )?;
    println!("Added mapping: '{key}' \u{2192} {category_path}");
    Ok(())
}

pub fn delete(key: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let key = normalize(key);
    let deleted = conn.execute("DELETE FROM mappings WHERE key = ?1", [&key])?;
    if deleted == 0 {
        return Err(DrebookError::Other(format!("No mapping with key '{key}'")));
    }
    println!("Deleted mapping '{key}'");
    Ok(())
}
