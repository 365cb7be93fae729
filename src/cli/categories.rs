use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::{DrebookError, Result};
use crate::settings::db_path;
use crate::taxonomy::Taxonomy;

pub fn list(group: Option<&str>) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let taxonomy = Taxonomy::standard();

    let group_key = match group {
        Some(name) => Some(
            taxonomy
                .by_display_name(name)
                .ok_or_else(|| DrebookError::UnknownGroup(name.to_string()))?
                .key(),
        ),
        None => None,
    };

    let mut table = Table::new();
    table.set_header(vec!["Group", "Category"]);
    for g in taxonomy.leaf_groups() {
        if let Some(key) = group_key {
            if g.key() != key {
                continue;
            }
        }
        let mut stmt = conn.prepare(
            "SELECT category FROM selected_categories WHERE group_key = ?1 ORDER BY id",
        )?;
        let categories: Vec<String> = stmt
            .query_map([g.key()], |row| row.get(0))?
            .filter_map(|r| r.ok())
            .collect();
        for category in categories {
            table.add_row(vec![Cell::new(g.display_name()), Cell::new(category)]);
        }
    }
    println!("Categories\n{table}");
    Ok(())
}

pub fn add(path: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let taxonomy = Taxonomy::standard();
    let (group_key, category) = taxonomy.resolve_path(path)?;
    conn.execute(
        "INSERT OR IGNORE INTO selected_categories (group_key, category) VALUES (?1, ?2)",
        rusqlite::params![group_key, category],
    )?;
    println!("Added category: {path}");
    Ok(())
}

pub fn remove(path: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let taxonomy = Taxonomy::standard();
    let (group_key, category) = taxonomy.resolve_path(path)?;
    let deleted = conn.execute(
        "DELETE FROM selected_categories WHERE group_key = ?1 AND category = ?2",
        rusqlite::params![group_key, category],
    )?;
    if deleted == 0 {
        return Err(DrebookError::UnknownCategory(path.to_string()));
    }
    println!("Removed category: {path}");
    Ok(())
}
