use crate::categorizer;
use crate::db::get_connection;
use crate::error::Result;
use crate::settings::db_path;
use crate::taxonomy::Taxonomy;

pub fn run(category: &str, ids: &[i64]) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let taxonomy = Taxonomy::standard();

    let result = categorizer::assign(&conn, &taxonomy, ids, category)?;

    match &result.pattern {
        Some(pattern) => println!(
            "Stored pattern '{pattern}' \u{2192} {category} ({} transactions)",
            result.matched
        ),
        None => println!(
            "No common pattern; stored {} exact mapping(s) \u{2192} {category}",
            result.keys.len()
        ),
    }

    Ok(())
}
