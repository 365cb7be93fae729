use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;
use crate::taxonomy::DEFAULT_CATEGORIES;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS statements (
    id INTEGER PRIMARY KEY,
    filename TEXT NOT NULL,
    period TEXT NOT NULL,
    period_label TEXT NOT NULL,
    record_count INTEGER NOT NULL DEFAULT 0,
    skipped_count INTEGER NOT NULL DEFAULT 0,
    checksum TEXT,
    imported_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY,
    statement_id INTEGER NOT NULL,
    fitid TEXT NOT NULL,
    date TEXT NOT NULL,
    description TEXT NOT NULL,
    amount REAL NOT NULL,
    created_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (statement_id) REFERENCES statements(id)
);

CREATE TABLE IF NOT EXISTS mappings (
    id INTEGER PRIMARY KEY,
    key TEXT NOT NULL UNIQUE,
    group_key TEXT NOT NULL,
    category TEXT NOT NULL,
    is_pattern INTEGER NOT NULL DEFAULT 0,
    created_at TEXT DEFAULT (datetime('now')),
    last_used TEXT
);

CREATE TABLE IF NOT EXISTS categorizations (
    id INTEGER PRIMARY KEY,
    mapping_key TEXT NOT NULL,
    category_path TEXT NOT NULL,
    matched_count INTEGER NOT NULL DEFAULT 0,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS selected_categories (
    id INTEGER PRIMARY KEY,
    group_key TEXT NOT NULL,
    category TEXT NOT NULL,
    UNIQUE (group_key, category)
);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;

    let count: i64 = conn.query_row("SELECT count(*) FROM selected_categories", [], |row| {
        row.get(0)
    })?;
    if count == 0 {
        for (group_key, items) in DEFAULT_CATEGORIES {
            for category in *items {
                conn.execute(
                    "INSERT INTO selected_categories (group_key, category) VALUES (?1, ?2)",
                    rusqlite::params![group_key, category],
                )?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_init_db_creates_tables() {
        let (_dir, conn) = test_db();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        for expected in &[
            "statements",
            "transactions",
            "mappings",
            "categorizations",
            "selected_categories",
        ] {
            assert!(tables.contains(&expected.to_string()), "missing table: {expected}");
        }
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, conn) = test_db();
        init_db(&conn).unwrap();
        let count: i64 = conn
            .query_row("SELECT count(*) FROM selected_categories", [], |r| r.get(0))
            .unwrap();
        let count2: i64 = conn
            .query_row("SELECT count(*) FROM selected_categories", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, count2);
    }

    #[test]
    fn test_init_db_seeds_selected_categories() {
        let (_dir, conn) = test_db();
        let count: i64 = conn
            .query_row("SELECT count(*) FROM selected_categories", [], |r| r.get(0))
            .unwrap();
        assert!(count >= 60, "expected at least 60 seeded categories, got {count}");
        let revenue: i64 = conn
            .query_row(
                "SELECT count(*) FROM selected_categories WHERE group_key = '1. RECEITA'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert!(revenue >= 7);
    }

    #[test]
    fn test_mapping_key_is_unique() {
        let (_dir, conn) = test_db();
        conn.execute(
            "INSERT INTO mappings (key, group_key, category, is_pattern) VALUES ('*pix', '1. RECEITA', 'PIX', 1)",
            [],
        )
        .unwrap();
        let dup = conn.execute(
            "INSERT INTO mappings (key, group_key, category, is_pattern) VALUES ('*pix', '1. RECEITA', 'Dinheiro', 1)",
            [],
        );
        assert!(dup.is_err());
    }
}
