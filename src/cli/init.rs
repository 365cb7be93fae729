use std::path::PathBuf;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::{load_settings, save_settings};

pub fn run(data_dir: Option<String>, company: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        settings.data_dir = dir;
    }
    if let Some(name) = company {
        settings.company_name = name;
    }

    let dir = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&dir)?;

    let db_path = dir.join("drebook.db");
    let conn = get_connection(&db_path)?;
    init_db(&conn)?;

    save_settings(&settings)?;
    println!("Initialized database at {}", db_path.display());
    if !settings.company_name.is_empty() {
        println!("Company: {}", settings.company_name);
    }
    Ok(())
}
