use thiserror::Error;

#[derive(Error, Debug)]
pub enum DrebookError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown group: {0}")]
    UnknownGroup(String),

    #[error("Invalid period (expected YYYY-MM): {0}")]
    InvalidPeriod(String),

    #[error("Statement contained no parseable transactions: {0}")]
    EmptyStatement(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, DrebookError>;
