pub mod assign;
pub mod categories;
pub mod categorize;
pub mod export;
pub mod import;
pub mod init;
pub mod mappings;
pub mod report;
pub mod statements;

use clap::{Parser, Subcommand};

use crate::error::{DrebookError, Result};

/// Validate a YYYY-MM period argument; defaults to the current month.
pub(crate) fn parse_period_opt(period: &Option<String>) -> Result<String> {
    let period = match period {
        Some(p) => p.clone(),
        None => chrono::Local::now().format("%Y-%m").to_string(),
    };
    let ok = chrono::NaiveDate::parse_from_str(&format!("{period}-01"), "%Y-%m-%d").is_ok();
    if !ok {
        return Err(DrebookError::InvalidPeriod(period));
    }
    Ok(period)
}

#[derive(Parser)]
#[command(
    name = "drebook",
    about = "DRE (income statement) dashboard for small businesses, fed by OFX bank statements."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up drebook: choose a data directory and initialize the database.
    Init {
        /// Path for drebook data (default: ~/Documents/drebook)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Company name printed on report headers
        #[arg(long)]
        company: Option<String>,
    },
    /// Import an OFX bank statement file.
    Import {
        /// Path to the .ofx file
        file: String,
    },
    /// List imported statements with period labels and counts.
    Statements,
    /// Categorize transactions in bulk by assigning a category path.
    Assign {
        /// Category path: GROUP.Category, e.g. 'RECEITA.PIX'
        #[arg(long)]
        category: String,
        /// Transaction IDs (shown in `drebook report uncategorized`)
        #[arg(long, num_args = 1.., required = true)]
        ids: Vec<i64>,
    },
    /// Manage description mappings directly.
    Mappings {
        #[command(subcommand)]
        command: MappingsCommands,
    },
    /// Show mapping coverage over imported transactions.
    Categorize {
        /// Period filter: YYYY-MM (default: all transactions)
        #[arg(long)]
        period: Option<String>,
    },
    /// Manage the leaf-category set offered per group.
    Categories {
        #[command(subcommand)]
        command: CategoriesCommands,
    },
    /// Generate reports.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Export reports to CSV.
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
}

#[derive(Subcommand)]
pub enum MappingsCommands {
    /// List all mappings in resolution order.
    List,
    /// Add a mapping by hand. Keys with '*' are wildcards.
    Add {
        /// Mapping key, e.g. '*maquininha' or an exact description
        key: String,
        /// Category path: GROUP.Category
        #[arg(long)]
        category: String,
    },
    /// Delete a mapping by key.
    Delete {
        /// Mapping key (shown in `drebook mappings list`)
        key: String,
    },
}

#[derive(Subcommand)]
pub enum CategoriesCommands {
    /// List selected categories, optionally for one group.
    List {
        /// Group display name, e.g. 'RECEITA'
        #[arg(long)]
        group: Option<String>,
    },
    /// Add a category to a group's selection.
    Add {
        /// Category path: GROUP.Category
        path: String,
    },
    /// Remove a category from a group's selection.
    Remove {
        /// Category path: GROUP.Category
        path: String,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// DRE statement for one month.
    Dre {
        /// Period: YYYY-MM (default: current month)
        #[arg(long)]
        period: Option<String>,
    },
    /// Compare two months group by group.
    Compare {
        /// Current period: YYYY-MM
        #[arg(long)]
        period: String,
        /// Previous period: YYYY-MM
        #[arg(long)]
        previous: String,
    },
    /// Monthly revenue/expense/profit trend.
    Trends {
        /// How many recent months to include
        #[arg(long, default_value = "6")]
        months: usize,
    },
    /// Transactions no mapping resolves yet.
    Uncategorized {
        /// Period filter: YYYY-MM (default: all transactions)
        #[arg(long)]
        period: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export one month's DRE to CSV.
    Dre {
        /// Period: YYYY-MM (default: current month)
        #[arg(long)]
        period: Option<String>,
        /// Output file path (default: dre-YYYY-MM.csv)
        #[arg(long)]
        output: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_period_opt_accepts_valid() {
        assert_eq!(
            parse_period_opt(&Some("2024-01".to_string())).unwrap(),
            "2024-01"
        );
    }

    #[test]
    fn test_parse_period_opt_rejects_garbage() {
        assert!(parse_period_opt(&Some("2024-13".to_string())).is_err());
        assert!(parse_period_opt(&Some("jan/2024".to_string())).is_err());
        assert!(parse_period_opt(&Some("2024".to_string())).is_err());
    }

    #[test]
    fn test_parse_period_opt_defaults_to_current_month() {
        let period = parse_period_opt(&None).unwrap();
        assert_eq!(period.len(), 7);
        assert_eq!(&period[4..5], "-");
    }
}
