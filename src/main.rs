mod categorizer;
mod cli;
mod db;
mod detector;
mod dre;
mod error;
mod export;
mod fmt;
mod importer;
mod matcher;
mod models;
mod ofx;
mod reports;
mod settings;
mod taxonomy;

use clap::Parser;

use cli::{CategoriesCommands, Cli, Commands, ExportCommands, MappingsCommands, ReportCommands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir, company } => cli::init::run(data_dir, company),
        Commands::Import { file } => cli::import::run(&file),
        Commands::Statements => cli::statements::run(),
        Commands::Assign { category, ids } => cli::assign::run(&category, &ids),
        Commands::Mappings { command } => match command {
            MappingsCommands::List => cli::mappings::list(),
            MappingsCommands::Add { key, category } => cli::mappings::add(&key, &category),
            MappingsCommands::Delete { key } => cli::mappings::delete(&key),
        },
        Commands::Categorize { period } => cli::categorize::run(period),
        Commands::Categories { command } => match command {
            CategoriesCommands::List { group } => cli::categories::list(group.as_deref()),
            CategoriesCommands::Add { path } => cli::categories::add(&path),
            CategoriesCommands::Remove { path } => cli::categories::remove(&path),
        },
        Commands::Report { command } => match command {
            ReportCommands::Dre { period } => cli::report::dre(period),
            ReportCommands::Compare { period, previous } => {
                cli::report::compare(&period, &previous)
            }
            ReportCommands::Trends { months } => cli::report::trends(months),
            ReportCommands::Uncategorized { period } => cli::report::uncategorized_report(period),
        },
        Commands::Export { command } => match command {
            ExportCommands::Dre { period, output } => cli::export::dre(period, output),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
