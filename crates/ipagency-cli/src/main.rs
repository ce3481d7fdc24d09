//! IP agency CLI
//!
//! Operator commands that load configuration spreadsheets into the database

use clap::{Parser, Subcommand};
use ipagency_config::Settings;
use ipagency_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "ipagency")]
#[command(about = "IP agency configuration import", long_about = None)]
struct Cli {
    /// Logging profile: development, production or test
    #[arg(long, global = true)]
    log_profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replace a configuration table with the contents of its spreadsheet
    Config(commands::config::ConfigArgs),
    /// List importable tables and their source files
    Tables(commands::tables::TablesArgs),
}

fn main() {
    let cli = Cli::parse_from(commands::split_legacy_command(std::env::args()));

    let settings = match Settings::load_with_dotenv() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let profile = cli
        .log_profile
        .as_deref()
        .unwrap_or(&settings.log_profile)
        .parse()
        .unwrap_or(Profile::Development);
    logging_facility::init(profile);

    let result = match cli.command {
        Commands::Config(args) => commands::config::execute(args, &settings),
        Commands::Tables(args) => commands::tables::execute(args, &settings),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
