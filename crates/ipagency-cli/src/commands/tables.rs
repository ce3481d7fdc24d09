//! Lists the importable tables
//!
//! Usage: ipagency tables [--source-dir <DIR>]

use clap::Args;
use ipagency_config::Settings;
use ipagency_store::tables::TABLES;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct TablesArgs {
    /// Directory holding the table spreadsheets
    #[arg(long)]
    pub source_dir: Option<PathBuf>,
}

pub fn execute(args: TablesArgs, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let source_dir = args.source_dir.unwrap_or_else(|| settings.source_dir.clone());

    for descriptor in TABLES {
        let source = match descriptor.source_path(&source_dir) {
            Some(path) if path.is_file() => path.display().to_string(),
            Some(path) => format!("{} (missing)", path.display()),
            None => "built-in seed data".to_string(),
        };
        println!("config:{:<20} {}", descriptor.command_name(), source);
    }
    Ok(())
}
