//! Table import command
//!
//! Usage: ipagency config <TABLE> [--db <PATH>] [--file <PATH>] ...

use clap::{Args, ValueEnum};
use ipagency_config::{Settings, TimestampMode};
use ipagency_core::ImportOutcome;
use ipagency_store::tables::{self, ImportSettings};
use ipagency_store::{db, run_import, ImportJob};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TimestampArg {
    Now,
    Fixed,
}

impl From<TimestampArg> for TimestampMode {
    fn from(arg: TimestampArg) -> Self {
        match arg {
            TimestampArg::Now => TimestampMode::Now,
            TimestampArg::Fixed => TimestampMode::Fixed,
        }
    }
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Table to import, e.g. `case-types` or `workflows`
    pub table: String,

    /// SQLite database file
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Directory holding the table spreadsheets
    #[arg(long)]
    pub source_dir: Option<PathBuf>,

    /// Read this file instead of the table's default spreadsheet
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// User id stamped into created_by/updated_by when a row has none
    #[arg(long)]
    pub actor_id: Option<i64>,

    /// Timestamp mode for rows without created_at/updated_at
    #[arg(long, value_enum)]
    pub timestamps: Option<TimestampArg>,

    /// Literal for the fixed mode (`YYYY-MM-DD HH:MM:SS`); implies `--timestamps fixed`
    #[arg(long)]
    pub fixed_at: Option<String>,
}

impl ConfigArgs {
    fn import_settings(&self, settings: &Settings) -> ImportSettings {
        let mut import = ImportSettings::from(settings);
        if let Some(actor_id) = self.actor_id {
            import.default_actor_id = actor_id;
        }
        if let Some(literal) = &self.fixed_at {
            import.fixed_timestamp = literal.clone();
            import.timestamps = Some(TimestampMode::Fixed);
        }
        if let Some(mode) = self.timestamps {
            import.timestamps = Some(mode.into());
        }
        import
    }
}

/// Execute a table import
pub fn execute(args: ConfigArgs, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let descriptor = tables::find(&args.table)?;
    let import_settings = args.import_settings(settings);

    let db_path = args.db.clone().unwrap_or_else(|| settings.database_path.clone());
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let conn = db::open_migrated(&db_path)?;

    let source_dir = args
        .source_dir
        .clone()
        .unwrap_or_else(|| settings.source_dir.clone());
    let job = ImportJob::for_descriptor(descriptor, &source_dir, args.file, &import_settings)?;

    // Checked here too so a missing file fails before the warning
    job.source.ensure_available()?;

    println!(
        "Importing {} from {}...",
        descriptor.table,
        job.source.describe()
    );
    println!(
        "Warning: table {} is emptied before loading and is not restored if the import fails.",
        descriptor.table
    );

    let outcome = run_import(&conn, &job)?;
    report(&outcome);
    Ok(())
}

fn report(outcome: &ImportOutcome) {
    if outcome.empty_source {
        eprintln!(
            "Warning: source has no data rows; table {} is now empty.",
            outcome.table
        );
    }

    for failure in &outcome.failures {
        println!(
            "✗ row {}: [{}] {}",
            failure.row_number, failure.code, failure.message
        );
        if let Ok(raw) = serde_json::to_string(&failure.raw) {
            println!("    {}", raw);
        }
    }

    println!(
        "✓ {}: {} imported, {} failed, {} skipped ({} rows read)",
        outcome.table,
        outcome.success_count,
        outcome.failure_count,
        outcome.skipped_count,
        outcome.rows_seen()
    );
}
