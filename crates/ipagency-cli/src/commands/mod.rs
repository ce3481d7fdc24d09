pub mod config;
pub mod tables;

use ipagency_store::tables::COMMAND_PREFIX;

/// Global options that take a separate value (`--log-profile test`)
const GLOBAL_VALUE_OPTIONS: &[&str] = &["--log-profile"];

/// Rewrite the legacy `config:<table>` spelling into `config <table>`.
///
/// Only the subcommand position is rewritten; option values such as
/// `--file config:roles.csv` pass through untouched.
pub fn split_legacy_command(args: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut args: Vec<String> = args.into_iter().collect();

    let mut index = 1;
    while index < args.len() {
        let arg = args[index].as_str();
        if GLOBAL_VALUE_OPTIONS.contains(&arg) {
            index += 2;
        } else if arg.starts_with('-') {
            index += 1;
        } else {
            break;
        }
    }

    let table = args
        .get(index)
        .and_then(|arg| arg.strip_prefix(COMMAND_PREFIX))
        .filter(|table| !table.is_empty())
        .map(str::to_string);
    if let Some(table) = table {
        args[index] = "config".to_string();
        args.insert(index + 1, table);
    }
    args
}
