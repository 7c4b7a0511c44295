//! Fix command - apply a remediation policy and write the fixed table.

use std::path::PathBuf;

use colored::Colorize;
use datasieve::input::write_delimited_file;
use datasieve::transform::ChangeReason;
use datasieve::DataSieve;

use super::{load_config, require_file, sibling_path};
use crate::cli::{DuplicateChoice, MissingChoice, RuleArgs};

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    faulty: Option<PathBuf>,
    duplicates: Option<DuplicateChoice>,
    missing: Option<MissingChoice>,
    rules: RuleArgs,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    require_file(&file)?;

    let mut config = load_config(&rules)?;
    if let Some(DuplicateChoice(handling)) = duplicates {
        config.policy.duplicate_handling = handling;
    }
    if let Some(MissingChoice(handling)) = missing {
        config.policy.missing_value_handling = handling;
    }

    println!(
        "{} {}",
        "Fixing".cyan().bold(),
        file.display().to_string().white()
    );

    let sieve = DataSieve::with_config(config);
    let (table, source) = sieve.read(&file)?;
    let result = sieve.remediate(&table)?;
    let delimiter = source.delimiter as u8;

    let output_path = output.unwrap_or_else(|| sibling_path(&file, "fixed"));
    write_delimited_file(&result.table, &output_path, delimiter)?;

    let log = &result.change_log;
    let filled = log.filled_rows().count();
    println!(
        "Kept {} of {} rows ({} dropped, {} filled)",
        result.table.row_count().to_string().white().bold(),
        table.row_count(),
        log.dropped_count().to_string().red(),
        filled.to_string().yellow()
    );
    if log.duplicate_drops() > 0 {
        println!(
            "  {} duplicate rows removed",
            log.duplicate_drops().to_string().red()
        );
    }

    for (column, value) in &result.fill_values {
        println!("  Fill value for {}: {}", column.cyan(), value);
    }
    for warning in &result.warnings {
        println!("{} {}", "Warning:".yellow().bold(), warning.message);
    }

    if verbose && !log.is_empty() {
        println!();
        println!("{}", "Changes:".yellow().bold());
        for entry in log.entries() {
            let reason = entry.reason.to_string();
            let reason = match entry.reason {
                ChangeReason::Filled { .. } => reason.yellow(),
                _ => reason.red(),
            };
            // rows are numbered from 1 for display
            println!("  row {:>6}  {}", entry.row + 1, reason);
        }
    }

    println!();
    println!(
        "Fixed table written to {}",
        output_path.display().to_string().white().bold()
    );

    if let Some(faulty_path) = faulty {
        let faulty_table = result.faulty_rows(&table);
        write_delimited_file(&faulty_table, &faulty_path, delimiter)?;
        println!(
            "Faulty rows ({}) written to {}",
            faulty_table.row_count(),
            faulty_path.display().to_string().white().bold()
        );
    }

    Ok(())
}
