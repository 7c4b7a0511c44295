//! Check command - list the issues found on each row.

use std::path::PathBuf;

use colored::Colorize;
use datasieve::DataSieve;

use super::{load_config, require_file};
use crate::cli::RuleArgs;

pub fn run(
    file: PathBuf,
    all: bool,
    rules: RuleArgs,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    require_file(&file)?;
    let config = load_config(&rules)?;

    let sieve = DataSieve::with_config(config);
    let (table, _) = sieve.read(&file)?;
    let report = sieve.check(&table)?;

    println!(
        "{} {}",
        "Checking".cyan().bold(),
        file.display().to_string().white()
    );
    println!();

    for row in &report.rows {
        if row.is_clean() {
            if all {
                println!("  row {:>6}  {}", row.row + 1, "ok".green());
            }
            continue;
        }
        println!("  row {:>6}  {}", row.row + 1, row.issues.red());
    }

    let counts = &report.counts;
    println!();
    println!(
        "{} of {} rows have issues",
        counts.faulty_rows.to_string().white().bold(),
        report.rows.len()
    );
    if counts.faulty_rows > 0 {
        println!(
            "  missing: {}  email: {}  date: {}  region: {}",
            counts.missing_rows, counts.invalid_email, counts.invalid_date, counts.region_mismatch
        );
    } else {
        println!("{}", "No issues found.".green().bold());
    }

    Ok(())
}
