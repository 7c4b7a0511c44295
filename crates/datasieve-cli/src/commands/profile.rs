//! Profile command - column types, statistics, duplicates and summary.

use std::path::PathBuf;

use colored::Colorize;
use datasieve::{DataSieve, Report};

use super::{load_config, require_file};
use crate::cli::RuleArgs;

pub fn run(
    file: PathBuf,
    json_output: bool,
    output: Option<PathBuf>,
    rules: RuleArgs,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    require_file(&file)?;
    let config = load_config(&rules)?;
    let report = DataSieve::with_config(config).profile_file(&file)?;

    if let Some(path) = &output {
        std::fs::write(path, report.to_json_pretty()?)?;
    }

    if json_output {
        println!("{}", report.to_json_pretty()?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Profiling".cyan().bold(),
        file.display().to_string().white()
    );
    println!();

    print_columns(&report, verbose);
    print_summary(&report);

    if let Some(path) = output {
        println!();
        println!(
            "Report written to {}",
            path.display().to_string().white().bold()
        );
    }

    Ok(())
}

fn print_columns(report: &Report, verbose: bool) {
    println!("{}", "Columns:".yellow().bold());
    for (name, column_type) in report.column_types.iter() {
        let Some(stats) = report.statistics.get(name) else {
            continue;
        };
        let missing = if stats.missing > 0 {
            format!("{} missing", stats.missing).red()
        } else {
            "complete".green()
        };
        println!(
            "  {:20} {:12} {:>6} unique  {}",
            name,
            column_type.label(),
            stats.unique,
            missing
        );

        if let Some(numeric) = &stats.numeric {
            println!(
                "  {:20} mean {:.3}  std {:.3}  min {}  25% {}  50% {}  75% {}  max {}",
                "",
                numeric.mean,
                numeric.std,
                numeric.min,
                numeric.p25,
                numeric.p50,
                numeric.p75,
                numeric.max
            );
        } else if verbose {
            if let Some(top) = &stats.top {
                println!("  {:20} top {:?} ({}x)", "", top, stats.freq);
            }
        }
    }
    println!();
}

fn print_summary(report: &Report) {
    let summary = &report.summary;

    println!("{}", "Summary:".yellow().bold());
    println!("  Rows:            {}", summary.processed_rows.to_string().white().bold());
    println!("  Rows w/ issues:  {}", count(summary.failed_rows));
    println!("  Duplicates:      {}", count(summary.duplicate_count));
    println!("  Missing values:  {}", count(summary.missing_value_rows));
    println!("  Invalid emails:  {}", count(summary.invalid_email_count));
    println!("  Invalid dates:   {}", count(summary.invalid_date_count));
    println!("  Region mismatch: {}", count(summary.region_mismatch_count));
    println!();

    let quality = &report.quality;
    println!("{}", "Quality:".yellow().bold());
    println!("  Completeness: {:.1}%", quality.completeness);
    println!("  Uniqueness:   {:.1}%", quality.uniqueness);
    println!("  Validity:     {:.1}%", quality.validity);
    println!("  Consistency:  {:.1}%", quality.consistency);

    let score = format!("{:.1}%", quality.score);
    let score_color = if quality.score >= 80.0 {
        score.green()
    } else if quality.score >= 50.0 {
        score.yellow()
    } else {
        score.red()
    };
    println!("Data quality score: {}", score_color.bold());
}

fn count(n: usize) -> colored::ColoredString {
    if n == 0 {
        n.to_string().green()
    } else {
        n.to_string().red()
    }
}
