//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use datasieve::{DuplicateHandling, MissingValueHandling};

/// DataSieve: profile, validate and fix tabular data
#[derive(Parser)]
#[command(name = "datasieve")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Profile a data file: column types, statistics, duplicates and issues
    Profile {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,

        /// Write the full JSON report to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        rules: RuleArgs,
    },

    /// Remediate a data file and write the fixed table
    Fix {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for the fixed table (default: <file>.fixed.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the dropped and altered rows to this path
        #[arg(long)]
        faulty: Option<PathBuf>,

        /// What to do with duplicate rows (keep, drop)
        #[arg(long)]
        duplicates: Option<DuplicateChoice>,

        /// What to do with missing values (drop-row, fill-mean, fill-median)
        #[arg(long)]
        missing: Option<MissingChoice>,

        #[command(flatten)]
        rules: RuleArgs,
    },

    /// List the issues found on each row
    Check {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Also list rows without issues
        #[arg(long)]
        all: bool,

        #[command(flatten)]
        rules: RuleArgs,
    },
}

/// Options shared by every command that runs the field rules.
#[derive(clap::Args, Clone, Debug, Default)]
pub struct RuleArgs {
    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Columns that identify a duplicate, comma-separated (default: all)
    #[arg(short, long, value_delimiter = ',')]
    pub key: Option<Vec<String>>,

    /// Region code table to check against (builtin, none)
    #[arg(long)]
    pub regions: Option<RegionChoice>,
}

/// Duplicate handling choice
#[derive(Clone, Copy, Debug)]
pub struct DuplicateChoice(pub DuplicateHandling);

impl std::str::FromStr for DuplicateChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keep" => Ok(Self(DuplicateHandling::Keep)),
            "drop" => Ok(Self(DuplicateHandling::Drop)),
            _ => Err(format!("Unknown duplicate handling: {}. Use keep or drop.", s)),
        }
    }
}

/// Missing value handling choice
#[derive(Clone, Copy, Debug)]
pub struct MissingChoice(pub MissingValueHandling);

impl std::str::FromStr for MissingChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "drop-row" | "drop" => Ok(Self(MissingValueHandling::DropRow)),
            "fill-mean" | "mean" => Ok(Self(MissingValueHandling::FillMean)),
            "fill-median" | "median" => Ok(Self(MissingValueHandling::FillMedian)),
            _ => Err(format!(
                "Unknown missing value handling: {}. Use drop-row, fill-mean, or fill-median.",
                s
            )),
        }
    }
}

/// Region code table choice
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegionChoice {
    /// Skip the region check
    #[default]
    None,
    /// Built-in wilaya codes on the `state`/`num_state` columns
    Builtin,
}

impl std::str::FromStr for RegionChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "off" => Ok(RegionChoice::None),
            "builtin" | "wilayas" => Ok(RegionChoice::Builtin),
            _ => Err(format!("Unknown region table: {}. Use builtin or none.", s)),
        }
    }
}

impl std::fmt::Display for RegionChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionChoice::None => write!(f, "none"),
            RegionChoice::Builtin => write!(f, "builtin"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_fix_arguments() {
        let cli = Cli::parse_from([
            "datasieve",
            "fix",
            "data.csv",
            "--duplicates",
            "drop",
            "--missing",
            "fill_median",
            "--key",
            "id,email",
        ]);
        match cli.command {
            Commands::Fix {
                duplicates,
                missing,
                rules,
                ..
            } => {
                assert_eq!(duplicates.map(|d| d.0), Some(DuplicateHandling::Drop));
                assert_eq!(missing.map(|m| m.0), Some(MissingValueHandling::FillMedian));
                assert_eq!(rules.key, Some(vec!["id".to_string(), "email".to_string()]));
            }
            _ => panic!("expected fix"),
        }
    }

    #[test]
    fn test_region_choice() {
        assert_eq!("builtin".parse::<RegionChoice>(), Ok(RegionChoice::Builtin));
        assert!("mars".parse::<RegionChoice>().is_err());
    }
}
