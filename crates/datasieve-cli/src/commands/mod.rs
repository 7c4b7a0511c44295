//! CLI command implementations.

pub mod check;
pub mod fix;
pub mod profile;

use std::path::{Path, PathBuf};

use datasieve::{RegionRule, SieveConfig};
use tracing::debug;

use crate::cli::{RegionChoice, RuleArgs};

/// Build the engine configuration: config file first, then flag overrides.
pub(crate) fn load_config(rules: &RuleArgs) -> Result<SieveConfig, Box<dyn std::error::Error>> {
    let mut config = match &rules.config {
        Some(path) => SieveConfig::load(path)?,
        None => SieveConfig::default(),
    };

    if let Some(key) = &rules.key {
        config.duplicate_key = Some(key.clone());
    }
    match rules.regions {
        Some(RegionChoice::Builtin) => config.region = Some(RegionRule::wilayas()),
        Some(RegionChoice::None) => config.region = None,
        None => {}
    }

    config.validate()?;
    debug!(
        policy = ?config.policy,
        key = ?config.duplicate_key,
        regions = config.region.is_some(),
        "resolved configuration"
    );
    Ok(config)
}

/// Check that the input file exists before handing it to the engine.
pub(crate) fn require_file(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }
    Ok(())
}

/// `<stem>.<suffix>.<ext>` next to the input file.
pub(crate) fn sibling_path(file: &Path, suffix: &str) -> PathBuf {
    let stem = file.file_stem().unwrap_or_default().to_string_lossy();
    let ext = file
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "csv".to_string());
    file.with_file_name(format!("{}.{}.{}", stem, suffix, ext))
}
