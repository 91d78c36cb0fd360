//! File scan command.

use std::path::Path;

use anyhow::{Context, Result};
use scanpatch_core::{TargetSpec, scan_target};
use tracing::info;

use crate::commands::report;
use crate::pattern::parse_pattern;

/// Run the file command
pub fn run(path: &Path, search: &str, replace: Option<&str>, json: bool) -> Result<()> {
    let search = parse_pattern(search).context("invalid search pattern")?;
    let replace = replace
        .map(parse_pattern)
        .transpose()
        .context("invalid replacement pattern")?;

    info!("Scanning {}", path.display());
    let spec = TargetSpec::File(path.to_path_buf());
    let outcome = scan_target(&spec, &search, replace.as_deref())?;

    report::print_outcome(&outcome, &search, replace.is_some(), json)
}
