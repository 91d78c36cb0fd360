//! Process scan command.

use anyhow::{Context, Result};
use scanpatch_core::{TargetSpec, scan_target};
use tracing::info;

use crate::commands::report;
use crate::pattern::parse_pattern;

/// Run the process command
pub fn run(pid: u32, search: &str, replace: Option<&str>, json: bool) -> Result<()> {
    let search = parse_pattern(search).context("invalid search pattern")?;
    let replace = replace
        .map(parse_pattern)
        .transpose()
        .context("invalid replacement pattern")?;

    info!("Scanning process {}", pid);
    let spec = TargetSpec::Process(pid);
    let outcome = scan_target(&spec, &search, replace.as_deref())?;

    report::print_outcome(&outcome, &search, replace.is_some(), json)
}
