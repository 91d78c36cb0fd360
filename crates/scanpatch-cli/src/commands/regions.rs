//! Region listing command.

use std::path::Path;

use anyhow::{Result, bail};
use scanpatch_core::{Region, TargetAccess, TargetSpec};

/// Run the regions command
pub fn run(pid: Option<u32>, file: Option<&Path>, json: bool) -> Result<()> {
    let spec = match (pid, file) {
        (Some(pid), None) => TargetSpec::Process(pid),
        (None, Some(path)) => TargetSpec::File(path.to_path_buf()),
        _ => bail!("exactly one of --pid or --file is required"),
    };

    let target = spec.open()?;
    let regions: Vec<Region> = target.regions()?.collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&regions)?);
        return Ok(());
    }

    println!("{} region(s):", regions.len());
    for region in &regions {
        println!(
            "  {}  {:>12} bytes  {}",
            region,
            region.size,
            if region.is_scannable() {
                "scannable"
            } else {
                "skipped"
            }
        );
    }

    Ok(())
}
