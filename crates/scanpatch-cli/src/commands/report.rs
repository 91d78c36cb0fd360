//! Shared result formatting for the scan commands.

use anyhow::Result;
use owo_colors::OwoColorize;
use scanpatch_core::ScanOutcome;

/// Render bytes as a lowercase hex string.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Print a scan outcome in the standard report shape.
pub fn print_outcome(
    outcome: &ScanOutcome,
    search: &[u8],
    patching: bool,
    json: bool,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    let pattern = to_hex(search);
    if outcome.matches.is_empty() {
        println!("No matches for pattern '{}'.", pattern);
    } else {
        println!(
            "Found pattern '{}' at {} location(s):",
            pattern,
            outcome.matches.len()
        );
        for m in &outcome.matches {
            println!("  - start: {:#x}, end: {:#x}", m.start, m.end);
        }

        if patching {
            let line = format!(
                "Patched {}/{} match(es).",
                outcome.writes_applied, outcome.writes_attempted
            );
            if outcome.writes_applied == outcome.writes_attempted {
                println!("{}", line.green());
            } else {
                println!("{}", line.yellow());
            }
        }
    }

    if outcome.regions_skipped > 0 {
        let note = format!(
            "{} region(s) could not be read and were skipped.",
            outcome.regions_skipped
        );
        println!("{}", note.yellow());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_rendering_is_lowercase_and_dense() {
        assert_eq!(to_hex(&[0xde, 0xad, 0x00, 0x0f]), "dead000f");
        assert_eq!(to_hex(&[]), "");
    }
}
