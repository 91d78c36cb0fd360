use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod pattern;

#[derive(Parser)]
#[command(name = "scanpatch")]
#[command(about = "Find a byte pattern in a file or live process and optionally patch it")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a file on disk, patching matches in place when REPLACE is given
    File {
        /// File to scan
        path: PathBuf,
        /// Pattern to find: hex digits or a double-quoted literal
        search: String,
        /// Replacement pattern, same length as the search pattern
        replace: Option<String>,
        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Scan a live process's memory, patching matches in place when REPLACE is given
    Process {
        /// Process id to attach to
        pid: u32,
        /// Pattern to find: hex digits or a double-quoted literal
        search: String,
        /// Replacement pattern, same length as the search pattern
        replace: Option<String>,
        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the memory regions a scan would cover
    #[command(group(ArgGroup::new("target").required(true).args(["pid", "file"])))]
    Regions {
        /// Process id to inspect
        #[arg(long)]
        pid: Option<u32>,
        /// File to inspect
        #[arg(long)]
        file: Option<PathBuf>,
        /// Emit the regions as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("scanpatch_cli=info".parse()?)
                .add_directive("scanpatch_core=warn".parse()?),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Command::File {
            path,
            search,
            replace,
            json,
        } => commands::file::run(&path, &search, replace.as_deref(), json),
        Command::Process {
            pid,
            search,
            replace,
            json,
        } => commands::process::run(pid, &search, replace.as_deref(), json),
        Command::Regions { pid, file, json } => commands::regions::run(pid, file.as_deref(), json),
    }
}
