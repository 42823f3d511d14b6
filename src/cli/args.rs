use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "remotefs",
    version,
    about = "Walk and probe media libraries on local disk, FTP or SMB"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v for verbose, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode: suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file to read [scanner.remote_fs] from (default: platform config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Walk a directory tree and print every directory with its entries
    Walk(WalkArgs),

    /// Print existence, kind and size of a single path
    Stat(StatArgs),

    /// Open the backend connection and report whether it succeeded
    Check(CheckArgs),
}

/// Arguments for the `remotefs walk` command.
#[derive(clap::Args, Debug)]
pub struct WalkArgs {
    /// URL (ftp://host/path, smb://host/share/path) or a path on the configured backend
    pub location: Option<String>,

    /// Emit one JSON object per directory instead of an indented listing
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `remotefs stat` command.
#[derive(clap::Args, Debug)]
pub struct StatArgs {
    /// URL or path on the configured backend
    pub location: String,
}

/// Arguments for the `remotefs check` command.
#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// URL to check instead of the configured backend
    pub location: Option<String>,
}
