//! respaldo — back up every project under a directory to GitHub or a NAS.
//!
//! # Usage
//!
//! ```text
//! respaldo --dest github [--projects-dir <path>] [--dry-run]
//! respaldo --dest nas [--projects-dir <path>] [--nas-dir <path>] [--dry-run]
//! ```
//!
//! Every flag except `--dest` can also come from `~/.respaldo/config.yaml`
//! or the `RESPALDO_*` environment variables.

mod backup;

use anyhow::Result;
use clap::Parser;

use backup::BackupArgs;

#[derive(Parser, Debug)]
#[command(
    name = "respaldo",
    version,
    about = "Back up local projects to GitHub or to a NAS folder",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    backup: BackupArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.backup.run()
}
