//! `respaldo --dest <github|nas>` — run one backup pass over the projects root.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use respaldo_core::{
    logging, orchestrator, ConfigOverrides, CoreError, Destination, RespaldoConfig, RunReport,
};
use respaldo_github::{GitCli, GithubStrategy};
use respaldo_nas::NasStrategy;

/// Arguments for a backup run.
#[derive(Args, Debug)]
pub struct BackupArgs {
    /// Backup destination: github | nas.
    #[arg(long, value_name = "DEST")]
    pub dest: Destination,

    /// Directory whose immediate subdirectories are backed up.
    #[arg(long, value_name = "PATH")]
    pub projects_dir: Option<PathBuf>,

    /// NAS destination root (used with `--dest nas`).
    #[arg(long, value_name = "PATH")]
    pub nas_dir: Option<PathBuf>,

    /// Append-only log file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Read configuration from this YAML file instead of ~/.respaldo/config.yaml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show what would be backed up without writing anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl BackupArgs {
    pub fn run(self) -> Result<()> {
        let cli_layer = ConfigOverrides {
            projects_root: self.projects_dir,
            nas_root: self.nas_dir,
            log_file: self.log_file,
            git_program: None,
        };
        let config = RespaldoConfig::resolve(self.config.as_deref(), &cli_layer)
            .context("failed to resolve configuration")?;
        logging::init_file_logging(&config.log_file)
            .with_context(|| format!("cannot open log file {}", config.log_file.display()))?;

        tracing::info!(
            "Starting {} backup of {}{}",
            self.dest.label(),
            config.projects_root.display(),
            if self.dry_run { " (dry run)" } else { "" }
        );

        let result = match self.dest {
            Destination::Github => {
                let strategy = GithubStrategy::new(GitCli::new(&config.git_program), self.dry_run);
                orchestrator::run(&config.projects_root, &strategy)
            }
            Destination::Nas => {
                let strategy = NasStrategy::new(&config.nas_root, self.dry_run);
                orchestrator::run(&config.projects_root, &strategy)
            }
        };

        // A missing projects root is reported but still exits 0.
        let report = match result {
            Ok(report) => report,
            Err(CoreError::ProjectsRootMissing { path }) => {
                println!("{} la carpeta {} no existe.", "Error:".red(), path.display());
                return Ok(());
            }
            Err(err) => return Err(err).context("backup run failed"),
        };

        print_report(&report, self.dry_run);
        println!("Backup finalizado. Verifique el log para más detalles.");
        Ok(())
    }
}

fn print_report(report: &RunReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    if report.projects.is_empty() {
        println!("{prefix}No projects found.");
        return;
    }

    for run in &report.projects {
        match &run.result {
            Ok(outcome) => println!("{prefix}{} '{}' — {outcome}", "✓".green(), run.project.name),
            Err(_) => println!(
                "{prefix}{} '{}' — failed, see log",
                "✗".red(),
                run.project.name
            ),
        }
    }
}
