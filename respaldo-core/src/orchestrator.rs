//! Enumerate-and-dispatch loop shared by both destinations.
//!
//! Only the immediate subdirectories of the projects root are projects. Each
//! one is handed to the selected [`BackupStrategy`]; a failing project is
//! logged and the loop moves on.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::{io_err, CoreError};
use crate::types::{BackupOutcome, Destination, Project};

/// One backup destination, applied to one project at a time.
pub trait BackupStrategy {
    type Error: std::error::Error;

    /// Which destination this strategy writes to.
    fn destination(&self) -> Destination;

    /// Back up a single project.
    ///
    /// Errors abort this project only; the orchestrator logs them.
    fn backup(&self, project: &Project) -> Result<BackupOutcome, Self::Error>;
}

/// Result for one project within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRun {
    pub project: Project,
    /// The outcome, or the rendered error that was logged.
    pub result: Result<BackupOutcome, String>,
}

/// Outcome of a full run over the projects root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub destination: Destination,
    pub projects: Vec<ProjectRun>,
}

impl RunReport {
    /// Number of projects whose backup failed.
    pub fn failures(&self) -> usize {
        self.projects.iter().filter(|p| p.result.is_err()).count()
    }
}

/// List the projects directly under `root`, sorted by name.
///
/// Non-directory entries are ignored. Symlinks to directories count. An
/// unreadable entry fails the whole listing.
pub fn list_projects_at(root: &Path) -> Result<Vec<Project>, CoreError> {
    let entries = std::fs::read_dir(root).map_err(|e| io_err(root, e))?;
    projects_from_entries(root, entries.map(|e| e.map(|e| e.path())))
}

fn projects_from_entries(
    root: &Path,
    entries: impl IntoIterator<Item = io::Result<PathBuf>>,
) -> Result<Vec<Project>, CoreError> {
    let mut projects = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| io_err(root, e))?;
        if path.is_dir() {
            projects.push(Project::from_dir(path));
        }
    }
    projects.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(projects)
}

/// Run `strategy` over every project under `projects_root`.
///
/// Returns `CoreError::ProjectsRootMissing` (already logged) when the root
/// does not exist; nothing is processed in that case.
pub fn run<S: BackupStrategy>(projects_root: &Path, strategy: &S) -> Result<RunReport, CoreError> {
    let destination = strategy.destination();
    if !projects_root.exists() {
        tracing::error!("Projects root {} does not exist.", projects_root.display());
        return Err(CoreError::ProjectsRootMissing {
            path: projects_root.to_path_buf(),
        });
    }

    let projects = list_projects_at(projects_root).map_err(|err| {
        tracing::error!("Cannot list projects under {}: {}", projects_root.display(), err);
        err
    })?;
    tracing::debug!(
        "{} backup of {} project(s) under {}",
        destination.label(),
        projects.len(),
        projects_root.display()
    );

    let mut runs = Vec::with_capacity(projects.len());
    for project in projects {
        let result = match strategy.backup(&project) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                tracing::error!(
                    "{} backup failed for {}: {}",
                    destination.label(),
                    project.path.display(),
                    err
                );
                Err(err.to_string())
            }
        };
        runs.push(ProjectRun { project, result });
    }

    Ok(RunReport {
        destination,
        projects: runs,
    })
}
