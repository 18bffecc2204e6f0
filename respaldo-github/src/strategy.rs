//! Commit-and-push backup of a single repository.
//!
//! 1. No `.git` marker → one warning, nothing else.
//! 2. `git add .`
//! 3. `git status --porcelain`; empty → one info line, done.
//! 4. `git commit -m "Backup automático <timestamp>"` then `git push`.
//!
//! A failing push leaves the local commit in place.

use chrono::{DateTime, Local};

use respaldo_core::{BackupOutcome, BackupStrategy, Destination, Project};

use crate::error::GitError;
use crate::vcs::{GitCli, Vcs};

/// Commit message for a backup taken at `now`.
pub fn commit_message(now: DateTime<Local>) -> String {
    format!("Backup automático {}", now.format("%Y-%m-%d %H:%M:%S"))
}

/// Back up `project` through `vcs`.
///
/// The marker recorded when the project was enumerated decides whether it is
/// a repository. In dry-run mode only the status is queried; nothing is
/// staged, committed or pushed.
pub fn backup_repository<V: Vcs>(
    vcs: &V,
    project: &Project,
    dry_run: bool,
) -> Result<BackupOutcome, GitError> {
    let project_dir = project.path.as_path();
    if !project.has_vcs_marker {
        tracing::warn!("{} is not a git repository.", project_dir.display());
        return Ok(BackupOutcome::NotARepository);
    }

    if !dry_run {
        vcs.stage_all(project_dir)?;
    }

    let status = vcs.status_porcelain(project_dir)?;
    if status.trim().is_empty() {
        tracing::info!("No changes in {}, nothing committed.", project_dir.display());
        return Ok(BackupOutcome::Clean);
    }

    if dry_run {
        tracing::info!(
            "[dry-run] {} has pending changes; would commit and push.",
            project_dir.display()
        );
        return Ok(BackupOutcome::WouldCommit);
    }

    let message = commit_message(Local::now());
    vcs.commit(project_dir, &message)?;
    vcs.push(project_dir)?;
    tracing::info!("GitHub backup completed for {}", project_dir.display());

    Ok(BackupOutcome::Pushed { message })
}

/// GitHub destination: each project is committed and pushed to its own remote.
#[derive(Debug, Clone)]
pub struct GithubStrategy<V = GitCli> {
    vcs: V,
    dry_run: bool,
}

impl<V: Vcs> GithubStrategy<V> {
    pub fn new(vcs: V, dry_run: bool) -> Self {
        Self { vcs, dry_run }
    }

    pub fn vcs(&self) -> &V {
        &self.vcs
    }
}

impl<V: Vcs> BackupStrategy for GithubStrategy<V> {
    type Error = GitError;

    fn destination(&self) -> Destination {
        Destination::Github
    }

    fn backup(&self, project: &Project) -> Result<BackupOutcome, GitError> {
        backup_repository(&self.vcs, project, self.dry_run)
    }
}
