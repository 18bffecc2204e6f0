use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::GitError;

/// The four version-control operations a backup needs.
pub trait Vcs {
    /// Stage every change in the working tree (`git add .`).
    fn stage_all(&self, repo: &Path) -> Result<(), GitError>;

    /// Raw `git status --porcelain` output. Empty means clean.
    fn status_porcelain(&self, repo: &Path) -> Result<String, GitError>;

    fn commit(&self, repo: &Path, message: &str) -> Result<(), GitError>;

    /// Push the current branch to its configured remote.
    fn push(&self, repo: &Path) -> Result<(), GitError>;
}

/// [`Vcs`] backed by the `git` command-line tool.
///
/// Commands block until they exit; no timeout is applied.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn run(&self, repo: &Path, args: &[&str]) -> Result<String, GitError> {
        let command = format!(
            "{} -C {} {}",
            self.program.display(),
            repo.display(),
            args.join(" ")
        );
        tracing::debug!("running: {command}");

        let output = Command::new(&self.program)
            .arg("-C")
            .arg(repo)
            .args(args)
            .output()
            .map_err(|source| GitError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(GitError::CommandFailed {
            command,
            status: output.status.to_string(),
            stderr,
        })
    }
}

impl Vcs for GitCli {
    fn stage_all(&self, repo: &Path) -> Result<(), GitError> {
        self.run(repo, &["add", "."]).map(drop)
    }

    fn status_porcelain(&self, repo: &Path) -> Result<String, GitError> {
        self.run(repo, &["status", "--porcelain"])
    }

    fn commit(&self, repo: &Path, message: &str) -> Result<(), GitError> {
        self.run(repo, &["commit", "-m", message]).map(drop)
    }

    fn push(&self, repo: &Path) -> Result<(), GitError> {
        self.run(repo, &["push"]).map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_program_is_a_spawn_error() {
        let tmp = TempDir::new().unwrap();
        let git = GitCli::new(tmp.path().join("no-such-git"));
        let err = git.stage_all(tmp.path()).unwrap_err();
        assert!(matches!(err, GitError::Spawn { .. }), "got: {err}");
        assert!(err.to_string().contains("no-such-git"));
    }

    #[test]
    #[cfg(unix)]
    fn non_zero_exit_carries_command_and_stderr() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let fake = tmp.path().join("fake-git");
        std::fs::write(&fake, "#!/bin/sh\necho 'fatal: nope' >&2\nexit 128\n").unwrap();
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

        let err = GitCli::new(&fake).push(tmp.path()).unwrap_err();
        match err {
            GitError::CommandFailed {
                command,
                status,
                stderr,
            } => {
                assert!(command.ends_with(" push"), "got: {command}");
                assert!(status.contains("128"), "got: {status}");
                assert_eq!(stderr, "fatal: nope");
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }

    #[test]
    #[cfg(unix)]
    fn status_returns_raw_stdout() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let fake = tmp.path().join("fake-git");
        std::fs::write(&fake, "#!/bin/sh\nprintf ' M src/main.rs\\n'\n").unwrap();
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

        let out = GitCli::new(&fake).status_porcelain(tmp.path()).unwrap();
        assert_eq!(out, " M src/main.rs\n");
    }
}
