//! Domain types shared by the orchestrator and both backup strategies.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Name of the version-control metadata entry that marks a project as a git repository.
pub const VCS_MARKER: &str = ".git";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed project name: the directory name under the projects root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectName(pub String);

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProjectName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// A directory directly under the projects root, treated as one backup unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: ProjectName,
    pub path: PathBuf,
    /// Whether `<path>/.git` was present when the project was enumerated.
    pub has_vcs_marker: bool,
}

impl Project {
    /// Build a project from its directory. The name is the final path component.
    pub fn from_dir(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let has_vcs_marker = path.join(VCS_MARKER).exists();
        Self {
            name: ProjectName(name),
            path,
            has_vcs_marker,
        }
    }
}

// ---------------------------------------------------------------------------
// Destination
// ---------------------------------------------------------------------------

/// Backup destination kind selected by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Commit and push each repository to its configured remote.
    Github,
    /// Incremental mirror into the NAS destination root.
    Nas,
}

impl Destination {
    /// Human-readable label used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Github => "GitHub",
            Self::Nas => "NAS",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Github => "github",
            Self::Nas => "nas",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Destination {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "github" => Ok(Self::Github),
            "nas" => Ok(Self::Nas),
            other => Err(format!(
                "unknown destination '{other}'; expected: github, nas"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// File counts produced by one NAS mirror pass over a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorStats {
    /// Files written (absent at the destination, or digest mismatch).
    pub copied: usize,
    /// Files skipped because the destination digest already matched.
    pub unchanged: usize,
    /// Dry-run only: files that would have been written.
    pub would_copy: usize,
}

/// What a strategy did for a single project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    /// NAS mirror finished.
    Mirrored(MirrorStats),
    /// Changes were committed and pushed.
    Pushed { message: String },
    /// Dry-run: the working tree is dirty and would have been committed.
    WouldCommit,
    /// The working tree was clean; nothing committed.
    Clean,
    /// No `.git` marker; the project was skipped.
    NotARepository,
}

impl fmt::Display for BackupOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mirrored(stats) if stats.would_copy > 0 => write!(
                f,
                "{} would copy, {} unchanged",
                stats.would_copy, stats.unchanged
            ),
            Self::Mirrored(stats) => {
                write!(f, "{} copied, {} unchanged", stats.copied, stats.unchanged)
            }
            Self::Pushed { message } => write!(f, "pushed \"{message}\""),
            Self::WouldCommit => write!(f, "would commit and push"),
            Self::Clean => write!(f, "no changes"),
            Self::NotARepository => write!(f, "not a git repository, skipped"),
        }
    }
}
