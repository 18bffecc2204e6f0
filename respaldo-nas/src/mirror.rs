//! Incremental project mirror.
//!
//! ## `copy_if_changed` — per-file protocol
//!
//! 1. If the destination exists, hash both sides.
//! 2. Equal digests → skip, no write.
//! 3. Otherwise ensure the parent directory exists.
//! 4. Copy bytes and permissions, then carry over access/modification times.
//!
//! Nothing is ever deleted from the destination.

use std::fs;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use walkdir::WalkDir;

use respaldo_core::{BackupOutcome, BackupStrategy, Destination, MirrorStats, Project};

use crate::error::{io_err, NasError};
use crate::hasher::hash_file;

// ---------------------------------------------------------------------------
// Copy result
// ---------------------------------------------------------------------------

/// Outcome of an individual file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyResult {
    /// Destination was absent or its digest differed; bytes were written.
    Copied { path: PathBuf },
    /// Destination digest matched the source; nothing written.
    Unchanged { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been copied.
    WouldCopy { path: PathBuf },
}

// ---------------------------------------------------------------------------
// copy_if_changed
// ---------------------------------------------------------------------------

/// Copy `src` to `dst` unless `dst` already holds identical bytes.
pub(crate) fn copy_if_changed(src: &Path, dst: &Path, dry_run: bool) -> Result<CopyResult, NasError> {
    if dst.exists() && hash_file(src)? == hash_file(dst)? {
        tracing::debug!("unchanged: {}", dst.display());
        return Ok(CopyResult::Unchanged {
            path: dst.to_path_buf(),
        });
    }

    if dry_run {
        tracing::debug!("[dry-run] would copy: {}", dst.display());
        return Ok(CopyResult::WouldCopy {
            path: dst.to_path_buf(),
        });
    }

    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    copy_with_metadata(src, dst)?;

    tracing::debug!("copied: {}", dst.display());
    Ok(CopyResult::Copied {
        path: dst.to_path_buf(),
    })
}

/// `fs::copy` carries the permission bits; timestamps are set explicitly.
fn copy_with_metadata(src: &Path, dst: &Path) -> Result<(), NasError> {
    fs::copy(src, dst).map_err(|e| io_err(dst, e))?;
    let meta = fs::metadata(src).map_err(|e| io_err(src, e))?;
    let atime = FileTime::from_last_access_time(&meta);
    let mtime = FileTime::from_last_modification_time(&meta);
    filetime::set_file_times(dst, atime, mtime).map_err(|e| io_err(dst, e))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// mirror_project
// ---------------------------------------------------------------------------

/// Outcome of mirroring one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorReport {
    /// `<dest_root>/<project name>`
    pub target: PathBuf,
    pub files: Vec<CopyResult>,
}

impl MirrorReport {
    pub fn stats(&self) -> MirrorStats {
        let mut stats = MirrorStats::default();
        for f in &self.files {
            match f {
                CopyResult::Copied { .. } => stats.copied += 1,
                CopyResult::Unchanged { .. } => stats.unchanged += 1,
                CopyResult::WouldCopy { .. } => stats.would_copy += 1,
            }
        }
        stats
    }
}

/// Mirror every file under `project_dir` into `<dest_root>/<project name>/`.
///
/// Relative paths are preserved and directories (including empty ones) are
/// recreated. The first error aborts the remaining files of this project.
/// In dry-run mode no directory or file is created.
pub fn mirror_project(
    project_dir: &Path,
    dest_root: &Path,
    dry_run: bool,
) -> Result<MirrorReport, NasError> {
    let name = project_dir
        .file_name()
        .ok_or_else(|| NasError::InvalidProjectDir {
            path: project_dir.to_path_buf(),
        })?;
    let target = dest_root.join(name);
    if !dry_run {
        fs::create_dir_all(&target).map_err(|e| io_err(&target, e))?;
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(project_dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let src = entry.path();
        let rel = src
            .strip_prefix(project_dir)
            .map_err(|_| NasError::InvalidProjectDir {
                path: src.to_path_buf(),
            })?;
        let dst = target.join(rel);

        let file_type = entry.file_type();
        if file_type.is_dir() {
            if !dry_run {
                fs::create_dir_all(&dst).map_err(|e| io_err(&dst, e))?;
            }
            continue;
        }
        // Links to files are followed. Links to directories are not mirrored;
        // a dangling link fails like any unreadable file.
        if file_type.is_symlink() {
            let target = fs::metadata(src).map_err(|e| io_err(src, e))?;
            if target.is_dir() {
                tracing::debug!("skipping directory link: {}", src.display());
                continue;
            }
        }

        files.push(copy_if_changed(src, &dst, dry_run)?);
    }

    Ok(MirrorReport { target, files })
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// NAS destination: mirrors each project under a fixed destination root.
#[derive(Debug, Clone)]
pub struct NasStrategy {
    dest_root: PathBuf,
    dry_run: bool,
}

impl NasStrategy {
    pub fn new(dest_root: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            dest_root: dest_root.into(),
            dry_run,
        }
    }

}

impl BackupStrategy for NasStrategy {
    type Error = NasError;

    fn destination(&self) -> Destination {
        Destination::Nas
    }

    fn backup(&self, project: &Project) -> Result<BackupOutcome, NasError> {
        let report = mirror_project(&project.path, &self.dest_root, self.dry_run)?;
        let stats = report.stats();
        if self.dry_run {
            tracing::info!(
                "[dry-run] NAS backup for {}: {} file(s) would be copied",
                project.path.display(),
                stats.would_copy
            );
        } else {
            tracing::info!(
                "NAS backup completed for {} ({} copied, {} unchanged)",
                project.path.display(),
                stats.copied,
                stats.unchanged
            );
        }
        Ok(BackupOutcome::Mirrored(stats))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
