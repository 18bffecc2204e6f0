//! # respaldo-nas
//!
//! Incremental, hash-gated mirror of a project tree onto networked storage.
//!
//! Call [`mirror_project`] directly, or use [`NasStrategy`] with the
//! orchestrator in `respaldo-core`.

pub mod error;
pub mod hasher;
pub mod mirror;

pub use error::NasError;
pub use hasher::{hash_file, FileDigest};
pub use mirror::{mirror_project, CopyResult, MirrorReport, NasStrategy};
