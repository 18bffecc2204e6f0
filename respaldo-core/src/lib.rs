//! respaldo core library — configuration, logging, domain types and the
//! project orchestrator.
//!
//! - [`config`] — layered [`RespaldoConfig`] resolution
//! - [`logging`] — append-only `timestamp - LEVEL - message` log
//! - [`types`] — projects, destinations, outcomes
//! - [`orchestrator`] — [`BackupStrategy`] and the enumerate-and-dispatch loop
//! - [`error`] — [`CoreError`]

pub mod config;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod types;

pub use config::{ConfigOverrides, RespaldoConfig};
pub use error::CoreError;
pub use orchestrator::{BackupStrategy, ProjectRun, RunReport};
pub use types::{BackupOutcome, Destination, MirrorStats, Project, ProjectName};
