//! # respaldo-github
//!
//! Stage, commit and push each project repository.
//!
//! Version control is reached through the [`Vcs`] trait; [`GitCli`] shells
//! out to `git`, and tests substitute a recording fake.

pub mod error;
pub mod strategy;
pub mod vcs;

pub use error::GitError;
pub use strategy::{backup_repository, commit_message, GithubStrategy};
pub use vcs::{GitCli, Vcs};
