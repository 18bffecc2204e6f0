//! Layered run configuration.
//!
//! # Resolution order
//!
//! ```text
//! built-in defaults            (<home>/ProyectosDAM, //NAS/Backups/ProyectosDAM, ...)
//!   < <home>/.respaldo/config.yaml   (or --config <path>)
//!   < RESPALDO_* environment variables
//!   < command-line flags
//! ```
//!
//! # API pattern
//!
//! Every loader has two forms:
//! - `fn_at(home: &Path, …)` — explicit home; used in tests with `TempDir`
//! - `fn(…)` — derives home from `dirs::home_dir()`, delegates to `_at`

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{io_err, CoreError};

pub const ENV_PROJECTS_DIR: &str = "RESPALDO_PROJECTS_DIR";
pub const ENV_NAS_DIR: &str = "RESPALDO_NAS_DIR";
pub const ENV_LOG_FILE: &str = "RESPALDO_LOG_FILE";
pub const ENV_GIT: &str = "RESPALDO_GIT";

const DEFAULT_PROJECTS_DIR: &str = "ProyectosDAM";
const DEFAULT_NAS_DIR: &str = "//NAS/Backups/ProyectosDAM";

/// `<home>/.respaldo/`
pub fn respaldo_root(home: &Path) -> PathBuf {
    home.join(".respaldo")
}

/// `<home>/.respaldo/config.yaml` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    respaldo_root(home).join("config.yaml")
}

/// `<home>/.respaldo/logs/backup.log` — pure, no I/O.
pub fn default_log_path_at(home: &Path) -> PathBuf {
    respaldo_root(home).join("logs").join("backup.log")
}

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Fully resolved configuration, passed by reference into the orchestrator
/// and the strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RespaldoConfig {
    /// Directory whose immediate subdirectories are the projects.
    pub projects_root: PathBuf,
    /// Root directory on networked storage for `--dest nas`.
    pub nas_root: PathBuf,
    /// Append-only plain-text log.
    pub log_file: PathBuf,
    /// Program invoked for version-control commands.
    pub git_program: PathBuf,
}

/// A partial configuration layer. `None` leaves the lower layer untouched.
///
/// The same shape is used for the YAML file, the environment and CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    pub projects_root: Option<PathBuf>,
    pub nas_root: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub git_program: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Read the `RESPALDO_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Read overrides through an arbitrary lookup. Empty values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);
        Self {
            projects_root: get(ENV_PROJECTS_DIR),
            nas_root: get(ENV_NAS_DIR),
            log_file: get(ENV_LOG_FILE),
            git_program: get(ENV_GIT),
        }
    }
}

impl RespaldoConfig {
    /// Built-in defaults rooted at `home`.
    pub fn defaults_at(home: &Path) -> Self {
        Self {
            projects_root: home.join(DEFAULT_PROJECTS_DIR),
            nas_root: PathBuf::from(DEFAULT_NAS_DIR),
            log_file: default_log_path_at(home),
            git_program: PathBuf::from("git"),
        }
    }

    /// Overlay `layer` on top of `self`. A leading `~/` in any path is
    /// expanded against `home`.
    pub fn apply(&mut self, home: &Path, layer: &ConfigOverrides) {
        if let Some(p) = &layer.projects_root {
            self.projects_root = expand_home(home, p);
        }
        if let Some(p) = &layer.nas_root {
            self.nas_root = expand_home(home, p);
        }
        if let Some(p) = &layer.log_file {
            self.log_file = expand_home(home, p);
        }
        if let Some(p) = &layer.git_program {
            self.git_program = expand_home(home, p);
        }
    }

    /// Resolve every layer: defaults, config file, environment, then `cli`.
    ///
    /// `explicit_file` must exist when given; the default
    /// `<home>/.respaldo/config.yaml` is optional.
    pub fn resolve_at(
        home: &Path,
        explicit_file: Option<&Path>,
        env: &ConfigOverrides,
        cli: &ConfigOverrides,
    ) -> Result<Self, CoreError> {
        let mut config = Self::defaults_at(home);
        if let Some(file) = load_file_at(home, explicit_file)? {
            config.apply(home, &file);
        }
        config.apply(home, env);
        config.apply(home, cli);
        Ok(config)
    }

    /// `resolve_at` convenience wrapper: home from `dirs::home_dir()`,
    /// environment from the current process.
    pub fn resolve(explicit_file: Option<&Path>, cli: &ConfigOverrides) -> Result<Self, CoreError> {
        let home = dirs::home_dir().ok_or(CoreError::HomeNotFound)?;
        Self::resolve_at(&home, explicit_file, &ConfigOverrides::from_env(), cli)
    }
}

/// Load the YAML config layer.
///
/// Returns `Ok(None)` when no explicit file is given and the default file is
/// absent. Returns `CoreError::ConfigNotFound` if an explicit file is missing,
/// and `CoreError::ConfigParse` (with path + line context) if malformed.
pub fn load_file_at(
    home: &Path,
    explicit_file: Option<&Path>,
) -> Result<Option<ConfigOverrides>, CoreError> {
    let path = match explicit_file {
        Some(p) if !p.exists() => {
            return Err(CoreError::ConfigNotFound {
                path: p.to_path_buf(),
            })
        }
        Some(p) => p.to_path_buf(),
        None => {
            let default = config_path_at(home);
            if !default.exists() {
                return Ok(None);
            }
            default
        }
    };

    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    if contents.trim().is_empty() {
        return Ok(Some(ConfigOverrides::default()));
    }
    serde_yaml::from_str(&contents)
        .map(Some)
        .map_err(|source| CoreError::ConfigParse { path, source })
}

fn expand_home(home: &Path, path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}
