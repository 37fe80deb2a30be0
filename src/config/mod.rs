//! Configuration management for `bugtrack`.
//!
//! Configuration is loaded from YAML files with support for:
//! - User config (`<config dir>/bugtrack/config.yaml`)
//! - Project config (`.bugtrack.yaml` in the working directory)
//! - Environment variable overrides (`BUGTRACK_DATA`, `BUGTRACK_EXPORT_DIR`)
//! - CLI overrides (`--data`)
//!
//! Later layers win. Relative paths inside a config file are resolved
//! against the directory holding that file.

use std::fs;
use std::path::{Path, PathBuf};

use bugtrack_lib::{BugtrackError, Priority, Result, Status};
use serde::Deserialize;

pub const PROJECT_CONFIG_FILE: &str = ".bugtrack.yaml";
pub const DEFAULT_DATA_FILE: &str = "bugs.json";
pub const ENV_DATA_FILE: &str = "BUGTRACK_DATA";
pub const ENV_EXPORT_DIR: &str = "BUGTRACK_EXPORT_DIR";

/// Effective configuration after all layers are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// JSON data file backing the record store.
    pub data_file: PathBuf,
    /// Priority for `bt add` when `-p` is not given.
    pub default_priority: Priority,
    /// Status for `bt add` when `-s` is not given.
    pub default_status: Status,
    /// Directory that receives exports without an explicit `-o`.
    pub export_dir: PathBuf,
    /// Optional file that also receives log output.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            default_priority: Priority::Medium,
            default_status: Status::Open,
            export_dir: PathBuf::from("."),
            log_file: None,
        }
    }
}

/// One YAML config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    data_file: Option<PathBuf>,
    default_priority: Option<Priority>,
    default_status: Option<Status>,
    export_dir: Option<PathBuf>,
    log_file: Option<PathBuf>,
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub data_file: Option<PathBuf>,
}

/// Values supplied through the environment.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub data_file: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
}

impl EnvOverrides {
    /// Read overrides from the process environment. Empty values are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let read = |key: &str| {
            std::env::var_os(key)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self {
            data_file: read(ENV_DATA_FILE),
            export_dir: read(ENV_EXPORT_DIR),
        }
    }
}

/// Where configuration comes from, lowest precedence first.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub files: Vec<PathBuf>,
    pub env: EnvOverrides,
}

impl ConfigSources {
    /// The user config, the project config and the real environment.
    #[must_use]
    pub fn discover() -> Self {
        let mut files = Vec::new();
        if let Some(dir) = dirs::config_dir() {
            files.push(dir.join("bugtrack").join("config.yaml"));
        }
        files.push(PathBuf::from(PROJECT_CONFIG_FILE));
        Self {
            files,
            env: EnvOverrides::from_env(),
        }
    }
}

/// Load configuration from the standard locations.
///
/// # Errors
///
/// Returns `Config` if a config file exists but is unreadable or invalid.
pub fn load(cli: &CliOverrides) -> Result<Config> {
    load_from(&ConfigSources::discover(), cli)
}

/// Load configuration from explicit sources.
///
/// # Errors
///
/// Returns `Config` if a config file exists but is unreadable or invalid.
pub fn load_from(sources: &ConfigSources, cli: &CliOverrides) -> Result<Config> {
    let mut config = Config::default();

    for path in &sources.files {
        if let Some(file) = read_config_file(path)? {
            tracing::debug!(path = %path.display(), "Applying config file");
            let base = path.parent().unwrap_or_else(|| Path::new(""));
            config.apply_file(file, base);
        }
    }

    if let Some(data_file) = &sources.env.data_file {
        config.data_file.clone_from(data_file);
    }
    if let Some(export_dir) = &sources.env.export_dir {
        config.export_dir.clone_from(export_dir);
    }

    if let Some(data_file) = &cli.data_file {
        config.data_file.clone_from(data_file);
    }

    Ok(config)
}

impl Config {
    fn apply_file(&mut self, file: ConfigFile, base: &Path) {
        if let Some(data_file) = file.data_file {
            self.data_file = resolve(base, data_file);
        }
        if let Some(priority) = file.default_priority {
            self.default_priority = priority;
        }
        if let Some(status) = file.default_status {
            self.default_status = status;
        }
        if let Some(export_dir) = file.export_dir {
            self.export_dir = resolve(base, export_dir);
        }
        if let Some(log_file) = file.log_file {
            self.log_file = Some(resolve(base, log_file));
        }
    }
}

fn resolve(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

fn read_config_file(path: &Path) -> Result<Option<ConfigFile>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(BugtrackError::Config(format!(
                "cannot read {}: {e}",
                path.display()
            )));
        }
    };

    if raw.trim().is_empty() {
        return Ok(Some(ConfigFile::default()));
    }

    serde_yaml::from_str(&raw)
        .map(Some)
        .map_err(|e| BugtrackError::Config(format!("{}: {e}", path.display())))
}
