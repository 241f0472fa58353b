//! The Config Store: a small per-user key/value record on disk (§4.A).
//!
//! Out of scope as a "core" subsystem, but both the Infrastructure Driver
//! (post-apply admin seed, §4.G) and every subcommand's client
//! construction read through it, so it is specified here at its
//! interface and given a straightforward implementation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write config at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not determine a config directory for this platform")]
    NoConfigDir,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

fn default_provider() -> String {
    "aws".to_string()
}

/// The record persisted to `<config_dir>/runvoy/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_stack: Option<String>,
}

/// Reads/writes the config file. A missing file is equivalent to an empty
/// record (every field defaulted); writes are atomic full-file
/// replacements via a temp-file-then-rename, with unix permissions that
/// forbid other-read.
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// The default location: `dirs::config_dir()/runvoy/config.json`, or
    /// `$RUNVOY_CONFIG_PATH` when set (primarily for tests).
    pub fn discover() -> Result<Self> {
        if let Ok(path) = std::env::var("RUNVOY_CONFIG_PATH") {
            return Ok(Self { path: PathBuf::from(path) });
        }
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self { path: base.join("runvoy").join("config.json") })
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[tracing::instrument(skip(self))]
    pub fn load(&self) -> Result<Config> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(source) => return Err(ConfigError::Read { path: self.path.clone(), source }),
        };
        serde_json::from_str(&contents)
            .map_err(|source| ConfigError::Parse { path: self.path.clone(), source })
    }

    #[tracing::instrument(skip(self, config))]
    pub fn save(&self, config: &Config) -> Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|source| ConfigError::Write { path: self.path.clone(), source })?;

        let tmp_path = dir.join(format!(
            ".{}.tmp",
            self.path.file_name().and_then(|n| n.to_str()).unwrap_or("config")
        ));
        let body = serde_json::to_vec_pretty(config)
            .expect("Config serialization is infallible for well-formed structs");
        fs::write(&tmp_path, &body).map_err(|source| ConfigError::Write { path: tmp_path.clone(), source })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600))
                .map_err(|source| ConfigError::Write { path: tmp_path.clone(), source })?;
        }

        fs::rename(&tmp_path, &self.path)
            .map_err(|source| ConfigError::Write { path: self.path.clone(), source })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::at_path(dir.path().join("config.json"));
        let cfg = store.load().unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.provider, "aws");
    }

    #[test]
    fn round_trips_through_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::at_path(dir.path().join("config.json"));
        let cfg = Config {
            api_endpoint: Some("https://api.runvoy.dev".into()),
            api_key: Some("secret".into()),
            web_url: Some("https://runvoy.dev".into()),
            provider: "aws".into(),
            default_stack: Some("prod".into()),
        };
        store.save(&cfg).unwrap();
        assert_eq!(store.load().unwrap(), cfg);
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_forbids_other_read() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::at_path(dir.path().join("config.json"));
        store.save(&Config::default()).unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0);
    }

    #[test]
    fn save_overwrites_existing_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::at_path(dir.path().join("config.json"));
        store
            .save(&Config { api_key: Some("first".into()), ..Default::default() })
            .unwrap();
        store
            .save(&Config { api_key: Some("second".into()), ..Default::default() })
            .unwrap();
        assert_eq!(store.load().unwrap().api_key.as_deref(), Some("second"));
    }
}
