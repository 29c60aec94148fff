//! Configuration loading.
//!
//! Precedence: CLI flags > env vars > config file > defaults. This module
//! covers the last three; `main` applies the flags on top.
//!
//! Config file path: `--config`, else `$NETPOLGEN_CONFIG`, else
//! `~/.netpolgen/config.toml`. Only the implicit default path may be absent.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::translate::PortMode;

/// Env var naming the config file.
pub const CONFIG_PATH_ENV: &str = "NETPOLGEN_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Namespace written into every policy.
    pub namespace: String,

    /// How port tokens are interpreted.
    pub port_mode: PortMode,

    /// Fail the run when any port token was dropped.
    pub strict: bool,

    /// Logging settings.
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            port_mode: PortMode::default(),
            strict: false,
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset (e.g. `info`, `debug`).
    pub level: String,

    /// Directory for rolling JSON logs. Console-only when unset.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

/// An env override that was present but not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedOverride {
    /// Env var name.
    pub var: &'static str,
    /// Value found in the environment.
    pub value: String,
    /// Why it was not applied.
    pub reason: String,
}

impl fmt::Display for RejectedOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:?}: {}", self.var, self.value, self.reason)
    }
}

/// File and env layers merged, plus the env overrides that were ignored.
///
/// Not validated: CLI flags still go on top, so callers validate the
/// final [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    /// Merged configuration.
    pub config: Config,
    /// Ignored env overrides, for logging once a subscriber is installed.
    pub rejected_overrides: Vec<RejectedOverride>,
}

impl Config {
    /// Load configuration with precedence: env vars > TOML file > defaults.
    ///
    /// `explicit` is the `--config` flag, if given.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file is missing or any file
    /// fails to parse.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<LoadedConfig> {
        Self::load_with(explicit, |key| std::env::var(key).ok())
    }

    /// Load using a custom env resolver (for testing).
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_with(
        explicit: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<LoadedConfig> {
        let mut config = match explicit
            .map(Path::to_path_buf)
            .or_else(|| env(CONFIG_PATH_ENV).map(PathBuf::from))
        {
            Some(path) => load_config(&path)?,
            None => match default_config_path() {
                Ok(path) if path.exists() => load_config(&path)?,
                Ok(_) | Err(_) => Self::default(),
            },
        };
        let rejected_overrides = config.apply_overrides(env);
        Ok(LoadedConfig {
            config,
            rejected_overrides,
        })
    }

    /// Apply environment variable overrides.
    ///
    /// Invalid values leave the field untouched and are returned.
    /// Takes a resolver function for testability (avoids `set_var` in tests).
    pub fn apply_overrides(
        &mut self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Vec<RejectedOverride> {
        let mut rejected = Vec::new();
        if let Some(v) = env("NETPOLGEN_NAMESPACE") {
            self.namespace = v;
        }
        if let Some(v) = env("NETPOLGEN_PORT_MODE") {
            match v.parse() {
                Ok(mode) => self.port_mode = mode,
                Err(reason) => rejected.push(RejectedOverride {
                    var: "NETPOLGEN_PORT_MODE",
                    value: v,
                    reason,
                }),
            }
        }
        if let Some(v) = env("NETPOLGEN_STRICT") {
            match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => self.strict = true,
                "0" | "false" | "no" => self.strict = false,
                _ => rejected.push(RejectedOverride {
                    var: "NETPOLGEN_STRICT",
                    value: v.clone(),
                    reason: "expected true/false, yes/no or 1/0".to_owned(),
                }),
            }
        }
        rejected
    }

    /// Validate that configuration values are usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace is empty.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.namespace.trim().is_empty(),
            "namespace must not be empty"
        );
        Ok(())
    }
}

/// Load configuration from a TOML file (no env overrides, no validation).
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config at {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Resolve the default config directory (`~/.netpolgen/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".netpolgen"))
}

/// Resolve the default config file (`~/.netpolgen/config.toml`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

// Default value functions for serde

fn default_namespace() -> String {
    "default".to_owned()
}
fn default_log_level() -> String {
    "info".to_owned()
}
