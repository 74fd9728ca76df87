#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Nodewire Configuration
//!
//! Named connection contexts for `nodectl`, stored as TOML:
//!
//! ```toml
//! current = "local"
//! timeout_secs = 30
//!
//! [contexts.local]
//! url = "http://127.0.0.1:8500"
//! ```
//!
//! [`CliConfig::resolve_connect`] decides which node URL a command talks to.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Overrides every stored context.
pub const URL_ENV: &str = "NODEWIRE_URL";

/// Selects a stored context by name, ahead of `current`.
pub const CTX_ENV: &str = "NODEWIRE_CTX";

/// Used when nothing else names a node.
pub const DEFAULT_URL: &str = "http://127.0.0.1:8500";

/// Errors that can occur when loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write the configuration file
    #[error("Failed to access config file: {0}")]
    FileRead(#[from] std::io::Error),
    /// Failed to parse the TOML configuration file
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize configuration to TOML format
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// No context with that name exists
    #[error("context not found: {0}")]
    ContextNotFound(String),
    /// `current` is unset
    #[error("no current context set")]
    NoCurrentContext,
    /// Could not locate the user's configuration directory
    #[error("Could not find user config directory")]
    ConfigDirUnavailable,
}

/// A named node endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CtxEntry {
    /// Base URL of the node, without the `/api/v1` suffix.
    pub url: String,
}

/// Everything `nodectl` persists between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Name of the active context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
    /// Default per-request timeout in seconds; `0` or unset disables it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Stored contexts by name.
    #[serde(default)]
    pub contexts: BTreeMap<String, CtxEntry>,
}

impl CliConfig {
    /// Loads configuration from `path`. A missing file yields an empty config.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Saves this configuration as pretty-printed TOML, creating parent directories.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Returns the default config file path:
    /// `{config_dir()}/nodewire/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir =
            dirs::config_dir().ok_or(ConfigError::ConfigDirUnavailable)?.join("nodewire");
        Ok(config_dir.join("config.toml"))
    }

    /// Adds or replaces a context. It becomes current if `use_now` is set or
    /// no context was current yet. Returns `true` if it is now current.
    pub fn add_context(&mut self, name: &str, url: &str, use_now: bool) -> bool {
        self.contexts.insert(name.to_string(), CtxEntry { url: url.to_string() });
        if use_now || self.current.is_none() {
            self.current = Some(name.to_string());
        }
        self.current.as_deref() == Some(name)
    }

    /// Makes `name` the current context.
    pub fn use_context(&mut self, name: &str) -> Result<(), ConfigError> {
        if !self.contexts.contains_key(name) {
            return Err(ConfigError::ContextNotFound(name.to_string()));
        }
        self.current = Some(name.to_string());
        Ok(())
    }

    /// Removes a context, clearing `current` if it pointed there.
    pub fn remove_context(&mut self, name: &str) -> Option<CtxEntry> {
        let removed = self.contexts.remove(name);
        if self.current.as_deref() == Some(name) {
            self.current = None;
        }
        removed
    }

    /// The current context and its name.
    pub fn current_context(&self) -> Result<(&str, &CtxEntry), ConfigError> {
        let name = self.current.as_deref().ok_or(ConfigError::NoCurrentContext)?;
        let entry = self
            .contexts
            .get(name)
            .ok_or_else(|| ConfigError::ContextNotFound(name.to_string()))?;
        Ok((name, entry))
    }

    /// Picks the node URL, first match wins:
    /// 1. `flag` (`--connect`)
    /// 2. `NODEWIRE_URL`
    /// 3. the context named by `NODEWIRE_CTX`
    /// 4. the current context
    /// 5. [`DEFAULT_URL`]
    ///
    /// Blank values are skipped, as is an env context name that is not stored.
    pub fn resolve_connect(&self, flag: Option<&str>) -> String {
        self.resolve_connect_internal(
            flag,
            std::env::var(URL_ENV).ok().as_deref(),
            std::env::var(CTX_ENV).ok().as_deref(),
        )
    }

    /// Internal function for testing - allows injection of environment values
    fn resolve_connect_internal(
        &self,
        flag: Option<&str>,
        url_env: Option<&str>,
        ctx_env: Option<&str>,
    ) -> String {
        let non_blank =
            |s: Option<&str>| s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);

        if let Some(url) = non_blank(flag) {
            return url;
        }
        if let Some(url) = non_blank(url_env) {
            return url;
        }
        if let Some(name) = non_blank(ctx_env) {
            if let Some(ctx) = self.contexts.get(&name) {
                return ctx.url.clone();
            }
        }
        if let Ok((_, ctx)) = self.current_context() {
            return ctx.url.clone();
        }
        DEFAULT_URL.to_string()
    }
}
