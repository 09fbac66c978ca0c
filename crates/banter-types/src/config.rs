//! Bot configuration loaded from `banter.toml`.
//!
//! [`BotConfig`] carries the transport token, the admin id list the
//! role-ladder gate reads, the command prefix the transport strips (and
//! usage lines render), and the role name mapped to the trusted level.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Largest config file the loader will read.
const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024; // 64 KB

/// Default command prefix.
pub const DEFAULT_PREFIX: &str = ".";

/// Default role name mapped to the trusted level.
pub const DEFAULT_TRUSTED_ROLE: &str = "Trusted";

/// Errors from loading or serializing a [`BotConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read or failed a sanity check.
    #[error("cannot read config file: {0}")]
    Io(String),
    /// The document failed to parse or serialize.
    #[error("malformed config: {0}")]
    Format(String),
    /// The document parsed but holds unusable values.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration for one bot instance.
///
/// `token` is credential material: it is masked in `Debug` output and must
/// never be logged raw.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BotConfig {
    /// Credential the embedding transport connects with.
    pub token: String,
    /// Caller ids the role ladder grants the admin level.
    #[serde(default)]
    pub admins: Vec<String>,
    /// Prefix the transport strips before handing a line to the dispatcher.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Role name that maps to the trusted level.
    #[serde(default = "default_trusted_role")]
    pub trusted_role: String,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_trusted_role() -> String {
    DEFAULT_TRUSTED_ROLE.to_string()
}

impl BotConfig {
    /// Parse a configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Format(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Format(e.to_string()))
    }

    /// Read, parse, and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = read_config_file(path)?;
        let config = Self::from_toml(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the parsed values for problems a typo would cause.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::Invalid("token must not be empty".into()));
        }
        if self.prefix.is_empty() {
            return Err(ConfigError::Invalid("prefix must not be empty".into()));
        }
        if self.admins.iter().any(|id| id.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "admins must not contain empty ids".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &mask_token(&self.token))
            .field("admins", &self.admins)
            .field("prefix", &self.prefix)
            .field("trusted_role", &self.trusted_role)
            .finish()
    }
}

/// Read a config file with sanity checks: size limit, no null bytes.
fn read_config_file(path: &Path) -> Result<String, ConfigError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;

    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Io(format!(
            "{} exceeds maximum size of {} bytes (actual: {} bytes)",
            path.display(),
            MAX_CONFIG_FILE_SIZE,
            metadata.len()
        )));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;

    if content.contains('\0') {
        return Err(ConfigError::Io(format!(
            "{} contains null bytes",
            path.display()
        )));
    }

    Ok(content)
}

/// Mask a token for display or logging.
///
/// Returns the first 4 characters followed by "***", or just "***" if the
/// value is shorter than 4 characters.
pub fn mask_token(value: &str) -> String {
    if value.len() < 4 {
        "***".to_string()
    } else {
        let prefix: String = value.chars().take(4).collect();
        format!("{prefix}***")
    }
}
