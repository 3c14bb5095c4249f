// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_hall() -> String {
    "ohill".to_string()
}

fn default_timeout() -> u64 {
    10
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token for plan mutations. Browsing menus works without one.
    pub auth_token: Option<String>,
    #[serde(default = "default_hall")]
    pub default_hall: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_token: None,
            default_hall: default_hall(),
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        // Explicitly detect missing file so callers can fall back to defaults.
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Load the configuration, or defaults when no config file exists yet.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(config) => Ok(config),
            Err(err) if Self::is_missing_config_error(&err) => Ok(Self::default()),
            Err(err) => Err(err),
        }
    }

    /// Whether an error from `load` means the config file was simply absent,
    /// as opposed to unreadable or malformed.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }
        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }
        false
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&path, toml_str).map_err(|e| {
            anyhow::anyhow!("Failed to write config file '{}': {}", path.display(), e)
        })?;
        Ok(())
    }

    /// Get the path string using an explicit context.
    pub fn get_path_string(ctx: &dyn AppContext) -> Result<String> {
        let path = ctx.get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://localhost:8000/api");
        assert_eq!(config.default_hall, "ohill");
        assert_eq!(config.request_timeout_secs, 10);
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let ctx = TestContext::new();

        let mut config = Config::default();
        config.auth_token = Some("secret".to_string());
        config.default_hall = "runk".to_string();
        config.save(&ctx).unwrap();

        let loaded = Config::load(&ctx).unwrap();
        assert_eq!(loaded.auth_token.as_deref(), Some("secret"));
        assert_eq!(loaded.default_hall, "runk");
    }

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let ctx = TestContext::new();

        let err = Config::load(&ctx).unwrap_err();
        assert!(Config::is_missing_config_error(&err));

        let config = Config::load_or_default(&ctx).unwrap();
        assert_eq!(config.default_hall, "ohill");
    }
}
