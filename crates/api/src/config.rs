//! Persistent client configuration.
//!
//! The selected environment is stored as JSON under the platform config
//! directory (`brickken/config.json`). `BRICKKEN_ENV` overrides the stored
//! value for a single invocation, `BRICKKEN_CONFIG_PATH` relocates the file.

use std::{env, io, path::PathBuf};

use dirs_next::config_dir;
use serde::{Deserialize, Serialize};

use brickken_types::Environment;
use brickken_util::expand_tilde;

/// Environment variable overriding the stored environment selection.
pub const ENVIRONMENT_ENV_VAR: &str = "BRICKKEN_ENV";

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV_VAR: &str = "BRICKKEN_CONFIG_PATH";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub environment: Environment,
}

impl ClientConfig {
    /// Load the stored configuration, falling back to defaults when the file
    /// is missing or unreadable.
    pub fn load() -> Self {
        let path = default_config_path();
        if let Ok(content) = std::fs::read_to_string(&path)
            && let Ok(config) = serde_json::from_str(&content)
        {
            return config;
        }
        ClientConfig::default()
    }

    pub fn save(&self) -> Result<(), io::Error> {
        let path = default_config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// The environment to use for this invocation: `BRICKKEN_ENV` when set
    /// and valid, the stored selection otherwise.
    pub fn effective_environment(&self) -> Environment {
        if let Ok(raw) = env::var(ENVIRONMENT_ENV_VAR)
            && let Ok(environment) = raw.parse()
        {
            return environment;
        }
        self.environment
    }
}

/// Get the default path for the configuration file.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("brickken")
        .join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_environment_is_sandbox() {
        let config = ClientConfig::default();
        assert_eq!(config.environment, Environment::Sandbox);
    }

    #[test]
    fn env_var_overrides_the_stored_environment() {
        let config = ClientConfig {
            environment: Environment::Sandbox,
        };
        temp_env::with_var(ENVIRONMENT_ENV_VAR, Some("production"), || {
            assert_eq!(config.effective_environment(), Environment::Production);
        });
        temp_env::with_var(ENVIRONMENT_ENV_VAR, Some("not-an-env"), || {
            assert_eq!(config.effective_environment(), Environment::Sandbox);
        });
        temp_env::with_var(ENVIRONMENT_ENV_VAR, None::<&str>, || {
            assert_eq!(config.effective_environment(), Environment::Sandbox);
        });
    }

    #[test]
    fn config_path_env_var_relocates_the_file() {
        temp_env::with_var(CONFIG_PATH_ENV_VAR, Some("/tmp/brickken-test.json"), || {
            assert_eq!(
                default_config_path(),
                PathBuf::from("/tmp/brickken-test.json")
            );
        });
    }

    #[test]
    fn config_saves_and_reloads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        temp_env::with_var(CONFIG_PATH_ENV_VAR, Some(path.to_str().unwrap()), || {
            let config = ClientConfig {
                environment: Environment::Production,
            };
            config.save().unwrap();
            assert_eq!(ClientConfig::load(), config);
        });
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = ClientConfig {
            environment: Environment::Production,
        };
        let text = serde_json::to_string(&config).unwrap();
        let back: ClientConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, config);
        let legacy: ClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(legacy.environment, Environment::Sandbox);
    }
}
