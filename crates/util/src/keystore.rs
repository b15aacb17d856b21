//! API-key storage backed by the OS keychain.
//!
//! The key is held under the `brickken` keychain service. Setting
//! `BRICKKEN_SECRETS_BACKEND=env` bypasses the keychain and resolves the key
//! from the process environment instead, which keeps CI and containers
//! keychain-free.

use thiserror::Error;
use tracing::debug;

static SERVICE: &str = "brickken";
static ENTRY: &str = "api-key";

/// Environment variable used to select the secret resolution backend.
pub const SECRETS_BACKEND_ENV_VAR: &str = "BRICKKEN_SECRETS_BACKEND";

/// Environment variable consulted by the `env` backend.
pub const API_KEY_ENV_VAR: &str = "BRICKKEN_API_KEY";

/// Secret resolution backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretsBackend {
    /// Resolve the API key via the OS keychain (`keyring-rs`).
    Keychain,
    /// Resolve the API key from the process environment.
    Environment,
}

impl SecretsBackend {
    fn from_env_var(raw: Option<String>) -> Self {
        match raw.unwrap_or_default().trim().to_ascii_lowercase().as_str() {
            "env" => Self::Environment,
            _ => Self::Keychain,
        }
    }
}

/// Determine the currently configured secrets backend.
pub fn secrets_backend() -> SecretsBackend {
    let configured_value = std::env::var(SECRETS_BACKEND_ENV_VAR).ok();
    SecretsBackend::from_env_var(configured_value)
}

/// Load the stored API key, if any.
pub fn load_api_key() -> Result<Option<String>, KeystoreError> {
    match secrets_backend() {
        SecretsBackend::Environment => Ok(std::env::var(API_KEY_ENV_VAR).ok()),
        SecretsBackend::Keychain => {
            let entry = keyring_entry()?;
            match entry.get_password() {
                Ok(value) => Ok(Some(value)),
                Err(keyring::Error::NoEntry) => Ok(None),
                Err(e) => Err(KeystoreError::Keyring { error: e.to_string() }),
            }
        }
    }
}

/// Store the API key in the OS keychain.
pub fn store_api_key(value: &str) -> Result<(), KeystoreError> {
    if secrets_backend() == SecretsBackend::Environment {
        return Err(KeystoreError::EnvBackendIsReadOnly);
    }
    let entry = keyring_entry()?;
    entry
        .set_password(value)
        .map_err(|e| KeystoreError::Keyring { error: e.to_string() })?;
    debug!("stored API key in keychain");
    Ok(())
}

/// Remove the API key from the OS keychain.
pub fn remove_api_key() -> Result<(), KeystoreError> {
    if secrets_backend() == SecretsBackend::Environment {
        return Err(KeystoreError::EnvBackendIsReadOnly);
    }
    let entry = keyring_entry()?;
    match entry.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => {
            debug!("removed API key from keychain");
            Ok(())
        }
        Err(e) => Err(KeystoreError::Keyring { error: e.to_string() }),
    }
}

fn keyring_entry() -> Result<keyring::Entry, KeystoreError> {
    keyring::Entry::new(SERVICE, ENTRY).map_err(|e| KeystoreError::Keyring { error: e.to_string() })
}

/// Errors that can occur while accessing stored credentials.
#[derive(Debug, Error, Clone)]
pub enum KeystoreError {
    #[error("keychain error: {error}")]
    Keyring { error: String },

    #[error("secrets backend is 'env'; set {API_KEY_ENV_VAR} instead of writing to the keychain")]
    EnvBackendIsReadOnly,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_defaults_to_keychain_when_env_var_is_missing() {
        temp_env::with_var(SECRETS_BACKEND_ENV_VAR, None::<&str>, || {
            assert_eq!(secrets_backend(), SecretsBackend::Keychain);
        });
    }

    #[test]
    fn backend_uses_environment_when_configured() {
        temp_env::with_var(SECRETS_BACKEND_ENV_VAR, Some("env"), || {
            assert_eq!(secrets_backend(), SecretsBackend::Environment);
        });
    }

    #[test]
    fn env_backend_reads_the_process_environment() {
        temp_env::with_vars(
            [
                (SECRETS_BACKEND_ENV_VAR, Some("env")),
                (API_KEY_ENV_VAR, Some("test-key-value")),
            ],
            || {
                let key = load_api_key().expect("env backend never fails");
                assert_eq!(key.as_deref(), Some("test-key-value"));
            },
        );
    }

    #[test]
    fn env_backend_rejects_writes() {
        temp_env::with_var(SECRETS_BACKEND_ENV_VAR, Some("env"), || {
            assert!(matches!(
                store_api_key("nope"),
                Err(KeystoreError::EnvBackendIsReadOnly)
            ));
            assert!(matches!(
                remove_api_key(),
                Err(KeystoreError::EnvBackendIsReadOnly)
            ));
        });
    }
}
