//! Brickken API client.
//!
//! This crate dispatches the request descriptors produced by
//! `brickken-registry` and knows nothing about individual operations. It
//! covers:
//!
//! - Constructing an HTTP client with the `x-api-key` header pre-set
//! - Discovering credentials from `BRICKKEN_API_KEY` or the OS keychain
//! - Validating `BRICKKEN_API_BASE` overrides for safety
//! - Executing a [`RequestPlan`], including multipart uploads
//!
//! The primary entry point is [`BrickkenClient`]. Create an instance via
//! [`BrickkenClient::new`] and execute plans with [`BrickkenClient::execute`].

use std::env;
use std::fmt;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url, header, multipart};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use brickken_types::{Environment, FormValue, RequestBody, RequestPlan};
use brickken_util::keystore;

pub mod config;

pub use config::ClientConfig;

/// Allowed base domain for non-local `BRICKKEN_API_BASE` overrides.
/// Subdomains are also allowed.
const ALLOWED_DOMAINS: &[&str] = &["brickken.com"];
/// Hostnames allowed for local development regardless of scheme.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Environment variable overriding the API base URL.
pub const API_BASE_ENV_VAR: &str = "BRICKKEN_API_BASE";

/// An API key paired with the environment it belongs to.
///
/// The Debug form never prints the key.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub environment: Environment,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("environment", &self.environment)
            .finish()
    }
}

impl Credentials {
    /// Resolve credentials for an environment.
    ///
    /// Resolution order:
    /// - `BRICKKEN_API_KEY` environment variable
    /// - the OS keychain entry written by `brickken auth login`
    pub fn discover(environment: Environment) -> Result<Self, ApiError> {
        if let Ok(key) = env::var(keystore::API_KEY_ENV_VAR)
            && !key.trim().is_empty()
        {
            return Ok(Self { api_key: key, environment });
        }
        match keystore::load_api_key()? {
            Some(api_key) => Ok(Self { api_key, environment }),
            None => Err(ApiError::MissingApiKey),
        }
    }
}

/// Thin wrapper around a configured `reqwest::Client` for Brickken API access.
///
/// The client pre-configures the `x-api-key` and `Accept` headers and builds
/// requests against a validated base URL.
#[derive(Debug, Clone)]
pub struct BrickkenClient {
    pub base_url: String,
    pub environment: Environment,
    http: Client,
    user_agent: String,
}

/// Outcome of an executed request: the HTTP status and the response body,
/// parsed as JSON when the server sent JSON.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub json: Option<Value>,
    pub text: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl BrickkenClient {
    /// Construct a client for the given credentials.
    ///
    /// The base URL is taken from `BRICKKEN_API_BASE` (if set) or falls back
    /// to the environment's default. Non-localhost hosts must use HTTPS and
    /// sit under `brickken.com`.
    pub fn new(credentials: &Credentials) -> Result<Self, ApiError> {
        let environment = credentials.environment;
        let base_url = env::var(API_BASE_ENV_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| environment.default_base_url().to_string());
        validate_base_url(&base_url)?;

        let http = build_http(credentials)?;
        Ok(Self {
            base_url,
            environment,
            http,
            user_agent: format!("brickken-cli/0.1; {}", env::consts::OS),
        })
    }

    /// Build a `reqwest::RequestBuilder` for a method and API-relative path.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "building request");

        self.http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
    }

    /// Execute a request plan against the configured base URL.
    pub async fn execute(&self, plan: &RequestPlan) -> Result<ApiResponse, ApiError> {
        let method = Method::from_bytes(plan.method.as_bytes())
            .map_err(|_| ApiError::InvalidMethod(plan.method.clone()))?;
        let url = plan
            .url(&self.base_url)
            .map_err(|e| ApiError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: e.to_string(),
            })?;
        debug!(%url, method = %plan.method, "dispatching request");

        let mut request = self
            .http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent);
        for (name, value) in &plan.headers {
            request = request.header(name, value);
        }
        request = match &plan.body {
            Some(RequestBody::Json(body)) => request.json(body),
            Some(RequestBody::Multipart(parts)) => {
                let mut form = multipart::Form::new();
                for part in parts {
                    form = match &part.value {
                        FormValue::Text(text) => form.text(part.name.clone(), text.clone()),
                        FormValue::File(path) => {
                            let bytes = tokio::fs::read(path).await.map_err(|e| {
                                ApiError::FileUpload {
                                    path: path.display().to_string(),
                                    error: e.to_string(),
                                }
                            })?;
                            let file_name = path
                                .file_name()
                                .map(|n| n.to_string_lossy().into_owned())
                                .unwrap_or_else(|| part.name.clone());
                            form.part(
                                part.name.clone(),
                                multipart::Part::bytes(bytes).file_name(file_name),
                            )
                        }
                    };
                }
                request.multipart(form)
            }
            None => request,
        };

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let (json, _) = brickken_util::parse_response_json(&text);
        debug!(status, "received response");
        Ok(ApiResponse { status, json, text })
    }

    /// Verify the stored credentials by calling the connectivity check
    /// endpoint.
    ///
    /// The sandbox check is served from a different host than regular API
    /// traffic; see [`Environment::auth_check_base_url`].
    pub async fn check_credentials(&self) -> Result<ApiResponse, ApiError> {
        let url = format!("{}/get-network-info", self.environment.auth_check_base_url());
        debug!(%url, "checking credentials");
        let response = self
            .http
            .get(url)
            .header(header::USER_AGENT, &self.user_agent)
            .send()
            .await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let (json, _) = brickken_util::parse_response_json(&text);
        Ok(ApiResponse { status, json, text })
    }
}

fn build_http(credentials: &Credentials) -> Result<Client, ApiError> {
    let mut default_headers = header::HeaderMap::new();
    let key_value = header::HeaderValue::from_str(&credentials.api_key)
        .map_err(|_| ApiError::MalformedApiKey)?;
    default_headers.insert("x-api-key", key_value);
    default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

    Client::builder()
        .default_headers(default_headers)
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(ApiError::from)
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS, and host must be `brickken.com` or a
///   subdomain
fn validate_base_url(base: &str) -> Result<(), ApiError> {
    let parsed = Url::parse(base).map_err(|e| ApiError::InvalidBaseUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })?;

    let host = parsed.host_str().ok_or_else(|| ApiError::InvalidBaseUrl {
        url: base.to_string(),
        reason: "missing host".to_string(),
    })?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host.eq_ignore_ascii_case(allowed))
    {
        return Ok(());
    }

    if parsed.scheme() != "https" {
        return Err(ApiError::InvalidBaseUrl {
            url: base.to_string(),
            reason: format!(
                "non-localhost hosts must use https, got '{}://'",
                parsed.scheme()
            ),
        });
    }

    let allowed = ALLOWED_DOMAINS.iter().any(|&domain| {
        host.eq_ignore_ascii_case(domain) || host.ends_with(&format!(".{domain}"))
    });
    if !allowed {
        return Err(ApiError::InvalidBaseUrl {
            url: base.to_string(),
            reason: format!("host '{host}' is not under {ALLOWED_DOMAINS:?}"),
        });
    }

    Ok(())
}

/// Errors surfaced by credential discovery and request dispatch.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(
        "no API key found; run 'brickken auth login' or set {}",
        keystore::API_KEY_ENV_VAR
    )]
    MissingApiKey,

    #[error("API key contains characters not valid in an HTTP header")]
    MalformedApiKey,

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid HTTP method '{0}'")]
    InvalidMethod(String),

    #[error("failed to read '{path}' for upload: {error}")]
    FileUpload { path: String, error: String },

    #[error(transparent)]
    Keystore(#[from] brickken_util::KeystoreError),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_validation_accepts_brickken_hosts() {
        assert!(validate_base_url("https://api.brickken.com").is_ok());
        assert!(validate_base_url("https://api.sandbox.brickken.com").is_ok());
        assert!(validate_base_url("https://api-sandbox.brickken.com").is_ok());
        assert!(validate_base_url("https://brickken.com").is_ok());
    }

    #[test]
    fn base_url_validation_allows_localhost_with_any_scheme() {
        assert!(validate_base_url("http://localhost:3000").is_ok());
        assert!(validate_base_url("http://127.0.0.1:8080").is_ok());
    }

    #[test]
    fn base_url_validation_rejects_foreign_and_plaintext_hosts() {
        assert!(matches!(
            validate_base_url("https://api.example.com"),
            Err(ApiError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            validate_base_url("http://api.brickken.com"),
            Err(ApiError::InvalidBaseUrl { .. })
        ));
        // Suffix match must be on a dot boundary.
        assert!(validate_base_url("https://notbrickken.com").is_err());
    }

    #[test]
    fn credentials_debug_never_prints_the_key() {
        let creds = Credentials {
            api_key: "bk_live_secret".into(),
            environment: Environment::Production,
        };
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("bk_live_secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn discovery_prefers_the_environment_variable() {
        temp_env::with_vars(
            [
                (keystore::SECRETS_BACKEND_ENV_VAR, Some("env")),
                (keystore::API_KEY_ENV_VAR, Some("from-env")),
            ],
            || {
                let creds = Credentials::discover(Environment::Sandbox).unwrap();
                assert_eq!(creds.api_key, "from-env");
            },
        );
    }

    #[test]
    fn discovery_fails_cleanly_without_a_key() {
        temp_env::with_vars(
            [
                (keystore::SECRETS_BACKEND_ENV_VAR, Some("env")),
                (keystore::API_KEY_ENV_VAR, None),
            ],
            || {
                assert!(matches!(
                    Credentials::discover(Environment::Sandbox),
                    Err(ApiError::MissingApiKey)
                ));
            },
        );
    }
}
