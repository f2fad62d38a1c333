//! Configuration management for the RT client.
//!
//! This module handles loading configuration from environment variables,
//! with validation to ensure all required values are present. A `Config`
//! can also be built directly with [`Config::new`].

use std::env;
use std::fmt;

use url::Url;

use crate::error::RtError;

/// Default login form endpoint, relative to the base URL.
pub const DEFAULT_AUTH_ENDPOINT: &str = "NoAuth/Login.html";

/// Default REST 2.0 endpoint, relative to the base URL.
pub const DEFAULT_API_ENDPOINT: &str = "REST/2.0/";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How the client authenticates against RT.
#[derive(Clone)]
pub enum Credentials {
    /// Username and password posted to the login form.
    Password {
        /// Login name.
        username: String,
        /// Login password. Never logged.
        password: String,
    },
    /// Token from the RT::Authen::Token extension. Never logged.
    Token(String),
}

impl Credentials {
    /// Returns the secret values that must be redacted from messages.
    pub fn secrets(&self) -> Vec<&str> {
        match self {
            Credentials::Password { password, .. } => vec![password.as_str()],
            Credentials::Token(token) => vec![token.as_str()],
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            Credentials::Token(_) => f.debug_tuple("Token").field(&"[REDACTED]").finish(),
        }
    }
}

/// Configuration for connecting to an RT instance.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the RT instance, always ending in `/`
    /// (e.g., `https://rt.example.com/`).
    pub base_url: String,

    /// Login credentials.
    pub credentials: Credentials,

    /// Login endpoint relative to `base_url`.
    pub auth_endpoint: String,

    /// REST 2.0 endpoint relative to `base_url`.
    pub api_endpoint: String,

    /// Skip TLS certificate verification.
    pub accept_invalid_certs: bool,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Config {
    /// Builds a configuration with default endpoints.
    ///
    /// # Errors
    ///
    /// Returns `RtError::Config` if the base URL is not a valid http(s) URL.
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Result<Self, RtError> {
        Ok(Config {
            base_url: Self::validate_base_url(base_url.into())?,
            credentials,
            auth_endpoint: DEFAULT_AUTH_ENDPOINT.to_string(),
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            accept_invalid_certs: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Loads configuration from environment variables.
    ///
    /// # Required Environment Variables
    ///
    /// - `RT_BASE_URL`: The base URL of the RT instance
    /// - `RT_AUTH_TOKEN`, or both `RT_USERNAME` and `RT_PASSWORD`
    ///
    /// # Optional Environment Variables
    ///
    /// - `RT_AUTH_ENDPOINT` (default `NoAuth/Login.html`)
    /// - `RT_API_ENDPOINT` (default `REST/2.0/`)
    /// - `RT_ACCEPT_INVALID_CERTS` (`true`/`1` to disable TLS verification)
    /// - `RT_TIMEOUT_SECS` (default 30)
    ///
    /// # Errors
    ///
    /// Returns `RtError::Config` if any required variable is missing
    /// or if values fail validation.
    pub fn from_env() -> Result<Self, RtError> {
        let base_url = Self::get_required_env("RT_BASE_URL")?;

        let credentials = match Self::get_optional_env("RT_AUTH_TOKEN") {
            Some(token) => {
                Self::validate_secret("RT_AUTH_TOKEN", &token)?;
                Credentials::Token(token)
            }
            None => {
                let username = Self::get_required_env("RT_USERNAME")?;
                let password = Self::get_required_env("RT_PASSWORD")?;
                Self::validate_secret("RT_PASSWORD", &password)?;
                Credentials::Password { username, password }
            }
        };

        let mut config = Config::new(base_url, credentials)?;

        if let Some(endpoint) = Self::get_optional_env("RT_AUTH_ENDPOINT") {
            config.auth_endpoint = Self::normalize_endpoint(&endpoint, false);
        }
        if let Some(endpoint) = Self::get_optional_env("RT_API_ENDPOINT") {
            config.api_endpoint = Self::normalize_endpoint(&endpoint, true);
        }
        if let Some(flag) = Self::get_optional_env("RT_ACCEPT_INVALID_CERTS") {
            config.accept_invalid_certs = Self::parse_flag("RT_ACCEPT_INVALID_CERTS", &flag)?;
        }
        if let Some(secs) = Self::get_optional_env("RT_TIMEOUT_SECS") {
            config.timeout_secs = secs.trim().parse().map_err(|_| {
                RtError::invalid_config("RT_TIMEOUT_SECS must be a whole number of seconds")
            })?;
        }

        Ok(config)
    }

    /// Gets a required environment variable, returning an error if missing or empty.
    fn get_required_env(name: &str) -> Result<String, RtError> {
        Self::get_optional_env(name).ok_or_else(|| RtError::missing_env(name))
    }

    fn get_optional_env(name: &str) -> Option<String> {
        env::var(name).ok().filter(|value| !value.trim().is_empty())
    }

    /// Validates the base URL and normalizes it to end with a single `/`.
    fn validate_base_url(url: String) -> Result<String, RtError> {
        let url = url.trim();

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(RtError::invalid_config(
                "RT_BASE_URL must start with http:// or https://",
            ));
        }

        let parsed = Url::parse(url)
            .map_err(|e| RtError::invalid_config(format!("RT_BASE_URL is not a valid URL: {}", e)))?;
        if parsed.host().is_none() {
            return Err(RtError::invalid_config("RT_BASE_URL must include a host"));
        }

        Ok(format!("{}/", url.trim_end_matches('/')))
    }

    /// Strips leading slashes and, for directory endpoints, ensures a trailing one.
    fn normalize_endpoint(endpoint: &str, directory: bool) -> String {
        let endpoint = endpoint.trim().trim_start_matches('/');
        if directory && !endpoint.ends_with('/') {
            format!("{}/", endpoint)
        } else {
            endpoint.to_string()
        }
    }

    fn parse_flag(name: &str, value: &str) -> Result<bool, RtError> {
        match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            _ => Err(RtError::invalid_config(format!(
                "{} must be true or false",
                name
            ))),
        }
    }

    /// Rejects secrets that are obviously placeholder values.
    fn validate_secret(name: &str, secret: &str) -> Result<(), RtError> {
        let lower = secret.to_lowercase();
        let placeholder_patterns = ["your_password", "your_token", "placeholder", "changeme"];

        if placeholder_patterns.iter().any(|p| lower.contains(p)) {
            return Err(RtError::invalid_config(format!(
                "{} appears to be a placeholder value",
                name
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // `from_env` is covered in tests/config_tests.rs, which serializes its
    // access to the process environment.

    #[test]
    fn test_validate_base_url_adds_trailing_slash() {
        let result = Config::validate_base_url("https://rt.example.com".to_string()).unwrap();
        assert_eq!(result, "https://rt.example.com/");

        let result = Config::validate_base_url("https://rt.example.com/rt//".to_string()).unwrap();
        assert_eq!(result, "https://rt.example.com/rt/");
    }

    #[test]
    fn test_validate_base_url_requires_scheme() {
        assert!(Config::validate_base_url("rt.example.com/".to_string()).is_err());
    }

    #[test]
    fn test_normalize_endpoint() {
        assert_eq!(Config::normalize_endpoint("/REST/2.0", true), "REST/2.0/");
        assert_eq!(Config::normalize_endpoint("REST/2.0/", true), "REST/2.0/");
        assert_eq!(
            Config::normalize_endpoint("/NoAuth/Login.html", false),
            "NoAuth/Login.html"
        );
    }

    #[test]
    fn test_parse_flag() {
        assert!(Config::parse_flag("X", "TRUE").unwrap());
        assert!(!Config::parse_flag("X", "0").unwrap());
        assert!(Config::parse_flag("X", "maybe").is_err());
    }

    #[test]
    fn test_validate_secret_rejects_placeholder() {
        assert!(Config::validate_secret("RT_PASSWORD", "ChangeMe").is_err());
        assert!(Config::validate_secret("RT_PASSWORD", "s3cr3t-value").is_ok());
    }

    #[test]
    fn test_new_uses_defaults() {
        let config = Config::new("https://rt.example.com", Credentials::Token("t".into())).unwrap();
        assert_eq!(config.auth_endpoint, DEFAULT_AUTH_ENDPOINT);
        assert_eq!(config.api_endpoint, DEFAULT_API_ENDPOINT);
        assert!(!config.accept_invalid_certs);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_credentials_debug_redacts() {
        let creds = Credentials::Password {
            username: "root".to_string(),
            password: "hunter2".to_string(),
        };
        let shown = format!("{:?}", creds);
        assert!(shown.contains("root"));
        assert!(!shown.contains("hunter2"));
    }
}
