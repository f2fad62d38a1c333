//! `Config::from_env` against the process environment.
//!
//! Every test holds `ENV_LOCK` while it edits variables, since the
//! environment is shared by all tests in this binary.

use std::env;
use std::sync::{Mutex, MutexGuard};

use pretty_assertions::assert_eq;
use tokio_test::{assert_err, assert_ok};

use rt_rest::config::{Config, Credentials};
use rt_rest::error::RtError;

static ENV_LOCK: Mutex<()> = Mutex::new(());

const VARS: [&str; 8] = [
    "RT_BASE_URL",
    "RT_AUTH_TOKEN",
    "RT_USERNAME",
    "RT_PASSWORD",
    "RT_AUTH_ENDPOINT",
    "RT_API_ENDPOINT",
    "RT_ACCEPT_INVALID_CERTS",
    "RT_TIMEOUT_SECS",
];

/// Locks the environment and starts from a clean set of RT variables.
fn with_env(vars: &[(&str, &str)]) -> MutexGuard<'static, ()> {
    let guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    for name in VARS {
        env::remove_var(name);
    }
    for (name, value) in vars {
        env::set_var(name, value);
    }
    guard
}

fn config_message(err: RtError) -> String {
    match err {
        RtError::Config(message) => message,
        other => panic!("expected a configuration error, got {:?}", other),
    }
}

#[test]
fn password_credentials_with_defaults() {
    let _env = with_env(&[
        ("RT_BASE_URL", "https://rt.example.com/rt"),
        ("RT_USERNAME", "root"),
        ("RT_PASSWORD", "s3cr3t-value"),
    ]);

    let config = assert_ok!(Config::from_env());
    assert_eq!(config.base_url, "https://rt.example.com/rt/");
    assert_eq!(config.auth_endpoint, "NoAuth/Login.html");
    assert_eq!(config.api_endpoint, "REST/2.0/");
    assert!(!config.accept_invalid_certs);
    assert_eq!(config.timeout_secs, 30);
    assert!(matches!(
        config.credentials,
        Credentials::Password { ref username, ref password }
            if username == "root" && password == "s3cr3t-value"
    ));
}

#[test]
fn token_takes_precedence_over_password() {
    let _env = with_env(&[
        ("RT_BASE_URL", "https://rt.example.com"),
        ("RT_AUTH_TOKEN", "1-14-abcdef0123456789"),
        ("RT_USERNAME", "root"),
        ("RT_PASSWORD", "s3cr3t-value"),
    ]);

    let config = assert_ok!(Config::from_env());
    assert!(matches!(
        config.credentials,
        Credentials::Token(ref token) if token == "1-14-abcdef0123456789"
    ));
}

#[test]
fn missing_password_without_token_is_rejected() {
    let _env = with_env(&[
        ("RT_BASE_URL", "https://rt.example.com"),
        ("RT_USERNAME", "root"),
    ]);

    let message = config_message(assert_err!(Config::from_env()));
    assert!(message.contains("RT_PASSWORD"), "{}", message);
}

#[test]
fn blank_token_falls_back_to_password() {
    let _env = with_env(&[
        ("RT_BASE_URL", "https://rt.example.com"),
        ("RT_AUTH_TOKEN", "   "),
        ("RT_USERNAME", "root"),
    ]);

    let message = config_message(assert_err!(Config::from_env()));
    assert!(message.contains("RT_PASSWORD"), "{}", message);
}

#[test]
fn missing_base_url_is_rejected() {
    let _env = with_env(&[("RT_AUTH_TOKEN", "1-14-abcdef0123456789")]);

    let message = config_message(assert_err!(Config::from_env()));
    assert!(message.contains("RT_BASE_URL"), "{}", message);
}

#[test]
fn placeholder_token_is_rejected() {
    let _env = with_env(&[
        ("RT_BASE_URL", "https://rt.example.com"),
        ("RT_AUTH_TOKEN", "your_token_here"),
    ]);

    let message = config_message(assert_err!(Config::from_env()));
    assert!(message.contains("RT_AUTH_TOKEN"), "{}", message);
}

#[test]
fn endpoints_are_normalized() {
    let _env = with_env(&[
        ("RT_BASE_URL", "https://rt.example.com"),
        ("RT_AUTH_TOKEN", "1-14-abcdef0123456789"),
        ("RT_AUTH_ENDPOINT", "/NoAuth/Login.html"),
        ("RT_API_ENDPOINT", "/REST/2.0"),
    ]);

    let config = assert_ok!(Config::from_env());
    assert_eq!(config.auth_endpoint, "NoAuth/Login.html");
    assert_eq!(config.api_endpoint, "REST/2.0/");
}

#[test]
fn optional_flags_are_parsed() {
    let _env = with_env(&[
        ("RT_BASE_URL", "https://rt.example.com"),
        ("RT_AUTH_TOKEN", "1-14-abcdef0123456789"),
        ("RT_ACCEPT_INVALID_CERTS", "yes"),
        ("RT_TIMEOUT_SECS", " 90 "),
    ]);

    let config = assert_ok!(Config::from_env());
    assert!(config.accept_invalid_certs);
    assert_eq!(config.timeout_secs, 90);
}

#[test]
fn invalid_timeout_is_rejected() {
    let _env = with_env(&[
        ("RT_BASE_URL", "https://rt.example.com"),
        ("RT_AUTH_TOKEN", "1-14-abcdef0123456789"),
        ("RT_TIMEOUT_SECS", "soon"),
    ]);

    let message = config_message(assert_err!(Config::from_env()));
    assert!(message.contains("RT_TIMEOUT_SECS"), "{}", message);
}

#[test]
fn invalid_certificate_flag_is_rejected() {
    let _env = with_env(&[
        ("RT_BASE_URL", "https://rt.example.com"),
        ("RT_AUTH_TOKEN", "1-14-abcdef0123456789"),
        ("RT_ACCEPT_INVALID_CERTS", "maybe"),
    ]);

    let message = config_message(assert_err!(Config::from_env()));
    assert!(message.contains("RT_ACCEPT_INVALID_CERTS"), "{}", message);
}
