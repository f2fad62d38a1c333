//! HTTP session for the Request Tracker REST API.
//!
//! This module provides the `RtClient` struct: an authenticated session
//! with generic REST 2.0 verbs returning parsed JSON, and a REST 1.0
//! multipart POST whose text answer is decoded by the [`legacy`] parser.
//!
//! Record-specific operations live in [`crate::managers`].
//!
//! # Security
//!
//! Passwords and tokens are never logged. All error messages built from
//! server responses are sanitized before they leave the client.
//!
//! [`legacy`]: crate::legacy

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use indexmap::IndexMap;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::config::{Config, Credentials};
use crate::error::RtError;
use crate::legacy::{self, LegacyResponse};
use crate::models::{Attachment, RecordRef, SystemInfo};

/// Path of the REST 1.0 API, relative to the base URL.
const LEGACY_API_ENDPOINT: &str = "REST/1.0/";

/// Maximum length for HTTP error response bodies kept in errors.
const MAX_ERROR_BODY_LEN: usize = 500;

/// Password inputs of RT's login form; a page carrying one is the login page.
const LOGIN_FORM_MARKERS: [&str; 2] = [r#"name="pass""#, "name='pass'"];

/// An authenticated session with an RT instance.
///
/// Password sessions log in once through the web login form and keep the
/// session cookie; token sessions send `Authorization: token ...` on every
/// request.
///
/// # Example
///
/// ```ignore
/// let config = Config::from_env()?;
/// let client = RtClient::connect(&config).await?;
///
/// let ticket = client.ticket().get("42").await?;
/// ```
pub struct RtClient {
    /// The underlying HTTP client with its cookie store.
    http: Client,

    /// Base URL of the RT instance, ending in `/`.
    base_url: String,

    /// Login form URL.
    auth_url: String,

    /// REST 2.0 URL, ending in `/`.
    api_url: String,

    /// Login credentials.
    /// SECURITY: Never log these values!
    credentials: Credentials,

    /// Request timeout, reported in timeout errors.
    timeout: Duration,

    /// Custom field name to record lookups. Entries live as long as the client.
    custom_field_ids: Mutex<HashMap<String, RecordRef>>,
}

impl RtClient {
    /// Creates a client without logging in.
    ///
    /// Token sessions are usable right away; password sessions need
    /// [`login`](Self::login) first. Prefer [`connect`](Self::connect).
    ///
    /// # Errors
    ///
    /// Returns `RtError::HttpClient` if the HTTP client fails to initialize
    /// and `RtError::Config` if the token is not a valid header value.
    pub fn new(config: &Config) -> Result<Self, RtError> {
        let mut headers = HeaderMap::new();
        if let Credentials::Token(token) = &config.credentials {
            let mut value = HeaderValue::from_str(&format!("token {}", token))
                .map_err(|_| RtError::invalid_config("auth token contains invalid characters"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let timeout = Duration::from_secs(config.timeout_secs);
        let http = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .default_headers(headers)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(RtError::HttpClient)?;

        if config.accept_invalid_certs {
            tracing::warn!("TLS certificate verification is disabled");
        }

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            auth_url: format!("{}{}", config.base_url, config.auth_endpoint),
            api_url: format!("{}{}", config.base_url, config.api_endpoint),
            credentials: config.credentials.clone(),
            timeout,
            custom_field_ids: Mutex::new(HashMap::new()),
        })
    }

    /// Creates a client and authenticates the session.
    ///
    /// # Errors
    ///
    /// Returns `RtError::Authentication` if the login form answers with
    /// 401/403 or shows the login page again, or any transport error raised
    /// while logging in.
    pub async fn connect(config: &Config) -> Result<Self, RtError> {
        let client = Self::new(config)?;
        client.login().await?;
        Ok(client)
    }

    /// Posts the login form for password sessions. Token sessions need no login.
    pub async fn login(&self) -> Result<(), RtError> {
        let Credentials::Password { username, password } = &self.credentials else {
            tracing::debug!("Using token authentication, skipping login form");
            return Ok(());
        };

        tracing::debug!(username = %username, "Logging in to RT");

        let response = self
            .http
            .post(&self.auth_url)
            .form(&[("user", username.as_str()), ("pass", password.as_str())])
            .send()
            .await
            .map_err(|e| self.transport_error(e, "POST login"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.handle_http_error(status, response, "login").await);
        }

        // RT answers a rejected login with 200 and the login form again
        let body = response.text().await.map_err(RtError::Http)?;
        if is_login_form(&body) {
            tracing::warn!(username = %username, "RT returned the login form, credentials rejected");
            return Err(RtError::Authentication);
        }

        tracing::info!(username = %username, "Logged in to RT");
        Ok(())
    }

    /// Base URL of the RT instance, ending in `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Secrets to strip from messages built from server output.
    pub(crate) fn secrets(&self) -> Vec<&str> {
        self.credentials.secrets()
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path.trim_start_matches('/'))
    }

    // ========================================================================
    // REST 2.0 verbs
    // ========================================================================

    /// GET request relative to the REST 2.0 endpoint.
    pub async fn get(&self, path: &str) -> Result<Value, RtError> {
        self.execute(Method::GET, path, self.http.get(self.api_url(path)))
            .await
    }

    /// GET request with query parameters.
    pub async fn get_with_query<Q>(&self, path: &str, query: &Q) -> Result<Value, RtError>
    where
        Q: Serialize + ?Sized,
    {
        let req = self.http.get(self.api_url(path)).query(query);
        self.execute(Method::GET, path, req).await
    }

    /// POST request with a JSON body.
    pub async fn post<B>(&self, path: &str, body: &B) -> Result<Value, RtError>
    where
        B: Serialize + ?Sized,
    {
        let req = self.http.post(self.api_url(path)).json(body);
        self.execute(Method::POST, path, req).await
    }

    /// POST request with query parameters and a JSON body.
    pub async fn post_with_query<Q, B>(
        &self,
        path: &str,
        query: &Q,
        body: &B,
    ) -> Result<Value, RtError>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let req = self.http.post(self.api_url(path)).query(query).json(body);
        self.execute(Method::POST, path, req).await
    }

    /// POST request with a `text/plain` body.
    pub async fn post_text(&self, path: &str, text: impl Into<String>) -> Result<Value, RtError> {
        let req = self
            .http
            .post(self.api_url(path))
            .header(CONTENT_TYPE, "text/plain")
            .body(text.into());
        self.execute(Method::POST, path, req).await
    }

    /// PUT request with a JSON body.
    pub async fn put<B>(&self, path: &str, body: &B) -> Result<Value, RtError>
    where
        B: Serialize + ?Sized,
    {
        let req = self.http.put(self.api_url(path)).json(body);
        self.execute(Method::PUT, path, req).await
    }

    /// DELETE request.
    pub async fn delete(&self, path: &str) -> Result<Value, RtError> {
        self.execute(Method::DELETE, path, self.http.delete(self.api_url(path)))
            .await
    }

    /// Sends a REST 2.0 request and parses the JSON answer.
    ///
    /// Empty bodies (e.g. `204 No Content`) come back as `Value::Null`.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        req: RequestBuilder,
    ) -> Result<Value, RtError> {
        tracing::debug!(method = %method, path = %path, "Making RT API request");

        let response = req
            .send()
            .await
            .map_err(|e| self.transport_error(e, &format!("{} {}", method, path)))?;
        let status = response.status();

        if !status.is_success() {
            return Err(self.handle_http_error(status, response, path).await);
        }

        let body = response.text().await.map_err(RtError::Http)?;

        tracing::trace!(body = %body, "RT API response");

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    // ========================================================================
    // REST 1.0
    // ========================================================================

    /// POSTs fields and files to the REST 1.0 API.
    ///
    /// REST 1.0 is only needed for writes that carry attachments. Files are
    /// sent as `attachment_1..n` parts and listed in an `Attachment` field;
    /// the fields themselves go in the `content` part.
    ///
    /// # Errors
    ///
    /// Besides transport errors, fails when the RT status line in the
    /// answer reports an error.
    pub async fn post_v1(
        &self,
        path: &str,
        mut content: IndexMap<String, String>,
        attachments: &[Attachment],
    ) -> Result<LegacyResponse, RtError> {
        let url = format!(
            "{}{}{}",
            self.base_url,
            LEGACY_API_ENDPOINT,
            path.trim_start_matches('/')
        );

        let mut form = Form::new();
        if !attachments.is_empty() {
            let names: Vec<&str> = attachments.iter().map(|a| a.name.as_str()).collect();
            content.insert("Attachment".to_string(), names.join("\n"));

            for (index, attachment) in attachments.iter().enumerate() {
                let mut part =
                    Part::bytes(attachment.content.clone()).file_name(attachment.name.clone());
                if let Some(mime) = &attachment.mime {
                    part = part.mime_str(mime).map_err(|_| {
                        RtError::validation(format!("invalid MIME type for {}: {}", attachment.name, mime))
                    })?;
                }
                form = form.part(format!("attachment_{}", index + 1), part);
            }
        }
        form = form.text("content", legacy::encode_content(&content));

        tracing::debug!(
            path = %path,
            attachments = attachments.len(),
            "Making RT REST 1.0 request"
        );

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e, &format!("POST {}", path)))?;
        let status = response.status();

        if !status.is_success() {
            return Err(self.handle_http_error(status, response, path).await);
        }

        let body = response.text().await.map_err(RtError::Http)?;

        tracing::trace!(body = %body, "RT REST 1.0 response");

        LegacyResponse::from_body(status.as_u16(), body).into_result()
    }

    // ========================================================================
    // System information
    // ========================================================================

    /// General information about the RT system, including version and plugins.
    pub async fn rt_info(&self) -> Result<SystemInfo, RtError> {
        let value = self.get("rt").await?;
        Ok(serde_json::from_value(value)?)
    }

    /// RT version string.
    pub async fn rt_version(&self) -> Result<String, RtError> {
        Ok(self.rt_info().await?.version)
    }

    /// Installed RT plugins.
    pub async fn rt_plugins(&self) -> Result<Vec<String>, RtError> {
        Ok(self.rt_info().await?.plugins)
    }

    /// Tests connectivity and authentication against the RT server.
    ///
    /// # Errors
    ///
    /// Returns `RtError::ConnectionTest` with details about the failure.
    pub async fn test_connection(&self) -> Result<(), RtError> {
        tracing::debug!("Testing connection to RT server");

        match self.rt_info().await {
            Ok(info) => {
                tracing::info!(version = %info.version, "Connection test successful");
                Ok(())
            }
            Err(RtError::Authentication) => Err(RtError::connection_test(
                "Authentication failed - verify RT credentials",
            )),
            Err(RtError::Timeout { duration, .. }) => Err(RtError::connection_test(format!(
                "Connection timed out after {:?} - verify RT_BASE_URL is correct and server is reachable",
                duration
            ))),
            Err(e) => Err(RtError::connection_test(e.sanitized_display(&self.secrets()))),
        }
    }

    // ========================================================================
    // Custom field id cache
    // ========================================================================

    pub(crate) fn cached_custom_field(&self, name: &str) -> Option<RecordRef> {
        self.custom_field_ids
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(name)
            .cloned()
    }

    /// Stores a lookup result; an existing entry for `name` is kept.
    pub(crate) fn remember_custom_field(&self, name: &str, field: RecordRef) -> RecordRef {
        self.custom_field_ids
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry(name.to_string())
            .or_insert(field)
            .clone()
    }

    // ========================================================================
    // Error classification
    // ========================================================================

    fn transport_error(&self, e: reqwest::Error, operation: &str) -> RtError {
        if e.is_timeout() {
            return RtError::timeout(self.timeout, operation);
        }
        RtError::Http(e)
    }

    /// Converts a non-success response into an `RtError`.
    async fn handle_http_error(
        &self,
        status: StatusCode,
        response: reqwest::Response,
        path: &str,
    ) -> RtError {
        let body = response.text().await.unwrap_or_default();
        let body = RtError::sanitize_message(&body, &self.secrets());
        let body = truncate(body, MAX_ERROR_BODY_LEN);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RtError::Authentication,
            StatusCode::NOT_FOUND => RtError::not_found(path),
            _ => {
                tracing::warn!(status = %status, path = %path, "RT request failed");
                RtError::HttpStatus { status, body }
            }
        }
    }
}

/// True if `body` is RT's login page, which holds the password field.
fn is_login_form(body: &str) -> bool {
    LOGIN_FORM_MARKERS.iter().any(|marker| body.contains(marker))
}

/// Cuts `body` to at most `max` characters.
fn truncate(body: String, max: usize) -> String {
    match body.char_indices().nth(max) {
        Some((end, _)) => format!("{}...[truncated]", &body[..end]),
        None => body,
    }
}
