//! Core Last.fm client and shared request dispatch
//!
//! Every per-resource method catalog funnels through [`LastfmClient::call`],
//! which owns query assembly, transport, retry, and decoding of the
//! service-level error envelope. The per-method layer never looks at HTTP.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{LastfmError, LastfmResult};
use crate::models::ErrorResponse;

/// Last.fm API base URL
const LASTFM_API_URL: &str = "https://ws.audioscrobbler.com/2.0/";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Maximum length accepted for artist/album/track/user name parameters
const MAX_NAME_LENGTH: usize = 256;

/// Default number of retry attempts for transient failures
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds)
const RETRY_BASE_DELAY_MS: u64 = 100;

/// Service error code for "the requested entity was not found"
const ERROR_CODE_NOT_FOUND: i32 = 6;

/// Service error code for "invalid API key"
const ERROR_CODE_INVALID_KEY: i32 = 10;

/// Last.fm API client
///
/// One method per remote operation, grouped by resource in the `album`,
/// `artist`, `track` and `user` modules. The client is cheap to clone and
/// safe to share across concurrent callers.
#[derive(Clone)]
pub struct LastfmClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    max_retries: u32,
    retry_base_delay_ms: u64,
}

/// API key validation status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeyStatus {
    /// API key is valid
    Valid,
    /// API key is invalid
    Invalid,
    /// Could not determine validity (network error, etc.)
    Unknown(String),
}

impl fmt::Debug for LastfmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LastfmClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl LastfmClient {
    /// Create a new Last.fm client with the given API key
    ///
    /// # Errors
    /// Returns `LastfmError::MissingApiKey` if the API key is empty
    pub fn new(api_key: impl Into<String>) -> LastfmResult<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LastfmError::MissingApiKey);
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .pool_max_idle_per_host(5)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent("lastfm-rs/0.1")
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            base_url: LASTFM_API_URL.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay_ms: RETRY_BASE_DELAY_MS,
        })
    }

    /// Create a Last.fm client from environment variable
    ///
    /// Reads `LASTFM_API_KEY` from the environment.
    ///
    /// # Errors
    /// - `LastfmError::MissingApiKey` if the variable is not set or is empty
    /// - `LastfmError::InvalidInput` if the variable contains invalid UTF-8
    pub fn from_env() -> LastfmResult<Self> {
        match std::env::var("LASTFM_API_KEY") {
            Ok(key) if key.is_empty() => Err(LastfmError::MissingApiKey),
            Ok(key) => Self::new(key),
            Err(std::env::VarError::NotPresent) => Err(LastfmError::MissingApiKey),
            Err(std::env::VarError::NotUnicode(_)) => Err(LastfmError::InvalidInput(
                "LASTFM_API_KEY contains invalid UTF-8".to_string(),
            )),
        }
    }

    /// Override the API base URL (primarily for tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set retry configuration
    pub fn with_retry_config(mut self, attempts: u32, base_delay_ms: u64) -> Self {
        self.max_retries = attempts;
        self.retry_base_delay_ms = base_delay_ms;
        self
    }

    /// Validate a required name parameter (artist, album, track or user)
    pub(crate) fn validate_name<'a>(value: &'a str, what: &'static str) -> LastfmResult<&'a str> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LastfmError::InvalidInput(format!("{what} cannot be empty")));
        }
        if trimmed.len() > MAX_NAME_LENGTH {
            return Err(LastfmError::InvalidInput(format!(
                "{what} too long (max {MAX_NAME_LENGTH} characters)"
            )));
        }
        Ok(trimmed)
    }

    /// Execute an operation with retry logic for transient failures
    async fn with_retry<T, F, Fut>(&self, operation: F) -> LastfmResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = LastfmResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay_ms = self.retry_base_delay_ms * 2u64.pow(attempt);
                    warn!(
                        attempt = attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay_ms,
                        error = %e,
                        "Last.fm request failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Build the full query for one remote operation
    ///
    /// Always carries `method`, `api_key` and `format=json`. Parameters with
    /// an absent value (`None`) are omitted here, at the transport boundary;
    /// the per-method layer passes every documented key regardless.
    fn query_pairs(
        &self,
        method: &str,
        params: &[(&'static str, Option<String>)],
    ) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("method", method.to_string()),
            ("api_key", self.api_key.clone()),
            ("format", "json".to_string()),
        ];
        for (key, value) in params {
            if let Some(value) = value {
                query.push((*key, value.clone()));
            }
        }
        query
    }

    /// Make an API request and handle common error cases
    async fn send_request(&self, query: &[(&'static str, String)]) -> LastfmResult<String> {
        let response = self
            .http_client
            .get(&self.base_url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LastfmError::Timeout
                } else {
                    LastfmError::Http(e)
                }
            })?;

        // Check for rate limiting
        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Last.fm API rate limited");
            return Err(LastfmError::RateLimited);
        }

        response.text().await.map_err(LastfmError::Http)
    }

    /// Parse response text and surface service-level errors
    fn parse_api_error(text: &str) -> Option<LastfmError> {
        if let Ok(error) = serde_json::from_str::<ErrorResponse>(text) {
            if error.error == ERROR_CODE_NOT_FOUND {
                return Some(LastfmError::NotFound(error.message));
            }
            return Some(LastfmError::Api {
                code: error.error,
                message: error.message,
            });
        }
        None
    }

    /// Dispatch one remote operation and deserialize its response
    ///
    /// # Errors
    /// - `LastfmError::Api` / `LastfmError::NotFound` - Service error envelope
    /// - `LastfmError::RateLimited` / `LastfmError::Timeout` - Transport limits
    /// - `LastfmError::Http` - Any other transport failure
    /// - `LastfmError::Parse` - Malformed success payload
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: &[(&'static str, Option<String>)],
    ) -> LastfmResult<T> {
        let query = self.query_pairs(method, params);

        let text = self
            .with_retry(|| async { self.send_request(&query).await })
            .await?;

        if let Some(error) = Self::parse_api_error(&text) {
            return Err(error);
        }

        serde_json::from_str(&text).map_err(LastfmError::Parse)
    }

    /// Check if the API key is valid by making a simple request
    ///
    /// Returns `ApiKeyStatus` indicating whether the key is valid, invalid,
    /// or if the check could not be completed due to network issues.
    pub async fn validate_api_key(&self) -> ApiKeyStatus {
        use crate::models::SimilarOptions;

        // Probe with a well-known artist
        let options = SimilarOptions {
            limit: Some(1),
            ..SimilarOptions::default()
        };
        match self.get_similar_artists("The Beatles", &options).await {
            Ok(_) => ApiKeyStatus::Valid,
            Err(LastfmError::Api {
                code: ERROR_CODE_INVALID_KEY,
                ..
            }) => ApiKeyStatus::Invalid,
            Err(e) => ApiKeyStatus::Unknown(e.to_string()),
        }
    }
}

/// Encode a boolean parameter the way the service expects it
pub(crate) fn flag_param(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}

/// Encode an optional numeric parameter
pub(crate) fn num_param(value: Option<u32>) -> Option<String> {
    value.map(|v| v.to_string())
}
