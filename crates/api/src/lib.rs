//! Remote list client.
//!
//! This crate provides the one network capability the picker needs: issue a
//! GET against a paginated list URL and get back a decoded page or a failure.
//! It focuses on:
//!
//! - Resolving relative endpoints and server links against a base URL
//! - Attaching a bearer token from `CHOOSER_API_TOKEN` when present
//! - Treating non-2xx statuses as failures, not as pages
//! - Logging every request with credentials redacted
//!
//! The picker engine only sees the [`ListSource`] trait; [`ListClient`] is
//! the `reqwest` implementation.
//!
//! # Example
//!
//! ```ignore
//! use chooser_api::{ClientOptions, ListClient, ListSource};
//!
//! async fn first_page() -> Result<(), chooser_api::ApiError> {
//!     let client = ListClient::new(ClientOptions::from_env(Some("https://cms.example.com")))?;
//!     let page = client.fetch_page("/api/widgets/?page_size=10").await?;
//!     println!("{} widgets", page.count);
//!     Ok(())
//! }
//! ```

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use chooser_types::{ListResponse, RequestFailure};
use chooser_util::http::{JsonParseError, parse_list_response, status_error_message};
use chooser_util::redact_sensitive;
use reqwest::{Client, header};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Environment variable holding the origin for relative URLs.
pub const API_BASE_ENV: &str = "CHOOSER_API_BASE";
/// Environment variable holding a bearer token.
pub const API_TOKEN_ENV: &str = "CHOOSER_API_TOKEN";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1", "::1", "[::1]"];

/// Anything that can fetch one page of a list endpoint.
#[async_trait]
pub trait ListSource: Send + Sync {
    /// GET `url` and decode the body as a list page.
    async fn fetch_page(&self, url: &str) -> Result<ListResponse, ApiError>;
}

/// Failures of a list request.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("relative URL '{url}' needs a base URL; set CHOOSER_API_BASE or `base_url`")]
    MissingBaseUrl { url: String },
    #[error("unsupported URL scheme '{scheme}'; expected http or https")]
    UnsupportedScheme { scheme: String },
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] header::InvalidHeaderValue),
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status}{}", .hint.as_deref().map(|h| format!(": {h}")).unwrap_or_default())]
    Status { status: u16, hint: Option<String> },
    #[error(transparent)]
    Decode(#[from] JsonParseError),
}

impl ApiError {
    /// HTTP status for [`ApiError::Status`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Compact form carried back into the picker state machine.
    pub fn to_failure(&self) -> RequestFailure {
        RequestFailure {
            status: self.status(),
            message: redact_sensitive(&self.to_string()),
        }
    }
}

/// Construction options for [`ListClient`].
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Origin used to resolve relative URLs
    pub base_url: Option<String>,
    /// Bearer token sent with every request
    pub token: Option<String>,
}

impl ClientOptions {
    /// Options from the environment; an explicit `base_url` wins over
    /// `CHOOSER_API_BASE`.
    pub fn from_env(base_url: Option<&str>) -> Self {
        let base_url = base_url
            .map(str::to_string)
            .or_else(|| env::var(API_BASE_ENV).ok())
            .filter(|base| !base.trim().is_empty());
        let token = env::var(API_TOKEN_ENV).ok().filter(|token| !token.trim().is_empty());
        Self { base_url, token }
    }
}

#[derive(Debug, Clone)]
/// `reqwest`-backed [`ListSource`].
pub struct ListClient {
    base_url: Option<Url>,
    http: Client,
    user_agent: String,
}

impl ListClient {
    /// Build a client with JSON accept headers, optional bearer auth and a
    /// 30 second timeout.
    pub fn new(options: ClientOptions) -> Result<Self, ApiError> {
        let base_url = options.base_url.as_deref().map(parse_base_url).transpose()?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        if let Some(token) = options.token {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {token}"))?;
            value.set_sensitive(true);
            default_headers.insert(header::AUTHORIZATION, value);
        }

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url,
            http,
            user_agent: format!("chooser/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    /// Absolute form of `url`, resolved against the base URL when relative.
    pub fn resolve_url(&self, url: &str) -> Result<Url, ApiError> {
        let resolved = match Url::parse(url) {
            Ok(absolute) => absolute,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = self
                    .base_url
                    .as_ref()
                    .ok_or_else(|| ApiError::MissingBaseUrl { url: url.to_string() })?;
                base.join(url).map_err(|source| ApiError::InvalidUrl {
                    url: url.to_string(),
                    source,
                })?
            }
            Err(source) => {
                return Err(ApiError::InvalidUrl {
                    url: url.to_string(),
                    source,
                });
            }
        };
        check_scheme(&resolved)?;
        Ok(resolved)
    }
}

#[async_trait]
impl ListSource for ListClient {
    async fn fetch_page(&self, url: &str) -> Result<ListResponse, ApiError> {
        let target = self.resolve_url(url)?;
        debug!(url = %redact_sensitive(target.as_str()), "list request started");

        let response = self
            .http
            .get(target.clone())
            .header(header::USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                url = %redact_sensitive(target.as_str()),
                status = status.as_u16(),
                "list request failed"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                hint: status_error_message(status.as_u16()),
            });
        }

        let text = response.text().await?;
        let page = parse_list_response(&text, Some(status.as_u16()))?;
        debug!(
            url = %redact_sensitive(target.as_str()),
            count = page.count,
            results = page.results.len(),
            "list request finished"
        );
        Ok(page)
    }
}

/// Parses and checks a base URL. Plain http is accepted, with a warning for
/// hosts other than localhost.
fn parse_base_url(base: &str) -> Result<Url, ApiError> {
    let mut parsed = Url::parse(base).map_err(|source| ApiError::InvalidUrl {
        url: base.to_string(),
        source,
    })?;
    check_scheme(&parsed)?;

    let host = parsed.host_str().unwrap_or_default();
    let is_local = LOCALHOST_DOMAINS.iter().any(|local| host.eq_ignore_ascii_case(local));
    if parsed.scheme() == "http" && !is_local {
        warn!(host, "base URL uses plain http; credentials are sent unencrypted");
    }

    // `Url::join` drops the last path segment unless it ends with '/'.
    if !parsed.path().ends_with('/') {
        let path = format!("{}/", parsed.path());
        parsed.set_path(&path);
    }
    Ok(parsed)
}

fn check_scheme(url: &Url) -> Result<(), ApiError> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ApiError::UnsupportedScheme { scheme: other.to_string() }),
    }
}
