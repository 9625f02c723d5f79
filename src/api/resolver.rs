//! Stream URL redirect resolution
//!
//! Many IPTV providers hand out URLs that redirect to the actual edge server.
//! The resolver follows the redirects once, up front, so the player gets the
//! final URL. Segmented and transport-stream URLs are returned untouched:
//! intermediate proxies do not redirect those reliably.

use reqwest::{redirect, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::stream::FormatHint;

/// Redirects followed before giving up
const MAX_REDIRECTS: usize = 10;

/// Redirect resolution errors
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Invalid stream URL: {0}")]
    InvalidUrl(String),

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid HTTP client settings: {0}")]
    ClientSetup(reqwest::Error),
}

impl ResolveError {
    /// True for failures caused by the network rather than the URL
    pub fn is_network(&self) -> bool {
        matches!(self, ResolveError::RequestFailed(_) | ResolveError::ServerError(_))
    }
}

/// Follows HTTP redirects for stream URLs
#[derive(Debug, Clone)]
pub struct StreamResolver {
    client: reqwest::Client,
}

impl StreamResolver {
    pub fn new(user_agent: &str) -> Result<Self, ResolveError> {
        Self::with_timeout(user_agent, Duration::from_secs(10))
    }

    /// Fails when the settings cannot make a client (e.g. a user agent
    /// that is not a valid header value)
    pub fn with_timeout(user_agent: &str, timeout: Duration) -> Result<Self, ResolveError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(ResolveError::ClientSetup)?;
        Ok(Self { client })
    }

    /// True when `url` is handed to the player as-is
    pub fn is_passthrough(url: &str) -> bool {
        FormatHint::from_url(url).is_segmented()
    }

    /// Final URL after redirects
    pub async fn resolve(&self, url: &str) -> Result<String, ResolveError> {
        if Self::is_passthrough(url) {
            debug!("passing through segmented url {}", url);
            return Ok(url.to_string());
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ResolveError::InvalidUrl(url.to_string()));
        }

        let mut response = self.client.head(url).send().await?;

        // Some stream servers refuse HEAD
        if matches!(
            response.status(),
            StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED
        ) {
            debug!("HEAD refused by {}, retrying with GET", url);
            response = self.client.get(url).send().await?;
        }

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(ResolveError::ServerError(status.as_u16()));
        }

        let resolved = response.url().to_string();
        if resolved != url {
            debug!("resolved {} -> {}", url, resolved);
        }
        Ok(resolved)
    }

    /// Like [`resolve`](Self::resolve), falling back to the original URL on
    /// any failure
    pub async fn resolve_or_original(&self, url: &str) -> String {
        match self.resolve(url).await {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!("could not resolve {}: {}; using it as-is", url, e);
                url.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_formats() {
        assert!(StreamResolver::is_passthrough("http://a/live/index.m3u8"));
        assert!(StreamResolver::is_passthrough("http://a/live/1.ts?token=x"));
        assert!(StreamResolver::is_passthrough("http://a/manifest.mpd"));
        assert!(!StreamResolver::is_passthrough("http://a/live/user/pass/123"));
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let resolver = StreamResolver::new("test").unwrap();
        let err = resolver.resolve("rtmp://a/live").await.unwrap_err();
        assert!(matches!(err, ResolveError::InvalidUrl(_)));
        assert!(!err.is_network());
    }

    #[test]
    fn test_bad_user_agent_is_reported() {
        let err = StreamResolver::new("zaptv\n0.1").unwrap_err();
        assert!(matches!(err, ResolveError::ClientSetup(_)));
        assert!(!err.is_network());
    }
}
