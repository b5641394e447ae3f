use std::fmt;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_FILE_BYTES: usize = 64 * 1024 * 1024; // 64 MiB

#[derive(Debug, Error)]
pub enum SharePointError {
    #[error("invalid site url: {0}")]
    InvalidSiteUrl(#[from] url::ParseError),
    #[error("site url must use http or https, got `{0}`")]
    UnsupportedScheme(String),
    #[error("access token is empty or contains characters not allowed in an HTTP header")]
    InvalidToken,
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} answered {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("response from {url} exceeds {limit} bytes")]
    BodyTooLarge { url: String, limit: usize },
    #[error("failed to read response from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Connection settings for one SharePoint site.
#[derive(Clone)]
pub struct SharePointConfig {
    /// Site root, e.g. `https://contoso.sharepoint.com/Teams/case-team`.
    pub site_url: Url,
    pub access_token: String,
    pub timeout: Duration,
    /// Downloads larger than this fail instead of being buffered.
    pub max_file_bytes: usize,
}

impl SharePointConfig {
    pub fn new(site_url: &str, access_token: impl Into<String>) -> Result<Self, SharePointError> {
        let site_url = Url::parse(site_url.trim())?;
        if !matches!(site_url.scheme(), "http" | "https") {
            return Err(SharePointError::UnsupportedScheme(
                site_url.scheme().to_string(),
            ));
        }
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(SharePointError::InvalidToken);
        }
        Ok(Self {
            site_url,
            access_token,
            timeout: DEFAULT_TIMEOUT,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_file_bytes(mut self, max_file_bytes: usize) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }

    /// Site URL without query, fragment or trailing '/'.
    pub(crate) fn site_base(&self) -> String {
        let mut url = self.site_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.as_str().trim_end_matches('/').to_string()
    }
}

impl fmt::Debug for SharePointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharePointConfig")
            .field("site_url", &self.site_url.as_str())
            .field("access_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("max_file_bytes", &self.max_file_bytes)
            .finish()
    }
}
