use std::io::Read;

use docreview_core::{FolderStore, StoreError};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;

use crate::config::{SharePointConfig, SharePointError};
use crate::rest::{self, WebInfo, ODATA_JSON};

/// [`FolderStore`] over a SharePoint site's REST API.
///
/// Paths are server-relative (`/Teams/<site>/Delte Dokumenter/...`). Requests are made
/// synchronously, one at a time, with the bearer token from the config.
#[derive(Debug)]
pub struct SharePointFolderStore {
    client: Client,
    site: String,
    max_file_bytes: usize,
}

impl SharePointFolderStore {
    /// Build a client for `config.site_url` and check that the site answers.
    ///
    /// The site title is logged on success. A rejected token surfaces here as
    /// [`SharePointError::Status`].
    pub fn connect(config: SharePointConfig) -> Result<Self, SharePointError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.access_token.trim()))
            .map_err(|_| SharePointError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(ODATA_JSON));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let store = Self {
            client,
            site: config.site_base(),
            max_file_bytes: config.max_file_bytes,
        };

        let url = rest::web_url(&store.site);
        let response = store.client.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SharePointError::Status { url, status });
        }
        let body = read_limited(&url, response, store.max_file_bytes)?;
        let web: WebInfo = serde_json::from_slice(&body)
            .map_err(|source| SharePointError::Decode { url, source })?;
        log::info!("authenticated against {}; site title: \"{}\"", store.site, web.title);

        Ok(store)
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    fn get(&self, path: &str, url: String) -> Result<Vec<u8>, StoreError> {
        log::debug!("GET {url}");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| StoreError::remote(path, SharePointError::Http(err)))?;

        match response.status() {
            status if status.is_success() => {
                read_limited(&url, response, self.max_file_bytes)
                    .map_err(|err| StoreError::remote(path, err))
            }
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(path.to_string())),
            status => Err(StoreError::remote(
                path,
                SharePointError::Status { url, status },
            )),
        }
    }

    fn list(&self, path: &str, collection: &str) -> Result<Vec<String>, StoreError> {
        let url = rest::folder_children_url(&self.site, path, collection);
        let body = self.get(path, url.clone())?;
        rest::parse_names(&body)
            .map_err(|source| StoreError::remote(path, SharePointError::Decode { url, source }))
    }
}

impl FolderStore for SharePointFolderStore {
    fn list_subfolders(&self, path: &str) -> Result<Vec<String>, StoreError> {
        self.list(path, "Folders")
    }

    fn list_files(&self, path: &str) -> Result<Vec<String>, StoreError> {
        self.list(path, "Files")
    }

    fn fetch_file(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        let url = rest::file_content_url(&self.site, path);
        self.get(path, url)
    }
}

/// Buffer a response body, refusing anything over `limit` bytes.
fn read_limited(url: &str, response: Response, limit: usize) -> Result<Vec<u8>, SharePointError> {
    let too_large = || SharePointError::BodyTooLarge {
        url: url.to_string(),
        limit,
    };
    if response.content_length().is_some_and(|len| len > limit as u64) {
        return Err(too_large());
    }

    // Read one byte past the limit so an oversized body without Content-Length is caught.
    let mut body = Vec::new();
    response
        .take(limit as u64 + 1)
        .read_to_end(&mut body)
        .map_err(|source| SharePointError::Body {
            url: url.to_string(),
            source,
        })?;
    if body.len() > limit {
        return Err(too_large());
    }
    Ok(body)
}
