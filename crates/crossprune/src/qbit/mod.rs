//! Blocking client for the qBittorrent WebUI API v2.

pub mod wire;

use crate::config::Settings;
use crate::error::{CrossPruneError, Result};
use crate::service::{Item, ItemFile, TorrentService};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use std::time::Duration;
use wire::{into_item_files, TorrentFileInfo, TorrentInfo};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct QbitClient {
    client: Client,
    base_url: String,
}

impl QbitClient {
    /// Builds an unauthenticated client. The session cookie set by
    /// [`QbitClient::login`] is kept in the client's cookie store.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        // qBittorrent rejects requests whose Referer does not match its host
        let mut headers = HeaderMap::new();
        let referer = HeaderValue::from_str(&base_url).map_err(|e| {
            CrossPruneError::Config(format!("Invalid base URL '{}': {}", base_url, e))
        })?;
        headers.insert(REFERER, referer);

        let client = Client::builder()
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Builds a client from settings and logs in.
    pub fn connect(settings: &Settings) -> Result<Self> {
        let client = Self::new(settings.base_url())?;
        client.login(&settings.username, &settings.password)?;
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn login(&self, username: &str, password: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url("auth/login"))
            .form(&[("username", username), ("password", password)])
            .send()
            .map_err(|e| {
                CrossPruneError::ServiceUnavailable(format!(
                    "Cannot reach {}: {}",
                    self.base_url, e
                ))
            })?;

        let status = response.status();
        let body = response.text().unwrap_or_default();

        if status.as_u16() == 403 {
            return Err(CrossPruneError::ServiceUnavailable(
                "Login refused: too many failed attempts, client IP is banned".to_string(),
            ));
        }
        if !status.is_success() || body.trim() != "Ok." {
            return Err(CrossPruneError::ServiceUnavailable(
                "Failed to log in to qBittorrent. Check credentials.".to_string(),
            ));
        }

        Ok(())
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api/v2/{}", self.base_url, endpoint)
    }

    /// Non-2xx responses become [`CrossPruneError::Api`] with the body text.
    fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CrossPruneError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

impl TorrentService for QbitClient {
    fn version(&self) -> Result<String> {
        let response = self.client.get(self.url("app/version")).send()?;
        Ok(Self::ensure_success(response)?.text()?.trim().to_string())
    }

    fn list_items(&self) -> Result<Vec<Item>> {
        let torrents = self
            .client
            .get(self.url("torrents/info"))
            .send()
            .map_err(CrossPruneError::from)
            .and_then(Self::ensure_success)
            .and_then(|response| Ok(response.json::<Vec<TorrentInfo>>()?))
            .map_err(|e| {
                CrossPruneError::ServiceUnavailable(format!("Failed to get torrents: {}", e))
            })?;
        Ok(torrents.into_iter().map(Item::from).collect())
    }

    fn list_files(&self, hash: &str) -> Result<Vec<ItemFile>> {
        let listing = self
            .client
            .get(self.url("torrents/files"))
            .query(&[("hash", hash)])
            .send()
            .map_err(CrossPruneError::from)
            .and_then(Self::ensure_success)
            .and_then(|response| Ok(response.json::<Vec<TorrentFileInfo>>()?));

        listing
            .map(into_item_files)
            .map_err(|e| CrossPruneError::ListingUnavailable {
                hash: hash.to_string(),
                message: e.to_string(),
            })
    }

    fn apply_label(&self, hashes: &[String], label: &str) -> Result<()> {
        let joined = hashes.join("|");
        let response = self
            .client
            .post(self.url("torrents/addTags"))
            .form(&[("hashes", joined.as_str()), ("tags", label)])
            .send()?;
        Self::ensure_success(response)?;
        Ok(())
    }
}
