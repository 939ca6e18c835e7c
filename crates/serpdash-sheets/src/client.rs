//! HTTP client for the published spreadsheet CSV export.
//!
//! Wraps `reqwest` with status handling and retry. The export URL is
//! whatever the operator published — a Google Sheets
//! `export?format=csv` link or any other plain-CSV endpoint; an optional
//! API key is passed as the `key` query parameter for authenticated
//! exports.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::retry::retry_with_backoff;
use crate::SheetsError;

/// Client for one spreadsheet CSV export URL.
pub struct SheetsClient {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl SheetsClient {
    /// Creates a client for the given export URL.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        url: &str,
        timeout_secs: u64,
        api_key: Option<&str>,
    ) -> Result<Self, SheetsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("serpdash/0.1 (ranking-dashboard)")
            .build()?;

        Ok(Self {
            client,
            url: url.to_owned(),
            api_key: api_key.map(ToOwned::to_owned),
        })
    }

    /// Fetches the CSV export body once.
    ///
    /// # Errors
    ///
    /// - [`SheetsError::NotFound`] on HTTP 404.
    /// - [`SheetsError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`SheetsError::Http`] on network failure.
    pub async fn fetch_csv(&self) -> Result<String, SheetsError> {
        let mut request = self.client.get(&self.url);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SheetsError::NotFound {
                url: self.url.clone(),
            });
        }
        if !status.is_success() {
            return Err(SheetsError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        Ok(response.text().await?)
    }

    /// Fetches the CSV export, retrying transient failures with back-off.
    ///
    /// # Errors
    ///
    /// Same as [`SheetsClient::fetch_csv`], after retries are exhausted.
    pub async fn fetch_csv_with_retry(
        &self,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<String, SheetsError> {
        retry_with_backoff(max_retries, backoff_base_ms, || self.fetch_csv()).await
    }
}
