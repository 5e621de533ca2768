//! HTTP client with pacing and typed fetch errors.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE as ACCEPT_LANGUAGE_HEADER};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use super::pacer::RequestPacer;
use super::user_agent::{resolve_user_agent, ACCEPT_LANGUAGE};
use crate::config::Settings;

/// A network-level failure: timeout, connection error or non-2xx status.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("response from {url} was not valid JSON: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Paced HTTP client. Every call sleeps the configured delay first.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    pacer: RequestPacer,
    max_attempts: u32,
}

impl HttpClient {
    pub fn new(settings: &Settings) -> Self {
        let user_agent = resolve_user_agent(settings.user_agent.as_deref());

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE_HEADER,
            HeaderValue::from_static(ACCEPT_LANGUAGE),
        );

        let client = Client::builder()
            .user_agent(&user_agent)
            .default_headers(headers)
            .timeout(settings.request_timeout())
            .gzip(true)
            .brotli(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            pacer: RequestPacer::new(&settings.delay),
            max_attempts: settings.max_fetch_attempts.max(1),
        }
    }

    /// GET a page as text, one attempt. Listing strategies call this and
    /// treat any failure as "this page contributed zero URLs".
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        self.pacer.pause().await;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    }

    /// GET with exponential backoff up to the attempt ceiling. Used only
    /// for product detail pages, where a lost page means a lost record.
    pub async fn get_text_with_retry(&self, url: &str) -> Result<String, FetchError> {
        let mut backoff = Duration::from_secs(1);
        let mut attempt = 1;
        loop {
            match self.get_text(url).await {
                Ok(body) => return Ok(body),
                Err(err) if attempt < self.max_attempts => {
                    warn!(
                        "fetch attempt {}/{} for {} failed: {}",
                        attempt, self.max_attempts, url, err
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// POST a JSON body and parse the JSON response.
    pub async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &Value,
    ) -> Result<Value, FetchError> {
        self.pacer.pause().await;

        let mut request = self.client.post(url).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_str(&text).map_err(|source| FetchError::Json {
            url: url.to_string(),
            source,
        })
    }
}
