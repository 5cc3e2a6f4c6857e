use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// A page that came back with a 2xx status.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    /// The server answered, just not with a page. Routine for guessed paths.
    pub fn is_missing_page(&self) -> bool {
        matches!(self, FetchError::Status { .. })
    }
}

/// Anything that can GET a URL and hand back its body.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let transport = |e: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let start = Instant::now();
        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        debug!("GET {} -> {} in {}ms", url, status, start.elapsed().as_millis());

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(transport)?;
        Ok(Page {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

// ── Tests ──
