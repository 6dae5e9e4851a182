use async_trait::async_trait;
use nhs_core::{Error, Result};
use reqwest::Client;

use crate::CrawlConfig;

/// Fetches a page body. Any failure is a per-request `Error::Transport`.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn get(&self, url: &str) -> Result<String>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &CrawlConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(5));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self { client: builder.build()? })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String> {
        let resp = self.client.get(url).send().await.map_err(|e| Error::transport(url, e))?;
        if !resp.status().is_success() {
            return Err(Error::transport(url, format!("HTTP {}", resp.status())));
        }
        resp.text().await.map_err(|e| Error::transport(url, e))
    }
}
