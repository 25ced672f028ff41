use crate::domain::ports::Fetch;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// reqwest-backed transport. One client, connection pooling for the
/// duration of the process.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        tracing::debug!("{} responded {}", url, response.status());
        let response = response.error_for_status()?;
        Ok(response.json::<Value>().await?)
    }
}
