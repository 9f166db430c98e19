use crate::config::toml_config::SourceConfig;
use crate::domain::ports::{FetchedPage, PageSource};
use crate::utils::error::{Result, ScoutError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Upstream page over HTTP. The client is built once at startup and shared
/// by every request handler.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
    url: String,
}

impl HttpPageSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(&config.user_agent);

        // 設定超時
        if let Some(timeout) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        Ok(Self {
            client: builder.build()?,
            url: config.url.clone(),
        })
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self) -> Result<FetchedPage> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();

        tracing::debug!("Upstream response status: {}", status);

        if !status.is_success() {
            tracing::warn!("Upstream {} responded with {}", self.url, status);
            return Err(ScoutError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(FetchedPage {
            url: self.url.clone(),
            body,
        })
    }

    fn source_url(&self) -> &str {
        &self.url
    }
}
