use crate::utils::error::Result;
use async_trait::async_trait;

/// Raw upstream document plus the URL it came from.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub body: String,
}

/// Where the transfer-list HTML comes from. The HTTP adapter is the
/// production implementation; tests and `scrape-once --file` use others.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self) -> Result<FetchedPage>;

    fn source_url(&self) -> &str;
}
