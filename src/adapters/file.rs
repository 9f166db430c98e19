use crate::domain::ports::{FetchedPage, PageSource};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// A saved copy of the upstream page, for replaying layout problems offline.
#[derive(Debug, Clone)]
pub struct FilePageSource {
    path: PathBuf,
    source_url: String,
}

impl FilePageSource {
    /// `source_url` is reported as the listings' source; the file is what
    /// gets read.
    pub fn new(path: impl Into<PathBuf>, source_url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source_url: source_url.into(),
        }
    }
}

#[async_trait]
impl PageSource for FilePageSource {
    async fn fetch_page(&self) -> Result<FetchedPage> {
        tracing::debug!("Reading saved page from {}", self.path.display());
        let body = tokio::fs::read_to_string(&self.path).await?;
        Ok(FetchedPage {
            url: self.source_url.clone(),
            body,
        })
    }

    fn source_url(&self) -> &str {
        &self.source_url
    }
}
