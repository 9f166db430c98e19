use crate::core::html::html_to_text;
use crate::core::parser::{parse_listings, ParseRules};
use crate::domain::model::{Group, GroupReport, TransferReport};
use crate::domain::ports::{FetchedPage, PageSource};
use crate::utils::error::{Result, ScoutError};
use chrono::Utc;

/// Fetches the upstream page and turns it into listings.
///
/// Every call re-fetches and re-parses; nothing is cached between calls.
pub struct TransferFetcher<P: PageSource> {
    source: P,
    rules: ParseRules,
}

impl<P: PageSource> TransferFetcher<P> {
    pub fn new(source: P, rules: ParseRules) -> Self {
        Self { source, rules }
    }

    pub fn source_url(&self) -> &str {
        self.source.source_url()
    }

    pub async fn fetch_page(&self) -> Result<FetchedPage> {
        tracing::debug!("Fetching transfer list from: {}", self.source.source_url());
        let page = self.source.fetch_page().await?;
        tracing::debug!("Fetched {} bytes from {}", page.body.len(), page.url);
        Ok(page)
    }

    /// `fetchListings(group)`: one fetch, decode, parse of a single section.
    pub async fn fetch_listings(&self, group: Group) -> Result<GroupReport> {
        let page = self.fetch_page().await?;
        let report = self.group_report(&page, group)?;
        tracing::info!("Fetched {} '{}' listings", report.count, group);
        Ok(report)
    }

    /// Both sections from a single fetch of the page.
    pub async fn fetch_all(&self) -> Result<TransferReport> {
        let page = self.fetch_page().await?;
        let report = self.transfer_report(&page)?;
        tracing::info!(
            "Fetched {} listings (u21: {}, nt: {})",
            report.counts.total,
            report.counts.u21,
            report.counts.nt
        );
        Ok(report)
    }

    pub fn group_report(&self, page: &FetchedPage, group: Group) -> Result<GroupReport> {
        let text = decode_page(page)?;
        let players = parse_listings(&text, group, &self.rules);

        Ok(GroupReport {
            team: group,
            source: page.url.clone(),
            count: players.len(),
            players,
            fetched_at: Utc::now(),
        })
    }

    pub fn transfer_report(&self, page: &FetchedPage) -> Result<TransferReport> {
        let text = decode_page(page)?;
        let u21 = parse_listings(&text, Group::U21, &self.rules);
        let nt = parse_listings(&text, Group::Nt, &self.rules);

        Ok(TransferReport::new(page.url.clone(), u21, nt))
    }
}

/// Decoded plain text of the page. An empty document means the upstream
/// served something other than the transfer list.
pub fn decode_page(page: &FetchedPage) -> Result<String> {
    let text = html_to_text(&page.body);
    if text.is_empty() {
        return Err(ScoutError::Parse {
            message: format!("{} returned an empty document", page.url),
        });
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::ParseConfig;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingSource {
        body: String,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PageSource for CountingSource {
        async fn fetch_page(&self) -> Result<FetchedPage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(FetchedPage {
                url: self.source_url().to_string(),
                body: self.body.clone(),
            })
        }

        fn source_url(&self) -> &str {
            "https://transfers.test/list"
        }
    }

    fn fetcher(body: &str) -> (TransferFetcher<CountingSource>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            body: body.to_string(),
            calls: calls.clone(),
        };
        let rules = ParseRules::from_config(&ParseConfig::default()).unwrap();
        (TransferFetcher::new(source, rules), calls)
    }

    const PAGE: &str = "<h2>U-21</h2><table>\
        <tr><td>400000001</td><td>Andreas Georgiou</td><td>Cyprus</td><td>19</td></tr>\
        </table><h2>National Team</h2><table>\
        <tr><td>400000002</td><td>Nikos Ioannou</td><td>Cyprus</td><td>27</td></tr>\
        </table>";

    #[tokio::test]
    async fn test_fetch_all_uses_single_fetch() {
        let (fetcher, calls) = fetcher(PAGE);

        let report = fetcher.fetch_all().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.source, "https://transfers.test/list");
        assert_eq!(report.counts.u21, 1);
        assert_eq!(report.counts.nt, 1);
        assert_eq!(report.counts.total, 2);
        assert_eq!(report.u21[0].ht_id, 400000001);
        assert_eq!(report.nt[0].ht_id, 400000002);
    }

    #[tokio::test]
    async fn test_every_call_refetches() {
        let (fetcher, calls) = fetcher(PAGE);

        let first = fetcher.fetch_listings(Group::U21).await.unwrap();
        let second = fetcher.fetch_listings(Group::Nt).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(first.team, Group::U21);
        assert_eq!(first.count, 1);
        assert_eq!(second.players[0].name, "Nikos Ioannou");
    }

    #[tokio::test]
    async fn test_page_without_rows_yields_empty_report() {
        let (fetcher, _) = fetcher("<h2>U-21</h2><p>No players listed</p>");

        let report = fetcher.fetch_listings(Group::U21).await.unwrap();
        assert_eq!(report.count, 0);
        assert!(report.players.is_empty());
    }

    #[tokio::test]
    async fn test_empty_document_is_parse_error() {
        let (fetcher, _) = fetcher("   <html></html>  ");

        let result = fetcher.fetch_all().await;
        assert!(matches!(result, Err(ScoutError::Parse { .. })));
    }
}
