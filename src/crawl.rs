//! Crawling one configured site into an article table.
//!
//! 1. **Links**: read the homepage's article links (order kept, no dedup)
//! 2. **Fetching**: resolve and fetch every link, `concurrency` at a time
//! 3. **Filtering**: keep only usable articles, in link order
//! 4. **Output**: export when more than one article survived

use crate::config::{CrawlerSettings, NewsConfig, SiteConfig};
use crate::error::Result;
use crate::export::export_batch_today;
use crate::fetch::{FetchOutcome, fetch_outcome};
use crate::http::{HttpClient, RetryFetch};
use crate::links::build_link;
use crate::models::ArticleBatch;
use crate::pages::{HttpPages, PageSource};
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use std::path::PathBuf;
use tracing::{error, info, instrument, warn};

/// Terminal state of a crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// The table was written to `path` with `articles` data rows.
    Exported { path: PathBuf, articles: usize },
    /// Fewer than two usable articles; nothing was written.
    InsufficientYield { articles: usize },
}

/// Per-link counters for one crawl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub links: usize,
    pub duplicate_links: usize,
    pub accepted: usize,
    pub transport_failed: usize,
    pub missing_body: usize,
}

/// Fetch every homepage link of `site` and collect the usable articles.
///
/// Fetches run through an order-preserving buffer, so the batch follows
/// homepage link order whatever the completion timing. A failed link never
/// affects its siblings. Only a homepage failure is returned as an error.
#[instrument(level = "info", skip(pages, site), fields(site_id = %site.site_id))]
pub async fn collect_articles<P>(
    pages: &P,
    site: &SiteConfig,
    concurrency: usize,
) -> Result<(ArticleBatch, CrawlStats)>
where
    P: PageSource,
{
    let links = pages.article_links().await.inspect_err(|e| {
        error!(host = %site.host, error = %e, "Failed to read homepage");
    })?;

    let mut stats = CrawlStats {
        links: links.len(),
        duplicate_links: links.iter().duplicates().count(),
        ..CrawlStats::default()
    };
    info!(
        links = stats.links,
        duplicates = stats.duplicate_links,
        concurrency,
        "Indexed homepage links"
    );

    let outcomes: Vec<FetchOutcome> = stream::iter(links)
        .map(|link| fetch_outcome(pages, &site.site_id, build_link(&site.host, &link)))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut batch = ArticleBatch::new(site.site_id.clone());
    for outcome in outcomes {
        match outcome {
            FetchOutcome::Accepted(article) => {
                stats.accepted += 1;
                batch.push(article);
            }
            FetchOutcome::TransportFailed(_) => stats.transport_failed += 1,
            FetchOutcome::MissingBody => stats.missing_body += 1,
        }
    }

    info!(
        accepted = stats.accepted,
        transport_failed = stats.transport_failed,
        missing_body = stats.missing_body,
        "{} articles were obtained from {}",
        batch.len(),
        site.site_id
    );
    Ok((batch, stats))
}

/// Crawl `site` and export the batch into `settings.output_dir`.
///
/// # Arguments
///
/// * `pages` - Page source for the site's homepage and articles
/// * `site` - The resolved site configuration
/// * `settings` - Concurrency and output directory
///
/// # Returns
///
/// [`CrawlOutcome::Exported`] when more than one usable article was fetched,
/// [`CrawlOutcome::InsufficientYield`] (and no file) otherwise.
///
/// # Errors
///
/// Returns an error if the homepage cannot be read or the table cannot be
/// written. Per-article failures never surface here.
pub async fn crawl<P>(
    pages: &P,
    site: &SiteConfig,
    settings: &CrawlerSettings,
) -> Result<CrawlOutcome>
where
    P: PageSource,
{
    let (batch, _stats) = collect_articles(pages, site, settings.concurrency).await?;

    if batch.len() > 1 {
        let path = export_batch_today(&settings.output_dir, &batch).await?;
        Ok(CrawlOutcome::Exported {
            path,
            articles: batch.len(),
        })
    } else {
        warn!(
            site_id = %site.site_id,
            articles = batch.len(),
            "Not enough usable articles to export; check the article_body query"
        );
        Ok(CrawlOutcome::InsufficientYield {
            articles: batch.len(),
        })
    }
}

/// Crawl `site_id` over HTTP using the loaded configuration.
///
/// An unknown site or an invalid selector fails here, before any request.
#[instrument(level = "info", skip(config))]
pub async fn run(config: &NewsConfig, site_id: &str) -> Result<CrawlOutcome> {
    let site = config.site(site_id)?;
    let settings = &config.crawler;

    let fetcher = RetryFetch::from_settings(HttpClient::new(settings)?, settings);
    let pages = HttpPages::new(fetcher, &site)?;

    info!(host = %site.host, "Beginning scraper");
    crawl(&pages, &site, settings).await
}
