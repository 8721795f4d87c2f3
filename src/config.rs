//! Site configuration loaded from `config.yaml`.
//!
//! The file maps site identifiers to a homepage URL and the CSS selectors the
//! page objects use, plus an optional `crawler` block with transport and
//! concurrency settings:
//!
//! ```yaml
//! news_sites:
//!   elmundo:
//!     url: https://www.elmundo.es
//!     queries:
//!       homepage_article_links: ".ue-c-cover-content__link"
//!       article_title: ".ue-c-article__headline"
//!       article_body: ".ue-c-article__body"
//! crawler:
//!   concurrency: 8
//! ```

use crate::error::{Result, ScraperError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{info, instrument};

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// The whole configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsConfig {
    pub news_sites: BTreeMap<String, SiteEntry>,
    #[serde(default)]
    pub crawler: CrawlerSettings,
}

/// One entry of `news_sites`.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteEntry {
    pub url: String,
    pub queries: SiteQueries,
}

/// CSS selectors used to pull links and article fields out of a page.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteQueries {
    pub homepage_article_links: String,
    pub article_title: String,
    pub article_body: String,
}

/// A resolved site: its identifier together with its entry.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub site_id: String,
    pub host: String,
    pub queries: SiteQueries,
}

/// Transport, concurrency and output knobs.
///
/// Every key is optional in the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerSettings {
    /// Maximum number of article fetches in flight.
    pub concurrency: usize,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Retries after the first failed attempt.
    pub max_retries: usize,
    /// Initial backoff delay, doubled on every retry.
    pub retry_base_delay_ms: u64,
    pub user_agent: String,
    /// Directory the article table is written into.
    pub output_dir: PathBuf,
}

impl Default for CrawlerSettings {
    fn default() -> Self {
        Self {
            concurrency: 8,
            timeout_secs: 30,
            max_retries: 2,
            retry_base_delay_ms: 500,
            user_agent: concat!("news_scraper/", env!("CARGO_PKG_VERSION")).to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl CrawlerSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

impl NewsConfig {
    /// Parse a configuration from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: NewsConfig =
            serde_yaml::from_str(text).map_err(|e| ScraperError::Config(e.to_string()))?;
        if config.crawler.concurrency == 0 {
            return Err(ScraperError::Config(
                "crawler.concurrency must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    /// Read and parse a configuration file.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).await.map_err(|e| {
            ScraperError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_yaml(&text)?;
        info!(sites = config.news_sites.len(), "Loaded configuration");
        Ok(config)
    }

    /// Configured site identifiers, sorted.
    pub fn site_ids(&self) -> Vec<String> {
        self.news_sites.keys().cloned().collect()
    }

    /// Look up a site by identifier.
    ///
    /// # Errors
    ///
    /// [`ScraperError::UnknownSite`] listing the configured identifiers when
    /// `site_id` is not one of them.
    pub fn site(&self, site_id: &str) -> Result<SiteConfig> {
        let entry = self
            .news_sites
            .get(site_id)
            .ok_or_else(|| ScraperError::UnknownSite {
                site_id: site_id.to_string(),
                available: self.site_ids(),
            })?;
        Ok(SiteConfig {
            site_id: site_id.to_string(),
            host: entry.url.clone(),
            queries: entry.queries.clone(),
        })
    }
}
