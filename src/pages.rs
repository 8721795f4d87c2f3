//! Page objects: a site's homepage and its article pages.
//!
//! A [`PageSource`] yields the raw article links of a homepage and the
//! title/body of an article page. [`HttpPages`] implements it by fetching
//! over HTTP and selecting elements with the CSS selectors from the site's
//! `queries` block.

use crate::config::{SiteConfig, SiteQueries};
use crate::error::{Result, ScraperError};
use crate::http::FetchPage;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

/// Fields extracted from an article page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticlePage {
    pub title: String,
    pub body: String,
    pub url: String,
}

/// Source of homepage links and article pages for one site.
pub trait PageSource {
    /// Raw `href` values of the homepage's article links, in document order.
    ///
    /// Duplicates are kept.
    async fn article_links(&self) -> Result<Vec<String>>;

    /// Fetch and parse the article at `url`.
    ///
    /// Errors are transport failures; a page without body text is `Ok` with
    /// an empty `body`.
    async fn article_page(&self, url: &str) -> Result<ArticlePage>;
}

/// Compiled selectors for one site.
#[derive(Debug, Clone)]
pub struct PageSelectors {
    links: Selector,
    title: Selector,
    body: Selector,
}

impl PageSelectors {
    pub fn compile(queries: &SiteQueries) -> Result<Self> {
        Ok(Self {
            links: parse_selector("homepage_article_links", &queries.homepage_article_links)?,
            title: parse_selector("article_title", &queries.article_title)?,
            body: parse_selector("article_body", &queries.article_body)?,
        })
    }
}

fn parse_selector(query: &'static str, selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ScraperError::Selector {
        query,
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_text(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

/// Collect the `href` of every element matching the link selector.
pub fn parse_article_links(html: &str, selectors: &PageSelectors) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&selectors.links)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Extract title and body from an article document.
///
/// Only the first match of each selector is used. Missing elements give
/// empty strings.
pub fn parse_article(html: &str, url: &str, selectors: &PageSelectors) -> ArticlePage {
    let document = Html::parse_document(html);
    ArticlePage {
        title: first_text(&document, &selectors.title),
        body: first_text(&document, &selectors.body),
        url: url.to_string(),
    }
}

/// HTTP-backed page source for one configured site.
#[derive(Debug)]
pub struct HttpPages<F> {
    fetcher: F,
    host: String,
    selectors: PageSelectors,
}

impl<F> HttpPages<F>
where
    F: FetchPage,
{
    /// Build a page source for `site`, failing early on invalid selectors.
    pub fn new(fetcher: F, site: &SiteConfig) -> Result<Self> {
        Ok(Self {
            fetcher,
            host: site.host.clone(),
            selectors: PageSelectors::compile(&site.queries)?,
        })
    }
}

impl<F> PageSource for HttpPages<F>
where
    F: FetchPage,
{
    #[instrument(level = "info", skip_all, fields(host = %self.host))]
    async fn article_links(&self) -> Result<Vec<String>> {
        let html = self.fetcher.fetch_page(&self.host).await?;
        let links = parse_article_links(&html, &self.selectors);
        debug!(count = links.len(), "Parsed homepage links");
        Ok(links)
    }

    async fn article_page(&self, url: &str) -> Result<ArticlePage> {
        let html = self.fetcher.fetch_page(url).await?;
        Ok(parse_article(&html, url, &self.selectors))
    }
}
