//! Fetching a single article and deciding whether it is usable.
//!
//! Every failure here is local to one link: it is logged once and the link
//! contributes nothing to the batch. Nothing propagates to the crawler.

use crate::error::ScraperError;
use crate::links::CanonicalUrl;
use crate::models::Article;
use crate::pages::PageSource;
use crate::utils::truncate_for_log;
use tracing::{info, instrument, warn};

/// Classified result of one article fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The page was retrieved and has a body.
    Accepted(Article),
    /// Retrieval failed (connection, timeout, status, retries exhausted).
    TransportFailed(ScraperError),
    /// The page was retrieved but the body selector found no text.
    MissingBody,
}

impl FetchOutcome {
    pub fn into_article(self) -> Option<Article> {
        match self {
            FetchOutcome::Accepted(article) => Some(article),
            _ => None,
        }
    }
}

/// Fetch `url` and classify the result.
#[instrument(level = "info", skip(pages, url), fields(url = %url))]
pub async fn fetch_outcome<P>(pages: &P, site_id: &str, url: CanonicalUrl) -> FetchOutcome
where
    P: PageSource,
{
    info!("Start fetching article");

    let page = match pages.article_page(url.as_str()).await {
        Ok(page) => page,
        Err(e) => {
            warn!(error = %e, "Error while fetching the article");
            return FetchOutcome::TransportFailed(e);
        }
    };

    let article = Article {
        site_id: site_id.to_string(),
        url,
        title: page.title,
        body: page.body,
    };
    if !article.is_usable() {
        warn!("Invalid article, there is no body");
        return FetchOutcome::MissingBody;
    }

    info!(
        title = %truncate_for_log(&article.title, 120),
        bytes = article.body.len(),
        "Article fetched"
    );
    FetchOutcome::Accepted(article)
}

/// Fetch `url`, returning the article only when it is usable.
///
/// Transport failures and pages without a body are logged with exactly one
/// warning each and reduce to `None`.
///
/// # Arguments
///
/// * `pages` - Page source used to retrieve and parse the article
/// * `site_id` - Identifier of the site the link came from
/// * `url` - Canonical URL produced by [`crate::links::build_link`]
///
/// # Returns
///
/// `Some(article)` with title, body and url copied from the page, or `None`.
pub async fn fetch_article<P>(pages: &P, site_id: &str, url: CanonicalUrl) -> Option<Article>
where
    P: PageSource,
{
    fetch_outcome(pages, site_id, url).await.into_article()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CrawlerSettings, SiteConfig, SiteQueries};
    use crate::error::Result;
    use crate::http::{HttpClient, RetryFetch};
    use crate::links::build_link;
    use crate::pages::{ArticlePage, HttpPages};
    use std::fmt::Debug;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Records the message of every WARN event.
    #[derive(Clone, Default)]
    struct WarnCapture(Arc<Mutex<Vec<String>>>);

    struct MessageVisitor(String);

    impl Visit for MessageVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }
    }

    impl<S: Subscriber> Layer<S> for WarnCapture {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::WARN {
                let mut visitor = MessageVisitor(String::new());
                event.record(&mut visitor);
                self.0.lock().unwrap().push(visitor.0);
            }
        }
    }

    impl WarnCapture {
        fn messages(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    /// Serves a fixed title/body for every URL, or fails every request.
    struct StaticPages {
        body: Option<&'static str>,
    }

    impl PageSource for StaticPages {
        async fn article_links(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        async fn article_page(&self, url: &str) -> Result<ArticlePage> {
            match self.body {
                Some(body) => Ok(ArticlePage {
                    title: "Headline".to_string(),
                    body: body.to_string(),
                    url: url.to_string(),
                }),
                None => Err(ScraperError::Status {
                    status: 502,
                    url: url.to_string(),
                }),
            }
        }
    }

    fn url() -> CanonicalUrl {
        build_link("https://elmundo.example", "/a/1")
    }

    #[tokio::test]
    async fn test_accepted_article_copies_page_fields() {
        let pages = StaticPages { body: Some("x") };
        let article = fetch_article(&pages, "elmundo", url()).await.unwrap();
        assert_eq!(article.site_id, "elmundo");
        assert_eq!(article.title, "Headline");
        assert_eq!(article.body, "x");
        assert_eq!(article.url.as_str(), "https://elmundo.example/a/1");
    }

    #[tokio::test]
    async fn test_transport_failure_is_absorbed() {
        let pages = StaticPages { body: None };
        let outcome = fetch_outcome(&pages, "elmundo", url()).await;
        assert!(matches!(
            outcome,
            FetchOutcome::TransportFailed(ScraperError::Status { status: 502, .. })
        ));
        assert!(outcome.into_article().is_none());
    }

    #[tokio::test]
    async fn test_empty_body_is_distinct_from_transport_failure() {
        let pages = StaticPages { body: Some("") };
        let outcome = fetch_outcome(&pages, "elmundo", url()).await;
        assert!(matches!(outcome, FetchOutcome::MissingBody));
        assert!(fetch_article(&pages, "elmundo", url()).await.is_none());
    }

    fn mock_site(host: String) -> SiteConfig {
        SiteConfig {
            site_id: "elmundo".to_string(),
            host,
            queries: SiteQueries {
                homepage_article_links: "a".to_string(),
                article_title: "h1".to_string(),
                article_body: ".body".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_single_warning_per_failure_kind() {
        let capture = WarnCapture::default();
        let _guard = tracing::subscriber::set_default(Registry::default().with(capture.clone()));

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let site = mock_site(server.uri());
        let client = HttpClient::new(&CrawlerSettings::default()).unwrap();
        let fetcher = RetryFetch::new(client, 2, Duration::from_millis(1));
        let pages = HttpPages::new(fetcher, &site).unwrap();

        let article_url = build_link(&site.host, "/a/1");
        assert!(fetch_article(&pages, "elmundo", article_url).await.is_none());
        let transport = capture.messages();
        assert_eq!(transport.len(), 1, "warnings: {transport:?}");

        let empty = StaticPages { body: Some("") };
        assert!(fetch_article(&empty, "elmundo", url()).await.is_none());
        let all = capture.messages();
        assert_eq!(all.len(), 2, "warnings: {all:?}");
        assert_ne!(all[0], all[1]);
    }

    #[tokio::test]
    async fn test_accepted_article_logs_no_warning() {
        let capture = WarnCapture::default();
        let _guard = tracing::subscriber::set_default(Registry::default().with(capture.clone()));

        let pages = StaticPages { body: Some("x") };
        assert!(fetch_article(&pages, "elmundo", url()).await.is_some());
        assert!(capture.messages().is_empty());
    }
}
