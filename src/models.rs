//! Data models for fetched articles and their exported form.
//!
//! - [`Article`]: a fetched article page, tagged with its site
//! - [`ArticleBatch`]: usable articles collected for one site
//! - [`ExportRecord`]: the fixed column set written to the article table

use crate::links::CanonicalUrl;
use serde::Serialize;

/// A fetched news article.
///
/// An article is *usable* only when its body is non-empty; the crawler drops
/// everything else before export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// Identifier of the site the article was discovered on.
    pub site_id: String,
    /// The URL the article was fetched from.
    pub url: CanonicalUrl,
    /// The article headline.
    pub title: String,
    /// The article text. Empty means the page had no body.
    pub body: String,
}

impl Article {
    pub fn is_usable(&self) -> bool {
        !self.body.is_empty()
    }

    pub fn to_record(&self) -> ExportRecord<'_> {
        ExportRecord {
            body: &self.body,
            title: &self.title,
            url: self.url.as_str(),
        }
    }
}

/// Usable articles for one site, in homepage link order.
#[derive(Debug, Clone, Default)]
pub struct ArticleBatch {
    pub site_id: String,
    pub articles: Vec<Article>,
}

impl ArticleBatch {
    pub fn new(site_id: impl Into<String>) -> Self {
        Self {
            site_id: site_id.into(),
            articles: Vec::new(),
        }
    }

    pub fn push(&mut self, article: Article) {
        self.articles.push(article);
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// One row of the article table.
///
/// The field order here is the column order of every exported file.
#[derive(Debug, Serialize)]
pub struct ExportRecord<'a> {
    pub body: &'a str,
    pub title: &'a str,
    pub url: &'a str,
}

impl ExportRecord<'_> {
    /// Header row, matching the serialized field order.
    pub const COLUMNS: [&'static str; 3] = ["body", "title", "url"];

    pub fn values(&self) -> [&str; 3] {
        [self.body, self.title, self.url]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::build_link;

    fn article(body: &str) -> Article {
        Article {
            site_id: "elmundo".to_string(),
            url: build_link("https://elmundo.example", "/a/1"),
            title: "Title".to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_usable_requires_body() {
        assert!(article("text").is_usable());
        assert!(!article("").is_usable());
    }

    #[test]
    fn test_record_follows_columns() {
        let a = article("text");
        let record = a.to_record();
        assert_eq!(record.values(), ["text", "Title", "https://elmundo.example/a/1"]);
        assert_eq!(ExportRecord::COLUMNS, ["body", "title", "url"]);
    }

    #[test]
    fn test_batch_push() {
        let mut batch = ArticleBatch::new("elmundo");
        assert!(batch.is_empty());
        batch.push(article("one"));
        batch.push(article("two"));
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.site_id, "elmundo");
    }
}
