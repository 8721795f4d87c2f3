//! # News Scraper
//!
//! Crawls a configured news site's homepage, fetches every linked article,
//! and writes the usable ones to a tab-delimited table named
//! `{site_id}_{DD_MM_YYYY}_articles.csv`. A separate cleaning stage adds
//! `newspaper_uid` and `host` columns to such a table.
//!
//! ## Usage
//!
//! ```sh
//! news_scraper elmundo
//! news_cleaner elmundo_18_10_2026_articles.csv
//! ```
//!
//! ## Architecture
//!
//! 1. **Links**: read homepage article links with the site's CSS selectors
//! 2. **Resolving**: turn each href into an absolute URL ([`links`])
//! 3. **Fetching**: download and validate articles concurrently ([`fetch`], [`crawl`])
//! 4. **Output**: write the table when at least two articles survived ([`export`])

pub mod clean;
pub mod cli;
pub mod config;
pub mod crawl;
pub mod error;
pub mod export;
pub mod fetch;
pub mod http;
pub mod links;
pub mod logging;
pub mod models;
pub mod pages;
pub mod utils;

pub use error::{Result, ScraperError};
