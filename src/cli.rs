//! Command-line interface definitions for the scraper and the cleaner.

use crate::config::DEFAULT_CONFIG_PATH;
use clap::Parser;
use std::path::PathBuf;

/// Crawl a configured news site and write its articles to a table.
///
/// ```sh
/// news_scraper elmundo
/// news_scraper eluniversal --config sites.yaml --output-dir ./raw
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct ScrapeCli {
    /// The news site that you want to scrape
    pub news_site: String,

    /// Path to the sites configuration file
    #[arg(short, long, env = "NEWS_SCRAPER_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Output directory for the article table (overrides `crawler.output_dir`)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Maximum concurrent article fetches (overrides `crawler.concurrency`)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: Option<u16>,
}

/// Add `newspaper_uid` and `host` columns to a scraped article table.
///
/// ```sh
/// news_cleaner elmundo_18_10_2026_articles.csv > clean.tsv
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CleanCli {
    /// The path to the dirty data
    pub filename: PathBuf,
}
