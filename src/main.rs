use clap::Parser;
use news_scraper::cli::ScrapeCli;
use news_scraper::config::NewsConfig;
use news_scraper::crawl::{self, CrawlOutcome};
use news_scraper::logging::init_tracing;
use news_scraper::utils::ensure_writable_dir;
use std::error::Error;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let start_time = std::time::Instant::now();
    let args = ScrapeCli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut config = NewsConfig::load(&args.config).await?;
    if let Some(dir) = args.output_dir {
        config.crawler.output_dir = dir;
    }
    if let Some(concurrency) = args.concurrency {
        config.crawler.concurrency = usize::from(concurrency);
    }

    // Fail on an unknown site before touching the output directory
    config.site(&args.news_site)?;

    if let Err(e) = ensure_writable_dir(&config.crawler.output_dir).await {
        error!(
            path = %config.crawler.output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    match crawl::run(&config, &args.news_site).await? {
        CrawlOutcome::Exported { path, articles } => {
            info!(path = %path.display(), articles, "Article table written");
        }
        CrawlOutcome::InsufficientYield { articles } => {
            info!(articles, "No article table written");
        }
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "Execution complete");
    Ok(())
}
