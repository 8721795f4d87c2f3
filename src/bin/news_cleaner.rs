use clap::Parser;
use news_scraper::clean::clean_file;
use news_scraper::cli::CleanCli;
use news_scraper::logging::init_tracing;
use std::error::Error;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let args = CleanCli::parse();
    info!(filename = %args.filename.display(), "Starting cleaning process");

    let table = clean_file(&args.filename).await?;
    table.write_to(std::io::stdout().lock(), b'\t')?;

    info!(rows = table.rows.len(), "Cleaning complete");
    Ok(())
}
