//! Tab-delimited article table output.
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! └── elmundo_18_10_2026_articles.csv
//! ```
//!
//! The header is [`ExportRecord::COLUMNS`] for every file, whatever the
//! batch contains. Existing files with the same name are overwritten.

use crate::error::Result;
use crate::models::{ArticleBatch, ExportRecord};
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Field delimiter of the article table.
pub const DELIMITER: u8 = b'\t';

/// `{site_id}_{DD_MM_YYYY}_articles.csv`
pub fn export_filename(site_id: &str, date: NaiveDate) -> String {
    format!("{}_{}_articles.csv", site_id, date.format("%d_%m_%Y"))
}

/// Serialize a batch into table bytes: header, then one row per article.
pub fn render_table(batch: &ArticleBatch) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(ExportRecord::COLUMNS)?;
    for article in &batch.articles {
        writer.serialize(article.to_record())?;
    }

    writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()).into())
}

/// Write `batch` into `output_dir` under the name for `date`.
///
/// Creates `output_dir` if needed and overwrites an existing file of the
/// same name.
///
/// # Arguments
///
/// * `output_dir` - Directory the table is written into
/// * `batch` - Usable articles for one site
/// * `date` - Date stamped into the file name as `DD_MM_YYYY`
///
/// # Returns
///
/// The path of the written file:
/// `{output_dir}/{site_id}_{DD_MM_YYYY}_articles.csv`.
#[instrument(level = "info", skip(batch), fields(site_id = %batch.site_id, rows = batch.len()))]
pub async fn export_batch(
    output_dir: &Path,
    batch: &ArticleBatch,
    date: NaiveDate,
) -> Result<PathBuf> {
    let table = render_table(batch)?;

    fs::create_dir_all(output_dir).await?;
    let path = output_dir.join(export_filename(&batch.site_id, date));

    info!(path = %path.display(), "Writing article table");
    fs::write(&path, table).await?;
    info!(path = %path.display(), "Wrote article table");

    Ok(path)
}

/// [`export_batch`] stamped with today's local date.
pub async fn export_batch_today(output_dir: &Path, batch: &ArticleBatch) -> Result<PathBuf> {
    export_batch(output_dir, batch, Local::now().date_naive()).await
}
