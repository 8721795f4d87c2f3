//! Cleaning stage for exported article tables.
//!
//! Three fixed steps:
//! 1. read the table
//! 2. fill a `newspaper_uid` column from the file name (`elmundo_..._articles.csv` -> `elmundo`)
//! 3. derive a `host` column from each row's `url`
//!
//! Both tab-delimited (scraper output) and comma-delimited input is accepted;
//! the delimiter is taken from the header line.

use crate::error::{Result, ScraperError};
use std::io::Write;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

pub const NEWSPAPER_UID_COLUMN: &str = "newspaper_uid";
pub const HOST_COLUMN: &str = "host";
pub const URL_COLUMN: &str = "url";

/// An in-memory table of string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Parse delimited text with a header row.
    pub fn parse(text: &str, delimiter: u8) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let rows = reader
            .records()
            .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
            .collect::<std::result::Result<Vec<Vec<String>>, csv::Error>>()?;

        Ok(Self { headers, rows })
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cells of column `name`, if present.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).map(String::as_str).unwrap_or_default())
                .collect(),
        )
    }

    /// Replace column `name` if it exists, append it otherwise.
    ///
    /// `values` must hold one cell per row.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
    }

    /// Write the table, header first.
    pub fn write_to<W: Write>(&self, writer: W, delimiter: u8) -> Result<()> {
        let mut out = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .from_writer(writer);
        out.write_record(&self.headers)?;
        for row in &self.rows {
            out.write_record(row)?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Pick tab when the header line contains one, comma otherwise.
pub fn detect_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    if header.contains('\t') { b'\t' } else { b',' }
}

/// The file's basename up to the first `_`.
pub fn extract_newspaper_uid(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.split('_').next().unwrap_or_default().to_string()
}

/// Network location of `url`, exactly as written in it.
///
/// User info and any port (even the scheme's default) are kept, the way a
/// netloc is. Unparseable or relative URLs give an empty string.
///
/// # Examples
///
/// ```
/// use news_scraper::clean::extract_host;
///
/// assert_eq!(extract_host("https://www.elmundo.es/section/article"), "www.elmundo.es");
/// assert_eq!(extract_host("https://www.elmundo.es:443/a"), "www.elmundo.es:443");
/// ```
pub fn extract_host(url: &str) -> String {
    let url = url.trim();
    let has_host = Url::parse(url).is_ok_and(|parsed| parsed.host_str().is_some());
    if !has_host {
        return String::new();
    }
    let Some((_, rest)) = url.split_once("://") else {
        return String::new();
    };
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    rest[..end].to_string()
}

/// Add `newspaper_uid` and `host` columns to `table`.
///
/// # Arguments
///
/// * `table` - The table read from disk; must have a `url` column
/// * `newspaper_uid` - Value written into every row's `newspaper_uid`
/// * `source` - Path the table came from, used in error messages
///
/// # Returns
///
/// The table with both columns appended (or replaced when already present).
///
/// # Errors
///
/// [`ScraperError::MissingColumn`] when there is no `url` column.
pub fn clean_table(mut table: Table, newspaper_uid: &str, source: &Path) -> Result<Table> {
    info!(%newspaper_uid, "Filling newspaper_uid column");
    table.set_column(NEWSPAPER_UID_COLUMN, vec![newspaper_uid.to_string(); table.rows.len()]);

    info!("Extracting host from URL");
    let hosts = table
        .column(URL_COLUMN)
        .ok_or_else(|| ScraperError::MissingColumn {
            column: URL_COLUMN.to_string(),
            path: source.to_path_buf(),
        })?
        .into_iter()
        .map(extract_host)
        .collect();
    table.set_column(HOST_COLUMN, hosts);

    Ok(table)
}

/// Read `path` and run the cleaning steps on it.
///
/// The newspaper uid is the basename of `path` up to the first `_`, and the
/// delimiter is detected from the header line.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a valid table, or
/// has no `url` column.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn clean_file(path: &Path) -> Result<Table> {
    info!("Reading file");
    let text = fs::read_to_string(path).await?;
    let table = Table::parse(&text, detect_delimiter(&text))?;

    let newspaper_uid = extract_newspaper_uid(path);
    info!(%newspaper_uid, rows = table.rows.len(), "Newspaper uid detected");

    clean_table(table, &newspaper_uid, path)
}
