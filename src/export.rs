//! CSV export of filtered records
//!
//! Every cell is quoted and missing values are written as `N/A`, which is
//! what spreadsheet users of the console expect.

use crate::core::error::{ListviewError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use csv::{QuoteStyle, WriterBuilder};
use std::io::Write;

/// Cell text for a missing value
pub const MISSING: &str = "N/A";

/// A record that can be written as one CSV row
pub trait CsvExport {
    /// Column headers, in row order
    fn csv_headers() -> Vec<&'static str>;

    /// One cell per header
    fn csv_row(&self) -> Vec<String>;
}

/// Write `records` with a header row to `writer`
pub fn write_csv<T: CsvExport, W: Write>(records: &[T], writer: W) -> Result<()> {
    let mut csv = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);

    csv.write_record(T::csv_headers()).map_err(export_error)?;
    for record in records {
        csv.write_record(record.csv_row()).map_err(export_error)?;
    }
    csv.flush().map_err(|e| ListviewError::Export(e.to_string()))?;

    tracing::debug!(rows = records.len(), "CSV export written");
    Ok(())
}

/// Render `records` as a CSV document
pub fn to_csv_string<T: CsvExport>(records: &[T]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| ListviewError::Export(e.to_string()))
}

/// File name for an export made on `date`, e.g. `user-cards-2024-06-15.csv`
pub fn export_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}-{}.csv", prefix, date.format("%Y-%m-%d"))
}

/// Cell for a number; missing numbers are written as 0
pub fn number_cell(value: Option<f64>) -> String {
    let value = value.unwrap_or(0.0);
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Cell for a timestamp, as a calendar date
pub fn date_cell(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

fn export_error(err: csv::Error) -> ListviewError {
    ListviewError::Export(err.to_string())
}
