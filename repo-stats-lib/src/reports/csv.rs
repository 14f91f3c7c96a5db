use crate::Result;
use crate::facts::RepositoryMetrics;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, NaiveDate, Utc};
use ohno::{EnrichableExt, IntoAppError};
use std::fs::File;
use std::io::Write;

/// Column names, in output order.
pub const HEADER: [&str; 15] = [
    "name",
    "open_pr",
    "closed_pr",
    "forks",
    "stars",
    "open_issues",
    "closed_issues",
    "language",
    "license",
    "contributors",
    "branches",
    "created",
    "updated",
    "pushed",
    "commits",
];

/// Appends one row per repository to a CSV stream.
///
/// The header is written on construction. Every row is flushed as soon as it is written so that a
/// run interrupted midway still leaves a usable file behind.
#[derive(Debug)]
pub struct CsvReport<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvReport<W> {
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new().terminator(csv::Terminator::CRLF).from_writer(inner);

        writer.write_record(HEADER)?;
        writer.flush()?;

        Ok(Self { writer })
    }

    pub fn append(&mut self, metrics: &RepositoryMetrics) -> Result<()> {
        let commits = metrics.commit_count.map(|c| c.to_string()).unwrap_or_default();

        self.writer.write_record([
            metrics.name.clone(),
            metrics.open_pr_count.to_string(),
            metrics.closed_pr_count.to_string(),
            metrics.fork_count.to_string(),
            metrics.star_count.to_string(),
            metrics.open_issue_count.to_string(),
            metrics.closed_issue_count.to_string(),
            metrics.dominant_language.clone(),
            metrics.license_name.clone(),
            metrics.contributor_count.to_string(),
            metrics.branch_count.to_string(),
            format_date(metrics.created_date()),
            format_date(metrics.updated_date()),
            format_date(metrics.pushed_date()),
            commits,
        ])?;
        self.writer.flush()?;

        Ok(())
    }

    /// Flush and give back the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(csv::IntoInnerError::into_error)
            .into_app_err("flushing CSV report")
    }
}

impl CsvReport<File> {
    /// Create `<millis>.csv` in `dir`, named after the run's start time.
    ///
    /// An existing file with the same name is never overwritten.
    pub fn create_in(dir: &Utf8Path, started_at: DateTime<Utc>) -> Result<(Self, Utf8PathBuf)> {
        let path = dir.join(report_file_name(started_at));

        let file = File::create_new(&path).into_app_err_with(|| format!("creating output file '{path}'"))?;
        let report = Self::new(file).map_err(|e| e.enrich_with(|| format!("writing header to '{path}'")))?;

        Ok((report, path))
    }
}

/// The decimal millisecond timestamp of `started_at`, with a `.csv` extension.
#[must_use]
pub fn report_file_name(started_at: DateTime<Utc>) -> String {
    format!("{}.csv", started_at.timestamp_millis())
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
