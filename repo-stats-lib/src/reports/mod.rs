//! Report generation for repository metrics
//!
//! Two outputs are produced from the same [`RepositoryMetrics`](crate::facts::RepositoryMetrics)
//! records:
//! - **CSV**: one file per run, one row per successfully analysed repository, written
//!   incrementally and flushed after every row
//! - **Console**: a block of labeled lines per repository, optionally colored

mod console;
mod csv;

pub use self::console::generate as generate_console;
pub use self::csv::{CsvReport, HEADER as CSV_HEADER, report_file_name};
