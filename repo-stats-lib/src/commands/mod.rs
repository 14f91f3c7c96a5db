//! Command-line interface and orchestration for repo-stats
//!
//! This module implements the CLI and coordinates the rest of the crate to perform an
//! end-to-end analysis run.
//!
//! # Execution Flow
//!
//! The `run` function parses command-line arguments using clap and hands them to
//! `process_repositories`, which:
//!
//! 1. Initializes logging and loads the configuration, layering CLI flags on top
//! 2. Reads the repository references from `--repo` or `--repoFile`
//! 3. Creates the timestamped CSV file in the output directory
//! 4. Runs the batch, streaming console output and CSV rows as repositories complete
//! 5. Prints a one-line summary and sets the exit status
//!
//! Every fatal condition is detected before the first request is made.

mod analyze;
mod config;
mod host;
mod run;

const LOG_TARGET: &str = "  commands";

pub use analyze::{AnalyzeArgs, ColorMode, LogLevel, process_repositories};
pub use config::{CONFIG_FILE_NAME, Config, DEFAULT_CONFIG_TOML};
#[cfg(test)]
pub use host::TestHost;
pub use host::Host;
pub use run::run;
