//! Collect activity metrics for GitHub repositories into a timestamped CSV file.
//!
//! ```bash
//! repo-stats -r https://github.com/tokio-rs/tokio,https://github.com/serde-rs/serde -v
//! repo-stats -f repos.txt
//! ```
//!
//! Set `TOKEN` (in the environment or a `.env` file) to a GitHub personal access token to lift the
//! unauthenticated rate limit.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use repo_stats_lib::{Host, run};
use std::io::Write;
use std::io::{stderr, stdout};

/// Default host that talks to the real terminal and process.
#[derive(Debug, Clone, Default)]
pub struct RealHost;

#[cfg_attr(coverage_nightly, coverage(off))]
impl Host for RealHost {
    fn output(&mut self) -> impl Write {
        stdout()
    }

    fn error(&mut self) -> impl Write {
        stderr()
    }

    fn exit(&mut self, code: i32) {
        std::process::exit(code);
    }
}

#[tokio::main]
#[cfg_attr(coverage_nightly, coverage(off))]
async fn main() -> Result<(), ohno::AppError> {
    // A missing .env file is the common case
    let _ = dotenvy::dotenv();

    run(&mut RealHost, std::env::args()).await
}
