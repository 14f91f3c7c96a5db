//! Command dispatch logic for repo-stats

use super::{AnalyzeArgs, process_repositories};
use crate::{Host, Result};
use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use std::io::Write;

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "repo-stats", author, version, long_about = None)]
#[command(about = "Collect activity metrics for GitHub repositories into a CSV file")]
#[command(styles = CLAP_STYLES)]
struct Args {
    #[command(flatten)]
    analyze: AnalyzeArgs,
}

/// Parse command-line arguments and run the analysis
///
/// This function is designed to be called from main.rs with the program arguments.
/// Usage errors, `--help` and `--version` are written to the host and end with
/// [`Host::exit`] rather than an error.
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if a fatal condition stops the run before the batch completes
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let args = match Args::try_parse_from(args) {
        Ok(args) => args,
        Err(e) => {
            let rendered = e.render();
            if e.use_stderr() {
                let _ = write!(host.error(), "{rendered}");
            } else {
                let _ = write!(host.output(), "{rendered}");
            }

            host.exit(e.exit_code());
            return Ok(());
        }
    };

    process_repositories(host, &args.analyze).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::TestHost;

    #[tokio::test]
    async fn test_missing_input_prints_usage_and_exits() {
        let mut host = TestHost::new();
        run(&mut host, ["repo-stats", "-v"]).await.unwrap();

        assert_eq!(host.exit_code, Some(2));
        assert!(host.error_str().contains("Usage"));
        assert!(host.output_buf.is_empty());
    }

    #[tokio::test]
    async fn test_help_goes_to_output() {
        let mut host = TestHost::new();
        run(&mut host, ["repo-stats", "--help"]).await.unwrap();

        assert_eq!(host.exit_code, Some(0));
        assert!(host.output_str().contains("--repoFile"));
    }

    #[tokio::test]
    async fn test_unreadable_repo_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");

        let mut host = TestHost::new();
        let err = run(
            &mut host,
            [
                "repo-stats",
                "-f",
                missing.to_str().unwrap(),
                "--output-dir",
                dir.path().to_str().unwrap(),
                "--log-level",
                "none",
            ],
        )
        .await
        .unwrap_err();

        assert!(format!("{err:#}").contains("reading repository list"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_override_is_fatal() {
        let dir = tempfile::tempdir().unwrap();

        let mut host = TestHost::new();
        let err = run(
            &mut host,
            [
                "repo-stats",
                "-r",
                "acme/widgets",
                "--max-concurrent",
                "0",
                "--output-dir",
                dir.path().to_str().unwrap(),
                "--log-level",
                "none",
            ],
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("max_concurrent"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
