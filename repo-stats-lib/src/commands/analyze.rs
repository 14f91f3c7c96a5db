//! The repository analysis workflow.

use super::config::Config;
use super::{Host, LOG_TARGET};
use crate::Result;
use crate::facts::{
    BatchEntry, BatchOptions, BatchSink, Client, ClientConfig, Pacing, RepositoryMetrics, run_batch, split_references,
};
use crate::reports::{CsvReport, generate_console};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use clap::{ArgGroup, Args, ValueEnum};
use core::time::Duration;
use ohno::{EnrichableExt, IntoAppError};
use std::fs::{self, File};
use std::io::Write;
use std::sync::Arc;

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("input").required(true).args(["repo", "repo_file"])))]
pub struct AnalyzeArgs {
    /// Comma-separated list of repository URLs or owner/name slugs
    #[arg(short = 'r', long = "repo", value_name = "URLS")]
    pub repo: Option<String>,

    /// File containing repository URLs separated by commas or line breaks
    #[arg(short = 'f', long = "repoFile", value_name = "PATH")]
    pub repo_file: Option<Utf8PathBuf>,

    /// Print the metrics of each repository as it completes
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// GitHub personal access token
    #[arg(long, value_name = "TOKEN", env = "TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Path to configuration file (default is `repo-stats.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Root of the GitHub REST API
    #[arg(long, value_name = "URL", help_heading = "Fetching")]
    pub api_url: Option<String>,

    /// How successive fetches are released
    #[arg(long, value_name = "MODE", help_heading = "Fetching")]
    pub pacing: Option<Pacing>,

    /// Seconds between the start of successive fetches in staggered mode
    #[arg(long, value_name = "SECS", help_heading = "Fetching")]
    pub stagger: Option<u64>,

    /// Maximum number of repositories fetched at the same time
    #[arg(long, value_name = "N", help_heading = "Fetching")]
    pub max_concurrent: Option<usize>,

    /// Seconds allowed for fetching a single repository
    #[arg(long, value_name = "SECS", help_heading = "Fetching")]
    pub timeout: Option<u64>,

    /// Directory where the CSV report is written
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub output_dir: Option<Utf8PathBuf>,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: LogLevel,
}

impl AnalyzeArgs {
    /// Layer the command-line overrides on top of a loaded configuration.
    fn apply_to(&self, mut config: Config) -> Config {
        if let Some(url) = &self.api_url {
            config.base_url.clone_from(url);
        }
        if let Some(pacing) = self.pacing {
            config.pacing = pacing;
        }
        if let Some(secs) = self.stagger {
            config.stagger_interval = Duration::from_secs(secs);
        }
        if let Some(max) = self.max_concurrent {
            config.max_concurrent = max;
        }
        if let Some(secs) = self.timeout {
            config.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir.clone_from(dir);
        }

        config
    }
}

/// Analyse the requested repositories and write the CSV report.
pub async fn process_repositories<H: Host>(host: &mut H, args: &AnalyzeArgs) -> Result<()> {
    init_logging(args.log_level);

    let config = Config::load(Utf8Path::new("."), args.config.as_deref())?;
    let config = args.apply_to(config);
    config.validate()?;

    let inputs = read_inputs(args)?;

    let client = Client::new(&ClientConfig {
        token: resolve_token(args),
        base_url: config.base_url.clone(),
    })?;

    let started_at = Utc::now();
    let (report, path) = CsvReport::create_in(&config.output_dir, started_at)?;
    log::info!(target: LOG_TARGET, "Writing results to '{path}'");

    let options = BatchOptions {
        pacing: config.pacing,
        stagger_interval: config.stagger_interval,
        max_concurrent: config.max_concurrent,
        fetch_timeout: config.fetch_timeout,
    };

    let mut sink = ReportSink {
        host: &mut *host,
        report,
        path: path.clone(),
        verbose: args.verbose,
        use_colors: use_colors(args.color),
    };

    let result = run_batch(&client, &inputs, &options, &mut sink).await?;
    drop(sink);

    let succeeded = result.succeeded().count();
    let _ = writeln!(
        host.output(),
        "Analysed {succeeded} of {} repositories; results written to {path}",
        result.len()
    );

    if !result.is_empty() && succeeded == 0 {
        host.exit(1);
    }

    Ok(())
}

/// Collect the raw repository references from `--repo` or `--repoFile`.
fn read_inputs(args: &AnalyzeArgs) -> Result<Vec<Arc<str>>> {
    let text = match (&args.repo, &args.repo_file) {
        (Some(list), _) => list.clone(),
        (None, Some(path)) => fs::read_to_string(path).into_app_err_with(|| format!("reading repository list '{path}'"))?,
        (None, None) => String::new(),
    };

    Ok(split_references(&text).map(Arc::from).collect())
}

/// The access token to send, or `None` when requests go out unauthenticated.
fn resolve_token(args: &AnalyzeArgs) -> Option<String> {
    let token = args.token.clone().filter(|t| !t.is_empty());
    if token.is_none() {
        log::info!(target: LOG_TARGET, "No TOKEN provided; using the unauthenticated GitHub rate limit");
    }

    token
}

fn use_colors(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            use std::io::{IsTerminal, stdout};
            stdout().is_terminal()
        }
    }
}

/// Initialize logger based on log level
fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // A logger may already be installed when running more than once in a process
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}

/// Routes batch outcomes to the host and the CSV report.
struct ReportSink<'a, H: Host> {
    host: &'a mut H,
    report: CsvReport<File>,
    path: Utf8PathBuf,
    verbose: bool,
    use_colors: bool,
}

impl<H: Host> BatchSink for ReportSink<'_, H> {
    fn completed(&mut self, entry: &BatchEntry, done: usize, total: usize) {
        match &entry.outcome {
            Ok(metrics) => {
                log::info!(target: LOG_TARGET, "Analysed '{}' ({done}/{total})", entry.input);

                if self.verbose {
                    let mut console_output = String::new();
                    if render_console(metrics, self.use_colors, &mut console_output) {
                        let _ = writeln!(self.host.output(), "{console_output}");
                    }
                }
            }

            Err(reason) => {
                log::debug!(target: LOG_TARGET, "Entry {} failed ({done}/{total})", entry.index + 1);
                let _ = writeln!(self.host.error(), "[ERROR]: Repo {} not analysed -> {reason}", entry.input);
            }
        }
    }

    fn record(&mut self, metrics: &RepositoryMetrics) -> Result<()> {
        self.report
            .append(metrics)
            .map_err(|e| e.enrich_with(|| format!("writing row for '{}' to '{}'", metrics.name, self.path)))
    }
}

/// Render the console block for one repository; a rendering failure is logged and skipped.
fn render_console<W: core::fmt::Write>(metrics: &RepositoryMetrics, use_colors: bool, out: &mut W) -> bool {
    match generate_console(metrics, use_colors, out) {
        Ok(()) => true,
        Err(e) => {
            log::warn!(target: LOG_TARGET, "Could not print the report for '{}': {e:#}", metrics.name);
            false
        }
    }
}
