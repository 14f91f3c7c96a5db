use crate::Result;
use crate::facts::Pacing;
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "repo-stats.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root of the GitHub REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// How successive fetches are released
    #[serde(default = "default_pacing")]
    pub pacing: Pacing,

    /// Minimum delay between the start of successive fetches in staggered mode
    #[serde(default = "default_stagger_interval", with = "humantime_serde")]
    pub stagger_interval: Duration,

    /// Maximum number of repositories fetched at the same time
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Time budget for fetching a single repository
    #[serde(default = "default_fetch_timeout", with = "humantime_serde")]
    pub fetch_timeout: Duration,

    /// Directory where the CSV report is written
    #[serde(default = "default_output_dir")]
    pub output_dir: Utf8PathBuf,
}

fn default_base_url() -> String {
    crate::facts::DEFAULT_BASE_URL.to_string()
}

const fn default_pacing() -> Pacing {
    Pacing::Staggered
}

const fn default_stagger_interval() -> Duration {
    crate::facts::DEFAULT_STAGGER_INTERVAL
}

const fn default_max_concurrent() -> usize {
    crate::facts::DEFAULT_MAX_CONCURRENT
}

const fn default_fetch_timeout() -> Duration {
    crate::facts::DEFAULT_FETCH_TIMEOUT
}

fn default_output_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(".")
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// An explicit `config_path` must exist. Otherwise `repo-stats.toml` is looked up in `base_dir`
    /// and defaults are used when it is absent.
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8Path>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading configuration file '{path}'"))?;
            (path.to_path_buf(), text)
        } else {
            let path = base_dir.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
                Err(e) => return Err(e).into_app_err_with(|| format!("reading configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config
            .validate()
            .map_err(|e| app_err!("invalid configuration file '{final_path}': {e}"))?;

        log::debug!(target: super::LOG_TARGET, "Loaded configuration from '{final_path}'");
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent == 0 {
            return Err(app_err!("max_concurrent must be at least 1"));
        }

        if self.fetch_timeout.is_zero() {
            return Err(app_err!("fetch_timeout must be greater than zero"));
        }

        let _ = Url::parse(&self.base_url).into_app_err_with(|| format!("base_url '{}' is not a valid URL", self.base_url))?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
