use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::kernel::cycle::{PollConfig, DEFAULT_CONTAINER_ID, SLEEP_NORMAL, SLEEP_RETRY};
use crate::kernel::watch::{StaticWatchList, WatchListProvider, WatchTarget};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOG_LEVEL: &str = "info";

pub const USAGE: &str = "\
Usage: counterwatch

Monitors the atomic counters configured on an ACI fabric and adds an artifact to a
Phantom container whenever a known counter shows traffic. Use CTRL+C to exit.

Required environment:
    APIC_HOST              controller host or base URL
    APIC_USERNAME          controller user
    APIC_PASSWORD          controller password
    PHANTOM_HOST           Phantom host or base URL
    PHANTOM_TOKEN          Phantom automation token

Optional environment:
    PHANTOM_CONTAINER_ID   container receiving artifacts (28)
    WATCH_LIST_PATH        JSON array of {\"class\", \"counter\", \"threshold\"} objects
    POLL_INTERVAL_SECS     idle time between sweeps (60)
    RETRY_INTERVAL_SECS    idle time after a failed login (10)
    REQUEST_TIMEOUT_SECS   per-request timeout (10)
    APIC_VERIFY_TLS        verify the controller certificate (true)
    PHANTOM_VERIFY_TLS     verify the Phantom certificate (true)
    LOG_LEVEL              tracing filter (info)
";

pub struct Config {
    pub apic_host: String,
    pub apic_username: String,
    pub apic_password: String,
    pub apic_verify_tls: bool,
    pub phantom_host: String,
    pub phantom_token: String,
    pub phantom_verify_tls: bool,
    pub watch_list: StaticWatchList,
    pub poll: PollConfig,
    pub request_timeout: Duration,
    pub log_level: String,
}

// Credentials stay out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("apic_host", &self.apic_host)
            .field("apic_username", &self.apic_username)
            .field("apic_verify_tls", &self.apic_verify_tls)
            .field("phantom_host", &self.phantom_host)
            .field("phantom_verify_tls", &self.phantom_verify_tls)
            .field("watch_list", &self.watch_list.list())
            .field("poll", &self.poll)
            .field("request_timeout", &self.request_timeout)
            .field("log_level", &self.log_level)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<L>(lookup: L) -> Result<Config, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let settings = Settings { lookup };

        let watch_list = match settings.optional("WATCH_LIST_PATH") {
            Some(path) => StaticWatchList::new(load_watch_list(Path::new(&path))?),
            None => StaticWatchList::default(),
        };

        let poll_interval: u64 = settings.parsed("POLL_INTERVAL_SECS", SLEEP_NORMAL.as_secs())?;
        let retry_interval: u64 = settings.parsed("RETRY_INTERVAL_SECS", SLEEP_RETRY.as_secs())?;
        if retry_interval >= poll_interval {
            return Err(ConfigError::RetryNotShorter {
                retry: retry_interval,
                poll: poll_interval,
            });
        }

        let request_timeout: u64 =
            settings.parsed("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        if request_timeout == 0 {
            return Err(ConfigError::Invalid {
                key: "REQUEST_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        Ok(Config {
            apic_host: settings.required("APIC_HOST")?,
            apic_username: settings.required("APIC_USERNAME")?,
            apic_password: settings.required("APIC_PASSWORD")?,
            apic_verify_tls: settings.flag("APIC_VERIFY_TLS", true)?,
            phantom_host: settings.required("PHANTOM_HOST")?,
            phantom_token: settings.required("PHANTOM_TOKEN")?,
            phantom_verify_tls: settings.flag("PHANTOM_VERIFY_TLS", true)?,
            watch_list,
            poll: PollConfig {
                poll_interval: Duration::from_secs(poll_interval),
                retry_interval: Duration::from_secs(retry_interval),
                container_id: settings.parsed("PHANTOM_CONTAINER_ID", DEFAULT_CONTAINER_ID)?,
            },
            request_timeout: Duration::from_secs(request_timeout),
            log_level: settings
                .optional("LOG_LEVEL")
                .map(|level| level.to_lowercase())
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }
}

/// Reads a JSON watch list. An empty list is rejected since it would make every sweep a no-op.
pub fn load_watch_list(path: &Path) -> Result<Vec<WatchTarget>, ConfigError> {
    let failure = |reason: String| ConfigError::WatchList {
        path: path.display().to_string(),
        reason,
    };

    let content = fs::read_to_string(path).map_err(|e| failure(e.to_string()))?;
    let targets: Vec<WatchTarget> =
        serde_json::from_str(&content).map_err(|e| failure(e.to_string()))?;
    if targets.is_empty() {
        return Err(failure("watch list is empty".to_string()));
    }
    Ok(targets)
}

struct Settings<L> {
    lookup: L,
}

impl<L: Fn(&str) -> Option<String>> Settings<L> {
    /// Blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.optional(key).ok_or(ConfigError::Missing(key))
    }

    fn parsed<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        match self.optional(key) {
            Some(value) => value
                .parse::<T>()
                .map_err(|_| ConfigError::Invalid { key, value }),
            None => Ok(default),
        }
    }

    fn flag(&self, key: &'static str, default: bool) -> Result<bool, ConfigError> {
        match self.optional(key).map(|v| v.to_lowercase()) {
            None => Ok(default),
            Some(v) if matches!(v.as_str(), "true" | "1" | "yes") => Ok(true),
            Some(v) if matches!(v.as_str(), "false" | "0" | "no") => Ok(false),
            Some(value) => Err(ConfigError::Invalid { key, value }),
        }
    }
}
