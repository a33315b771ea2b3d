use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

use crate::toast::{DEFAULT_TOAST_CAPACITY, DEFAULT_TOAST_DURATION};

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_UNREAD_POLL_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// `None` sends requests without a deadline.
    pub request_timeout: Option<Duration>,
    pub toast_duration: Duration,
    pub toast_capacity: usize,
    pub unread_poll_interval: Duration,
    /// Where the session is persisted; `None` keeps it in memory.
    pub database_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            toast_duration: DEFAULT_TOAST_DURATION,
            toast_capacity: DEFAULT_TOAST_CAPACITY,
            unread_poll_interval: DEFAULT_UNREAD_POLL_INTERVAL,
            database_path: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let base_url = lookup("PANTRY_API_URL")
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| {
                info!("PANTRY_API_URL not set, using default: {}", defaults.base_url);
                defaults.base_url.clone()
            });

        let timeout_secs = try_load(
            &lookup,
            "PANTRY_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT.as_secs(),
        );
        let toast_ms = try_load(
            &lookup,
            "PANTRY_TOAST_MS",
            u64::try_from(DEFAULT_TOAST_DURATION.as_millis()).unwrap_or(u64::MAX),
        );
        let toast_capacity = try_load(&lookup, "PANTRY_TOAST_CAPACITY", defaults.toast_capacity);
        let poll_secs = try_load(
            &lookup,
            "PANTRY_POLL_SECS",
            DEFAULT_UNREAD_POLL_INTERVAL.as_secs(),
        );

        let database_path = lookup("PANTRY_DB_PATH")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Self {
            base_url,
            request_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            toast_duration: Duration::from_millis(toast_ms),
            toast_capacity: toast_capacity.max(1),
            unread_poll_interval: Duration::from_secs(poll_secs.max(1)),
            database_path,
        }
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        info!("{key} not set, using default: {default}");
        return default;
    };

    raw.trim().parse().unwrap_or_else(|error| {
        warn!("Invalid {key} value '{raw}': {error}; using default: {default}");
        default
    })
}
