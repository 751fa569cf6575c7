//! Configuration: defaults, then `config.json`, then environment, then CLI flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::app::sort::SortMode;

pub const DEFAULT_API_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/";
pub const DEFAULT_IMAGE_SIZE: &str = "w185";
const APP_DIR: &str = "popular-movies";

/// Resolved application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// TMDB v3 API key; without it nothing can be fetched
    pub api_key: Option<String>,
    pub api_base: String,
    pub image_base: String,
    pub image_size: String,
    /// How long a transient notice stays on screen
    pub notice_duration_ms: u64,
    /// Connect timeout of the reachability probe
    pub probe_timeout_ms: u64,
    /// Pause between background reachability checks
    pub connectivity_poll_ms: u64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            image_base: DEFAULT_IMAGE_BASE.to_string(),
            image_size: DEFAULT_IMAGE_SIZE.to_string(),
            notice_duration_ms: 2000,
            probe_timeout_ms: 1500,
            connectivity_poll_ms: 5000,
            user_agent: format!("popular_movies/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// On-disk shape of `config.json`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    api_key: Option<String>,
    api_base: Option<String>,
    image_base: Option<String>,
    image_size: Option<String>,
    notice_duration_ms: Option<u64>,
    probe_timeout_ms: Option<u64>,
    connectivity_poll_ms: Option<u64>,
}

impl Config {
    /// Load from the default config file location and the process environment.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = default_config_file() {
            config.merge_file(&path)?;
        }
        config.merge_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Overlay values from a JSON file. A missing file is not an error.
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file: {}", path.display()))?;
        let file: FileConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        if let Some(key) = file.api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(base) = file.api_base {
            self.api_base = base;
        }
        if let Some(base) = file.image_base {
            self.image_base = base;
        }
        if let Some(size) = file.image_size {
            self.image_size = size;
        }
        if let Some(ms) = file.notice_duration_ms {
            self.notice_duration_ms = ms;
        }
        if let Some(ms) = file.probe_timeout_ms {
            self.probe_timeout_ms = ms;
        }
        if let Some(ms) = file.connectivity_poll_ms {
            self.connectivity_poll_ms = ms;
        }
        Ok(())
    }

    /// Overlay values from environment variables, looked up through `lookup`.
    pub fn merge_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("TMDB_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(base) = lookup("POPULAR_MOVIES_API_BASE") {
            self.api_base = base;
        }
        if let Some(ms) = parse_var(&lookup, "POPULAR_MOVIES_NOTICE_MS")? {
            self.notice_duration_ms = ms;
        }
        if let Some(ms) = parse_var(&lookup, "POPULAR_MOVIES_PROBE_TIMEOUT_MS")? {
            self.probe_timeout_ms = ms;
        }
        if let Some(ms) = parse_var(&lookup, "POPULAR_MOVIES_CONNECTIVITY_POLL_MS")? {
            self.connectivity_poll_ms = ms;
        }
        Ok(())
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key {
            self.api_key = Some(key);
        }
        self
    }

    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_duration_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn connectivity_poll_interval(&self) -> Duration {
        Duration::from_millis(self.connectivity_poll_ms)
    }

    /// Catalog URL for a sort mode, `None` for [`SortMode::None`].
    pub fn endpoint(&self, mode: SortMode) -> Option<String> {
        let path = mode.endpoint_path()?;
        let key = self.api_key.as_deref().unwrap_or_default();
        Some(format!(
            "{}/movie/{}?api_key={}",
            self.api_base.trim_end_matches('/'),
            path,
            urlencoding::encode(key)
        ))
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(val) => val
            .parse()
            .map(Some)
            .with_context(|| format!("Failed to parse environment variable {} = '{}'", name, val)),
        None => Ok(None),
    }
}

pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
}

pub fn default_log_file() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
        .join("popular-movies.log")
}
