use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::service::{DEFAULT_API_BASE, DEFAULT_TIMEOUT};

/// Environment variable holding the API token.
pub const TOKEN_ENV: &str = "TODOIST_TOKEN";

/// Cached snapshots younger than this are trusted without a fetch.
pub const DEFAULT_CACHE_MAX_AGE: Duration = Duration::from_secs(5 * 60);

const APP_DIR_NAME: &str = "todoist-tui";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub token: Option<String>,
    pub api_base: String,
    pub request_timeout: Duration,
    pub cache_max_age: Duration,
}

/// On-disk config file (~/.todoist-tui/config.toml). Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub api_base: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub cache_max_age_secs: Option<u64>,
}

/// Read `<base_dir>/config.toml`, returning defaults if missing or unparseable.
pub fn load_config_file(base_dir: &Path) -> ConfigFile {
    let path = base_dir.join("config.toml");
    match std::fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
            Ok(cf) => cf,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to parse config.toml, using defaults");
                ConfigFile::default()
            }
        },
        Err(_) => ConfigFile::default(),
    }
}

/// Read the token from the environment. An empty value counts as missing.
pub fn token_from_env() -> Option<String> {
    std::env::var(TOKEN_ENV)
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

impl Config {
    pub fn new(base_dir: PathBuf, cache_dir: PathBuf) -> Self {
        Self {
            base_dir,
            cache_dir,
            token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            cache_max_age: DEFAULT_CACHE_MAX_AGE,
        }
    }

    pub fn load() -> Result<Self> {
        let home_dir = dirs::home_dir().context("Could not find home directory")?;
        let base_dir = home_dir.join(format!(".{}", APP_DIR_NAME));
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| home_dir.join(".cache"))
            .join(APP_DIR_NAME);

        let mut config = Self::new(base_dir, cache_dir);
        config.apply_file(load_config_file(&config.base_dir));
        config.token = token_from_env();

        tracing::debug!(
            base_dir = %config.base_dir.display(),
            cache_dir = %config.cache_dir.display(),
            has_token = config.token.is_some(),
            "config loaded"
        );
        Ok(config)
    }

    /// Overlay the values present in a config file.
    pub fn apply_file(&mut self, file: ConfigFile) {
        if let Some(api_base) = file.api_base {
            self.api_base = api_base;
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.cache_max_age_secs {
            self.cache_max_age = Duration::from_secs(secs);
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.base_dir).context("Failed to create base directory")?;
        std::fs::create_dir_all(&self.cache_dir).context("Failed to create cache directory")?;
        Ok(())
    }

    pub fn log_path(&self) -> PathBuf {
        self.base_dir.join(format!("{}.log", APP_DIR_NAME))
    }
}
