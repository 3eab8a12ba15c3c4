use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::content::{ContentSelectors, DepthLimits};
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub feeds: BTreeMap<String, String>,
    #[serde(default)]
    pub extraction: ExtractionSettings,
    #[serde(default)]
    pub fetch: FetchSettings,
    #[serde(default)]
    pub selectors: ContentSelectors,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSettings {
    #[serde(default = "default_description_length")]
    pub description_length: usize,

    #[serde(default = "default_max_articles")]
    pub max_articles: usize,

    #[serde(default = "default_quote_depth")]
    pub quote_depth: usize,

    #[serde(default = "default_heading_depth")]
    pub heading_depth: usize,

    #[serde(default = "default_link_depth")]
    pub link_depth: usize,

    #[serde(default = "default_video_depth")]
    pub video_depth: usize,

    #[serde(default = "default_formatting_depth")]
    pub formatting_depth: usize,

    #[serde(default = "default_eviction_depth")]
    pub eviction_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchSettings {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Pause after the first fetched page and then every
    /// `pages_between_delay` pages, in milliseconds.
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    #[serde(default = "default_pages_between_delay")]
    pub pages_between_delay: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub log_to_file: bool,

    #[serde(default = "default_log_file")]
    pub log_file: String,

    #[serde(default)]
    pub json_format: bool,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|_| ConfigError::NotFound(path.as_ref().display().to_string()))?;

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for (name, url) in &self.feeds {
            if name.is_empty() {
                return Err(ConfigError::Invalid("Feed name cannot be empty".to_string()));
            }

            url::Url::parse(url).map_err(|_| ConfigError::InvalidUrl(url.clone()))?;
        }

        if self.extraction.description_length == 0 {
            return Err(ConfigError::Invalid(
                "Description length must be greater than 0".to_string(),
            ));
        }

        if self.extraction.max_articles == 0 {
            return Err(ConfigError::Invalid("Max articles must be greater than 0".to_string()));
        }

        if self.fetch.timeout == 0 {
            return Err(ConfigError::Invalid("Timeout must be greater than 0".to_string()));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(length) = std::env::var("NEWSGRAB_DESCRIPTION_LENGTH") {
            if let Ok(val) = length.parse() {
                self.extraction.description_length = val;
            }
        }

        if let Ok(max_articles) = std::env::var("NEWSGRAB_MAX_ARTICLES") {
            if let Ok(val) = max_articles.parse() {
                self.extraction.max_articles = val;
            }
        }

        if let Ok(user_agent) = std::env::var("NEWSGRAB_USER_AGENT") {
            self.fetch.user_agent = user_agent;
        }

        if let Ok(level) = std::env::var("NEWSGRAB_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("newsgrab"))
            .ok_or_else(|| ConfigError::Invalid("Could not determine config directory".to_string()))
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feeds: BTreeMap::new(),
            extraction: ExtractionSettings::default(),
            fetch: FetchSettings::default(),
            selectors: ContentSelectors::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ExtractionSettings {
    pub fn depth_limits(&self) -> DepthLimits {
        DepthLimits {
            quote: self.quote_depth,
            heading: self.heading_depth,
            link: self.link_depth,
            video: self.video_depth,
            formatting: self.formatting_depth,
            eviction: self.eviction_depth,
        }
    }
}

impl FetchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            description_length: default_description_length(),
            max_articles: default_max_articles(),
            quote_depth: default_quote_depth(),
            heading_depth: default_heading_depth(),
            link_depth: default_link_depth(),
            video_depth: default_video_depth(),
            formatting_depth: default_formatting_depth(),
            eviction_depth: default_eviction_depth(),
        }
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout: default_timeout(),
            max_redirects: default_max_redirects(),
            page_delay_ms: default_page_delay_ms(),
            pages_between_delay: default_pages_between_delay(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_to_file: false,
            log_file: default_log_file(),
            json_format: false,
        }
    }
}

fn default_description_length() -> usize { 200 }
fn default_max_articles() -> usize { 100 }
fn default_quote_depth() -> usize { DepthLimits::default().quote }
fn default_heading_depth() -> usize { DepthLimits::default().heading }
fn default_link_depth() -> usize { DepthLimits::default().link }
fn default_video_depth() -> usize { DepthLimits::default().video }
fn default_formatting_depth() -> usize { DepthLimits::default().formatting }
fn default_eviction_depth() -> usize { DepthLimits::default().eviction }

fn default_user_agent() -> String {
    format!("newsgrab/{}", env!("CARGO_PKG_VERSION"))
}
fn default_timeout() -> u64 { 30 }
fn default_max_redirects() -> usize { 10 }
fn default_page_delay_ms() -> u64 { 200 }
fn default_pages_between_delay() -> usize { 10 }

fn default_log_level() -> String { "warn".to_string() }
fn default_log_file() -> String { "logs/newsgrab.log".to_string() }
