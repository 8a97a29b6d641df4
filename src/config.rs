use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Scraper configuration, usually read from `cl-syllabus.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub baseurl: String,

    /// Stream name to course identifiers, kept in file order.
    pub streams: IndexMap<String, Vec<String>>,

    #[serde(default)]
    pub fetch: FetchConfig,
}

impl Config {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs_err::read_to_string(path.as_ref())?;
        text.parse()
            .with_context(|| format!("Invalid config file {}", path.as_ref().display()))
    }

    /// Builds the page url of a course relative to `baseurl`.
    pub fn course_url(&self, course: &str) -> Result<Url> {
        let base = Url::parse(&self.baseurl)
            .with_context(|| format!("Invalid baseurl {:?}", self.baseurl))?;
        base.join(course)
            .with_context(|| format!("Couldn't join {:?} to {}", course, self.baseurl))
    }

    /// Iterates `(stream, course)` pairs in configuration order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.streams.iter().flat_map(|(stream, courses)| {
            courses
                .iter()
                .map(move |course| (stream.as_str(), course.as_str()))
        })
    }

    fn validate(&self) -> Result<()> {
        let base = Url::parse(&self.baseurl)
            .with_context(|| format!("Invalid baseurl {:?}", self.baseurl))?;
        if base.cannot_be_a_base() {
            return Err(anyhow!("baseurl {:?} cannot be a base", self.baseurl));
        }
        if self.fetch.max_attempts == 0 {
            return Err(anyhow!("fetch.max_attempts must be at least 1"));
        }
        if self.fetch.concurrent_downloads == 0 {
            return Err(anyhow!("fetch.concurrent_downloads must be at least 1"));
        }
        Ok(())
    }
}

impl FromStr for Config {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Delay before the first retry, doubled after each further timeout
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_concurrent_downloads")]
    pub concurrent_downloads: usize,
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Delay to wait after the given failed attempt (1-based).
    pub fn backoff(&self, attempt: usize) -> Duration {
        let exp = attempt.saturating_sub(1).min(16) as u32;
        Duration::from_millis(self.backoff_ms.saturating_mul(1 << exp))
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
            user_agent: default_user_agent(),
            concurrent_downloads: default_concurrent_downloads(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_max_attempts() -> usize {
    5
}

fn default_backoff_ms() -> u64 {
    500
}

fn default_user_agent() -> String {
    String::from("cl-syllabus")
}

fn default_concurrent_downloads() -> usize {
    1
}
