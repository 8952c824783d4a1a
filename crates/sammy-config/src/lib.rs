use anyhow::Context;
use sammy_core::DuplicatePolicy;
use sammy_engine::{SummarizeOptions, summarizer};
use sammy_sources::{FetchOptions, github};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for sammy (credentials are read from the environment, never from here)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// User summarized when `--user` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_user: Option<String>,

    #[serde(default)]
    pub github: GithubConfig,

    #[serde(default)]
    pub summarizer: SummarizerConfig,

    #[serde(default)]
    pub masking: MaskingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "default_github_url")]
    pub api_url: String,

    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Derived from `per_page` to cover the whole event history when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerConfig {
    #[serde(default = "default_openai_url")]
    pub api_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaskingConfig {
    #[serde(default)]
    pub on_duplicate: DuplicatePolicy,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: default_github_url(),
            per_page: default_per_page(),
            max_pages: None,
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            api_url: default_openai_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_github_url() -> String {
    github::DEFAULT_API_URL.to_string()
}

fn default_per_page() -> u32 {
    sammy_sources::DEFAULT_PER_PAGE
}

fn default_openai_url() -> String {
    summarizer::DEFAULT_API_URL.to_string()
}

fn default_model() -> String {
    summarizer::DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    sammy_engine::DEFAULT_MAX_TOKENS
}

fn default_temperature() -> f32 {
    summarizer::DEFAULT_TEMPERATURE
}

impl GithubConfig {
    pub fn fetch_options(&self) -> FetchOptions {
        let options = FetchOptions::new(self.per_page);
        match self.max_pages {
            Some(max_pages) => options.with_max_pages(max_pages),
            None => options,
        }
    }
}

impl SummarizerConfig {
    pub fn summarize_options(&self, on_duplicate: DuplicatePolicy) -> SummarizeOptions {
        SummarizeOptions {
            max_tokens: self.max_tokens,
            on_duplicate,
        }
    }
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        Self::load_or_create(&Self::config_path())
    }

    /// Load config from `path`, which must exist
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    fn load_or_create(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            // Create default config file
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(path, content)?;
            Ok(config)
        }
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "sammy", "sammy") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.sammy/config.toml")
        }
    }
}
