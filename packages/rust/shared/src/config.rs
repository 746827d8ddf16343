//! Application configuration for copyscan.
//!
//! User config lives at `~/.copyscan/copyscan.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CopyscanError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "copyscan.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".copyscan";

// ---------------------------------------------------------------------------
// Config structs (matching copyscan.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Pipeline limits and pool sizes.
    #[serde(default)]
    pub pipeline: PipelineSection,

    /// Web-search lookup settings.
    #[serde(default)]
    pub search: SearchSection,

    /// Candidate-page fetch settings.
    #[serde(default)]
    pub fetch: FetchSection,

    /// Semantic-annotation (keyword extraction) settings.
    #[serde(default)]
    pub annotate: AnnotateSection,

    /// HTTP server bind settings.
    #[serde(default)]
    pub server: ServerSection,
}

/// `[pipeline]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSection {
    /// Hard cap on sentences processed per check; extras are dropped.
    #[serde(default = "default_max_sentences")]
    pub max_sentences: usize,

    /// Worker-pool size for the search-lookup stage.
    #[serde(default = "default_pool_size")]
    pub lookup_pool_size: usize,

    /// Worker-pool size for the fetch-and-score stage.
    #[serde(default = "default_pool_size")]
    pub fetch_pool_size: usize,
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            max_sentences: default_max_sentences(),
            lookup_pool_size: default_pool_size(),
            fetch_pool_size: default_pool_size(),
        }
    }
}

fn default_max_sentences() -> usize {
    20
}
fn default_pool_size() -> usize {
    10
}

/// `[search]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSection {
    /// Base URL of the search-results page to scrape.
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_net_timeout")]
    pub timeout_secs: u64,

    /// Domains never accepted as comparison sources (suffix match on host).
    #[serde(default = "default_denied_domains")]
    pub denied_domains: Vec<String>,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
            timeout_secs: default_net_timeout(),
            denied_domains: default_denied_domains(),
        }
    }
}

fn default_search_endpoint() -> String {
    "https://www.google.com".into()
}
fn default_net_timeout() -> u64 {
    5
}
fn default_denied_domains() -> Vec<String> {
    vec!["youtube.com".into(), "vimeo.com".into()]
}

/// `[fetch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSection {
    /// Per-attempt timeout in seconds.
    #[serde(default = "default_net_timeout")]
    pub timeout_secs: u64,

    /// Total fetch attempts per URL (not retries-after-first).
    #[serde(default = "default_fetch_attempts")]
    pub attempts: u32,

    /// Fixed delay between attempts, in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for FetchSection {
    fn default() -> Self {
        Self {
            timeout_secs: default_net_timeout(),
            attempts: default_fetch_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_fetch_attempts() -> u32 {
    2
}
fn default_retry_delay_ms() -> u64 {
    500
}

/// `[annotate]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotateSection {
    /// Base URL of the annotation API.
    #[serde(default = "default_annotate_endpoint")]
    pub endpoint: String,

    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for AnnotateSection {
    fn default() -> Self {
        Self {
            endpoint: default_annotate_endpoint(),
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_annotate_endpoint() -> String {
    "https://api.textrazor.com".into()
}
fn default_api_key_env() -> String {
    "TEXTRAZOR_API_KEY".into()
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    5000
}

// ---------------------------------------------------------------------------
// Runtime configs (injected into constructors — no global config state)
// ---------------------------------------------------------------------------

/// Runtime pipeline configuration handed to the orchestrator.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Hard cap on sentences processed per check.
    pub max_sentences: usize,
    /// Worker-pool size for the lookup stage.
    pub lookup_pool_size: usize,
    /// Worker-pool size for the fetch-and-score stage.
    pub fetch_pool_size: usize,
}

impl From<&AppConfig> for PipelineConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_sentences: config.pipeline.max_sentences,
            lookup_pool_size: config.pipeline.lookup_pool_size,
            fetch_pool_size: config.pipeline.fetch_pool_size,
        }
    }
}

/// Runtime configuration for the search-lookup client.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Base URL of the search-results page.
    pub endpoint: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Denied source domains (suffix match on host).
    pub denied_domains: Vec<String>,
}

impl From<&AppConfig> for SearchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            endpoint: config.search.endpoint.clone(),
            timeout_secs: config.search.timeout_secs,
            denied_domains: config.search.denied_domains.clone(),
        }
    }
}

/// Runtime configuration for the content fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Per-attempt timeout in seconds.
    pub timeout_secs: u64,
    /// Total attempts per URL.
    pub attempts: u32,
    /// Delay between attempts in milliseconds.
    pub retry_delay_ms: u64,
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.fetch.timeout_secs,
            attempts: config.fetch.attempts,
            retry_delay_ms: config.fetch.retry_delay_ms,
        }
    }
}

/// Runtime configuration for the annotation client.
#[derive(Debug, Clone)]
pub struct AnnotateConfig {
    /// Base URL of the annotation API.
    pub endpoint: String,
    /// Name of the env var holding the API key.
    pub api_key_env: String,
}

impl From<&AppConfig> for AnnotateConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            endpoint: config.annotate.endpoint.clone(),
            api_key_env: config.annotate.api_key_env.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.copyscan/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CopyscanError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.copyscan/copyscan.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CopyscanError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| CopyscanError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| CopyscanError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| CopyscanError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| CopyscanError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read the annotation API key from the env var the config names.
pub fn resolve_api_key(config: &AppConfig) -> Result<String> {
    let var_name = &config.annotate.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(CopyscanError::config(format!(
            "annotation API key not found. Set the {var_name} environment variable."
        ))),
    }
}
