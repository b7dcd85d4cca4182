use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
}

/// Where the data and fragment endpoints live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every request path is resolved against (e.g., "http://127.0.0.1:3000/").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Tax records collection (e.g., "/api/taxes").
    #[serde(default = "default_taxes_path")]
    pub taxes_path: String,
    /// Todo list collection (e.g., "/todos").
    #[serde(default = "default_todos_path")]
    pub todos_path: String,
    /// Directory holding `<name>.html` fragments, relative to the base URL.
    #[serde(default = "default_fragments_path")]
    pub fragments_path: String,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
}

/// Persistent template store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Keep fetched templates on disk between runs (default: true).
    #[serde(default = "default_persist")]
    pub persist: bool,
    /// Override for the store file location.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Dispatcher behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Drop handler results that finish after a newer navigation began (default: true).
    #[serde(default = "default_discard_stale")]
    pub discard_stale: bool,
    /// What the user sees when a view handler fails.
    #[serde(default)]
    pub on_failure: FailurePolicy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log the failure and leave the previous view on screen.
    #[default]
    KeepPrevious,
    /// Replace the content with an error view. History is left alone.
    RenderError,
}

fn default_base_url() -> String {
    "http://127.0.0.1:3000/".to_string()
}

fn default_taxes_path() -> String {
    "/api/taxes".to_string()
}

fn default_todos_path() -> String {
    "/todos".to_string()
}

fn default_fragments_path() -> String {
    "fragments".to_string()
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_persist() -> bool {
    true
}

fn default_discard_stale() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            taxes_path: default_taxes_path(),
            todos_path: default_todos_path(),
            fragments_path: default_fragments_path(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            persist: default_persist(),
            path: None,
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            discard_stale: default_discard_stale(),
            on_failure: FailurePolicy::default(),
        }
    }
}

impl CacheConfig {
    /// Store file location: the configured override, or
    /// `<data_dir>/taxview/templates.json`.
    pub fn store_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }
        let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        data_dir.join("taxview").join("templates.json")
    }
}
