use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_PAGE_SIZE;

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Where the catalog service lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Service root, shared by the catalog and collections endpoints.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Path of the paginated exhibit listing, relative to `api_base`.
    #[serde(default = "default_exhibits_path")]
    pub exhibits_path: String,
    /// Exhibits per page (default: 20).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

/// HTTP transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
    /// Total request timeout in seconds. Unset means no extra limit.
    #[serde(default)]
    pub request_timeout_seconds: Option<u32>,
}

/// What the exhibit list shows while a new page is loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaleItems {
    /// Previous items stay visible until the new page commits.
    #[default]
    Keep,
    /// Items are emptied as soon as a new fetch is dispatched.
    Clear,
}

/// Listing behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub stale_items: StaleItems,
    /// Delay before a search-text edit is dispatched, in milliseconds (default: 0).
    #[serde(default)]
    pub search_debounce_ms: u64,
}

/// Credentials for the collections endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Bearer token. Takes precedence over `token_env_var`.
    #[serde(default)]
    pub token: Option<String>,
    /// Environment variable consulted when `token` is unset.
    #[serde(default = "default_token_env_var")]
    pub token_env_var: String,
}

fn default_api_base() -> String {
    "https://museum-curator-backend.onrender.com".to_string()
}

fn default_exhibits_path() -> String {
    "/api/exhibits".to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_token_env_var() -> String {
    "CURATOR_TOKEN".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            exhibits_path: default_exhibits_path(),
            page_size: default_page_size(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_seconds: default_connect_timeout(),
            request_timeout_seconds: None,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token: None,
            token_env_var: default_token_env_var(),
        }
    }
}
