//! Configuration loading and the auth context.

mod credentials;
mod loader;
mod types;

pub use credentials::{AuthContext, SecureString};
pub use loader::ConfigError;
pub use types::{AuthConfig, CatalogConfig, Config, HttpConfig, StaleItems, ViewConfig};
