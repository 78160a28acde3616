mod common;

use std::time::Duration;

use common::temp_config;
use curator::catalog::ClientSettings;
use curator::config::{AuthContext, Config, ConfigError, StaleItems};
use curator::controller::ViewOptions;

/// Test that Config::default() produces the expected values.
#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert_eq!(
        config.catalog.api_base,
        "https://museum-curator-backend.onrender.com"
    );
    assert_eq!(config.catalog.exhibits_path, "/api/exhibits");
    assert_eq!(config.catalog.page_size, 20);
    assert_eq!(config.http.connect_timeout_seconds, 5);
    assert_eq!(config.http.request_timeout_seconds, None);
    assert_eq!(config.view.stale_items, StaleItems::Keep);
    assert_eq!(config.view.search_debounce_ms, 0);
    assert_eq!(config.auth.token, None);
    assert_eq!(config.auth.token_env_var, "CURATOR_TOKEN");
}

#[test]
fn test_config_path_ends_with_expected() {
    let path = Config::config_path();
    assert!(path.ends_with("museum-curator/config.toml"));
}

#[test]
fn test_full_config_file() {
    let (_dir, path) = temp_config(
        r#"
[catalog]
api_base = "http://localhost:3000/v1"
page_size = 12

[http]
connect_timeout_seconds = 2
request_timeout_seconds = 10

[view]
stale_items = "clear"
search_debounce_ms = 300

[auth]
token = "abc"
"#,
    );

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.catalog.api_base, "http://localhost:3000/v1");
    assert_eq!(config.catalog.exhibits_path, "/api/exhibits");
    assert_eq!(config.catalog.page_size, 12);
    assert_eq!(config.view.stale_items, StaleItems::Clear);

    let settings = ClientSettings::from_config(&config);
    assert_eq!(settings.connect_timeout, Duration::from_secs(2));
    assert_eq!(settings.request_timeout, Some(Duration::from_secs(10)));

    let options = ViewOptions::from_config(&config);
    assert_eq!(options.initial_query.page_size(), 12);
    assert_eq!(options.search_debounce, Duration::from_millis(300));

    assert!(AuthContext::resolve(&config.auth).is_authenticated());
}

#[test]
fn test_partial_config_keeps_defaults() {
    let (_dir, path) = temp_config("[view]\nsearch_debounce_ms = 150\n");

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.view.search_debounce_ms, 150);
    assert_eq!(config.view.stale_items, StaleItems::Keep);
    assert_eq!(config.catalog.page_size, 20);
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let (_dir, path) = temp_config("[catalog\napi_base = ");

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn test_unknown_stale_items_value_is_parse_error() {
    let (_dir, path) = temp_config("[view]\nstale_items = \"fade\"\n");

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn test_file_failing_validation_is_rejected() {
    let (_dir, path) = temp_config("[catalog]\npage_size = 0\n");

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError { .. }));
    assert!(err.to_string().contains("page_size"));
}

#[test]
fn test_directory_path_is_read_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = Config::load_from(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ReadError { .. }));
}
