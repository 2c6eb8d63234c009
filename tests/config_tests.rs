use reqscribe::config::{API_KEY_ENV, API_KEY_ENV_FALLBACK, DEFAULT_MODEL};
use reqscribe::{Config, ReqscribeError, RequirementsClient, ViewMode};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let config = Config::load_from(&dir.path().join("config.toml")).expect("defaults load");

    assert_eq!(config, Config::default());
    assert_eq!(config.model, DEFAULT_MODEL);
    assert_eq!(config.timeout_seconds, 120);
    assert_eq!(config.default_view, ViewMode::Rendered);
}

#[test]
fn test_save_and_reload() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let path = dir.path().join("config.toml");

    let mut config = Config::default();
    let changed = config.update(
        Some("file-key".to_string()),
        Some("gemini-2.5-pro".to_string()),
        None,
        Some(30),
        Some(ViewMode::Csv),
    );
    assert!(changed);
    config.output_dir = Some(PathBuf::from("/tmp/specs"));
    config.save_to(&path).expect("config saves");

    let reloaded = Config::load_from(&path).expect("config reloads");
    assert_eq!(reloaded, config);

    let raw = fs::read_to_string(&path).expect("read config file");
    assert!(raw.contains("default_view = \"csv\""));
}

#[test]
fn test_update_without_changes_reports_false() {
    let mut config = Config::default();
    assert!(!config.update(None, Some(DEFAULT_MODEL.to_string()), None, None, None));
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let path = dir.path().join("config.toml");
    fs::write(&path, "model = \"gemini-2.0-flash\"\n").expect("write config");

    let config = Config::load_from(&path).expect("partial config loads");
    assert_eq!(config.model, "gemini-2.0-flash");
    assert_eq!(config.base_url, Config::default().base_url);
    assert!(config.api_key.is_empty());
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let path = dir.path().join("config.toml");
    fs::write(&path, "model = [unterminated").expect("write config");

    let err = Config::load_from(&path).expect_err("bad TOML fails");
    assert!(err.to_string().contains("Invalid configuration file format"));
}

#[test]
fn test_environment_key_takes_precedence() {
    let mut config = Config {
        api_key: "from-file".to_string(),
        ..Config::default()
    };
    config.apply_env(env_of(&[(API_KEY_ENV, " from-env ")]));
    assert_eq!(config.api_key, "from-env");
}

#[test]
fn test_fallback_variable_is_used_when_primary_is_blank() {
    let mut config = Config::default();
    config.apply_env(env_of(&[
        (API_KEY_ENV, "  "),
        (API_KEY_ENV_FALLBACK, "google-key"),
    ]));
    assert_eq!(config.api_key, "google-key");

    let mut untouched = Config {
        api_key: "from-file".to_string(),
        ..Config::default()
    };
    untouched.apply_env(env_of(&[]));
    assert_eq!(untouched.api_key, "from-file");
}

#[test]
fn test_missing_key_is_fatal_configuration_error() {
    let config = Config::default();
    let err = config.validate().expect_err("no key is invalid");
    assert!(matches!(err, ReqscribeError::Configuration(_)));
    assert!(err.is_fatal());

    let Err(err) = RequirementsClient::from_config(&config) else {
        panic!("client needs a key");
    };
    assert!(err.is_fatal());
}

#[test]
fn test_invalid_base_url_and_timeout_are_rejected() {
    let config = Config {
        api_key: "key".to_string(),
        base_url: "not a url".to_string(),
        ..Config::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ReqscribeError::Configuration(_))
    ));

    let config = Config {
        api_key: "key".to_string(),
        timeout_seconds: 0,
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_valid_config_builds_client() {
    let config = Config {
        api_key: "key".to_string(),
        ..Config::default()
    };
    let client = RequirementsClient::from_config(&config).expect("client builds");
    assert_eq!(client.provider_name(), "Gemini");

    let provider = config.provider_config().expect("provider config");
    assert_eq!(provider.timeout.as_secs(), 120);
}

#[test]
fn test_masked_api_key_shows_last_four() {
    let config = Config {
        api_key: "abcdefgh1234".to_string(),
        ..Config::default()
    };
    assert_eq!(config.masked_api_key(), "********1234");
    assert_eq!(Config::default().masked_api_key(), "(not set)");
}
