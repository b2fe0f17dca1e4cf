use clap::Parser;
use gchat_relay::cli::Cli;
use gchat_relay::config::{Config, ConfigError};
use serial_test::serial;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// A helper function to run a test with a temporary config file.
fn with_config_file<F>(toml_content: &str, test_fn: F)
where
    F: FnOnce(PathBuf),
{
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", toml_content).unwrap();
    let path = file.path().to_path_buf();
    test_fn(path);
}

/// Clears every variable the loader reads so tests start from a clean slate.
fn clear_env() {
    for key in [
        "WEBHOOK_URL",
        "GCHAT_RELAY_LOG_LEVEL",
        "GCHAT_RELAY_WEBHOOK__URL",
        "GCHAT_RELAY_WEBHOOK__TIMEOUT_MS",
        "GCHAT_RELAY_SERVER__LISTEN_ADDRESS",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_defaults_without_sources() {
    clear_env();
    let cli = Cli::try_parse_from(["gchat-relay"]).unwrap();
    let config = Config::load(&cli).unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.server.listen_address.to_string(), "0.0.0.0:8080");
    assert!(!config.has_webhook_url());
    assert!(!config.metrics.enabled);
}

#[test]
#[serial]
fn test_load_full_valid_config() {
    clear_env();
    let toml_content = r#"
        log_level = "debug"
        [server]
        listen_address = "127.0.0.1:3000"
        [webhook]
        url = "https://chat.googleapis.com/v1/spaces/AAA/messages?key=k&token=t"
        timeout_ms = 5000
        [metrics]
        enabled = true
        listen_address = "127.0.0.1:9100"
    "#;

    with_config_file(toml_content, |path| {
        let cli = Cli::try_parse_from(["gchat-relay", "--config", path.to_str().unwrap()]).unwrap();
        let config = Config::load(&cli).unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.server.listen_address.to_string(), "127.0.0.1:3000");
        assert_eq!(
            config.webhook.url,
            "https://chat.googleapis.com/v1/spaces/AAA/messages?key=k&token=t"
        );
        assert_eq!(config.webhook.timeout_ms, Some(5000));
        assert!(config.metrics.enabled);
        assert_eq!(config.metrics.listen_address.to_string(), "127.0.0.1:9100");
    });
}

#[test]
#[serial]
fn test_webhook_url_env_overrides_file() {
    clear_env();
    let toml_content = r#"
        [webhook]
        url = "https://from-file.example/hook"
    "#;

    with_config_file(toml_content, |path| {
        std::env::set_var("WEBHOOK_URL", "https://from-env.example/hook");
        let cli = Cli::try_parse_from(["gchat-relay", "--config", path.to_str().unwrap()]).unwrap();
        let config = Config::load(&cli).unwrap();
        clear_env();

        assert_eq!(config.webhook.url, "https://from-env.example/hook");
    });
}

#[test]
#[serial]
fn test_prefixed_env_and_cli_precedence() {
    clear_env();
    std::env::set_var("GCHAT_RELAY_LOG_LEVEL", "warn");
    std::env::set_var("GCHAT_RELAY_SERVER__LISTEN_ADDRESS", "127.0.0.1:4000");
    std::env::set_var("WEBHOOK_URL", "https://from-env.example/hook");

    let cli = Cli::try_parse_from([
        "gchat-relay",
        "--listen-address",
        "127.0.0.1:5000",
        "--webhook-url",
        "https://from-cli.example/hook",
    ])
    .unwrap();
    let config = Config::load(&cli);
    clear_env();
    let config = config.unwrap();

    assert_eq!(config.log_level, "warn");
    assert_eq!(config.server.listen_address.to_string(), "127.0.0.1:5000");
    assert_eq!(config.webhook.url, "https://from-cli.example/hook");
}

#[test]
#[serial]
fn test_invalid_value_type() {
    clear_env();
    let toml_content = r#"
        [server]
        listen_address = "not an address"
    "#;

    with_config_file(toml_content, |path| {
        let cli = Cli::try_parse_from(["gchat-relay", "--config", path.to_str().unwrap()]).unwrap();
        let config_result = Config::load(&cli);
        assert!(matches!(config_result, Err(ConfigError::Figment(_))));
    });
}

#[test]
#[serial]
fn test_non_existent_config_file() {
    clear_env();
    let non_existent_path = PathBuf::from("/path/to/non/existent/config.toml");
    let cli = Cli::try_parse_from([
        "gchat-relay",
        "--config",
        non_existent_path.to_str().unwrap(),
    ])
    .unwrap();
    let config_result = Config::load(&cli);
    assert!(config_result.is_err());
    let error_string = config_result.unwrap_err().to_string();
    assert!(error_string.contains("Config file not found at specified path"));
}
