use std::collections::HashMap;
use std::time::Duration;

use peerban_config::defaults::{
    ENV_BAD_PREFIXES, ENV_BASE_URL, ENV_LOG_FORMAT, ENV_LOG_LEVEL, ENV_PASSWORD, ENV_RESET_INTERVAL,
    ENV_RETRY_ATTEMPTS, ENV_SCAN_INTERVAL, ENV_USERNAME, MAX_RESET_INTERVAL_SECS,
};
use peerban_config::{ConfigError, ConfigLoader};

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect()
}

fn required() -> Vec<(&'static str, &'static str)> {
    vec![
        (ENV_BASE_URL, "http://qbittorrent:8080"),
        (ENV_USERNAME, "admin"),
        (ENV_PASSWORD, "hunter2"),
    ]
}

#[test]
fn loads_defaults_when_only_required_values_are_set() -> anyhow::Result<()> {
    let vars = env(&required());
    let config = ConfigLoader::new(|name| vars.get(name).cloned()).load()?;

    assert_eq!(config.api.base_url.as_str(), "http://qbittorrent:8080/");
    assert_eq!(config.api.username, "admin");
    assert_eq!(config.schedule.scan_interval, Duration::from_secs(10));
    assert_eq!(config.schedule.reset_interval, Duration::from_secs(21_600));
    assert_eq!(config.retry.attempts, 5);
    assert_eq!(config.retry.delay, Duration::from_secs(2));
    assert_eq!(config.http_timeout, Duration::from_secs(10));
    assert!(config.bad_client_prefixes.is_none());
    Ok(())
}

#[test]
fn each_required_variable_is_enforced() {
    for missing in [ENV_BASE_URL, ENV_USERNAME, ENV_PASSWORD] {
        let pairs: Vec<_> = required()
            .into_iter()
            .filter(|(key, _)| *key != missing)
            .collect();
        let vars = env(&pairs);
        let err = ConfigLoader::new(|name| vars.get(name).cloned())
            .load()
            .expect_err("missing variable should fail");
        assert!(matches!(err, ConfigError::MissingEnv { name } if name == missing));
    }
}

#[test]
fn blank_values_count_as_missing() {
    let mut pairs = required();
    pairs.push((ENV_PASSWORD, "   "));
    let vars = env(&pairs);
    let err = ConfigLoader::new(|name| vars.get(name).cloned())
        .load()
        .expect_err("blank password should fail");
    assert!(matches!(err, ConfigError::MissingEnv { name } if name == ENV_PASSWORD));
}

#[test]
fn overrides_are_parsed() -> anyhow::Result<()> {
    let mut pairs = required();
    pairs.push((ENV_SCAN_INTERVAL, "3"));
    pairs.push((ENV_RETRY_ATTEMPTS, "2"));
    pairs.push((ENV_BAD_PREFIXES, "-XL0012,-BN"));
    let vars = env(&pairs);
    let config = ConfigLoader::new(|name| vars.get(name).cloned()).load()?;

    assert_eq!(config.schedule.scan_interval, Duration::from_secs(3));
    assert_eq!(config.retry.attempts, 2);
    assert_eq!(
        config.bad_client_prefixes,
        Some(vec!["-XL0012".to_string(), "-BN".to_string()])
    );
    Ok(())
}

#[test]
fn invalid_interval_names_the_field() {
    let mut pairs = required();
    pairs.push((ENV_SCAN_INTERVAL, "often"));
    let vars = env(&pairs);
    let err = ConfigLoader::new(|name| vars.get(name).cloned())
        .load()
        .expect_err("non-numeric interval should fail");
    assert!(matches!(
        err,
        ConfigError::InvalidField {
            field,
            reason: "not_an_integer",
            ..
        } if field == ENV_SCAN_INTERVAL
    ));
}

#[test]
fn reset_interval_is_bounded() -> anyhow::Result<()> {
    for raw in ["59", "604801", "18446744073709551615"] {
        let mut pairs = required();
        pairs.push((ENV_RESET_INTERVAL, raw));
        let vars = env(&pairs);
        let err = ConfigLoader::new(|name| vars.get(name).cloned())
            .load()
            .expect_err("reset interval outside bounds should fail");
        let ConfigError::InvalidField { field, reason, .. } = err else {
            anyhow::bail!("expected an invalid field for {raw}");
        };
        assert_eq!(field, ENV_RESET_INTERVAL);
        assert_eq!(reason, "out_of_range");
    }

    let mut pairs = required();
    pairs.push((ENV_RESET_INTERVAL, "604800"));
    let vars = env(&pairs);
    let config = ConfigLoader::new(|name| vars.get(name).cloned()).load()?;
    assert_eq!(
        config.schedule.reset_interval,
        Duration::from_secs(MAX_RESET_INTERVAL_SECS)
    );
    Ok(())
}

#[test]
fn password_is_redacted_from_debug_output() -> anyhow::Result<()> {
    let vars = env(&required());
    let config = ConfigLoader::new(|name| vars.get(name).cloned()).load()?;
    let rendered = format!("{config:?}");
    assert!(!rendered.contains("hunter2"));
    assert!(rendered.contains("<redacted>"));
    Ok(())
}

#[test]
fn log_settings_fall_back_with_notice() {
    let vars = env(&[(ENV_LOG_LEVEL, "chatty"), (ENV_LOG_FORMAT, "json")]);
    let settings = ConfigLoader::new(|name| vars.get(name).cloned()).log_settings();
    assert_eq!(settings.level, "info");
    assert_eq!(settings.format.as_deref(), Some("json"));
    assert!(
        settings
            .fallback_notice
            .as_deref()
            .is_some_and(|notice| notice.contains("chatty"))
    );

    let vars = env(&[(ENV_LOG_LEVEL, "Debug")]);
    let settings = ConfigLoader::new(|name| vars.get(name).cloned()).log_settings();
    assert_eq!(settings.level, "debug");
    assert!(settings.format.is_none());
    assert!(settings.fallback_notice.is_none());
}
