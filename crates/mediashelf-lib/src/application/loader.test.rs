use super::*;
use crate::primitives::{ColorIntent, LogFormat};
use std::path::PathBuf;

fn cli_with_data_dir() -> AppConfig {
    AppConfig {
        data_dir: Some(PathBuf::from("/tmp/mediashelf-test")),
        ..AppConfig::default()
    }
}

#[test]
fn test_config_loading_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.user, "default");
    assert_eq!(config.log_level, 0);
    assert_eq!(config.net_timeout, 15);
    assert_eq!(config.undo_window, 30);
    assert_eq!(config.color, ColorIntent::Auto);
    assert_eq!(config.jobs, None);
}

#[test]
fn test_config_merging() {
    let base = AppConfig::default();
    let override_config = AppConfig {
        log_level: 4,
        color: ColorIntent::Always,
        jobs: Some(16),
        user: "ana".to_string(),
        ..AppConfig::default()
    };

    let merged = base.merge_with(override_config);
    assert_eq!(merged.log_level, 4);
    assert_eq!(merged.color, ColorIntent::Always);
    assert_eq!(merged.jobs, Some(16));
    assert_eq!(merged.user, "ana");
    assert_eq!(merged.net_timeout, 15);
}

#[test]
fn test_merge_keeps_base_when_other_is_default() {
    let base = AppConfig {
        log_format: LogFormat::Json,
        tmdb_api_key: Some("key".to_string()),
        ..AppConfig::default()
    };

    let merged = base.merge_with(AppConfig::default());
    assert_eq!(merged.log_format, LogFormat::Json);
    assert_eq!(merged.tmdb_api_key.as_deref(), Some("key"));
}

#[test]
fn test_validate_rejects_zero_jobs() {
    let mut config = AppConfig {
        jobs: Some(0),
        ..cli_with_data_dir()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationFailed { .. })
    ));
}

#[test]
fn test_validate_rejects_zero_timeout() {
    let mut config = AppConfig {
        net_timeout: 0,
        ..cli_with_data_dir()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_path_like_user() {
    let mut config = AppConfig {
        user: "../etc".to_string(),
        ..cli_with_data_dir()
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("../etc"));
}

#[test]
fn test_validate_clears_blank_keys_and_derives_cache_dir() {
    let mut config = AppConfig {
        tmdb_api_key: Some("   ".to_string()),
        rawg_api_key: Some("rawg".to_string()),
        ..cli_with_data_dir()
    };

    config.validate().unwrap();
    assert_eq!(config.tmdb_api_key, None);
    assert_eq!(config.rawg_api_key.as_deref(), Some("rawg"));
    assert_eq!(
        config.cache_dir,
        Some(PathBuf::from("/tmp/mediashelf-test/cache"))
    );
}

#[test]
fn test_restore_window_uses_seconds() {
    let config = AppConfig {
        undo_window: 45,
        ..AppConfig::default()
    };
    assert_eq!(config.restore_window(), chrono::TimeDelta::seconds(45));
}

#[test]
fn test_resolve_applies_environment_color() {
    let env_config = EnvironmentConfig {
        no_color: Some("1".to_string()),
        ..EnvironmentConfig::default()
    };

    let config = AppConfig::resolve_with_env(cli_with_data_dir(), &env_config).unwrap();
    assert_eq!(config.color, ColorIntent::Never);
}

#[test]
fn test_resolve_cli_color_beats_environment() {
    let env_config = EnvironmentConfig {
        no_color: Some("1".to_string()),
        ..EnvironmentConfig::default()
    };
    let cli = AppConfig {
        color: ColorIntent::Always,
        ..cli_with_data_dir()
    };

    let config = AppConfig::resolve_with_env(cli, &env_config).unwrap();
    assert_eq!(config.color, ColorIntent::Always);
}

#[test]
fn test_resolve_propagates_validation_errors() {
    let cli = AppConfig {
        jobs: Some(0),
        ..cli_with_data_dir()
    };
    assert!(AppConfig::resolve_with_env(cli, &EnvironmentConfig::default()).is_err());
}
