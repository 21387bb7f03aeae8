use clap::Parser;
use mediashelf_lib::application::env::EnvironmentConfig;
use mediashelf_lib::application::{AppConfig, Cli, Commands};
use mediashelf_lib::primitives::{ColorIntent, ConfigError, LogFormat, MediaKind};
use std::path::PathBuf;

fn resolve(args: &[&str], env: &EnvironmentConfig) -> Result<(AppConfig, Option<Commands>), ConfigError> {
    let cli = Cli::try_parse_from(args).expect("arguments should parse");
    let config = AppConfig::resolve_with_env(cli.config, env)?;
    Ok((config, cli.command))
}

#[test]
fn test_config_default_creation() {
    let config = AppConfig::default();

    assert!(config.log_level <= 4);
    assert!(config.net_timeout > 0);
    assert_eq!(config.undo_window, 30);
    assert_eq!(config.color, ColorIntent::Auto);
}

#[test]
fn test_cli_flags_reach_the_resolved_config() {
    let (config, command) = resolve(
        &[
            "mediashelf",
            "--data-dir",
            "/tmp/shelf",
            "--user",
            "ana",
            "--jobs",
            "2",
            "--undo-window",
            "90",
            "--log-format",
            "json",
            "search",
            "anime",
            "cowboy",
            "bebop",
        ],
        &EnvironmentConfig::default(),
    )
    .unwrap();

    assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/shelf")));
    assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/shelf/cache")));
    assert_eq!(config.user, "ana");
    assert_eq!(config.jobs, Some(2));
    assert_eq!(config.restore_window().num_seconds(), 90);
    assert_eq!(config.log_format, LogFormat::Json);

    match command {
        Some(Commands::Search { kind, query }) => {
            assert_eq!(kind, MediaKind::Anime);
            assert_eq!(query.join(" "), "cowboy bebop");
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_environment_color_yields_to_cli() {
    let env = EnvironmentConfig {
        no_color: Some("1".to_string()),
        ..EnvironmentConfig::default()
    };

    let (config, _) = resolve(&["mediashelf", "--data-dir", "/tmp/shelf"], &env).unwrap();
    assert_eq!(config.color, ColorIntent::Never);

    let (config, _) = resolve(
        &["mediashelf", "--data-dir", "/tmp/shelf", "--color", "always"],
        &env,
    )
    .unwrap();
    assert_eq!(config.color, ColorIntent::Always);
}

#[test]
fn test_invalid_user_is_rejected() {
    let result = resolve(
        &["mediashelf", "--data-dir", "/tmp/shelf", "--user", "../etc"],
        &EnvironmentConfig::default(),
    );

    assert!(matches!(result, Err(ConfigError::ValidationFailed { .. })));
}
