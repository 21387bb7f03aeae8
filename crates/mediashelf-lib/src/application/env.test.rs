use super::*;

fn env(pairs: &[(&str, &str)]) -> EnvironmentConfig {
    let mut config = EnvironmentConfig::default();
    for (key, value) in pairs {
        let value = Some(value.to_string());
        match *key {
            "NO_COLOR" => config.no_color = value,
            "FORCE_COLOR" => config.force_color = value,
            "CLICOLOR" => config.clicolor = value,
            "CI" => config.ci = value,
            "TERM" => config.term = value,
            other => panic!("unexpected variable {other}"),
        }
    }
    config
}

#[test]
fn test_empty_environment_keeps_intent() {
    for intent in [ColorIntent::Auto, ColorIntent::Always, ColorIntent::Never] {
        assert_eq!(env(&[]).apply_color_config(intent), intent);
    }
}

#[test]
fn test_no_color_disables() {
    assert_eq!(
        env(&[("NO_COLOR", "1")]).apply_color_config(ColorIntent::Auto),
        ColorIntent::Never
    );
}

#[test]
fn test_empty_no_color_is_ignored() {
    assert_eq!(
        env(&[("NO_COLOR", "")]).apply_color_config(ColorIntent::Auto),
        ColorIntent::Auto
    );
}

#[test]
fn test_clicolor_zero_disables() {
    assert_eq!(
        env(&[("CLICOLOR", "0")]).apply_color_config(ColorIntent::Always),
        ColorIntent::Never
    );
    assert_eq!(
        env(&[("CLICOLOR", "1")]).apply_color_config(ColorIntent::Auto),
        ColorIntent::Auto
    );
}

#[test]
fn test_ci_and_dumb_terminal_disable() {
    assert_eq!(
        env(&[("CI", "true")]).apply_color_config(ColorIntent::Auto),
        ColorIntent::Never
    );
    assert_eq!(
        env(&[("TERM", "dumb")]).apply_color_config(ColorIntent::Auto),
        ColorIntent::Never
    );
}

#[test]
fn test_force_color_wins() {
    let config = env(&[
        ("CLICOLOR", "0"),
        ("NO_COLOR", "1"),
        ("CI", "1"),
        ("FORCE_COLOR", "1"),
    ]);

    assert_eq!(config.apply_color_config(ColorIntent::Auto), ColorIntent::Always);
}

#[test]
fn test_force_color_zero_disables() {
    assert_eq!(
        env(&[("FORCE_COLOR", "false")]).apply_color_config(ColorIntent::Always),
        ColorIntent::Never
    );
}

#[test]
fn test_invalid_force_color_is_ignored() {
    assert_eq!(
        env(&[("FORCE_COLOR", "maybe")]).apply_color_config(ColorIntent::Auto),
        ColorIntent::Auto
    );
}

#[test]
fn test_load_reads_process_environment() {
    assert!(EnvironmentConfig::load().is_ok());
}
