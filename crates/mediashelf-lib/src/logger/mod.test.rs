use super::*;

#[test]
fn test_default_filter_scopes_levels() {
    let filter = default_filter(LogLevel::Debug);

    assert!(filter.starts_with("mediashelf_lib=debug,mediashelf=debug"));
    assert!(filter.contains("reqwest=warn"));
    assert!(filter.contains("hyper_util=warn"));
    assert!(filter.ends_with(",debug"));
}

#[test]
fn test_default_filter_parses() {
    for level in [
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ] {
        assert!(
            default_filter(level).parse::<EnvFilter>().is_ok(),
            "{level:?} filter should parse"
        );
    }
}

#[test]
fn test_progress_span_macro_builds_spans() {
    let plain = crate::progress_span!("enrich");
    let counted = crate::progress_span!("enrich", total = 12usize);

    // no subscriber in unit tests, so both spans are disabled but valid
    drop(plain);
    drop(counted);
}

#[test]
fn test_logger_not_initialized_initially() {
    // Another test in this binary may have installed a subscriber
    assert!(!Logger::is_initialized() || Logger::global().is_some());
}

#[test]
fn test_second_init_is_rejected() {
    let config = LoggerConfig {
        level: LogLevel::Error,
        format: LogFormat::Text,
        output: LogOutput::Stderr,
        color: false,
    };

    // The first call may lose to another test in this binary
    let _ = Logger::init(config.clone());

    assert!(Logger::is_initialized());
    assert!(matches!(
        Logger::init(config),
        Err(LoggerError::AlreadyInitialized)
    ));
}
