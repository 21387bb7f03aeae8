use super::*;
use std::error::Error;

// =============================================================================
// LEVEL A: EXHAUSTIVE DATA TYPE TESTING
// =============================================================================

macro_rules! test_enum_completeness {
    ($enum_type:ty, $test_name:ident) => {
        #[test]
        fn $test_name() {
            // Test all variants are constructible and round-trip correctly
            for variant in <$enum_type>::value_variants() {
                // Test Debug doesn't panic and produces output
                let debug_str = format!("{:?}", variant);
                assert!(!debug_str.is_empty(), "Debug output should not be empty");

                // Test clap PossibleValue generation
                let possible_value = variant.to_possible_value();
                assert!(
                    possible_value.is_some(),
                    "PossibleValue should exist for all variants"
                );

                // Test round-trip through primary name
                let possible_val = possible_value.unwrap();
                let primary_name = possible_val.get_name();
                let parsed: Result<$enum_type, _> = primary_name.parse();
                assert!(
                    parsed.is_ok(),
                    "Primary name '{}' should parse correctly",
                    primary_name
                );
                assert_eq!(
                    parsed.unwrap(),
                    *variant,
                    "Round-trip should preserve variant"
                );
            }
        }
    };
}

macro_rules! test_fromstr_aliases {
    ($enum_type:ty, $test_name:ident, $expected_mappings:expr) => {
        #[test]
        fn $test_name() {
            let mappings: &[(&str, $enum_type)] = &$expected_mappings;

            for (input, expected) in mappings {
                let parsed: Result<$enum_type, _> = input.parse();
                assert!(
                    parsed.is_ok(),
                    "Failed to parse '{}' for {}",
                    input,
                    stringify!($enum_type)
                );
                assert_eq!(
                    parsed.unwrap(),
                    *expected,
                    "Wrong variant for input '{}', expected {:?}",
                    input,
                    expected
                );
            }
        }
    };
}

// Generate exhaustive tests for all ValueEnum types
test_enum_completeness!(LogLevel, test_log_level_completeness);
test_enum_completeness!(LogFormat, test_log_format_completeness);
test_enum_completeness!(LogOutput, test_log_output_completeness);
test_enum_completeness!(ColorIntent, test_color_intent_completeness);
test_enum_completeness!(MediaKind, test_media_kind_completeness);
test_enum_completeness!(WatchStatus, test_watch_status_completeness);

// Test all documented aliases work correctly
test_fromstr_aliases!(
    LogLevel,
    test_log_level_aliases,
    [
        ("error", LogLevel::Error),
        ("err", LogLevel::Error),
        ("fatal", LogLevel::Error),
        ("critical", LogLevel::Error),
        ("warn", LogLevel::Warning),
        ("warning", LogLevel::Warning),
        ("info", LogLevel::Info),
        ("information", LogLevel::Info),
        ("debug", LogLevel::Debug),
        ("debugging", LogLevel::Debug),
        ("trace", LogLevel::Trace),
        ("tracing", LogLevel::Trace),
        ("verbose", LogLevel::Trace),
    ]
);

test_fromstr_aliases!(
    LogFormat,
    test_log_format_aliases,
    [
        ("text", LogFormat::Text),
        ("txt", LogFormat::Text),
        ("plain", LogFormat::Text),
        ("json", LogFormat::Json),
        ("yaml", LogFormat::Yaml),
        ("yml", LogFormat::Yaml),
    ]
);

test_fromstr_aliases!(
    LogOutput,
    test_log_output_aliases,
    [("stderr", LogOutput::Stderr), ("stdout", LogOutput::Stdout),]
);

test_fromstr_aliases!(
    ColorIntent,
    test_color_intent_aliases,
    [
        ("auto", ColorIntent::Auto),
        ("automatic", ColorIntent::Auto),
        ("detect", ColorIntent::Auto),
        ("always", ColorIntent::Always),
        ("force", ColorIntent::Always),
        ("on", ColorIntent::Always),
        ("never", ColorIntent::Never),
        ("off", ColorIntent::Never),
    ]
);

test_fromstr_aliases!(
    MediaKind,
    test_media_kind_aliases,
    [
        ("movie", MediaKind::Movie),
        ("film", MediaKind::Movie),
        ("tv", MediaKind::Tv),
        ("show", MediaKind::Tv),
        ("series", MediaKind::Tv),
        ("anime", MediaKind::Anime),
        ("manga", MediaKind::Manga),
        ("book", MediaKind::Book),
        ("game", MediaKind::Game),
    ]
);

test_fromstr_aliases!(
    WatchStatus,
    test_watch_status_aliases,
    [
        ("planned", WatchStatus::Planned),
        ("backlog", WatchStatus::Planned),
        ("in-progress", WatchStatus::InProgress),
        ("in_progress", WatchStatus::InProgress),
        ("watching", WatchStatus::InProgress),
        ("dropped", WatchStatus::Dropped),
        ("completed", WatchStatus::Completed),
    ]
);

// =============================================================================
// LEVEL B: COMPLEX IMPLEMENTATION BEHAVIORS/VALIDATIONS
// =============================================================================

#[test]
fn test_log_level_from_verbosity_boundary_conditions() {
    assert_eq!(LogLevel::from_verbosity(0), LogLevel::Error);
    assert_eq!(LogLevel::from_verbosity(1), LogLevel::Warning);
    assert_eq!(LogLevel::from_verbosity(2), LogLevel::Info);
    assert_eq!(LogLevel::from_verbosity(3), LogLevel::Debug);
    assert_eq!(LogLevel::from_verbosity(4), LogLevel::Trace);

    // 4.. maps to Trace
    assert_eq!(LogLevel::from_verbosity(5), LogLevel::Trace);
    assert_eq!(LogLevel::from_verbosity(u8::MAX), LogLevel::Trace);
}

#[test]
fn test_log_level_filter_directives() {
    assert_eq!(LogLevel::Warning.as_filter(), "warn");
    assert_eq!(LogLevel::Trace.as_filter(), "trace");
}

#[test]
fn test_color_intent_explicit_resolution() {
    assert!(ColorIntent::Always.resolve());
    assert!(!ColorIntent::Never.resolve());
}

#[test]
fn test_invalid_value_reports_parse_error() {
    let err = "podcast".parse::<MediaKind>().unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
    assert!(err.to_string().contains("podcast"));
    assert!(err.source().is_none());
}

#[test]
fn test_data_types_are_copy() {
    fn assert_copy<T: Copy>() {}

    assert_copy::<LogLevel>();
    assert_copy::<LogFormat>();
    assert_copy::<LogOutput>();
    assert_copy::<ColorIntent>();
    assert_copy::<MediaKind>();
    assert_copy::<WatchStatus>();
    assert_copy::<ProviderIds>();
}
