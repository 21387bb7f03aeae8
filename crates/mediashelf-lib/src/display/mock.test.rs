use super::*;

#[test]
fn test_records_status_calls_in_order() {
    let display = MockDisplayProvider::new();

    display.status().success("Added", "Dune");
    display.status().warning("cache only");

    assert_eq!(
        display.get_calls(),
        vec![
            DisplayCall::StatusSuccess {
                item: "Added".to_string(),
                details: "Dune".to_string(),
            },
            DisplayCall::StatusWarning {
                message: "cache only".to_string(),
            },
        ]
    );
    assert_eq!(display.count_calls("status_success"), 1);
}

#[test]
fn test_clones_share_recording() {
    let display = MockDisplayProvider::new();
    let other = display.clone();

    DisplayProvider::table(&other).properties(&[("Kind", "movie")]);

    assert!(display.shows("Kind movie"));
    display.clear_calls();
    assert!(other.get_calls().is_empty());
}

#[test]
fn test_table_text_includes_rows() {
    let display = MockDisplayProvider::new();

    DisplayProvider::table(&display).table(&["Title"], &[vec!["The Wire".to_string()]]);

    assert!(display.shows("The Wire"));
    assert!(!display.shows("Mad Men"));
}
