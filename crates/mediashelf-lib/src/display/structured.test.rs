use super::*;

#[test]
fn test_table_aligns_columns() {
    let styling = StyleManager::plain();
    let structured = StructuredDisplay::new(&styling, None);

    let lines = structured
        .table()
        .header(&["Title", "Status"])
        .row(&["Dune", "completed"])
        .row(&["The Wire", "watching"])
        .render_lines();

    assert_eq!(
        lines,
        vec![
            "Title     Status".to_string(),
            "Dune      completed".to_string(),
            "The Wire  watching".to_string(),
        ]
    );
}

#[test]
fn test_table_without_header_or_rows_is_empty() {
    let styling = StyleManager::plain();
    let structured = StructuredDisplay::new(&styling, None);

    assert!(structured.table().render_lines().is_empty());
}

#[test]
fn test_short_rows_are_padded() {
    let styling = StyleManager::plain();
    let structured = StructuredDisplay::new(&styling, None);

    let lines = structured
        .table()
        .header(&["A", "B"])
        .row(&["only"])
        .render_lines();

    assert_eq!(lines[1], "only");
}

#[test]
fn test_wide_tables_truncate_to_limit() {
    let styling = StyleManager::plain();
    let structured = StructuredDisplay::new(&styling, Some(20));

    let lines = structured
        .table()
        .row(&["A very long title that will not fit", "tv"])
        .render_lines();

    assert!(measure_text_width(&lines[0]) <= 20);
    assert!(lines[0].contains("..."));
    assert!(lines[0].ends_with("tv"));
}

#[test]
fn test_pairs_align_keys() {
    let styling = StyleManager::plain();
    let structured = StructuredDisplay::new(&styling, None);

    assert_eq!(
        structured.render_pairs(&[("Kind", "movie"), ("Status", "completed")]),
        vec!["Kind    movie".to_string(), "Status  completed".to_string()]
    );
}
