use super::*;

#[test]
fn test_success_and_error_lines() {
    let styling = StyleManager::plain();
    let status = StatusDisplay::new(&styling);

    assert_eq!(status.render_success("Added", "Dune"), "+ Added: Dune");
    assert_eq!(status.render_success("Saved", ""), "+ Saved");
    assert_eq!(status.render_error("undo", "nothing to restore"), "x undo: nothing to restore");
}

#[test]
fn test_warning_and_info_lines() {
    let styling = StyleManager::plain();
    let status = StatusDisplay::new(&styling);

    assert_eq!(status.render_warning("cache only"), "! cache only");
    assert_eq!(status.render_info("3 items"), "- 3 items");
}

#[test]
fn test_list_lines_are_bulleted() {
    let styling = StyleManager::plain();
    let status = StatusDisplay::new(&styling);

    assert_eq!(
        status.render_list(&["Drama", "Crime"]),
        vec!["  * Drama".to_string(), "  * Crime".to_string()]
    );
}

#[test]
fn test_printing_does_not_panic() {
    let styling = StyleManager::plain();
    let status = StatusDisplay::new(&styling);

    status.message("plain");
    status.emphasis("bold");
    status.subtle("dim");
    status.section("Section");
}
