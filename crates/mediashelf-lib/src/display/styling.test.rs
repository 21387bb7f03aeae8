use super::*;

#[test]
fn test_plain_styling_has_no_escapes() {
    let styling = StyleManager::plain();

    assert!(!styling.color_enabled());
    assert_eq!(styling.style_error("boom"), "boom");
    assert_eq!(styling.format_success("saved"), "+ saved");
    assert_eq!(styling.format_error("nope"), "x nope");
    assert_eq!(styling.format_warning("careful"), "! careful");
    assert_eq!(styling.format_info("fyi"), "- fyi");
    assert_eq!(styling.format_bullet("item"), "  * item");
}

#[test]
fn test_colored_styling_wraps_text() {
    let styling = StyleManager::new(true);

    let styled = styling.style_success("ok");
    assert!(styled.contains("ok"));
    assert!(styled.contains('\u{1b}'));
    assert_eq!(styling.symbols().success, "✓");
}
