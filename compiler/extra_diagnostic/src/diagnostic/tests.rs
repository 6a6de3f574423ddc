use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_builder_collects_labels_and_notes() {
    let diag = Diagnostic::error(ErrorCode::E2001)
        .with_message("cannot assign String to Int")
        .with_label(Span::new(4, 9), "this is a String")
        .with_secondary_label(Span::new(0, 3), "declared here")
        .with_note("Int only accepts integers");
    assert!(diag.is_error());
    assert_eq!(diag.primary_span(), Some(Span::new(4, 9)));
    assert_eq!(diag.labels.len(), 2);
    assert_eq!(diag.notes, ["Int only accepts integers"]);
}

#[test]
fn test_display_is_compact() {
    let diag = Diagnostic::warning(ErrorCode::E2005)
        .with_message("unknown property")
        .with_label(Span::new(1, 2), "here");
    assert_eq!(
        diag.to_string(),
        "warning[E2005]: unknown property\n  --> 1..2: here"
    );
}

#[test]
fn test_render_points_at_the_span() {
    let diag = Diagnostic::error(ErrorCode::E1003)
        .with_message("unclosed delimiter")
        .with_label(Span::new(0, 1), "opened here");
    let rendered = diag.render("input", "[1, 2");
    assert_eq!(
        rendered,
        "error[E1003]: unclosed delimiter\n \
         --> input:1:1\n  \
         |\n\
         1 | [1, 2\n  \
         | ^ opened here"
    );
}

#[test]
fn test_render_on_a_later_line() {
    let source = "let a = 1\nin a + 'x'";
    let diag = Diagnostic::error(ErrorCode::E2007)
        .with_message("invalid operand types")
        .with_label(Span::new(13, 20), "Int + String");
    let rendered = diag.render("main.extra", source);
    assert!(rendered.contains("--> main.extra:2:4"), "{rendered}");
    assert!(rendered.contains("2 | in a + 'x'"), "{rendered}");
    assert!(rendered.ends_with("   ^^^^^^^ Int + String"), "{rendered}");
}
