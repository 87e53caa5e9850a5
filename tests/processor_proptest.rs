//! Property-based tests for the default processor
//!
//! Processing is total: arbitrary input must render without panicking, the
//! same input must always render the same way, and nothing that reaches the
//! output as markup can run script.

use once_cell::sync::Lazy;
use proptest::prelude::*;
use texier::texier::Processor;

static PROCESSOR: Lazy<Processor> =
    Lazy::new(|| Processor::with_defaults().expect("default processor"));

/// Markup-heavy snippets, joined into documents.
fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("*".to_string()),
        Just("**".to_string()),
        Just("//".to_string()),
        Just("`".to_string()),
        Just("\"".to_string()),
        Just(".[x #y]".to_string()),
        Just(":http://a.org".to_string()),
        Just("((".to_string()),
        Just("))".to_string()),
        Just("\n".to_string()),
        Just("\n\n".to_string()),
        Just("- ".to_string()),
        Just("1. ".to_string()),
        Just("  ".to_string()),
        Just("| ".to_string()),
        Just("|----\n".to_string()),
        Just("### ".to_string()),
        Just("----".to_string()),
        Just("<b>".to_string()),
        Just("</b>".to_string()),
        Just("<script>".to_string()),
        Just("</script>".to_string()),
        Just("''".to_string()),
        Just("<!--".to_string()),
        Just("-->".to_string()),
        Just("--!>".to_string()),
        Just("->".to_string()),
        Just(">".to_string()),
        Just("\t".to_string()),
        Just("*x*:[java\tscript:x]".to_string()),
        Just("<a href=\"java\tscript:x\">".to_string()),
        Just("<a href=\"javascript:x\">".to_string()),
        Just("<a href=\"http://a.org\">".to_string()),
        Just("</a>".to_string()),
        Just("<img src=\"java\nscript:x\">".to_string()),
        "[a-z]{1,6}",
    ]
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment(), 0..24).prop_map(|parts| parts.concat())
}

/// Every raw `<` in the output opens a tag or a comment, since text is always
/// escaped. Checks each of them the way a browser would read it.
fn check_markup(html: &str) -> Result<(), TestCaseError> {
    let mut rest = html;
    while let Some(start) = rest.find('<') {
        let tail = &rest[start..];
        let end = tail.find('>').map_or(tail.len(), |i| i + 1);
        let raw = &tail[..end];
        // browsers drop tabs and line breaks inside URLs, but not inside comments
        let markup: String = raw
            .chars()
            .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
            .collect::<String>()
            .to_ascii_lowercase();
        if let Some(comment) = raw.strip_prefix("<!--") {
            let body = comment.strip_suffix("-->");
            prop_assert!(body.is_some(), "unterminated comment: {}", html);
            let body = body.unwrap_or_default();
            prop_assert!(!body.contains("--"), "comment closes early: {}", html);
            prop_assert!(!body.starts_with('>'), "comment closes early: {}", html);
        } else {
            prop_assert!(!markup.starts_with("<script"), "script leaked: {}", html);
            for attribute in [" href=\"", " src=\""] {
                for (at, _) in markup.match_indices(attribute) {
                    let target = markup[at + attribute.len()..].trim_start();
                    prop_assert!(!target.starts_with("javascript:"), "script link leaked: {}", html);
                }
            }
        }
        rest = &tail[end..];
    }
    Ok(())
}

proptest! {
    #[test]
    fn test_arbitrary_text_renders(input in "[a-z *_/`'\"#=|.:\\-\\[\\]{}()!^\n\t]{0,120}") {
        let first = PROCESSOR.to_html(&input);
        prop_assert_eq!(first, PROCESSOR.to_html(&input));
    }

    #[test]
    fn test_markup_soup_renders(input in document()) {
        let html = PROCESSOR.to_html(&input);
        prop_assert!(!html.contains("<script"), "script leaked: {}", html);
    }

    #[test]
    fn test_markup_soup_cannot_run_script(input in document()) {
        check_markup(&PROCESSOR.to_html(&input))?;
    }

    #[test]
    fn test_line_endings_do_not_matter(input in document()) {
        let crlf = input.replace('\n', "\r\n");
        prop_assert_eq!(PROCESSOR.to_html(&input), PROCESSOR.to_html(&crlf));
    }
}

#[test]
fn test_processor_is_shared_across_threads() {
    let inputs = [
        "####### title\n\n*em* and **strong**",
        "- a\n- b\n\n| x | y",
        "<div class=\"c\">block</div>",
        "plain text:http://example.com",
    ];
    let expected: Vec<String> = inputs.iter().map(|input| PROCESSOR.to_html(input)).collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let input = inputs[i % inputs.len()];
                scope.spawn(move || PROCESSOR.to_html(input))
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), expected[i % inputs.len()]);
        }
    });
}
