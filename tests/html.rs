//! Passthrough HTML and its validation

use std::sync::Arc;
use texier::texier::validation::{AllowListPolicy, DenyAll};
use texier::texier::{load_defaults, Loader, Processor};

fn html(input: &str) -> String {
    Processor::with_defaults()
        .expect("default processor")
        .to_html(input)
}

fn strict_processor() -> Processor {
    let policy = AllowListPolicy::new()
        .allow_tag("span", ["class", "style"])
        .allow_tag("div", ["class", "id"])
        .allow_classes(["good", "#main"])
        .allow_styles(["color"]);
    let config = load_defaults().expect("defaults");
    Processor::with_policy(&config, Arc::new(policy)).expect("processor")
}

#[test]
fn test_allowed_block_tag_passes_through() {
    insta::assert_snapshot!(
        html("<div class=\"note\">hello</div>"),
        @r#"<div class="note">hello</div>"#
    );
}

#[test]
fn test_allowed_inline_tag_inside_paragraph() {
    insta::assert_snapshot!(html("say <b>hi</b> now"), @"<p>say <b>hi</b> now</p>");
}

#[test]
fn test_empty_tags() {
    insta::assert_snapshot!(html("a<br>b"), @"<p>a<br />b</p>");
    insta::assert_snapshot!(
        html("<img src=\"a.png\" alt=\"A\" />"),
        @r#"<p><img alt="A" src="a.png" /></p>"#
    );
}

#[test]
fn test_denied_tag_degrades_to_text() {
    insta::assert_snapshot!(
        html("<script>alert(1)</script>"),
        @"<p>&lt;script&gt;alert(1)&lt;/script&gt;</p>"
    );
}

#[test]
fn test_markup_inside_denied_tag_is_still_matched() {
    insta::assert_snapshot!(
        html("<script><b>x</b></script>"),
        @"<p>&lt;script&gt;<b>x</b>&lt;/script&gt;</p>"
    );
}

#[test]
fn test_disallowed_attribute_is_dropped() {
    insta::assert_snapshot!(
        html("<b onclick=\"evil()\" title=\"t\">bold</b>"),
        @r#"<p><b title="t">bold</b></p>"#
    );
}

#[test]
fn test_forbidden_scheme_rejects_the_tag() {
    let output = html("<a href=\"javascript:alert(1)\">x</a>");
    assert!(!output.contains("<a href=\"javascript"));
    assert!(output.contains("&lt;a "));
}

#[test]
fn test_allowed_scheme_keeps_the_link() {
    insta::assert_snapshot!(
        html("<a href=\"https://example.com\">x</a>"),
        @r#"<p><a href="https://example.com">x</a></p>"#
    );
}

#[test]
fn test_class_and_style_tokens_are_filtered() {
    let processor = strict_processor();
    insta::assert_snapshot!(
        processor.to_html("<span class=\"good bad\" style=\"color: red; position: absolute\">x</span>"),
        @r#"<p><span class="good" style="color:red">x</span></p>"#
    );
}

#[test]
fn test_id_is_checked_as_class_token() {
    let processor = strict_processor();
    insta::assert_snapshot!(
        processor.to_html("<div id=\"main\">a</div>\n\n<div id=\"other\">b</div>"),
        @r#"<div id="main">a</div><div>b</div>"#
    );
}

#[test]
fn test_modifier_respects_policy() {
    let processor = strict_processor();
    insta::assert_snapshot!(
        processor.to_html("hello .[good bad #main]{color: blue; top: 0}"),
        @r#"<p class="good" id="main" style="color:blue">hello</p>"#
    );
}

#[test]
fn test_deny_all_policy() {
    let config = load_defaults().expect("defaults");
    let processor = Processor::with_policy(&config, Arc::new(DenyAll)).expect("processor");
    insta::assert_snapshot!(processor.to_html("<b>x</b>"), @"<p>&lt;b&gt;x&lt;/b&gt;</p>");
}

#[test]
fn test_comments_pass_through() {
    insta::assert_snapshot!(
        html("hello <!-- note --> world"),
        @"<p>hello <!-- note --> world</p>"
    );
}

#[test]
fn test_comments_can_be_dropped() {
    let config = Loader::new()
        .with_toml("[html]\npass_comments = false\n")
        .build()
        .expect("config");
    let processor = Processor::new(&config).expect("processor");
    insta::assert_snapshot!(
        processor.to_html("hello <!-- note --> world"),
        @"<p>hello world</p>"
    );
}

#[test]
fn test_comment_cannot_be_closed_early() {
    let output = html("<!--><script>alert(1)</script>-->");
    assert!(!output.contains("<script"), "{}", output);
    assert!(output.contains("&lt;script&gt;"), "{}", output);
}

#[test]
fn test_comment_with_double_dash_is_text() {
    let output = html("<!-- ---!><script>alert(1)</script> -->");
    assert!(!output.contains("<script"), "{}", output);
    assert!(!output.contains("<!--"), "{}", output);
}

#[test]
fn test_malformed_comment_is_not_dropped_silently() {
    let config = Loader::new()
        .with_toml("[html]\npass_comments = false\n")
        .build()
        .expect("config");
    let processor = Processor::new(&config).expect("processor");
    let output = processor.to_html("a <!-->b<!-- --> c");
    assert!(output.contains("&lt;!"), "{}", output);
    assert!(output.contains('b'), "{}", output);
    assert!(!output.contains("<!--"), "{}", output);
}

#[test]
fn test_tab_cannot_hide_a_scheme_in_attributes() {
    for input in [
        "<a href=\"java\tscript:alert(1)\">x</a>",
        "<a href=\"java\nscript:alert(1)\">x</a>",
        "<img src=\"java\r\nscript:alert(1)\">",
    ] {
        let output = html(input);
        assert!(!output.contains("<a href"), "{}", output);
        assert!(!output.contains("<img"), "{}", output);
    }
}

#[test]
fn test_unclosed_tags_parse_in_bounded_time() {
    use std::time::{Duration, Instant};

    let started = Instant::now();
    let output = html(&"<b>x".repeat(30));
    assert!(output.starts_with("<p>&lt;b&gt;x"), "{}", output);

    let nested = format!("{}</i></b>", "<b><i>".repeat(15));
    let output = html(&nested);
    assert!(output.starts_with("<p>"), "{}", output);

    let unclosed_blocks = "<div>a\n".repeat(20);
    let output = html(&unclosed_blocks);
    assert!(output.contains("&lt;div&gt;a"), "{}", output);

    assert!(started.elapsed() < Duration::from_secs(5));
}
