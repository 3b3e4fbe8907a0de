use deskmail::mail::images::{dedupe_images, inline_data_images, rewrite_html};

#[test]
fn dedup_removes_later_duplicate_regardless_of_attribute_layout() {
    let html = concat!(
        r#"<img src="https://x/a.png" alt="first">"#,
        "<p>between</p>",
        r#"<img   alt="second"   src="https://x/a.png" >"#,
    );
    let deduped = dedupe_images(html);

    assert!(deduped.contains(r#"alt="first""#));
    assert!(!deduped.contains(r#"alt="second""#));
    assert!(deduped.contains("<p>between</p>"));
}

#[test]
fn dedup_twice_is_a_fixed_point() {
    let html = r#"<img src="a"><img src="b"><img src="a"><img src="b">"#;
    let once = dedupe_images(html);
    assert_eq!(dedupe_images(&once), once);
    assert_eq!(once.matches("<img").count(), 2);
}

#[test]
fn one_inline_part_per_embedded_image_occurrence() {
    let html = concat!(
        r#"<img src="data:image/png;base64,AAAA">"#,
        r#"<img src="data:image/gif;base64,BBBB">"#,
        r#"<img src="https://hosted/c.png">"#,
    );
    let (rewritten, parts) = inline_data_images(html);

    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].mime_type, "image/png");
    assert_eq!(parts[1].mime_type, "image/gif");
    assert!(rewritten.contains(r#"<img src="https://hosted/c.png">"#));
    assert!(!rewritten.contains("data:"));

    for part in &parts {
        assert_eq!(rewritten.matches(&format!("cid:{}", part.content_id)).count(), 1);
    }
}

#[test]
fn whitespace_is_stripped_from_inlined_payloads() {
    let html = "<img src=\"data:image/png;base64,AAAA\nBBBB CCCC\">";
    let (_, parts) = inline_data_images(html);
    assert_eq!(parts[0].base64, "AAAABBBBCCCC");
}

#[test]
fn pipeline_runs_dedup_before_inlining() {
    let html = concat!(
        r#"<img src="data:image/png;base64,SAME">"#,
        r#"<img src="data:image/png;base64,SAME">"#,
    );
    let output = rewrite_html(html);

    // the duplicate is removed first, so only one part is generated
    assert_eq!(output.inline_parts.len(), 1);
    assert_eq!(output.html.matches("<img").count(), 1);
}

#[test]
fn structure_is_deterministic_across_runs() {
    let html = r#"<p>a</p><img src="data:image/png;base64,AAAA"><p>b</p>"#;
    let first = rewrite_html(html);
    let second = rewrite_html(html);

    assert_eq!(first.inline_parts.len(), second.inline_parts.len());
    // content-ids embed a timestamp; the surrounding structure must match
    let strip = |value: &str| {
        value
            .replace(&first.inline_parts[0].content_id, "CID")
            .replace(&second.inline_parts[0].content_id, "CID")
    };
    assert_eq!(strip(&first.html), strip(&second.html));
}
