//! Rewrites the HTML body before composition: duplicate `<img>` removal and
//! `data:` image extraction into out-of-line `cid:` parts.

use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::{SystemTime, UNIX_EPOCH};

use regex::Regex;

static IMG_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<img\b[^>]*>").unwrap());

static SRC_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)src\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());

static DATA_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)src\s*=\s*["']data:([^;"']+);base64,([^"']*)["']"#).unwrap()
});

/// A `data:` image lifted out of the HTML body, to be emitted as its own
/// MIME part and referenced from the rewritten HTML by `cid:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlinePart {
    pub content_id: String,
    pub mime_type: String,
    pub base64: String,
}

#[derive(Debug, Clone)]
pub struct RewrittenHtml {
    pub html: String,
    pub inline_parts: Vec<InlinePart>,
}

/// Runs both passes in order: dedupe first, then `data:` inlining.
pub fn rewrite_html(html: &str) -> RewrittenHtml {
    let deduped = dedupe_images(html);
    let (html, inline_parts) = inline_data_images(&deduped);
    RewrittenHtml { html, inline_parts }
}

/// Removes every `<img>` tag whose `src` repeats an earlier tag's `src`.
/// The first occurrence wins; tags without a `src` attribute are kept.
///
/// The upstream rich-text editor can emit the same image twice (inline and
/// pasted), which bloats the message and renders twice in some clients.
pub fn dedupe_images(html: &str) -> String {
    let mut seen = HashSet::new();
    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;

    for tag in IMG_TAG.find_iter(html) {
        out.push_str(&html[cursor..tag.start()]);
        cursor = tag.end();

        let src = SRC_ATTR
            .captures(tag.as_str())
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|group| group.as_str().to_string());

        match src {
            Some(src) if seen.contains(&src) => {}
            Some(src) => {
                seen.insert(src);
                out.push_str(tag.as_str());
            }
            None => out.push_str(tag.as_str()),
        }
    }

    out.push_str(&html[cursor..]);
    out
}

/// Rewrites every embedded `data:<mime>;base64,<payload>` image source into a
/// `cid:` reference and collects one [`InlinePart`] per occurrence. Sources
/// that are not `data:` URLs (already-hosted images) are left untouched.
///
/// Content-ids only need to be unique within one message; a counter plus a
/// millisecond timestamp covers that.
pub fn inline_data_images(html: &str) -> (String, Vec<InlinePart>) {
    let stamp = unix_millis();
    let mut parts = Vec::new();
    let mut index = 0_usize;

    let rewritten = DATA_SRC.replace_all(html, |caps: &regex::Captures| {
        let mime_type = caps[1].trim().to_string();
        let base64: String = caps[2].split_whitespace().collect();
        let content_id = format!("img_{index}_{stamp}");
        index += 1;

        let replacement = format!("src=\"cid:{content_id}\"");
        parts.push(InlinePart {
            content_id,
            mime_type,
            base64,
        });
        replacement
    });

    (rewritten.into_owned(), parts)
}

/// True when the HTML still references at least one image that is not an
/// inlined `cid:` part, i.e. an externally hosted image.
pub fn has_remote_images(html: &str) -> bool {
    IMG_TAG.find_iter(html).any(|tag| {
        SRC_ATTR
            .captures(tag.as_str())
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
            .is_some_and(|group| !group.as_str().starts_with("cid:"))
    })
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis())
        .unwrap_or_default()
}
