//! RFC 2822 message assembly. The shape of the MIME tree is a closed enum
//! selected from what the body contains; each shape serializes independently
//! and an attachment always wraps the selected shape in an outer
//! `multipart/mixed` with the attachment as the last part.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use rand::Rng;

use super::headers::MessageHeaders;
use super::images::InlinePart;

#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub filename: String,
    pub mime_type: String,
    /// Base64 content as supplied by the caller; internal line breaks are
    /// stripped and the content re-folded on emission, never re-encoded.
    pub base64_content: String,
}

#[derive(Debug, Clone)]
pub struct MessageBody {
    pub plain: String,
    pub html: Option<String>,
}

/// The five structurally different message trees, minus the mixed wrapper.
/// Mail client rendering depends on this nesting being exact.
#[derive(Debug, Clone)]
pub enum MessageShape {
    /// No HTML body: a bare `text/plain` part.
    Plain,
    /// HTML referencing externally hosted images only: a bare `text/html`
    /// part, no related wrapper needed.
    HtmlOnly,
    /// HTML with no images at all: `multipart/alternative` { plain, html }.
    Alternative,
    /// HTML referencing `cid:` parts: `multipart/related` { html, images }.
    Related { inline_parts: Vec<InlinePart> },
}

impl MessageShape {
    pub fn select(has_html: bool, inline_parts: Vec<InlinePart>, has_remote_images: bool) -> Self {
        if !has_html {
            return Self::Plain;
        }
        if !inline_parts.is_empty() {
            return Self::Related { inline_parts };
        }
        if has_remote_images {
            Self::HtmlOnly
        } else {
            Self::Alternative
        }
    }
}

/// The complete RFC 2822 byte sequence for one send. Ephemeral; built,
/// encoded, transmitted, dropped.
#[derive(Debug, Clone)]
pub struct ComposedMessage {
    raw: String,
}

impl ComposedMessage {
    pub fn as_rfc2822(&self) -> &str {
        &self.raw
    }

    /// URL-safe base64 without padding, the `raw` field of the Gmail send
    /// request.
    pub fn encode_raw(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.raw.as_bytes())
    }
}

pub fn compose(
    headers: &MessageHeaders,
    body: &MessageBody,
    shape: MessageShape,
    attachment: Option<&EmailAttachment>,
) -> ComposedMessage {
    let mut lines = header_lines(headers);
    let (content_type, part_body) = shape_part(body, shape);

    let raw = match attachment {
        None => {
            lines.push(content_type);
            format!("{}\r\n\r\n{}", lines.join("\r\n"), part_body)
        }
        Some(attachment) => {
            let boundary = fresh_boundary();
            lines.push(format!(
                "Content-Type: multipart/mixed; boundary=\"{boundary}\""
            ));
            let mut out = format!("{}\r\n\r\n", lines.join("\r\n"));
            out.push_str(&format!("--{boundary}\r\n{content_type}\r\n\r\n{part_body}\r\n"));
            out.push_str(&format!("--{boundary}\r\n"));
            out.push_str(&attachment_part(attachment));
            out.push_str(&format!("--{boundary}--\r\n"));
            out
        }
    };

    ComposedMessage { raw }
}

fn header_lines(headers: &MessageHeaders) -> Vec<String> {
    let mut lines = vec![
        format!("From: {}", headers.from),
        format!("To: {}", headers.to),
    ];
    if let Some(cc) = &headers.cc {
        lines.push(format!("Cc: {cc}"));
    }
    lines.push(format!("Subject: {}", headers.subject));
    lines.push("MIME-Version: 1.0".to_string());
    lines
}

/// Serializes one shape into its `Content-Type` header line and body text.
fn shape_part(body: &MessageBody, shape: MessageShape) -> (String, String) {
    let html = body.html.as_deref().unwrap_or(&body.plain);

    match shape {
        MessageShape::Plain => (
            "Content-Type: text/plain; charset=utf-8".to_string(),
            body.plain.clone(),
        ),
        MessageShape::HtmlOnly => (
            "Content-Type: text/html; charset=utf-8".to_string(),
            html.to_string(),
        ),
        MessageShape::Alternative => {
            let boundary = fresh_boundary();
            (
                format!("Content-Type: multipart/alternative; boundary=\"{boundary}\""),
                alternative_body(&body.plain, html, &boundary),
            )
        }
        MessageShape::Related { inline_parts } => {
            let boundary = fresh_boundary();
            (
                format!("Content-Type: multipart/related; boundary=\"{boundary}\""),
                related_body(html, &inline_parts, &boundary),
            )
        }
    }
}

fn alternative_body(plain: &str, html: &str, boundary: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("--{boundary}\r\n"));
    out.push_str("Content-Type: text/plain; charset=utf-8\r\n\r\n");
    out.push_str(plain);
    out.push_str("\r\n");
    out.push_str(&format!("--{boundary}\r\n"));
    out.push_str("Content-Type: text/html; charset=utf-8\r\n\r\n");
    out.push_str(html);
    out.push_str("\r\n");
    out.push_str(&format!("--{boundary}--\r\n"));
    out
}

fn related_body(html: &str, inline_parts: &[InlinePart], boundary: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("--{boundary}\r\n"));
    out.push_str("Content-Type: text/html; charset=utf-8\r\n\r\n");
    out.push_str(html);
    out.push_str("\r\n");

    for part in inline_parts {
        out.push_str(&format!("--{boundary}\r\n"));
        out.push_str(&format!("Content-Type: {}\r\n", part.mime_type));
        out.push_str("Content-Transfer-Encoding: base64\r\n");
        out.push_str(&format!("Content-ID: <{}>\r\n", part.content_id));
        out.push_str("Content-Disposition: inline\r\n\r\n");
        out.push_str(&fold_base64_lines(&strip_base64_whitespace(&part.base64)));
        out.push_str("\r\n");
    }

    out.push_str(&format!("--{boundary}--\r\n"));
    out
}

fn attachment_part(attachment: &EmailAttachment) -> String {
    let filename = escape_filename(&attachment.filename);
    let mut out = String::new();
    out.push_str(&format!(
        "Content-Type: {}; name=\"{filename}\"\r\n",
        attachment.mime_type
    ));
    out.push_str("Content-Transfer-Encoding: base64\r\n");
    out.push_str(&format!(
        "Content-Disposition: attachment; filename=\"{filename}\"\r\n\r\n"
    ));
    out.push_str(&fold_base64_lines(&strip_base64_whitespace(
        &attachment.base64_content,
    )));
    out.push_str("\r\n");
    out
}

/// Callers may hand over base64 that is already line-wrapped, and inline
/// payloads are lifted straight out of untrusted HTML. Keep only the base64
/// alphabet: that drops internal breaks without decoding and re-encoding,
/// and guarantees pure ASCII so [`fold_base64_lines`] can slice by byte.
fn strip_base64_whitespace(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
        .collect()
}

fn fold_base64_lines(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 76 + 8);
    let mut start = 0;
    while start < input.len() {
        let end = (start + 76).min(input.len());
        out.push_str(&input[start..end]);
        out.push_str("\r\n");
        start = end;
    }
    out
}

/// Quoted filenames keep embedded quotes, backslash-escaped.
fn escape_filename(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// A random token plus a millisecond timestamp; never reused across sends so
/// a boundary cannot collide with one that leaked into quoted content.
fn fresh_boundary() -> String {
    let mut bytes = [0_u8; 12];
    rand::thread_rng().fill(&mut bytes);
    let token = STANDARD.encode(bytes);
    format!("deskmail-{}-{token}", unix_millis())
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis())
        .unwrap_or_default()
}
