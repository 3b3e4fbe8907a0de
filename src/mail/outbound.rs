//! The typed send request and the straight-line composition pipeline:
//! normalize line endings, rewrite images, pick a shape, compose.

use crate::error::{AppError, AppResult};

use super::headers::{self, MessageHeaders};
use super::images;
use super::mime::{self, ComposedMessage, EmailAttachment, MessageBody, MessageShape};

/// One outbound send, validated at the boundary. Constructed per send, never
/// persisted.
#[derive(Debug, Clone)]
pub struct OutboundEmailRequest {
    pub ticket_id: String,
    pub plain_body: String,
    pub html_body: Option<String>,
    pub recipient: String,
    pub is_internal_note: bool,
    pub attachment: Option<EmailAttachment>,
    pub reply_all: bool,
}

impl OutboundEmailRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.ticket_id.trim().is_empty() {
            return Err(AppError::Validation("ticket id is required".to_string()));
        }
        if self.plain_body.trim().is_empty() {
            return Err(AppError::Validation("message body is required".to_string()));
        }
        if self.is_internal_note {
            return Ok(());
        }
        let recipient = self.recipient.trim();
        if recipient.is_empty() {
            return Err(AppError::Validation("recipient is required".to_string()));
        }
        if !recipient.contains('@') {
            return Err(AppError::Validation(format!(
                "recipient `{recipient}` is not an email address"
            )));
        }
        Ok(())
    }
}

/// Builds the complete RFC 2822 message for one request. Pure transformation:
/// either one complete message comes out, or nothing was composed at all.
pub fn compose_email(request: &OutboundEmailRequest, headers: &MessageHeaders) -> ComposedMessage {
    let plain = headers::normalize_crlf(&request.plain_body);

    let html = request
        .html_body
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let Some(html) = html else {
        let body = MessageBody { plain, html: None };
        return mime::compose(headers, &body, MessageShape::Plain, request.attachment.as_ref());
    };

    let rewritten = images::rewrite_html(html);
    let has_remote = images::has_remote_images(&rewritten.html);
    let shape = MessageShape::select(true, rewritten.inline_parts, has_remote);
    let body = MessageBody {
        plain,
        html: Some(headers::normalize_crlf(&rewritten.html)),
    };

    mime::compose(headers, &body, shape, request.attachment.as_ref())
}
