//! One send, strictly linear: authenticate, validate, load the ticket,
//! branch on the thread binding, then compose, encode, send, and record.

use std::fs;
use std::io::{self, Read};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::auth::AuthenticatedCaller;
use crate::auth::credentials::{self, CredentialStore};
use crate::auth::oauth;
use crate::cli::SendArgs;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::mail::headers::{self, Sender};
use crate::mail::mime::EmailAttachment;
use crate::mail::outbound::{self, OutboundEmailRequest};
use crate::store::tickets::{self, MessageRecord, Ticket, TicketStore};

pub async fn run(ctx: &AppContext, args: SendArgs) -> AppResult<()> {
    let caller = ctx.caller()?;

    let ticket = ctx
        .ticket_store
        .load(&ctx.tenant, &args.ticket)?
        .ok_or_else(|| {
            AppError::Validation(format!(
                "unknown ticket `{}` in tenant `{}`",
                args.ticket, ctx.tenant
            ))
        })?;

    let request = build_request(&args, &ticket)?;
    request.validate()?;

    // No thread binding means there is no conversation to reply into: the
    // message is stored as a local-only note. Designed fallback, not an error.
    if request.is_internal_note || ticket.gmail_thread_id.is_none() {
        return store_note(ctx, &caller, &ticket, &request);
    }

    let credential = credentials::load_for_caller(&ctx.credential_store, &ctx.tenant, &caller)?;
    let access_token = oauth::resolve_access_token(
        &credential.refresh_token,
        ctx.settings.client_id()?,
        ctx.settings.client_secret(),
    )
    .await?;

    let sender = headers::resolve_sender(&ctx.settings, &credential);
    let message_headers =
        headers::build_headers(&ticket, &sender, &request.recipient, request.reply_all);
    let composed = outbound::compose_email(&request, &message_headers);

    let outcome = ctx
        .gmail_client
        .send(
            &composed.encode_raw(),
            ticket.gmail_thread_id.as_deref(),
            &access_token,
        )
        .await?;

    let record = message_record(&ticket, &request, &sender, false);
    ctx.ticket_store.append_message(&ctx.tenant, &record)?;

    ctx.output.emit(&outcome, || {
        format!("sent message {} on ticket {}", outcome.id, ticket.id)
    })
}

fn store_note(
    ctx: &AppContext,
    caller: &AuthenticatedCaller,
    ticket: &Ticket,
    request: &OutboundEmailRequest,
) -> AppResult<()> {
    let sender = note_sender(ctx, caller)?;
    let record = message_record(ticket, request, &sender, true);
    ctx.ticket_store.append_message(&ctx.tenant, &record)?;

    ctx.output.emit(&record, || {
        format!("stored internal note on ticket {}", ticket.id)
    })
}

/// Notes don't require a connected mailbox; fall back to the caller's user
/// id when no credential row exists.
fn note_sender(ctx: &AppContext, caller: &AuthenticatedCaller) -> AppResult<Sender> {
    match ctx.credential_store.load(&ctx.tenant, caller.user_id())? {
        Some(credential) => Ok(headers::resolve_sender(&ctx.settings, &credential)),
        None => Ok(Sender {
            email: caller.user_id().to_string(),
            display_name: ctx.settings.sender_name.clone(),
        }),
    }
}

fn message_record(
    ticket: &Ticket,
    request: &OutboundEmailRequest,
    sender: &Sender,
    internal: bool,
) -> MessageRecord {
    MessageRecord {
        ticket_id: ticket.id.clone(),
        from_email: sender.email.clone(),
        from_name: sender.display_name.clone(),
        content: request.plain_body.clone(),
        html_content: request.html_body.clone(),
        is_customer: false,
        is_internal_note: internal,
        sent_at_unix: tickets::now_unix(),
    }
}

fn build_request(args: &SendArgs, ticket: &Ticket) -> AppResult<OutboundEmailRequest> {
    let plain_body = read_body(args)?;
    let html_body = match &args.html_file {
        Some(path) => Some(fs::read_to_string(path)?),
        None => None,
    };
    let attachment = match &args.attach {
        Some(path) => Some(read_attachment(path)?),
        None => None,
    };

    let recipient = args
        .to
        .clone()
        .or_else(|| ticket.requester_email.clone())
        .unwrap_or_default();

    Ok(OutboundEmailRequest {
        ticket_id: ticket.id.clone(),
        plain_body,
        html_body,
        recipient,
        is_internal_note: args.internal_note,
        attachment,
        reply_all: args.reply_all,
    })
}

fn read_body(args: &SendArgs) -> AppResult<String> {
    let mut selected = 0;

    if args.body.is_some() {
        selected += 1;
    }
    if args.body_file.is_some() {
        selected += 1;
    }
    if args.stdin {
        selected += 1;
    }

    if selected == 0 {
        return Err(AppError::Validation(
            "missing body source; pass one of --body, --body-file, or --stdin".to_string(),
        ));
    }

    if selected > 1 {
        return Err(AppError::Validation(
            "pass only one body source: --body, --body-file, or --stdin".to_string(),
        ));
    }

    if let Some(body) = &args.body {
        return Ok(body.clone());
    }

    if let Some(path) = &args.body_file {
        return Ok(fs::read_to_string(path)?);
    }

    let mut body = String::new();
    io::stdin().read_to_string(&mut body)?;
    Ok(body)
}

fn read_attachment(path: &std::path::Path) -> AppResult<EmailAttachment> {
    let data = fs::read(path)?;
    let filename = path
        .file_name()
        .map(|value| value.to_string_lossy().to_string())
        .ok_or_else(|| {
            AppError::Validation(format!("invalid attachment path: {}", path.display()))
        })?;
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    Ok(EmailAttachment {
        filename,
        mime_type,
        base64_content: STANDARD.encode(&data),
    })
}
