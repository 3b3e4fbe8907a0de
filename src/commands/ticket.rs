use std::fs;

use serde::Serialize;

use crate::cli::{ImportArgs, ShowArgs, TicketCommand};
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::store::tickets::{MessageRecord, Ticket, TicketStore};

pub async fn run(ctx: &AppContext, command: TicketCommand) -> AppResult<()> {
    match command {
        TicketCommand::Import(args) => import(ctx, args),
        TicketCommand::Show(args) => show(ctx, args),
    }
}

fn import(ctx: &AppContext, args: ImportArgs) -> AppResult<()> {
    let raw = fs::read_to_string(&args.file)?;
    let ticket: Ticket = serde_json::from_str(&raw)?;

    if ticket.tenant_id != ctx.tenant {
        return Err(AppError::Validation(format!(
            "ticket belongs to tenant `{}`, not `{}`",
            ticket.tenant_id, ctx.tenant
        )));
    }

    ctx.ticket_store.import(&ticket)?;

    ctx.output.emit(&ticket, || format!("imported ticket {}", ticket.id))
}

#[derive(Debug, Serialize)]
struct TicketView {
    ticket: Ticket,
    messages: Vec<MessageRecord>,
}

fn show(ctx: &AppContext, args: ShowArgs) -> AppResult<()> {
    let ticket = ctx.ticket_store.load(&ctx.tenant, &args.id)?.ok_or_else(|| {
        AppError::Validation(format!(
            "unknown ticket `{}` in tenant `{}`",
            args.id, ctx.tenant
        ))
    })?;
    let messages = ctx.ticket_store.messages(&ctx.tenant, &args.id)?;

    if ctx.output.is_text() {
        let number = ticket.ticket_number.as_deref().unwrap_or("(no number)");
        let thread = ticket.gmail_thread_id.as_deref().unwrap_or("(no thread)");
        println!("{} | {} | {}", ticket.id, number, ticket.subject);
        println!("   thread: {thread}");
        println!("   messages: {}", messages.len());

        for message in &messages {
            let kind = if message.is_internal_note {
                "note"
            } else {
                "sent"
            };
            println!();
            println!("   [{kind}] from {}", message.from_email);
            println!("   {}", format_preview(&message.content));
        }

        return Ok(());
    }

    let view = TicketView { ticket, messages };
    ctx.output.emit(&view, || {
        format!("{} messages on ticket {}", view.messages.len(), view.ticket.id)
    })
}

fn format_preview(content: &str) -> String {
    let decoded = html_escape::decode_html_entities(content).to_string();
    let compact = decoded.split_whitespace().collect::<Vec<_>>().join(" ");

    if compact.len() <= 120 {
        return compact;
    }

    let mut end = 120;
    while !compact.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &compact[..end])
}
