use serde::Serialize;

use crate::auth::credentials::{CredentialStore, MailboxCredential};
use crate::cli::{ConnectArgs, MailboxCommand};
use crate::context::AppContext;
use crate::error::AppResult;

#[derive(Debug, Serialize)]
struct MailboxStatus {
    tenant: String,
    user: String,
    connected: bool,
    email_address: Option<String>,
    account_email: Option<String>,
}

pub async fn run(ctx: &AppContext, command: MailboxCommand) -> AppResult<()> {
    match command {
        MailboxCommand::Connect(args) => connect(ctx, args),
        MailboxCommand::Status => status(ctx),
        MailboxCommand::Disconnect => disconnect(ctx),
    }
}

/// The OAuth consent runs in the helpdesk web app; this imports its result
/// (the refresh token) so the pipeline can act for the user.
fn connect(ctx: &AppContext, args: ConnectArgs) -> AppResult<()> {
    let caller = ctx.caller()?;
    let credential = MailboxCredential {
        tenant_id: ctx.tenant.clone(),
        owner_user_id: caller.user_id().to_string(),
        refresh_token: args.refresh_token,
        email_address: args.email,
        account_email: args.account_email,
    };
    ctx.credential_store.save(&credential)?;

    let status = MailboxStatus {
        tenant: ctx.tenant.clone(),
        user: credential.owner_user_id.clone(),
        connected: true,
        email_address: credential.email_address.clone(),
        account_email: Some(credential.account_email.clone()),
    };
    ctx.output.emit(&status, || {
        format!(
            "mailbox connected for user {} in tenant {}",
            status.user, status.tenant
        )
    })
}

fn status(ctx: &AppContext) -> AppResult<()> {
    let caller = ctx.caller()?;
    let credential = ctx.credential_store.load(&ctx.tenant, caller.user_id())?;

    let status = MailboxStatus {
        tenant: ctx.tenant.clone(),
        user: caller.user_id().to_string(),
        connected: credential.is_some(),
        email_address: credential.as_ref().and_then(|value| value.email_address.clone()),
        account_email: credential.map(|value| value.account_email),
    };

    ctx.output.emit(&status, || {
        if status.connected {
            format!("mailbox connected for user {}", status.user)
        } else {
            format!(
                "no mailbox connected for user {}; run `deskmail mailbox connect`",
                status.user
            )
        }
    })
}

fn disconnect(ctx: &AppContext) -> AppResult<()> {
    let caller = ctx.caller()?;
    ctx.credential_store.clear(&ctx.tenant, caller.user_id())?;

    let status = MailboxStatus {
        tenant: ctx.tenant.clone(),
        user: caller.user_id().to_string(),
        connected: false,
        email_address: None,
        account_email: None,
    };
    ctx.output.emit(&status, || {
        format!("mailbox credential removed for user {}", status.user)
    })
}
