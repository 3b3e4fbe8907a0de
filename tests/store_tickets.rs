use std::path::Path;

use deskmail::api::GmailClient;
use deskmail::auth::credentials::{CredentialStore, FileCredentialStore, MailboxCredential};
use deskmail::cli::SendArgs;
use deskmail::commands;
use deskmail::config::{AppPaths, TenantSettings};
use deskmail::context::AppContext;
use deskmail::error::AppError;
use deskmail::output::Output;
use deskmail::store::tickets::{FileTicketStore, Ticket, TicketStore};

fn context(root: &Path) -> AppContext {
    let paths = AppPaths::rooted(root.join("config"), root.join("data")).expect("paths");
    AppContext {
        tenant: "acme".to_string(),
        user: Some("u-1".to_string()),
        service: false,
        verbose: 0,
        settings: TenantSettings::default(),
        credential_store: FileCredentialStore::new(paths.clone()),
        ticket_store: FileTicketStore::new(paths.clone()),
        gmail_client: GmailClient::new(),
        output: Output::from_flag(false),
        paths,
    }
}

fn ticket(thread: Option<&str>) -> Ticket {
    Ticket {
        id: "t-1".to_string(),
        tenant_id: "acme".to_string(),
        subject: "Hello".to_string(),
        ticket_number: Some("TKT-5".to_string()),
        gmail_thread_id: thread.map(ToOwned::to_owned),
        requester_email: Some("customer@example.com".to_string()),
        cc_addresses: vec![],
        updated_at_unix: 0,
    }
}

fn send_args(body: &str) -> SendArgs {
    SendArgs {
        ticket: "t-1".to_string(),
        to: None,
        body: Some(body.to_string()),
        body_file: None,
        stdin: false,
        html_file: None,
        attach: None,
        internal_note: false,
        reply_all: false,
    }
}

#[test]
fn tickets_round_trip_through_the_file_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path());

    ctx.ticket_store.import(&ticket(Some("thr-1"))).expect("import");
    let loaded = ctx
        .ticket_store
        .load("acme", "t-1")
        .expect("load")
        .expect("ticket exists");

    assert_eq!(loaded.subject, "Hello");
    assert_eq!(loaded.gmail_thread_id.as_deref(), Some("thr-1"));
    assert!(ctx.ticket_store.load("acme", "t-9").expect("load").is_none());
}

#[test]
fn credentials_round_trip_and_clear() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path());

    let credential = MailboxCredential {
        tenant_id: "acme".to_string(),
        owner_user_id: "u-1".to_string(),
        refresh_token: "rt-1".to_string(),
        email_address: Some("me@acme.com".to_string()),
        account_email: "agent@acme.com".to_string(),
    };
    ctx.credential_store.save(&credential).expect("save");

    let loaded = ctx
        .credential_store
        .load("acme", "u-1")
        .expect("load")
        .expect("credential exists");
    assert_eq!(loaded.refresh_token, "rt-1");

    ctx.credential_store.clear("acme", "u-1").expect("clear");
    assert!(ctx.credential_store.load("acme", "u-1").expect("load").is_none());
}

#[tokio::test]
async fn ticket_without_thread_stores_a_local_note_and_sends_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path());
    ctx.ticket_store.import(&ticket(None)).expect("import");

    // no credential is stored: if the pipeline tried to send, this would fail
    commands::send::run(&ctx, send_args("note body"))
        .await
        .expect("fallback should store locally");

    let messages = ctx.ticket_store.messages("acme", "t-1").expect("messages");
    assert_eq!(messages.len(), 1);
    assert!(!messages[0].is_customer);
    assert!(messages[0].is_internal_note);
    assert_eq!(messages[0].content, "note body");

    let refreshed = ctx
        .ticket_store
        .load("acme", "t-1")
        .expect("load")
        .expect("ticket exists");
    assert!(refreshed.updated_at_unix > 0);
}

#[tokio::test]
async fn internal_note_flag_bypasses_email_even_with_a_thread() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path());
    ctx.ticket_store.import(&ticket(Some("thr-1"))).expect("import");

    let mut args = send_args("internal only");
    args.internal_note = true;
    commands::send::run(&ctx, args).await.expect("note stored");

    let messages = ctx.ticket_store.messages("acme", "t-1").expect("messages");
    assert_eq!(messages.len(), 1);
    assert!(messages[0].is_internal_note);
}

#[tokio::test]
async fn missing_credential_surfaces_before_any_send() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path());
    ctx.ticket_store.import(&ticket(Some("thr-1"))).expect("import");

    let result = commands::send::run(&ctx, send_args("hello")).await;
    assert!(matches!(result, Err(AppError::MissingMailbox(_))));

    // nothing was inserted on the failed path
    let messages = ctx.ticket_store.messages("acme", "t-1").expect("messages");
    assert!(messages.is_empty());
}

#[tokio::test]
async fn failed_token_refresh_leaves_no_message_row() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut ctx = context(dir.path());
    ctx.settings.client_id = Some("client-1".to_string());
    ctx.ticket_store.import(&ticket(Some("thr-1"))).expect("import");

    let credential = MailboxCredential {
        tenant_id: "acme".to_string(),
        owner_user_id: "u-1".to_string(),
        refresh_token: "revoked".to_string(),
        email_address: Some("me@acme.com".to_string()),
        account_email: "agent@acme.com".to_string(),
    };
    ctx.credential_store.save(&credential).expect("save");

    // a revoked token is rejected by the provider; without network the
    // exchange dies at the transport instead. either way nothing sends.
    let result = commands::send::run(&ctx, send_args("hello")).await;
    assert!(matches!(
        result,
        Err(AppError::Credential(_)) | Err(AppError::Http(_))
    ));

    let messages = ctx.ticket_store.messages("acme", "t-1").expect("messages");
    assert!(messages.is_empty());
}

#[tokio::test]
async fn unknown_ticket_is_a_validation_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path());

    let result = commands::send::run(&ctx, send_args("hello")).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}
