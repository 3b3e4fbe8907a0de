use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "deskmail", version, about = "Outbound Gmail pipeline for helpdesk tickets")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "default",
        help = "Tenant to operate in"
    )]
    pub tenant: String,
    #[arg(long, global = true, help = "Acting user id")]
    pub user: Option<String>,
    #[arg(
        long,
        global = true,
        help = "Run as the trusted helpdesk backend on behalf of --user"
    )]
    pub service: bool,
    #[arg(long, global = true, help = "Emit JSON output")]
    pub json: bool,
    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Verbose logging")]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Send(SendArgs),
    Mailbox(MailboxArgs),
    Ticket(TicketArgs),
}

#[derive(Debug, Args)]
pub struct SendArgs {
    #[arg(long, help = "Ticket id the message belongs to")]
    pub ticket: String,
    #[arg(long, help = "Recipient address; defaults to the ticket requester")]
    pub to: Option<String>,
    #[arg(long, help = "Inline plain-text body")]
    pub body: Option<String>,
    #[arg(long, help = "Read plain-text body from file")]
    pub body_file: Option<PathBuf>,
    #[arg(long, help = "Read plain-text body from stdin")]
    pub stdin: bool,
    #[arg(long, help = "Read HTML body from file")]
    pub html_file: Option<PathBuf>,
    #[arg(long, help = "Attach one file")]
    pub attach: Option<PathBuf>,
    #[arg(long, help = "Store as an internal note; never emailed")]
    pub internal_note: bool,
    #[arg(long, help = "Cc the ticket's stored cc addresses")]
    pub reply_all: bool,
}

#[derive(Debug, Args)]
pub struct MailboxArgs {
    #[command(subcommand)]
    pub command: MailboxCommand,
}

#[derive(Debug, Subcommand)]
pub enum MailboxCommand {
    Connect(ConnectArgs),
    Status,
    Disconnect,
}

#[derive(Debug, Args)]
pub struct ConnectArgs {
    #[arg(long, help = "Refresh token issued to the tenant's OAuth app")]
    pub refresh_token: String,
    #[arg(long, help = "Address of the connected Gmail mailbox")]
    pub email: Option<String>,
    #[arg(long, help = "The user's helpdesk account email")]
    pub account_email: String,
}

#[derive(Debug, Args)]
pub struct TicketArgs {
    #[command(subcommand)]
    pub command: TicketCommand,
}

#[derive(Debug, Subcommand)]
pub enum TicketCommand {
    Import(ImportArgs),
    Show(ShowArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    #[arg(help = "Ticket record as JSON")]
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[arg(help = "Ticket id")]
    pub id: String,
}
