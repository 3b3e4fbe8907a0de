use crate::cli::{Cli, Command};
use crate::commands;
use crate::context::AppContext;
use crate::error::AppResult;

pub async fn run(cli: Cli) -> AppResult<()> {
    let Cli {
        tenant,
        user,
        service,
        json,
        verbose,
        command,
    } = cli;

    let ctx = AppContext::bootstrap(tenant, user, service, json, verbose)?;

    match command {
        Command::Send(args) => commands::send::run(&ctx, args).await,
        Command::Mailbox(args) => commands::mailbox::run(&ctx, args.command).await,
        Command::Ticket(args) => commands::ticket::run(&ctx, args.command).await,
    }
}
