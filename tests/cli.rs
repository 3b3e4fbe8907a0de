use clap::Parser;
use deskmail::cli::{Cli, Command, MailboxCommand, TicketCommand};

#[test]
fn parses_send_with_ticket_and_body() {
    let cli = Cli::try_parse_from([
        "deskmail",
        "--tenant",
        "acme",
        "--user",
        "u-1",
        "send",
        "--ticket",
        "t-1",
        "--body",
        "hello",
        "--reply-all",
    ])
    .expect("cli parse should work");

    assert_eq!(cli.tenant, "acme");
    assert_eq!(cli.user.as_deref(), Some("u-1"));
    match cli.command {
        Command::Send(send) => {
            assert_eq!(send.ticket, "t-1");
            assert_eq!(send.body.as_deref(), Some("hello"));
            assert!(send.reply_all);
            assert!(!send.internal_note);
        }
        _ => panic!("expected send command"),
    }
}

#[test]
fn parses_service_flag_for_trusted_callers() {
    let cli = Cli::try_parse_from([
        "deskmail", "--service", "--user", "u-2", "send", "--ticket", "t-1", "--stdin",
    ])
    .expect("cli parse should work");

    assert!(cli.service);
    match cli.command {
        Command::Send(send) => assert!(send.stdin),
        _ => panic!("expected send command"),
    }
}

#[test]
fn parses_mailbox_connect() {
    let cli = Cli::try_parse_from([
        "deskmail",
        "--user",
        "u-1",
        "mailbox",
        "connect",
        "--refresh-token",
        "rt",
        "--account-email",
        "agent@acme.com",
    ])
    .expect("cli parse should work");

    match cli.command {
        Command::Mailbox(mailbox) => match mailbox.command {
            MailboxCommand::Connect(connect) => {
                assert_eq!(connect.refresh_token, "rt");
                assert_eq!(connect.account_email, "agent@acme.com");
                assert!(connect.email.is_none());
            }
            _ => panic!("expected mailbox connect"),
        },
        _ => panic!("expected mailbox command"),
    }
}

#[test]
fn parses_ticket_show() {
    let cli = Cli::try_parse_from(["deskmail", "ticket", "show", "t-7"])
        .expect("cli parse should work");

    match cli.command {
        Command::Ticket(ticket) => match ticket.command {
            TicketCommand::Show(show) => assert_eq!(show.id, "t-7"),
            _ => panic!("expected ticket show"),
        },
        _ => panic!("expected ticket command"),
    }
}
