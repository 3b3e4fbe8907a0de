use crate::auth::credentials::MailboxCredential;
use crate::config::settings::TenantSettings;
use crate::store::tickets::Ticket;

const DEFAULT_SUBJECT: &str = "Re: Support";

/// The address an outbound reply appears to come from, after applying the
/// tenant's from-address policy.
#[derive(Debug, Clone)]
pub struct Sender {
    pub email: String,
    pub display_name: Option<String>,
}

/// Normalized header values for one outbound message. All values are single
/// line; sanitization happens here, not in the composer.
#[derive(Debug, Clone)]
pub struct MessageHeaders {
    pub from: String,
    pub to: String,
    pub cc: Option<String>,
    pub subject: String,
}

/// From-address priority: the tenant's shared group address (with the tenant
/// team name as display name) wins over the user's connected mailbox address,
/// which wins over the user's account email. This ordering determines which
/// address support replies appear to come from and must not change.
pub fn resolve_sender(settings: &TenantSettings, credential: &MailboxCredential) -> Sender {
    if let Some(group) = settings
        .group_email
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        return Sender {
            email: group.to_string(),
            display_name: settings.team_name.clone(),
        };
    }

    let email = credential
        .email_address
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(&credential.account_email)
        .to_string();

    Sender {
        email,
        display_name: settings.sender_name.clone(),
    }
}

pub fn build_headers(
    ticket: &Ticket,
    sender: &Sender,
    recipient: &str,
    reply_all: bool,
) -> MessageHeaders {
    let cc = if reply_all && !ticket.cc_addresses.is_empty() {
        let joined = ticket
            .cc_addresses
            .iter()
            .map(|address| sanitize_header_value(address))
            .filter(|address| !address.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        (!joined.is_empty()).then_some(joined)
    } else {
        None
    };

    MessageHeaders {
        from: from_header(sender),
        to: sanitize_header_value(recipient),
        cc,
        subject: build_subject(ticket.ticket_number.as_deref(), &ticket.subject),
    }
}

/// `[<ticket_number>] <subject>` when the ticket is numbered, otherwise the
/// raw subject, otherwise a fixed default. The result never contains CR or LF
/// (a subject spanning multiple lines is a header injection).
pub fn build_subject(ticket_number: Option<&str>, subject: &str) -> String {
    let subject = sanitize_header_value(subject);
    let number = ticket_number
        .map(sanitize_header_value)
        .filter(|value| !value.is_empty());

    match number {
        Some(number) => format!("[{number}] {subject}").trim_end().to_string(),
        None if subject.is_empty() => DEFAULT_SUBJECT.to_string(),
        None => subject,
    }
}

/// Strips CR and LF and surrounding whitespace so the value stays on one
/// header line.
pub fn sanitize_header_value(input: &str) -> String {
    input
        .chars()
        .filter(|value| *value != '\r' && *value != '\n')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Converts any mix of line endings to CRLF, the delimiter of the composed
/// message itself. Mixed endings render incorrectly in some mail clients.
pub fn normalize_crlf(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n").replace('\n', "\r\n")
}

fn from_header(sender: &Sender) -> String {
    let email = sanitize_header_value(&sender.email);
    let name = sender
        .display_name
        .as_deref()
        .map(sanitize_header_value)
        .filter(|value| !value.is_empty());

    match name {
        Some(name) => format!("{name} <{email}>"),
        None => email,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(number: Option<&str>, subject: &str) -> Ticket {
        Ticket {
            id: "t-1".to_string(),
            tenant_id: "acme".to_string(),
            subject: subject.to_string(),
            ticket_number: number.map(ToOwned::to_owned),
            gmail_thread_id: Some("thr-1".to_string()),
            requester_email: Some("customer@example.com".to_string()),
            cc_addresses: vec![],
            updated_at_unix: 0,
        }
    }

    fn credential(mailbox: Option<&str>) -> MailboxCredential {
        MailboxCredential {
            tenant_id: "acme".to_string(),
            owner_user_id: "u-1".to_string(),
            refresh_token: "rt".to_string(),
            email_address: mailbox.map(ToOwned::to_owned),
            account_email: "agent@acme.com".to_string(),
        }
    }

    #[test]
    fn prefixes_subject_with_ticket_number() {
        assert_eq!(build_subject(Some("TKT-5"), "Hello"), "[TKT-5] Hello");
    }

    #[test]
    fn falls_back_to_default_subject() {
        assert_eq!(build_subject(None, ""), "Re: Support");
        assert_eq!(build_subject(None, "  "), "Re: Support");
    }

    #[test]
    fn strips_line_breaks_from_subject() {
        assert_eq!(
            build_subject(None, "Hi\r\nBcc: evil@example.com"),
            "HiBcc: evil@example.com"
        );
    }

    #[test]
    fn group_address_wins_over_user_mailbox() {
        let settings = TenantSettings {
            group_email: Some("support@acme.com".to_string()),
            team_name: Some("Acme Support".to_string()),
            ..TenantSettings::default()
        };
        let sender = resolve_sender(&settings, &credential(Some("me@acme.com")));
        assert_eq!(sender.email, "support@acme.com");
        assert_eq!(sender.display_name.as_deref(), Some("Acme Support"));
    }

    #[test]
    fn mailbox_address_wins_over_account_email() {
        let sender = resolve_sender(&TenantSettings::default(), &credential(Some("me@acme.com")));
        assert_eq!(sender.email, "me@acme.com");
    }

    #[test]
    fn account_email_is_last_resort() {
        let sender = resolve_sender(&TenantSettings::default(), &credential(None));
        assert_eq!(sender.email, "agent@acme.com");
    }

    #[test]
    fn reply_all_adds_cc_from_ticket() {
        let mut ticket = ticket(Some("TKT-9"), "Hi");
        ticket.cc_addresses = vec!["a@example.com".to_string(), "b@example.com".to_string()];
        let sender = Sender {
            email: "support@acme.com".to_string(),
            display_name: None,
        };

        let headers = build_headers(&ticket, &sender, "to@example.com", true);
        assert_eq!(headers.cc.as_deref(), Some("a@example.com, b@example.com"));

        let headers = build_headers(&ticket, &sender, "to@example.com", false);
        assert!(headers.cc.is_none());
    }

    #[test]
    fn normalizes_mixed_line_endings() {
        assert_eq!(normalize_crlf("a\nb\r\nc\rd"), "a\r\nb\r\nc\r\nd");
    }

    #[test]
    fn from_header_includes_display_name_when_present() {
        let sender = Sender {
            email: "support@acme.com".to_string(),
            display_name: Some("Acme Support".to_string()),
        };
        assert_eq!(from_header(&sender), "Acme Support <support@acme.com>");

        let bare = Sender {
            email: "support@acme.com".to_string(),
            display_name: None,
        };
        assert_eq!(from_header(&bare), "support@acme.com");
    }
}
