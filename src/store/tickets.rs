//! Local stand-in for the helpdesk's relational store. Tickets arrive from
//! the ticketing system via `ticket import`; the send pipeline reads the
//! thread binding and writes message rows plus the ticket's updated-at
//! timestamp.

use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::config::AppPaths;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub tenant_id: String,
    pub subject: String,
    #[serde(default)]
    pub ticket_number: Option<String>,
    /// Binding to the Gmail conversation. When absent, outbound content is
    /// stored as a local-only note and no email is sent.
    #[serde(default)]
    pub gmail_thread_id: Option<String>,
    #[serde(default)]
    pub requester_email: Option<String>,
    #[serde(default)]
    pub cc_addresses: Vec<String>,
    #[serde(default)]
    pub updated_at_unix: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    pub ticket_id: String,
    pub from_email: String,
    #[serde(default)]
    pub from_name: Option<String>,
    pub content: String,
    #[serde(default)]
    pub html_content: Option<String>,
    /// Always false for rows written here; customer messages arrive through
    /// the inbound sync, not this pipeline.
    pub is_customer: bool,
    pub is_internal_note: bool,
    pub sent_at_unix: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TicketFile {
    ticket: Ticket,
    #[serde(default)]
    messages: Vec<MessageRecord>,
}

pub trait TicketStore {
    fn load(&self, tenant: &str, ticket_id: &str) -> AppResult<Option<Ticket>>;
    fn messages(&self, tenant: &str, ticket_id: &str) -> AppResult<Vec<MessageRecord>>;
    fn import(&self, ticket: &Ticket) -> AppResult<()>;
    /// Appends one message row and refreshes the ticket's `updated_at`.
    fn append_message(&self, tenant: &str, record: &MessageRecord) -> AppResult<()>;
}

#[derive(Debug, Clone)]
pub struct FileTicketStore {
    paths: AppPaths,
}

impl FileTicketStore {
    pub fn new(paths: AppPaths) -> Self {
        Self { paths }
    }

    fn read_file(&self, tenant: &str, ticket_id: &str) -> AppResult<Option<TicketFile>> {
        let path = self.paths.ticket_file(tenant, ticket_id);
        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(path)?;
        let file = serde_json::from_str(&raw)?;
        Ok(Some(file))
    }

    fn write_file(&self, file: &TicketFile) -> AppResult<()> {
        let path = self
            .paths
            .ticket_file(&file.ticket.tenant_id, &file.ticket.id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let payload = serde_json::to_string_pretty(file)?;
        fs::write(path, payload)?;
        Ok(())
    }
}

impl TicketStore for FileTicketStore {
    fn load(&self, tenant: &str, ticket_id: &str) -> AppResult<Option<Ticket>> {
        Ok(self.read_file(tenant, ticket_id)?.map(|file| file.ticket))
    }

    fn messages(&self, tenant: &str, ticket_id: &str) -> AppResult<Vec<MessageRecord>> {
        Ok(self
            .read_file(tenant, ticket_id)?
            .map(|file| file.messages)
            .unwrap_or_default())
    }

    fn import(&self, ticket: &Ticket) -> AppResult<()> {
        let messages = self
            .read_file(&ticket.tenant_id, &ticket.id)?
            .map(|file| file.messages)
            .unwrap_or_default();

        self.write_file(&TicketFile {
            ticket: ticket.clone(),
            messages,
        })
    }

    fn append_message(&self, tenant: &str, record: &MessageRecord) -> AppResult<()> {
        let mut file = self.read_file(tenant, &record.ticket_id)?.ok_or_else(|| {
            AppError::Validation(format!(
                "unknown ticket `{}` in tenant `{tenant}`",
                record.ticket_id
            ))
        })?;

        file.ticket.updated_at_unix = record.sent_at_unix;
        file.messages.push(record.clone());
        self.write_file(&file)
    }
}

pub fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or_default()
}
