pub mod tickets;

pub use tickets::{FileTicketStore, MessageRecord, Ticket, TicketStore};
