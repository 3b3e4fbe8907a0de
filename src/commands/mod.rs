pub mod mailbox;
pub mod send;
pub mod ticket;
