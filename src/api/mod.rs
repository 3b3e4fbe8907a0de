pub mod client;
pub mod messages;
pub mod models;

pub use client::GmailClient;
pub use models::SendOutcome;
