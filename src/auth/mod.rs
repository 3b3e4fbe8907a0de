pub mod caller;
pub mod credentials;
pub mod oauth;

pub use caller::AuthenticatedCaller;
pub use credentials::{CredentialStore, FileCredentialStore, MailboxCredential};
