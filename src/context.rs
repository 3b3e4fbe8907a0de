use crate::api::GmailClient;
use crate::auth::{AuthenticatedCaller, FileCredentialStore};
use crate::config::{self, AppPaths, TenantSettings};
use crate::error::AppResult;
use crate::output::Output;
use crate::store::FileTicketStore;

#[derive(Debug)]
pub struct AppContext {
    pub tenant: String,
    pub user: Option<String>,
    pub service: bool,
    pub verbose: u8,
    pub paths: AppPaths,
    pub settings: TenantSettings,
    pub credential_store: FileCredentialStore,
    pub ticket_store: FileTicketStore,
    pub gmail_client: GmailClient,
    pub output: Output,
}

impl AppContext {
    pub fn bootstrap(
        tenant: String,
        user: Option<String>,
        service: bool,
        json: bool,
        verbose: u8,
    ) -> AppResult<Self> {
        let tenant = config::resolve_tenant(&tenant);
        let paths = AppPaths::discover()?;
        let settings = config::load_settings(&paths, &tenant)?;
        let credential_store = FileCredentialStore::new(paths.clone());
        let ticket_store = FileTicketStore::new(paths.clone());
        let gmail_client = GmailClient::new();
        let output = Output::from_flag(json);

        Ok(Self {
            tenant,
            user,
            service,
            verbose,
            paths,
            settings,
            credential_store,
            ticket_store,
            gmail_client,
            output,
        })
    }

    /// Resolved fresh per command; commands that never touch credentials or
    /// the pipeline simply don't call this.
    pub fn caller(&self) -> AppResult<AuthenticatedCaller> {
        AuthenticatedCaller::resolve(self.service, self.user.clone())
    }
}
