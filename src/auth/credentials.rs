use std::fs;

use serde::{Deserialize, Serialize};

use crate::config::AppPaths;
use crate::error::{AppError, AppResult};

use super::caller::AuthenticatedCaller;

/// The stored Gmail connection for one tenant user: a long-lived refresh
/// token plus the addresses the mailbox can send as. Read-only to the send
/// pipeline; written only by `mailbox connect`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailboxCredential {
    pub tenant_id: String,
    pub owner_user_id: String,
    pub refresh_token: String,
    /// Address of the connected Gmail mailbox, when known.
    #[serde(default)]
    pub email_address: Option<String>,
    /// The user's helpdesk account email, the sending address of last resort.
    pub account_email: String,
}

pub trait CredentialStore {
    fn load(&self, tenant: &str, user: &str) -> AppResult<Option<MailboxCredential>>;
    fn save(&self, credential: &MailboxCredential) -> AppResult<()>;
    fn clear(&self, tenant: &str, user: &str) -> AppResult<()>;
}

#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    paths: AppPaths,
}

impl FileCredentialStore {
    pub fn new(paths: AppPaths) -> Self {
        Self { paths }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self, tenant: &str, user: &str) -> AppResult<Option<MailboxCredential>> {
        let path = self.paths.credential_file(tenant, user);
        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(path)?;
        let credential = serde_json::from_str(&raw)?;
        Ok(Some(credential))
    }

    fn save(&self, credential: &MailboxCredential) -> AppResult<()> {
        let path = self
            .paths
            .credential_file(&credential.tenant_id, &credential.owner_user_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let payload = serde_json::to_string_pretty(credential)?;
        fs::write(&path, payload)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mut perms = fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    fn clear(&self, tenant: &str, user: &str) -> AppResult<()> {
        let path = self.paths.credential_file(tenant, user);
        if path.exists() {
            fs::remove_file(path)?;
        }

        Ok(())
    }
}

/// Looks up the mailbox credential for the acting caller. Both variants end
/// at a per-user credential row; the match stays explicit so the two
/// authorization paths never blur.
pub fn load_for_caller<S: CredentialStore>(
    store: &S,
    tenant: &str,
    caller: &AuthenticatedCaller,
) -> AppResult<MailboxCredential> {
    let user = match caller {
        AuthenticatedCaller::TrustedSystem { acting_user } => acting_user.as_str(),
        AuthenticatedCaller::EndUser { user_id } => user_id.as_str(),
    };

    store.load(tenant, user)?.ok_or_else(|| {
        AppError::MissingMailbox(format!(
            "no gmail mailbox connected for user `{user}` in tenant `{tenant}`; run `deskmail mailbox connect`"
        ))
    })
}
