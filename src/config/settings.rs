use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Per-tenant configuration: the tenant's OAuth app registration plus its
/// from-address policy inputs. Tenants may carry distinct OAuth apps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantSettings {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Shared sending address for the whole tenant; when set it takes
    /// priority over any individual agent's mailbox.
    #[serde(default)]
    pub group_email: Option<String>,
    /// Display name used together with `group_email`.
    #[serde(default)]
    pub team_name: Option<String>,
    /// Display name for sends from an individual agent's mailbox.
    #[serde(default)]
    pub sender_name: Option<String>,
}

impl TenantSettings {
    pub fn client_id(&self) -> AppResult<&str> {
        self.client_id.as_deref().ok_or_else(|| {
            AppError::Config(
                "missing oauth client_id in tenant settings. add it to the tenant json".to_string(),
            )
        })
    }

    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }
}

/// Tenant settings are provisioned by hand (or by deployment tooling); a
/// missing file is an unconfigured tenant, not an error.
pub fn load(path: PathBuf) -> AppResult<TenantSettings> {
    if !path.exists() {
        return Ok(TenantSettings::default());
    }

    let raw = fs::read_to_string(path)?;
    let settings = serde_json::from_str(&raw)?;
    Ok(settings)
}
