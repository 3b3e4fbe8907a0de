use std::fs;
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

const APP_DIR: &str = "deskmail";

#[derive(Debug, Clone)]
pub struct AppPaths {
    tenants_dir: PathBuf,
    credentials_dir: PathBuf,
    tickets_dir: PathBuf,
}

impl AppPaths {
    pub fn discover() -> AppResult<Self> {
        let config_root = dirs::config_dir()
            .ok_or_else(|| AppError::Config("unable to resolve config directory".to_string()))?;
        let data_root = dirs::data_dir()
            .ok_or_else(|| AppError::Config("unable to resolve data directory".to_string()))?;

        Self::rooted(config_root.join(APP_DIR), data_root.join(APP_DIR))
    }

    /// Builds the layout under explicit roots; tests point this at a scratch
    /// directory.
    pub fn rooted(config_dir: PathBuf, data_dir: PathBuf) -> AppResult<Self> {
        let tenants_dir = config_dir.join("tenants");
        let credentials_dir = data_dir.join("credentials");
        let tickets_dir = data_dir.join("tickets");

        fs::create_dir_all(&tenants_dir)?;
        fs::create_dir_all(&credentials_dir)?;
        fs::create_dir_all(&tickets_dir)?;

        Ok(Self {
            tenants_dir,
            credentials_dir,
            tickets_dir,
        })
    }

    pub fn settings_file(&self, tenant: &str) -> PathBuf {
        self.tenants_dir.join(format!("{tenant}.json"))
    }

    pub fn credential_file(&self, tenant: &str, user: &str) -> PathBuf {
        self.credentials_dir.join(tenant).join(format!("{user}.json"))
    }

    pub fn ticket_file(&self, tenant: &str, ticket_id: &str) -> PathBuf {
        self.tickets_dir.join(tenant).join(format!("{ticket_id}.json"))
    }
}
