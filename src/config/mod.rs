pub mod paths;
pub mod settings;
pub mod tenant;

pub use paths::AppPaths;
pub use settings::TenantSettings;
pub use tenant::resolve_tenant;

use crate::error::AppResult;

pub fn load_settings(paths: &AppPaths, tenant: &str) -> AppResult<TenantSettings> {
    settings::load(paths.settings_file(tenant))
}
