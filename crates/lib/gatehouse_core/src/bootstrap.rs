//! First-start superadmin provisioning.

use tracing::{info, warn};

use crate::auth::AuthError;
use crate::auth::service::AuthService;
use crate::models::account::{NewAccount, PublicAccount, Role};
use crate::settings::BootstrapSettings;

/// Create the configured superadmin unless one already exists.
///
/// Returns the created account, or `None` when nothing was created. Only the
/// email is logged; the password never is.
pub async fn ensure_superadmin(
    service: &AuthService,
    settings: &BootstrapSettings,
) -> Result<Option<PublicAccount>, AuthError> {
    if service.store().role_exists(Role::Superadmin).await? {
        info!("superadmin present, skipping bootstrap");
        return Ok(None);
    }

    let input = NewAccount::new(
        settings.name.clone(),
        settings.email.clone(),
        settings.password.clone(),
        Role::Superadmin.as_str(),
    );
    match service.create_account(input).await {
        Ok(account) => {
            info!(account_id = %account.id, email = %account.email, "bootstrap superadmin created");
            Ok(Some(account))
        }
        Err(AuthError::DuplicateEmail) => {
            warn!(email = %settings.email, "bootstrap email belongs to a non-superadmin account");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
