use crate::db::{FleetStorage, NewDriver};
use crate::error::FleetError;
use crate::service::password::hash_password;
use tracing::info;

/// Create the configured first driver unless that username already exists.
///
/// Returns the new row id, or `None` when nothing was created.
pub async fn ensure_initial_driver(
    storage: &FleetStorage,
    username: &str,
    password: &str,
) -> Result<Option<i64>, FleetError> {
    if storage.username_taken(username).await? {
        info!(username, "bootstrap driver already present; skipping");
        return Ok(None);
    }
    let password_hash = hash_password(password).await?;
    let id = storage
        .create_driver(&NewDriver {
            username: username.to_string(),
            password_hash,
            first_name: String::new(),
            last_name: String::new(),
            license_number: None,
        })
        .await?;
    info!(username, id, "bootstrap driver created");
    Ok(Some(id))
}
