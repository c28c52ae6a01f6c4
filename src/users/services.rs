use anyhow::Context;
use serde_json::Value;
use tracing::{debug, warn};

use crate::state::AppState;
use crate::users::{
    error::{RegisterError, ValidationError},
    repo::StoreError,
    repo_types::{NewUser, User},
    validation::validate_registration,
};

/// Validates `body`, then hashes, seeds the performance ledger from the
/// current catalog, and persists the new user.
pub async fn register_user(state: &AppState, body: &Value) -> Result<User, RegisterError> {
    let creds = validate_registration(body).map_err(|e| {
        warn!(reason = e.kind.as_str(), location = e.location, "registration rejected");
        e
    })?;

    let taken = state
        .users
        .count_by_username(&creds.username)
        .await
        .context("check username availability")?;
    if taken > 0 {
        warn!(username = %creds.username, "username already taken");
        return Err(ValidationError::duplicate_username().into());
    }

    let hash = User::hash_password(&creds.password, state.config.bcrypt_cost).await?;
    let mut user = NewUser::new(creds.username, hash);

    let questions = state.catalog.list().await.context("fetch question catalog")?;
    user.seed_performance(&questions);
    debug!(entries = user.performance.len(), "performance ledger seeded");

    match state.users.insert(user).await {
        Ok(user) => Ok(user),
        // lost the race against a concurrent registration of the same name
        Err(StoreError::DuplicateUsername) => {
            warn!("username taken between check and insert");
            Err(ValidationError::duplicate_username().into())
        }
        Err(StoreError::Backend(e)) => Err(e.into()),
    }
}
