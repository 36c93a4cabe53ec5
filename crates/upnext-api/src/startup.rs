//! Startup tasks run before the server accepts requests.
//!
//! The service owns one system list, `Attended`, keyed `attended`.
//! [`bootstrap`] makes sure it exists. A failure is logged and startup
//! continues: the API works without the list, clients just do not see it.

use chrono::Utc;
use upnext_db::{DbError, UpsertOutcome};

use crate::state::AppState;

/// Create the system lists that are missing.
///
/// Idempotent: repeated calls leave exactly one `attended` list.
///
/// # Errors
///
/// Returns [`DbError`] if the store fails or times out.
pub async fn ensure_system_lists(state: &AppState) -> Result<UpsertOutcome, DbError> {
    let outcome = state.lists().ensure_system_lists(Utc::now()).await?;
    match outcome {
        UpsertOutcome::Inserted(id) => tracing::info!(%id, "Created system list \"Attended\""),
        UpsertOutcome::Existing => tracing::debug!("System list \"Attended\" already present"),
    }
    Ok(outcome)
}

/// Run every startup task, logging failures instead of returning them.
pub async fn bootstrap(state: &AppState) {
    if let Err(e) = ensure_system_lists(state).await {
        tracing::warn!(error = %e, "Failed to ensure system lists; continuing without them");
    }
}
