//! Maintenance endpoint for the retention purge.
//!
//! Unauthenticated: invoked by a trusted scheduler, not end users. Network
//! exposure is expected to be restricted at the deployment layer.

use axum::{Json, Router, extract::State, routing::post};
use serde::Serialize;
use tracing::info;

use crate::{ApiError, AppState};

/// Response for a purge run.
#[derive(Debug, Serialize)]
pub struct PurgeResponse {
    /// Records fully removed (blob and metadata).
    pub purged: usize,
    /// Records kept back because the blob delete failed.
    pub retained: usize,
}

/// POST `/delete-old-files`
/// Purge soft-deleted files older than the retention window.
async fn delete_old_files(
    State(state): State<AppState>,
) -> Result<Json<PurgeResponse>, ApiError> {
    let outcome = state.file_service().purge_deleted().await?;

    info!(
        purged = outcome.purged,
        retained = outcome.retained,
        "scheduled purge finished"
    );

    Ok(Json(PurgeResponse {
        purged: outcome.purged,
        retained: outcome.retained,
    }))
}

/// Creates maintenance routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/delete-old-files", post(delete_old_files))
}
