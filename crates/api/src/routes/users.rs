//! User registration route.
//!
//! Identity lives with the external provider; this endpoint mirrors the
//! verified (subject, email) pair into the local users table so share
//! grants can resolve emails.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde::Serialize;

use crate::{ApiError, AppState, middleware::AuthUser};
use filebay_core::file::UserRecord;
use filebay_db::UserRepository;

/// Response for a registered user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// Identity-provider subject.
    pub id: String,
    /// Email on record.
    pub email: String,
}

/// POST `/user`
/// Upsert the caller into the users table from their verified token.
async fn register_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let repo = UserRepository::new((*state.db).clone());
    let user = UserRecord {
        id: auth.user_id().to_string(),
        email: auth.email().to_string(),
    };

    repo.upsert(user.clone()).await?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id: user.id,
            email: user.email,
        }),
    ))
}

/// Creates user routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/user", post(register_user))
}
