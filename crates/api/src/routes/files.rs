//! File management routes.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{ApiError, AppState, middleware::AuthUser};
use filebay_core::file::{FileView, SearchParams, UploadItem};
use filebay_shared::Page;

/// Upper bound on a multipart upload body.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Creates the file routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/files", get(list_files))
        .route("/files/upload", post(upload_files))
        .route("/files/search", post(search_files))
        .route("/files/{id}", get(get_file).delete(delete_file))
        .route("/files/{id}/restore", post(restore_file))
        .route("/files/{id}/share", post(share_file))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_UPLOAD_BYTES))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response for a single file, with fresh signed URLs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    /// File ID.
    pub id: Uuid,
    /// Original filename as uploaded.
    pub original_name: String,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size: i64,
    /// Optional description applied at upload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the file is shared with the caller rather than owned.
    pub is_shared: bool,
    /// Short-lived signed URL for inline viewing.
    pub signed_url: String,
    /// Short-lived signed URL forcing an attachment download.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// Created at timestamp (ISO 8601).
    pub created_at: String,
    /// Updated at timestamp (ISO 8601).
    pub updated_at: String,
}

impl From<FileView> for FileResponse {
    fn from(view: FileView) -> Self {
        Self {
            id: view.record.id,
            original_name: view.record.original_name,
            mime_type: view.record.mime_type,
            size: view.record.size,
            description: view.record.description,
            is_shared: view.is_shared,
            signed_url: view.signed_url,
            download_url: view.download_url,
            created_at: view.record.created_at.to_rfc3339(),
            updated_at: view.record.updated_at.to_rfc3339(),
        }
    }
}

/// Request body for sharing a file.
#[derive(Debug, Deserialize, Validate)]
pub struct ShareRequest {
    /// Email of the registered user to share with.
    #[validate(email)]
    pub email: String,
    /// Client-supplied id for the share grant.
    pub id: Uuid,
}

/// Request body for searching the caller's files.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Case-insensitive substring of the original filename.
    pub name: Option<String>,
    /// Exact MIME type.
    pub file_type: Option<String>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/files?take=&skip=`
/// List files visible to the caller: owned plus shared-with.
async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<Page>,
) -> Result<Json<Vec<FileResponse>>, ApiError> {
    let views = state.file_service().list(auth.user_id(), page).await?;
    Ok(Json(views.into_iter().map(FileResponse::from).collect()))
}

/// GET `/files/{id}`
/// Fetch a single owned file with a fresh view URL.
async fn get_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(file_id): Path<Uuid>,
) -> Result<Json<FileResponse>, ApiError> {
    let view = state.file_service().get(file_id, auth.user_id()).await?;
    Ok(Json(FileResponse::from(view)))
}

/// POST `/files/upload`
/// Upload up to 10 files as repeated multipart `files` fields, with an
/// optional `description` text field applied to the whole batch.
async fn upload_files(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<StatusCode, ApiError> {
    let mut items = Vec::new();
    let mut description = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?
    {
        let name = field.name().map(ToString::to_string);
        match name.as_deref() {
            Some("files") => {
                let original_name = field.file_name().unwrap_or("unnamed").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(e.to_string()))?;
                items.push(UploadItem {
                    original_name,
                    mime_type,
                    bytes,
                });
            }
            Some("description") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(e.to_string()))?;
                if !text.is_empty() {
                    description = Some(text);
                }
            }
            _ => {}
        }
    }

    if items.is_empty() {
        return Err(ApiError::Validation(
            "at least one file is required".to_string(),
        ));
    }

    let count = items.len();
    state
        .file_service()
        .upload(items, auth.user_id(), description)
        .await?;

    info!(user_id = %auth.user_id(), count, "files uploaded");
    Ok(StatusCode::CREATED)
}

/// DELETE `/files/{id}`
/// Soft-delete an owned file and revoke its shares.
async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(file_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.file_service().delete(file_id, auth.user_id()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/files/{id}/restore`
/// Restore a soft-deleted owned file.
async fn restore_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(file_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .file_service()
        .restore(file_id, auth.user_id())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/files/{id}/share`
/// Grant read access to the registered user with the given email.
async fn share_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(file_id): Path<Uuid>,
    Json(payload): Json<ShareRequest>,
) -> Result<StatusCode, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    state
        .file_service()
        .share(auth.email(), file_id, &payload.email, payload.id)
        .await?;

    Ok(StatusCode::CREATED)
}

/// POST `/files/search`
/// Search the caller's own active files by name and/or MIME type.
async fn search_files(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<Vec<FileResponse>>, ApiError> {
    let params = SearchParams {
        name: payload.name,
        file_type: payload.file_type,
    };

    let views = state.file_service().search(auth.user_id(), params).await?;
    Ok(Json(views.into_iter().map(FileResponse::from).collect()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, header::AUTHORIZATION};
    use chrono::Utc;
    use http_body_util::BodyExt;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use sea_orm::DatabaseConnection;
    use tower::ServiceExt;

    use super::*;
    use crate::create_router;
    use filebay_core::storage::OpendalStore;
    use filebay_shared::config::{AuthConfig, StorageConfig, StorageProvider};
    use filebay_shared::{Claims, TokenVerifier};

    const TEST_SECRET: &str = "router-test-secret";

    /// State over a disconnected database and temp-dir storage. Good enough
    /// for middleware and error-mapping tests; no query can succeed.
    fn test_state() -> AppState {
        let root = std::env::temp_dir().join(format!("filebay-api-{}", Uuid::new_v4()));
        let storage = StorageConfig::new(StorageProvider::local_fs(root));
        let auth = AuthConfig {
            secret: TEST_SECRET.to_string(),
            issuer: None,
        };

        AppState {
            db: Arc::new(DatabaseConnection::default()),
            verifier: Arc::new(TokenVerifier::new(&auth)),
            storage: Arc::new(OpendalStore::from_config(&storage).unwrap()),
            retention_days: 15,
        }
    }

    fn sign_token(secret: &str, exp_offset_secs: i64) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "user-1".to_string(),
            email: "user1@example.com".to_string(),
            iat: now - 60,
            exp: now + exp_offset_secs,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    async fn error_code(response: axum::response::Response) -> String {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        json["error"]["code"].as_str().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn test_list_files_no_token_is_401() {
        let app = create_router(test_state());

        let response = app
            .oneshot(Request::builder().uri("/files").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(response).await, "MISSING_TOKEN");
    }

    #[tokio::test]
    async fn test_expired_token_is_401() {
        let app = create_router(test_state());
        let token = sign_token(TEST_SECRET, -3600);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/files")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(response).await, "TOKEN_EXPIRED");
    }

    #[tokio::test]
    async fn test_wrong_secret_token_is_401() {
        let app = create_router(test_state());
        let token = sign_token("some-other-secret", 3600);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/files")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(response).await, "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn test_search_without_filters_is_400() {
        let app = create_router(test_state());
        let token = sign_token(TEST_SECRET, 3600);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/files/search")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .header("Content-Type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "INVALID_SEARCH_PARAMS");
    }

    #[tokio::test]
    async fn test_share_rejects_malformed_email() {
        let app = create_router(test_state());
        let token = sign_token(TEST_SECRET, 3600);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/files/{}/share", Uuid::new_v4()))
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .header("Content-Type", "application/json")
                    .body(Body::from(format!(
                        r#"{{"email":"not-an-email","id":"{}"}}"#,
                        Uuid::new_v4()
                    )))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_repository_failure_maps_to_unknown_error() {
        // Disconnected pool: the first query fails and must surface as a
        // generic 500 without leaking the cause
        let app = create_router(test_state());
        let token = sign_token(TEST_SECRET, 3600);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/files")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_code(response).await, "UNKNOWN_ERROR");
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let app = create_router(test_state());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
