//! Error-to-HTTP mapping for the API surface.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use filebay_core::file::FileError;

/// API-level error: either a domain failure or a malformed request.
#[derive(Debug)]
pub enum ApiError {
    /// Domain error from the file service.
    Domain(FileError),
    /// Request body failed validation before reaching the service.
    Validation(String),
}

impl From<FileError> for ApiError {
    fn from(err: FileError) -> Self {
        Self::Domain(err)
    }
}

/// Stable error code and status for each domain failure. Matched
/// exhaustively so a new variant cannot ship without a mapping.
fn domain_mapping(err: &FileError) -> (StatusCode, &'static str, String) {
    match err {
        FileError::MaxFilesExceeded { limit } => (
            StatusCode::BAD_REQUEST,
            "MAXIMUM_FILES_EXCEEDED",
            format!("At most {limit} files can be uploaded at once"),
        ),
        FileError::UnsupportedMimeType(mime) => (
            StatusCode::BAD_REQUEST,
            "UNSUPPORTED_MIME_TYPE",
            format!("File type {mime} is not supported"),
        ),
        FileError::FileNotFound(_) => (
            StatusCode::NOT_FOUND,
            "FILE_NOT_FOUND",
            "File not found".to_string(),
        ),
        FileError::NotAuthorized { .. } => (
            StatusCode::FORBIDDEN,
            "NOT_AUTHORIZED",
            "You are not allowed to access this file".to_string(),
        ),
        FileError::NotFoundOrNotAuthorized => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND_OR_NOT_AUTHORIZED",
            "File not found or not owned by you".to_string(),
        ),
        FileError::UserNotFound(email) => (
            StatusCode::NOT_FOUND,
            "USER_NOT_FOUND",
            format!("No user is registered with email {email}"),
        ),
        FileError::InvalidSearchParams => (
            StatusCode::BAD_REQUEST,
            "INVALID_SEARCH_PARAMS",
            "Provide a name or a fileType to search by".to_string(),
        ),
        FileError::Storage(_) | FileError::Repository(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "UNKNOWN_ERROR",
            "An internal error occurred".to_string(),
        ),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            Self::Domain(err) => {
                if matches!(err, FileError::Storage(_) | FileError::Repository(_)) {
                    // Cause stays server-side; the client sees a generic code
                    error!(error = %err, "internal error");
                }
                domain_mapping(err)
            }
        };

        (
            status,
            Json(json!({ "error": { "code": code, "message": message } })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn code_of(err: &FileError) -> (StatusCode, &'static str) {
        let (status, code, _) = domain_mapping(err);
        (status, code)
    }

    #[test]
    fn test_domain_mapping_statuses() {
        assert_eq!(
            code_of(&FileError::MaxFilesExceeded { limit: 10 }),
            (StatusCode::BAD_REQUEST, "MAXIMUM_FILES_EXCEEDED")
        );
        assert_eq!(
            code_of(&FileError::UnsupportedMimeType("text/html".into())),
            (StatusCode::BAD_REQUEST, "UNSUPPORTED_MIME_TYPE")
        );
        assert_eq!(
            code_of(&FileError::FileNotFound(Uuid::new_v4())),
            (StatusCode::NOT_FOUND, "FILE_NOT_FOUND")
        );
        assert_eq!(
            code_of(&FileError::NotAuthorized {
                user_id: "u".into()
            }),
            (StatusCode::FORBIDDEN, "NOT_AUTHORIZED")
        );
        assert_eq!(
            code_of(&FileError::NotFoundOrNotAuthorized),
            (StatusCode::NOT_FOUND, "NOT_FOUND_OR_NOT_AUTHORIZED")
        );
        assert_eq!(
            code_of(&FileError::UserNotFound("a@b.c".into())),
            (StatusCode::NOT_FOUND, "USER_NOT_FOUND")
        );
        assert_eq!(
            code_of(&FileError::InvalidSearchParams),
            (StatusCode::BAD_REQUEST, "INVALID_SEARCH_PARAMS")
        );
        assert_eq!(
            code_of(&FileError::repository("boom")),
            (StatusCode::INTERNAL_SERVER_ERROR, "UNKNOWN_ERROR")
        );
    }

    #[test]
    fn test_internal_message_leaks_no_detail() {
        let (_, _, message) = domain_mapping(&FileError::repository("password=hunter2"));
        assert!(!message.contains("hunter2"));
    }
}
