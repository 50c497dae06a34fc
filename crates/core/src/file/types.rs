//! File domain types and data structures.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// File metadata record.
///
/// `id` is immutable and doubles as the object-store blob key; once an upload
/// completes the record maps 1:1 to exactly one blob.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Unique identifier, also the blob key.
    pub id: Uuid,
    /// Owning user (identity-provider subject).
    pub owner_user_id: String,
    /// Declared MIME type.
    pub mime_type: String,
    /// Original filename as uploaded.
    pub original_name: String,
    /// Size in bytes.
    pub size: i64,
    /// Optional description applied at upload.
    pub description: Option<String>,
    /// Hidden from lists/search when true; restorable within retention.
    pub soft_deleted: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Advances on every mutation; drives purge eligibility.
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a new file record.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    /// Pre-generated file id (= blob key).
    pub id: Uuid,
    /// Owning user.
    pub owner_user_id: String,
    /// Declared MIME type.
    pub mime_type: String,
    /// Original filename.
    pub original_name: String,
    /// Size in bytes.
    pub size: i64,
    /// Optional description.
    pub description: Option<String>,
}

/// A single file in an upload batch.
#[derive(Debug, Clone)]
pub struct UploadItem {
    /// Original filename.
    pub original_name: String,
    /// Declared MIME type.
    pub mime_type: String,
    /// Raw file bytes.
    pub bytes: Bytes,
}

/// A file record annotated for a read response.
///
/// Signed URLs are regenerated on every read and never persisted.
#[derive(Debug, Clone)]
pub struct FileView {
    /// The underlying metadata record.
    pub record: FileRecord,
    /// Fresh signed URL for inline viewing.
    pub signed_url: String,
    /// Fresh signed URL with attachment disposition; absent on single-file
    /// fetch.
    pub download_url: Option<String>,
    /// True when the record's owner differs from the requesting user.
    pub is_shared: bool,
}

/// Input for creating a share grant.
#[derive(Debug, Clone)]
pub struct NewShare {
    /// Share row id (client-supplied).
    pub id: Uuid,
    /// The shared file.
    pub file_id: Uuid,
    /// Denormalized email of the sharer.
    pub owner_email: String,
    /// The grantee user id.
    pub user_id: String,
}

/// Registered user, used to resolve an email to an id for sharing.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Identity-provider subject id.
    pub id: String,
    /// Email address.
    pub email: String,
}

/// Search filters over the caller's own active files.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    /// Case-insensitive substring match on the original filename.
    pub name: Option<String>,
    /// Exact match on the MIME type.
    pub file_type: Option<String>,
}

impl SearchParams {
    /// At least one filter must be present for a search to be valid.
    /// An empty string counts as absent, not as a match-everything filter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.as_deref().is_none_or(str::is_empty)
            && self.file_type.as_deref().is_none_or(str::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params_empty_forms() {
        assert!(SearchParams::default().is_empty());
        assert!(
            SearchParams {
                name: Some(String::new()),
                file_type: None,
            }
            .is_empty()
        );
        assert!(
            SearchParams {
                name: Some(String::new()),
                file_type: Some(String::new()),
            }
            .is_empty()
        );
        assert!(
            !SearchParams {
                name: Some("report".to_string()),
                file_type: None,
            }
            .is_empty()
        );
        assert!(
            !SearchParams {
                name: Some(String::new()),
                file_type: Some("application/pdf".to_string()),
            }
            .is_empty()
        );
    }
}

/// Result of a retention purge run.
#[derive(Debug, Clone, Copy, Default)]
pub struct PurgeOutcome {
    /// Records (and blobs) fully removed.
    pub purged: usize,
    /// Records retained because their blob delete failed; kept for
    /// reconciliation.
    pub retained: usize,
}
