//! File orchestration service implementation.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures::future;
use tracing::{info, warn};
use uuid::Uuid;

use filebay_shared::Page;

use super::error::FileError;
use super::mime::is_supported_mime;
use super::types::{
    FileRecord, FileView, NewFileRecord, NewShare, PurgeOutcome, SearchParams, UploadItem,
    UserRecord,
};
use crate::storage::{ObjectStore, StorageError};

/// Maximum number of files accepted in a single upload call.
pub const MAX_FILES_PER_UPLOAD: usize = 10;

/// Repository trait for file metadata and share persistence.
///
/// This trait is implemented by the db crate to provide actual database
/// operations.
pub trait FileRepository: Send + Sync {
    /// Insert a new file record.
    fn insert(
        &self,
        input: NewFileRecord,
    ) -> impl std::future::Future<Output = Result<FileRecord, FileError>> + Send;

    /// Find a file by id regardless of owner or soft-delete state.
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<FileRecord>, FileError>> + Send;

    /// Find a file by id and owner, regardless of soft-delete state.
    fn find_owned(
        &self,
        id: Uuid,
        owner_user_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<FileRecord>, FileError>> + Send;

    /// List active files visible to a user: owned plus shared-with, ordered
    /// by `updated_at` descending, paginated over the combined set.
    fn list_visible(
        &self,
        user_id: &str,
        page: Page,
    ) -> impl std::future::Future<Output = Result<Vec<FileRecord>, FileError>> + Send;

    /// Search the user's own active files by optional name substring
    /// (case-insensitive) and/or exact MIME type.
    fn search_owned(
        &self,
        user_id: &str,
        name: Option<&str>,
        mime_type: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Vec<FileRecord>, FileError>> + Send;

    /// Flip the soft-delete flag, bumping `updated_at`.
    fn set_soft_deleted(
        &self,
        id: Uuid,
        soft_deleted: bool,
    ) -> impl std::future::Future<Output = Result<(), FileError>> + Send;

    /// Physically delete a file record.
    fn delete(&self, id: Uuid) -> impl std::future::Future<Output = Result<(), FileError>> + Send;

    /// Find soft-deleted records whose `updated_at` is older than `cutoff`.
    fn find_purgeable(
        &self,
        cutoff: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<Vec<FileRecord>, FileError>> + Send;

    /// Insert a share grant. A duplicate (user, file) pair surfaces as a
    /// repository error.
    fn insert_share(
        &self,
        share: NewShare,
    ) -> impl std::future::Future<Output = Result<(), FileError>> + Send;

    /// Delete all share grants for a file.
    fn revoke_shares(
        &self,
        file_id: Uuid,
    ) -> impl std::future::Future<Output = Result<(), FileError>> + Send;
}

/// User store trait for resolving share grantees.
pub trait UserStore: Send + Sync {
    /// Resolve a user by email.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<UserRecord>, FileError>> + Send;
}

/// File orchestration service: all policy on top of metadata and object
/// storage.
pub struct FileService<S, R, U> {
    store: Arc<S>,
    repo: Arc<R>,
    users: Arc<U>,
    retention_days: i64,
}

impl<S, R, U> FileService<S, R, U>
where
    S: ObjectStore,
    R: FileRepository,
    U: UserStore,
{
    /// Default retention window for soft-deleted files.
    pub const DEFAULT_RETENTION_DAYS: i64 = 15;

    /// Create a new file service.
    #[must_use]
    pub fn new(store: Arc<S>, repo: Arc<R>, users: Arc<U>) -> Self {
        Self {
            store,
            repo,
            users,
            retention_days: Self::DEFAULT_RETENTION_DAYS,
        }
    }

    /// Override the retention window.
    #[must_use]
    pub fn with_retention_days(mut self, days: i64) -> Self {
        self.retention_days = days;
        self
    }

    /// List files visible to the user: own active files plus active files
    /// shared with them, newest mutation first.
    ///
    /// Every row is annotated with fresh signed view and download URLs; URLs
    /// are never persisted and expire 15 minutes from generation.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository or signed-URL issuance fails.
    pub async fn list(&self, user_id: &str, page: Page) -> Result<Vec<FileView>, FileError> {
        let records = self.repo.list_visible(user_id, page).await?;
        future::try_join_all(
            records
                .into_iter()
                .map(|record| self.annotate(record, user_id, true)),
        )
        .await
    }

    /// Fetch a single file by id.
    ///
    /// Only the owner may fetch by id; shares are deliberately not consulted
    /// here (the list endpoint is the broader read surface).
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` if no record exists and `NotAuthorized` if the
    /// caller does not own it.
    pub async fn get(&self, file_id: Uuid, user_id: &str) -> Result<FileView, FileError> {
        let record = self
            .repo
            .find_by_id(file_id)
            .await?
            .ok_or(FileError::FileNotFound(file_id))?;

        if record.owner_user_id != user_id {
            return Err(FileError::NotAuthorized {
                user_id: user_id.to_string(),
            });
        }

        self.annotate(record, user_id, false).await
    }

    /// Upload a batch of files.
    ///
    /// The batch size is checked before any blob write. Accepted files are
    /// processed independently and concurrently: unsupported MIME types fail
    /// that file only, and a failure does not roll back committed siblings.
    /// The first error is surfaced after all files have settled.
    ///
    /// # Errors
    ///
    /// Returns `MaxFilesExceeded`, `UnsupportedMimeType`, or a
    /// storage/repository error.
    pub async fn upload(
        &self,
        items: Vec<UploadItem>,
        user_id: &str,
        description: Option<String>,
    ) -> Result<(), FileError> {
        if items.len() > MAX_FILES_PER_UPLOAD {
            return Err(FileError::MaxFilesExceeded {
                limit: MAX_FILES_PER_UPLOAD,
            });
        }

        let results = future::join_all(
            items
                .into_iter()
                .map(|item| self.upload_one(item, user_id, description.clone())),
        )
        .await;

        results.into_iter().collect::<Result<Vec<_>, _>>()?;
        Ok(())
    }

    async fn upload_one(
        &self,
        item: UploadItem,
        user_id: &str,
        description: Option<String>,
    ) -> Result<(), FileError> {
        if !is_supported_mime(&item.mime_type) {
            return Err(FileError::UnsupportedMimeType(item.mime_type));
        }

        let id = Uuid::new_v4();
        let size = i64::try_from(item.bytes.len()).unwrap_or(i64::MAX);

        // Blob first, then the record: the record's existence implies the blob
        self.store
            .write(&id.to_string(), item.bytes, &item.mime_type)
            .await?;

        info!(
            file_id = %id,
            mime_type = %item.mime_type,
            size,
            "uploaded file blob"
        );

        self.repo
            .insert(NewFileRecord {
                id,
                owner_user_id: user_id.to_string(),
                mime_type: item.mime_type,
                original_name: item.original_name,
                size,
                description,
            })
            .await?;

        Ok(())
    }

    /// Soft-delete an owned file and revoke all of its shares.
    ///
    /// The blob is untouched; the purge removes it after the retention
    /// window.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundOrNotAuthorized` unless an owned record exists.
    pub async fn delete(&self, file_id: Uuid, user_id: &str) -> Result<(), FileError> {
        self.repo
            .find_owned(file_id, user_id)
            .await?
            .ok_or(FileError::NotFoundOrNotAuthorized)?;

        self.repo.set_soft_deleted(file_id, true).await?;
        self.repo.revoke_shares(file_id).await?;

        info!(file_id = %file_id, "file soft-deleted, shares revoked");
        Ok(())
    }

    /// Restore a soft-deleted owned file.
    ///
    /// Previously revoked shares are not restored.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundOrNotAuthorized` unless an owned record exists.
    pub async fn restore(&self, file_id: Uuid, user_id: &str) -> Result<(), FileError> {
        self.repo
            .find_owned(file_id, user_id)
            .await?
            .ok_or(FileError::NotFoundOrNotAuthorized)?;

        self.repo.set_soft_deleted(file_id, false).await?;
        Ok(())
    }

    /// Purge soft-deleted files older than the retention window.
    ///
    /// Blob first, then record. A blob delete failure (other than not-found)
    /// retains the record so the pair can be reconciled later instead of
    /// orphaning the blob silently.
    ///
    /// # Errors
    ///
    /// Returns an error if the candidate scan or a record delete fails.
    pub async fn purge_deleted(&self) -> Result<PurgeOutcome, FileError> {
        let cutoff = Utc::now() - Duration::days(self.retention_days);
        let candidates = self.repo.find_purgeable(cutoff).await?;

        let results = future::join_all(
            candidates
                .into_iter()
                .map(|record| self.purge_one(record)),
        )
        .await;

        let mut outcome = PurgeOutcome::default();
        for result in results {
            if result? {
                outcome.purged += 1;
            } else {
                outcome.retained += 1;
            }
        }

        info!(
            purged = outcome.purged,
            retained = outcome.retained,
            "purge run complete"
        );
        Ok(outcome)
    }

    /// Returns true when the record was fully removed.
    async fn purge_one(&self, record: FileRecord) -> Result<bool, FileError> {
        let key = record.id.to_string();
        match self.store.delete(&key).await {
            Ok(()) | Err(StorageError::NotFound { .. }) => {
                self.repo.delete(record.id).await?;
                info!(file_id = %record.id, "purged aged soft-deleted file");
                Ok(true)
            }
            Err(e) => {
                warn!(
                    blob_key = %key,
                    error = %e,
                    "blob delete failed; record retained for reconciliation"
                );
                Ok(false)
            }
        }
    }

    /// Grant read access on a file to the user registered under
    /// `grantee_email`.
    ///
    /// Note: sharer ownership of the file is not verified, matching the
    /// established API contract.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if no user has that email; a duplicate
    /// (user, file) pair surfaces as a repository error.
    pub async fn share(
        &self,
        sharer_email: &str,
        file_id: Uuid,
        grantee_email: &str,
        share_id: Uuid,
    ) -> Result<(), FileError> {
        let grantee = self
            .users
            .find_by_email(grantee_email)
            .await?
            .ok_or_else(|| FileError::UserNotFound(grantee_email.to_string()))?;

        let grantee_id = grantee.id;
        self.repo
            .insert_share(NewShare {
                id: share_id,
                file_id,
                owner_email: sharer_email.to_string(),
                user_id: grantee_id.clone(),
            })
            .await?;

        info!(file_id = %file_id, grantee = %grantee_id, "file shared");
        Ok(())
    }

    /// Search the caller's own active files.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSearchParams` when both filters are absent.
    pub async fn search(
        &self,
        user_id: &str,
        params: SearchParams,
    ) -> Result<Vec<FileView>, FileError> {
        if params.is_empty() {
            return Err(FileError::InvalidSearchParams);
        }

        // An empty string never reaches the repository as a filter
        let name = params.name.as_deref().filter(|s| !s.is_empty());
        let file_type = params.file_type.as_deref().filter(|s| !s.is_empty());
        let records = self.repo.search_owned(user_id, name, file_type).await?;

        future::try_join_all(
            records
                .into_iter()
                .map(|record| self.annotate(record, user_id, true)),
        )
        .await
    }

    /// Annotate a record with fresh signed URLs and the shared flag.
    async fn annotate(
        &self,
        record: FileRecord,
        user_id: &str,
        with_download: bool,
    ) -> Result<FileView, FileError> {
        let key = record.id.to_string();
        let view = self.store.presign_view(&key).await?;
        let download_url = if with_download {
            Some(
                self.store
                    .presign_download(&key, &record.original_name)
                    .await?
                    .url,
            )
        } else {
            None
        };
        let is_shared = record.owner_user_id != user_id;

        Ok(FileView {
            record,
            signed_url: view.url,
            download_url,
            is_shared,
        })
    }
}
