//! Object store implementation using Apache OpenDAL.

use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use opendal::{ErrorKind, Operator, services};

use filebay_shared::config::{StorageConfig, StorageProvider};

use super::error::StorageError;

/// A time-limited signed URL granting read access to a blob.
#[derive(Debug, Clone)]
pub struct SignedUrl {
    /// The signed URL.
    pub url: String,
    /// When the URL expires.
    pub expires_at: DateTime<Utc>,
}

/// Narrow object-store contract consumed by the orchestration service.
///
/// Implemented by [`OpendalStore`] in production and by in-memory fakes in
/// tests.
pub trait ObjectStore: Send + Sync {
    /// Store a blob under `key` with the given content type.
    fn write(
        &self,
        key: &str,
        payload: Bytes,
        content_type: &str,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;

    /// Issue a signed URL for inline viewing of the blob.
    fn presign_view(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<SignedUrl, StorageError>> + Send;

    /// Issue a signed URL that downloads the blob as an attachment named
    /// `filename`.
    fn presign_download(
        &self,
        key: &str,
        filename: &str,
    ) -> impl std::future::Future<Output = Result<SignedUrl, StorageError>> + Send;

    /// Delete the blob under `key`.
    fn delete(&self, key: &str) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;

    /// Check whether a blob exists under `key`.
    fn exists(&self, key: &str) -> impl std::future::Future<Output = bool> + Send;
}

/// Object store backed by an OpenDAL operator.
pub struct OpendalStore {
    operator: Operator,
    signed_url_ttl: Duration,
}

impl OpendalStore {
    /// Create a new object store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self {
            operator,
            signed_url_ttl: Duration::from_secs(config.signed_url_ttl_secs),
        })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
        }
    }

    fn expires_at(&self) -> DateTime<Utc> {
        Utc::now()
            + chrono::Duration::seconds(
                i64::try_from(self.signed_url_ttl.as_secs()).unwrap_or(i64::MAX),
            )
    }
}

impl ObjectStore for OpendalStore {
    async fn write(
        &self,
        key: &str,
        payload: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.operator
            .write_with(key, payload)
            .content_type(content_type)
            .await
            .map(|_| ())
            .map_err(StorageError::from)
    }

    async fn presign_view(&self, key: &str) -> Result<SignedUrl, StorageError> {
        let expires_at = self.expires_at();
        let presigned = self
            .operator
            .presign_read(key, self.signed_url_ttl)
            .await
            .map_err(StorageError::from)?;

        Ok(SignedUrl {
            url: presigned.uri().to_string(),
            expires_at,
        })
    }

    async fn presign_download(&self, key: &str, filename: &str) -> Result<SignedUrl, StorageError> {
        let expires_at = self.expires_at();
        let disposition = format!("attachment; filename=\"{filename}\"");
        let presigned = self
            .operator
            .presign_read_with(key, self.signed_url_ttl)
            .override_content_disposition(&disposition)
            .await
            .map_err(StorageError::from)?;

        Ok(SignedUrl {
            url: presigned.uri().to_string(),
            expires_at,
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.operator.delete(key).await.map_err(StorageError::from)
    }

    async fn exists(&self, key: &str) -> bool {
        match self.operator.stat(key).await {
            Ok(_) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_store() -> OpendalStore {
        let root = std::env::temp_dir().join(format!("filebay-store-{}", uuid::Uuid::new_v4()));
        let config = StorageConfig::new(StorageProvider::local_fs(root));
        OpendalStore::from_config(&config).expect("should create store")
    }

    #[tokio::test]
    async fn test_write_and_exists() {
        let store = local_store();
        assert!(!store.exists("some-key").await);

        store
            .write("some-key", Bytes::from_static(b"payload"), "text/plain")
            .await
            .unwrap();
        assert!(store.exists("some-key").await);
    }

    #[tokio::test]
    async fn test_delete_removes_blob() {
        let store = local_store();
        store
            .write("victim", Bytes::from_static(b"bytes"), "application/json")
            .await
            .unwrap();

        store.delete("victim").await.unwrap();
        assert!(!store.exists("victim").await);
    }

    #[tokio::test]
    async fn test_presign_unsupported_on_local_fs() {
        let store = local_store();
        let result = store.presign_view("anything").await;
        assert!(matches!(result, Err(StorageError::PresignNotSupported)));
    }

    #[tokio::test]
    async fn test_exists_false_for_missing_key() {
        let store = local_store();
        assert!(!store.exists(&uuid::Uuid::new_v4().to_string()).await);
    }
}
