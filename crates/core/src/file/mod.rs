//! File lifecycle orchestration.
//!
//! All policy on top of metadata and object storage lives here:
//! - Upload validation (batch size, supported MIME set)
//! - Ownership checks for mutation, soft-delete/restore semantics
//! - Share grants and cascading revocation
//! - Retention purge of aged soft-deleted files
//! - Signed-URL annotation for reads

mod error;
mod mime;
mod service;
mod types;

pub use error::FileError;
pub use mime::{SUPPORTED_MIME_TYPES, is_supported_mime};
pub use service::{FileRepository, FileService, UserStore, MAX_FILES_PER_UPLOAD};
pub use types::{
    FileRecord, FileView, NewFileRecord, NewShare, PurgeOutcome, SearchParams, UploadItem,
    UserRecord,
};
