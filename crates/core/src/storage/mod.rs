//! Object store adapter backed by Apache OpenDAL.
//!
//! Blobs are keyed by file id. The adapter exposes the narrow contract the
//! orchestration service needs: raw writes, time-boxed signed read URLs
//! (inline view and attachment download), and deletes.
//!
//! Supported backends:
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3, DigitalOcean Spaces
//! - Azure Blob Storage
//! - Local filesystem (development only; presigning unsupported)

mod error;
mod service;

pub use error::StorageError;
pub use service::{ObjectStore, OpendalStore, SignedUrl};
