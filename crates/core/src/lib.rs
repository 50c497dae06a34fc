//! Core business logic for Filebay.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and policy live here.
//!
//! # Modules
//!
//! - `file` - File lifecycle orchestration: upload, listing, sharing,
//!   soft-delete/restore, and retention purge
//! - `storage` - Vendor-agnostic object store adapter and signed URLs

pub mod file;
pub mod storage;
