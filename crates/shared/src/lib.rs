//! Shared types, configuration, and token verification for Filebay.
//!
//! This crate provides common types used across all other crates:
//! - Application configuration management
//! - Bearer-token verification producing a caller identity
//! - Pagination types for list endpoints

pub mod auth;
pub mod config;
pub mod page;
pub mod token;

pub use auth::{Claims, Identity};
pub use config::AppConfig;
pub use page::Page;
pub use token::{TokenError, TokenVerifier};
