//! `SeaORM` entity definitions.

pub mod files;
pub mod shared_files;
pub mod users;
