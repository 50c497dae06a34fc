//! Repository implementations of the core persistence traits.

mod file;
mod user;

pub use file::FileRepository;
pub use user::UserRepository;
