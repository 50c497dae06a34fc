//! Initial schema: users, files, and share grants.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(INITIAL_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS shared_files CASCADE;
             DROP TABLE IF EXISTS files CASCADE;
             DROP TABLE IF EXISTS users CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const INITIAL_SQL: &str = r"
-- Users mirror the external identity provider; id is the provider subject
CREATE TABLE users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Share grantees are looked up by email
CREATE INDEX idx_users_email ON users(email);

-- File metadata; the blob lives in object storage under the id as key
CREATE TABLE files (
    id UUID PRIMARY KEY,
    owner_user_id TEXT NOT NULL,
    mime_type TEXT NOT NULL,
    original_name TEXT NOT NULL,
    size BIGINT NOT NULL,
    description TEXT,
    soft_deleted BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Index for listing and searching a user's active files
CREATE INDEX idx_files_owner ON files(owner_user_id, soft_deleted);

-- Index for the retention purge scan
CREATE INDEX idx_files_purge ON files(soft_deleted, updated_at);

-- Share grants; removing a file removes its grants
CREATE TABLE shared_files (
    id UUID PRIMARY KEY,
    file_id UUID NOT NULL REFERENCES files(id) ON DELETE CASCADE,
    owner_email TEXT NOT NULL,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_shared_files_user_file UNIQUE (user_id, file_id)
);

-- Index for resolving files shared with a user
CREATE INDEX idx_shared_files_user ON shared_files(user_id);
";
