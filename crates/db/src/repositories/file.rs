//! File repository for database operations.
//!
//! Implements file metadata and share persistence using SeaORM.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, QueryFilter,
    QueryOrder, Set, Statement,
};
use uuid::Uuid;

use crate::entities::{files, shared_files};
use filebay_core::file::{
    FileError, FileRecord, FileRepository as FileRepoTrait, NewFileRecord, NewShare,
};
use filebay_shared::Page;

/// Visible set for a user: own active files plus active files shared with
/// them, ordered by last mutation, paginated over the combined rows.
const LIST_VISIBLE_SQL: &str = r"
SELECT f.* FROM files f
WHERE f.owner_user_id = $1 AND f.soft_deleted = FALSE
UNION ALL
SELECT f.* FROM files f
JOIN shared_files s ON s.file_id = f.id
WHERE s.user_id = $1 AND f.soft_deleted = FALSE
ORDER BY updated_at DESC
LIMIT $2 OFFSET $3
";

/// File repository implementation.
#[derive(Debug, Clone)]
pub struct FileRepository {
    db: DatabaseConnection,
}

impl FileRepository {
    /// Create a new file repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn list_visible_statement(user_id: &str, page: Page) -> Statement {
    let take = i64::try_from(page.take).unwrap_or(i64::MAX);
    let skip = i64::try_from(page.skip).unwrap_or(i64::MAX);
    Statement::from_sql_and_values(
        DbBackend::Postgres,
        LIST_VISIBLE_SQL,
        [user_id.into(), take.into(), skip.into()],
    )
}

impl FileRepoTrait for FileRepository {
    async fn insert(&self, input: NewFileRecord) -> Result<FileRecord, FileError> {
        let now = Utc::now();
        let active_model = files::ActiveModel {
            id: Set(input.id),
            owner_user_id: Set(input.owner_user_id),
            mime_type: Set(input.mime_type),
            original_name: Set(input.original_name),
            size: Set(input.size),
            description: Set(input.description),
            soft_deleted: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| FileError::repository(e.to_string()))?;

        Ok(to_domain(model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>, FileError> {
        let model = files::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| FileError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn find_owned(
        &self,
        id: Uuid,
        owner_user_id: &str,
    ) -> Result<Option<FileRecord>, FileError> {
        let model = files::Entity::find_by_id(id)
            .filter(files::Column::OwnerUserId.eq(owner_user_id))
            .one(&self.db)
            .await
            .map_err(|e| FileError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn list_visible(&self, user_id: &str, page: Page) -> Result<Vec<FileRecord>, FileError> {
        let models = files::Entity::find()
            .from_raw_sql(list_visible_statement(user_id, page))
            .all(&self.db)
            .await
            .map_err(|e| FileError::repository(e.to_string()))?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn search_owned(
        &self,
        user_id: &str,
        name: Option<&str>,
        mime_type: Option<&str>,
    ) -> Result<Vec<FileRecord>, FileError> {
        let mut query = files::Entity::find()
            .filter(files::Column::OwnerUserId.eq(user_id))
            .filter(files::Column::SoftDeleted.eq(false));

        if let Some(name) = name {
            let pattern = format!("%{}%", escape_like(name));
            query = query.filter(Expr::col(files::Column::OriginalName).ilike(pattern));
        }
        if let Some(mime_type) = mime_type {
            query = query.filter(files::Column::MimeType.eq(mime_type));
        }

        let models = query
            .order_by_desc(files::Column::UpdatedAt)
            .all(&self.db)
            .await
            .map_err(|e| FileError::repository(e.to_string()))?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn set_soft_deleted(&self, id: Uuid, soft_deleted: bool) -> Result<(), FileError> {
        files::Entity::update_many()
            .col_expr(files::Column::SoftDeleted, Expr::value(soft_deleted))
            .col_expr(files::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(files::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| FileError::repository(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), FileError> {
        files::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| FileError::repository(e.to_string()))?;

        Ok(())
    }

    async fn find_purgeable(&self, cutoff: DateTime<Utc>) -> Result<Vec<FileRecord>, FileError> {
        let models = files::Entity::find()
            .filter(files::Column::SoftDeleted.eq(true))
            .filter(files::Column::UpdatedAt.lt(cutoff))
            .all(&self.db)
            .await
            .map_err(|e| FileError::repository(e.to_string()))?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn insert_share(&self, share: NewShare) -> Result<(), FileError> {
        let active_model = shared_files::ActiveModel {
            id: Set(share.id),
            file_id: Set(share.file_id),
            owner_email: Set(share.owner_email),
            user_id: Set(share.user_id),
            ..Default::default()
        };

        active_model
            .insert(&self.db)
            .await
            .map_err(|e| FileError::repository(e.to_string()))?;

        Ok(())
    }

    async fn revoke_shares(&self, file_id: Uuid) -> Result<(), FileError> {
        shared_files::Entity::delete_many()
            .filter(shared_files::Column::FileId.eq(file_id))
            .exec(&self.db)
            .await
            .map_err(|e| FileError::repository(e.to_string()))?;

        Ok(())
    }
}

/// Escape LIKE metacharacters so a search term matches literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Convert database model to domain model.
fn to_domain(model: files::Model) -> FileRecord {
    FileRecord {
        id: model.id,
        owner_user_id: model.owner_user_id,
        mime_type: model.mime_type,
        original_name: model.original_name,
        size: model.size,
        description: model.description,
        soft_deleted: model.soft_deleted,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_visible_statement_binds_user_and_page() {
        let stmt = list_visible_statement("user-abc", Page { take: 20, skip: 40 });

        assert!(stmt.sql.contains("UNION ALL"));
        assert!(stmt.sql.contains("ORDER BY updated_at DESC"));
        assert!(stmt.sql.contains("LIMIT $2"));
        assert!(stmt.sql.contains("OFFSET $3"));

        let values = stmt.values.expect("statement carries bound values");
        assert_eq!(
            values.0,
            vec![
                sea_orm::Value::from("user-abc"),
                sea_orm::Value::from(20_i64),
                sea_orm::Value::from(40_i64),
            ]
        );
    }

    #[test]
    fn test_escape_like_neutralizes_wildcards() {
        assert_eq!(escape_like("100%_done"), "100\\%\\_done");
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }
}
