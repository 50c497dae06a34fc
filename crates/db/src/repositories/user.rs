//! User repository for database operations.
//!
//! Users mirror the external identity provider; registration is an upsert
//! keyed on the provider subject.

use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::debug;

use crate::entities::users;
use filebay_core::file::{FileError, UserRecord, UserStore};

/// User repository implementation.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Register a user, updating the stored email when the id already
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns a repository error if the upsert fails.
    pub async fn upsert(&self, user: UserRecord) -> Result<(), FileError> {
        // created_at stays NotSet so the column default applies
        let active_model = users::ActiveModel {
            id: Set(user.id.clone()),
            email: Set(user.email),
            ..Default::default()
        };

        users::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(users::Column::Id)
                    .update_column(users::Column::Email)
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| FileError::repository(e.to_string()))?;

        debug!(user_id = %user.id, "user registered");
        Ok(())
    }
}

impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, FileError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| FileError::repository(e.to_string()))?;

        Ok(model.map(|m| UserRecord {
            id: m.id,
            email: m.email,
        }))
    }
}
