//! `SeaORM` Entity for the files table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "files")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_user_id: String,
    pub mime_type: String,
    pub original_name: String,
    pub size: i64,
    pub description: Option<String>,
    pub soft_deleted: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::shared_files::Entity")]
    SharedFiles,
}

impl Related<super::shared_files::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SharedFiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
