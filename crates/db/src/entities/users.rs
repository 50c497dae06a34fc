//! `SeaORM` Entity for the users table.
//!
//! User ids are the opaque subjects minted by the external identity
//! provider, not UUIDs.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub email: String,
    pub created_at: DateTimeWithTimeZone,
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
