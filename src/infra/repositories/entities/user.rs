//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{User, UserStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<Date>,
    pub status: String,
    pub password: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::refresh_token::Entity")]
    RefreshToken,
}

impl Related<super::refresh_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RefreshToken.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            email: model.email,
            phone: model.phone,
            gender: model.gender.and_then(|g| g.parse().ok()),
            first_name: model.first_name,
            last_name: model.last_name,
            birth_date: model.birth_date,
            // Unknown values fail closed
            status: model.status.parse().unwrap_or(UserStatus::Deactive),
            password_hash: model.password,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
