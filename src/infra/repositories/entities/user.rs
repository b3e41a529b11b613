//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{User, UserRole};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password: Option<String>,
    pub img: Option<String>,
    pub role: String,
    pub status: bool,
    pub email_validated: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        let role = model.role.parse().unwrap_or_else(|_| {
            tracing::warn!(user_id = %model.id, role = %model.role, "Unknown stored role, treating as user");
            UserRole::User
        });

        User {
            id: model.id,
            name: model.name,
            email: model.email,
            password: model.password,
            img: model.img,
            role,
            status: model.status,
            email_validated: model.email_validated,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
