//! 用户直接授权实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_permissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub permission_id: i64,
    pub valid_from: Option<i64>,
    pub valid_until: Option<i64>,
    pub granted_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::permissions::Entity",
        from = "Column::PermissionId",
        to = "super::permissions::Column::Id"
    )]
    Permission,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::permissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Permission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_grant(self) -> crate::models::permissions::entities::UserPermissionGrant {
        use crate::models::permissions::entities::{UserPermissionGrant, ValidityWindow};

        UserPermissionGrant {
            id: self.id,
            user_id: self.user_id,
            permission_id: self.permission_id,
            window: ValidityWindow {
                valid_from: self.valid_from.map(super::to_datetime),
                valid_until: self.valid_until.map(super::to_datetime),
            },
            granted_at: super::to_datetime(self.granted_at),
        }
    }
}
