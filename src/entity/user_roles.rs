//! 用户角色分配实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_roles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub role_id: i64,
    pub valid_from: Option<i64>,
    pub valid_until: Option<i64>,
    pub assigned_at: i64,
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
        belongs_to = "super::roles::Entity",
        from = "Column::RoleId",
        to = "super::roles::Column::Id"
    )]
    Role,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::roles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_assignment(self) -> crate::models::permissions::entities::UserRoleAssignment {
        use crate::models::permissions::entities::{UserRoleAssignment, ValidityWindow};

        UserRoleAssignment {
            id: self.id,
            user_id: self.user_id,
            role_id: self.role_id,
            window: ValidityWindow {
                valid_from: self.valid_from.map(super::to_datetime),
                valid_until: self.valid_until.map(super::to_datetime),
            },
            assigned_at: super::to_datetime(self.assigned_at),
        }
    }
}
