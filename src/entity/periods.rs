//! 学期实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "periods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub starts_on: i64,
    pub ends_on: i64,
    pub is_current: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::evaluations::Entity")]
    Evaluations,
}

impl Related<super::evaluations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evaluations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_period(self) -> crate::models::academic::entities::Period {
        crate::models::academic::entities::Period {
            id: self.id,
            name: self.name,
            starts_on: super::to_datetime(self.starts_on),
            ends_on: super::to_datetime(self.ends_on),
            is_current: self.is_current,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
