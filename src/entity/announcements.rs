//! 公告实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "announcements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub summary: String,
    pub image_url: Option<String>,
    pub publish_at: i64,
    pub expires_at: Option<i64>,
    pub for_students: bool,
    pub for_teachers: bool,
    pub for_parents: bool,
    pub author_id: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AuthorId",
        to = "super::users::Column::Id"
    )]
    Author,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_announcement(self) -> crate::models::announcements::entities::Announcement {
        crate::models::announcements::entities::Announcement {
            id: self.id,
            title: self.title,
            content: self.content,
            summary: self.summary,
            image_url: self.image_url,
            publish_at: super::to_datetime(self.publish_at),
            expires_at: self.expires_at.map(super::to_datetime),
            for_students: self.for_students,
            for_teachers: self.for_teachers,
            for_parents: self.for_parents,
            author_id: self.author_id,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
