//! 活动实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub event_type: String,
    pub start_at: i64,
    pub end_at: i64,
    pub all_day: bool,
    pub location: Option<String>,
    pub modality: String,
    pub meeting_url: Option<String>,
    pub requires_registration: bool,
    pub capacity: Option<i32>,
    pub registration_deadline: Option<i64>,
    pub cancelled: bool,
    pub organizer_id: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OrganizerId",
        to = "super::users::Column::Id"
    )]
    Organizer,
    #[sea_orm(has_many = "super::event_registrations::Entity")]
    Registrations,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organizer.def()
    }
}

impl Related<super::event_registrations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registrations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_event(self) -> crate::models::events::entities::Event {
        use crate::models::events::entities::{Event, EventModality, EventType};

        Event {
            id: self.id,
            title: self.title,
            description: self.description,
            event_type: self
                .event_type
                .parse::<EventType>()
                .unwrap_or(EventType::Other),
            start_at: super::to_datetime(self.start_at),
            end_at: super::to_datetime(self.end_at),
            all_day: self.all_day,
            location: self.location,
            modality: self
                .modality
                .parse::<EventModality>()
                .unwrap_or(EventModality::InPerson),
            meeting_url: self.meeting_url,
            requires_registration: self.requires_registration,
            capacity: self.capacity,
            registration_deadline: self.registration_deadline.map(super::to_datetime),
            cancelled: self.cancelled,
            organizer_id: self.organizer_id,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
