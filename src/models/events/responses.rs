use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use super::entities::{Event, EventStatus};
use crate::models::common::PaginationInfo;
use crate::models::users::entities::UserSummary;

/// 活动视图（附带派生状态和报名情况）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/event.ts")]
pub struct EventItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub event: Event,
    pub status: EventStatus,
    pub registered_count: i64,
    pub remaining_seats: Option<i64>,
}

impl EventItem {
    pub fn at(event: Event, registered_count: i64, now: DateTime<Utc>) -> Self {
        let status = event.status_at(now);
        let remaining_seats = event.remaining_seats(registered_count);
        Self {
            event,
            status,
            registered_count,
            remaining_seats,
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/event.ts")]
pub struct EventListResponse {
    pub items: Vec<EventItem>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/event.ts")]
pub struct EventRegistration {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/event.ts")]
pub struct EventAttendee {
    pub registration_id: i64,
    pub user: UserSummary,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/event.ts")]
pub struct EventAttendeeListResponse {
    pub event_id: i64,
    pub items: Vec<EventAttendee>,
}
