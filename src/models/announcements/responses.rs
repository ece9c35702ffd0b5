use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use super::entities::{Announcement, AnnouncementStatus, Audience};
use crate::models::common::PaginationInfo;

/// 公告视图（附带派生状态）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct AnnouncementItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub announcement: Announcement,
    pub status: AnnouncementStatus,
    pub audiences: Vec<Audience>,
}

impl AnnouncementItem {
    pub fn at(announcement: Announcement, now: DateTime<Utc>) -> Self {
        let status = announcement.status_at(now);
        let audiences = announcement.audiences();
        Self {
            announcement,
            status,
            audiences,
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct AnnouncementListResponse {
    pub items: Vec<AnnouncementItem>,
    pub pagination: PaginationInfo,
}
