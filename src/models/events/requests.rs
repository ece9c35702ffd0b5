use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

use super::entities::{EventModality, EventStatus, EventType};
use crate::models::common::PaginationQuery;
use crate::utils::validate::{validate_length, validate_max_length, validate_url};

/// 创建活动请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/event.ts")]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub event_type: EventType,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[serde(default)]
    pub all_day: bool,
    pub location: Option<String>,
    pub modality: EventModality,
    pub meeting_url: Option<String>,
    #[serde(default)]
    pub requires_registration: bool,
    pub capacity: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
}

/// 活动字段的组合校验，创建与更新（合并后）共用
pub struct EventFields<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub location: Option<&'a str>,
    pub modality: EventModality,
    pub meeting_url: Option<&'a str>,
    pub capacity: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
}

impl EventFields<'_> {
    pub fn validate(&self) -> Result<(), String> {
        validate_length("标题", self.title, 3, 200)?;
        validate_max_length("描述", self.description, 5000)?;
        if self.end_at < self.start_at {
            return Err("结束时间不能早于开始时间".to_string());
        }
        if self.modality.needs_meeting_url() {
            match self.meeting_url {
                Some(url) if !url.trim().is_empty() => validate_url("会议链接", url)?,
                _ => return Err("线上或混合活动必须提供会议链接".to_string()),
            }
        }
        if self.modality.needs_location() && self.location.is_none_or(|l| l.trim().is_empty()) {
            return Err("线下或混合活动必须提供地点".to_string());
        }
        if self.capacity.is_some_and(|c| c < 1) {
            return Err("名额必须大于 0".to_string());
        }
        if self
            .registration_deadline
            .is_some_and(|deadline| deadline > self.start_at)
        {
            return Err("报名截止时间不能晚于活动开始时间".to_string());
        }
        Ok(())
    }
}

impl CreateEventRequest {
    pub fn fields(&self) -> EventFields<'_> {
        EventFields {
            title: &self.title,
            description: self.description.as_deref(),
            start_at: self.start_at,
            end_at: self.end_at,
            location: self.location.as_deref(),
            modality: self.modality,
            meeting_url: self.meeting_url.as_deref(),
            capacity: self.capacity,
            registration_deadline: self.registration_deadline,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.fields().validate()
    }
}

/// 更新活动请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/event.ts")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_type: Option<EventType>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub all_day: Option<bool>,
    pub location: Option<String>,
    pub modality: Option<EventModality>,
    pub meeting_url: Option<String>,
    pub requires_registration: Option<bool>,
    pub capacity: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub cancelled: Option<bool>,
}

/// 活动列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/event.ts")]
pub struct EventListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    pub event_type: Option<EventType>,
    pub modality: Option<EventModality>,
    pub status: Option<EventStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone, Default)]
pub struct EventListQuery {
    pub event_type: Option<EventType>,
    pub modality: Option<EventModality>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn request() -> CreateEventRequest {
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 15, 0, 0).unwrap();
        CreateEventRequest {
            title: "Reunión de padres".to_string(),
            description: None,
            event_type: EventType::Meeting,
            start_at: start,
            end_at: start + Duration::hours(2),
            all_day: false,
            location: Some("Auditorio".to_string()),
            modality: EventModality::InPerson,
            meeting_url: None,
            requires_registration: true,
            capacity: Some(120),
            registration_deadline: Some(start - Duration::days(1)),
        }
    }

    #[test]
    fn test_valid_event() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_end_before_start() {
        let mut req = request();
        req.end_at = req.start_at - Duration::minutes(1);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_virtual_requires_meeting_url() {
        let mut req = request();
        req.modality = EventModality::Virtual;
        assert_eq!(
            req.validate().unwrap_err(),
            "线上或混合活动必须提供会议链接"
        );
        req.meeting_url = Some("https://meet.example.com/padres".to_string());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_in_person_requires_location() {
        let mut req = request();
        req.location = Some("  ".to_string());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_capacity_and_deadline() {
        let mut req = request();
        req.capacity = Some(0);
        assert!(req.validate().is_err());

        let mut req = request();
        req.registration_deadline = Some(req.start_at + Duration::minutes(5));
        assert!(req.validate().is_err());
    }
}
