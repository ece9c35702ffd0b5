use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::filter::{ListFilter, any_field_matches, matches_eq};

macro_rules! string_enum {
    ($name:ident, $ts_file:literal, { $($variant:ident => $text:literal),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
        #[serde(rename_all = "snake_case")]
        #[ts(export, export_to = $ts_file)]
        pub enum $name {
            $($variant,)*
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $($name::$variant => write!(f, $text),)*
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)*
                    _ => Err(format!("Invalid {}: {s}", stringify!($name))),
                }
            }
        }
    };
}

pub(crate) use string_enum;

string_enum!(EventType, "../frontend/src/types/generated/event.ts", {
    Academic => "academic",
    Cultural => "cultural",
    Sports => "sports",
    Meeting => "meeting",
    Other => "other",
});

string_enum!(EventModality, "../frontend/src/types/generated/event.ts", {
    InPerson => "in_person",
    Virtual => "virtual",
    Hybrid => "hybrid",
});

impl EventModality {
    /// 线上或混合形式需要会议链接
    pub fn needs_meeting_url(&self) -> bool {
        matches!(self, EventModality::Virtual | EventModality::Hybrid)
    }

    /// 线下或混合形式需要地点
    pub fn needs_location(&self) -> bool {
        matches!(self, EventModality::InPerson | EventModality::Hybrid)
    }
}

/// 活动状态（由时间和取消标记派生）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/event.ts")]
pub enum EventStatus {
    Upcoming,
    Ongoing,
    Finished,
    Cancelled,
}

/// 报名被拒绝的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationRejection {
    NotRequired,
    Cancelled,
    Closed,
    Full,
    AlreadyRegistered,
}

impl RegistrationRejection {
    pub fn message(&self) -> &'static str {
        match self {
            RegistrationRejection::NotRequired => "该活动无需报名",
            RegistrationRejection::Cancelled => "活动已取消",
            RegistrationRejection::Closed => "报名已截止",
            RegistrationRejection::Full => "活动名额已满",
            RegistrationRejection::AlreadyRegistered => "已报名该活动",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/event.ts")]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub event_type: EventType,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub all_day: bool,
    pub location: Option<String>,
    pub modality: EventModality,
    pub meeting_url: Option<String>,
    pub requires_registration: bool,
    pub capacity: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub cancelled: bool,
    pub organizer_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn status_at(&self, now: DateTime<Utc>) -> EventStatus {
        if self.cancelled {
            EventStatus::Cancelled
        } else if self.start_at > now {
            EventStatus::Upcoming
        } else if self.end_at < now {
            EventStatus::Finished
        } else {
            EventStatus::Ongoing
        }
    }

    /// 报名截止时间：未设置时为活动开始时间
    pub fn registration_closes_at(&self) -> DateTime<Utc> {
        self.registration_deadline.unwrap_or(self.start_at)
    }

    /// 剩余名额；不限名额时为 None
    pub fn remaining_seats(&self, registered: i64) -> Option<i64> {
        self.capacity
            .map(|capacity| (i64::from(capacity) - registered).max(0))
    }

    /// 检查当前是否允许报名
    pub fn check_registration(
        &self,
        now: DateTime<Utc>,
        registered: i64,
        already_registered: bool,
    ) -> Result<(), RegistrationRejection> {
        if !self.requires_registration {
            return Err(RegistrationRejection::NotRequired);
        }
        if self.cancelled {
            return Err(RegistrationRejection::Cancelled);
        }
        if already_registered {
            return Err(RegistrationRejection::AlreadyRegistered);
        }
        if now > self.registration_closes_at() {
            return Err(RegistrationRejection::Closed);
        }
        if self.remaining_seats(registered) == Some(0) {
            return Err(RegistrationRejection::Full);
        }
        Ok(())
    }

    /// 活动时间段是否与 [from, to] 有交集
    pub fn overlaps(&self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> bool {
        from.is_none_or(|from| self.end_at >= from) && to.is_none_or(|to| self.start_at <= to)
    }
}

/// 活动列表过滤条件
#[derive(Debug, Clone)]
pub struct EventFilter {
    pub search: Option<String>,
    pub event_type: Option<EventType>,
    pub modality: Option<EventModality>,
    pub status: Option<EventStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub now: DateTime<Utc>,
}

impl ListFilter<Event> for EventFilter {
    fn matches(&self, item: &Event) -> bool {
        any_field_matches(
            [Some(item.title.as_str()), item.description.as_deref()],
            self.search.as_deref(),
        ) && matches_eq(self.event_type.as_ref(), &item.event_type)
            && matches_eq(self.modality.as_ref(), &item.modality)
            && matches_eq(self.status.as_ref(), &item.status_at(self.now))
            && item.overlaps(self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 10, 9, 0, 0).unwrap()
    }

    fn event() -> Event {
        Event {
            id: 1,
            title: "Feria de ciencias".to_string(),
            description: Some("Proyectos de secundaria".to_string()),
            event_type: EventType::Academic,
            start_at: base(),
            end_at: base() + Duration::hours(4),
            all_day: false,
            location: Some("Patio principal".to_string()),
            modality: EventModality::InPerson,
            meeting_url: None,
            requires_registration: true,
            capacity: Some(2),
            registration_deadline: Some(base() - Duration::days(1)),
            cancelled: false,
            organizer_id: 3,
            created_at: base(),
            updated_at: base(),
        }
    }

    #[test]
    fn test_status_derivation() {
        let e = event();
        assert_eq!(e.status_at(base() - Duration::minutes(1)), EventStatus::Upcoming);
        assert_eq!(e.status_at(base()), EventStatus::Ongoing);
        assert_eq!(e.status_at(base() + Duration::hours(4)), EventStatus::Ongoing);
        assert_eq!(
            e.status_at(base() + Duration::hours(4) + Duration::seconds(1)),
            EventStatus::Finished
        );

        let mut cancelled = event();
        cancelled.cancelled = true;
        assert_eq!(cancelled.status_at(base()), EventStatus::Cancelled);
    }

    #[test]
    fn test_registration_rules() {
        let e = event();
        let before = base() - Duration::days(2);
        assert_eq!(e.check_registration(before, 0, false), Ok(()));
        assert_eq!(
            e.check_registration(before, 2, false),
            Err(RegistrationRejection::Full)
        );
        assert_eq!(
            e.check_registration(before, 0, true),
            Err(RegistrationRejection::AlreadyRegistered)
        );
        assert_eq!(
            e.check_registration(base() - Duration::hours(1), 0, false),
            Err(RegistrationRejection::Closed)
        );

        let mut open = event();
        open.requires_registration = false;
        assert_eq!(
            open.check_registration(before, 0, false),
            Err(RegistrationRejection::NotRequired)
        );
    }

    #[test]
    fn test_remaining_seats() {
        let mut e = event();
        assert_eq!(e.remaining_seats(1), Some(1));
        assert_eq!(e.remaining_seats(5), Some(0));
        e.capacity = None;
        assert_eq!(e.remaining_seats(100), None);
    }

    #[test]
    fn test_modality_strings() {
        assert_eq!(EventModality::InPerson.to_string(), "in_person");
        assert_eq!("hybrid".parse::<EventModality>(), Ok(EventModality::Hybrid));
        assert!("remote".parse::<EventModality>().is_err());
        assert!(EventModality::Hybrid.needs_meeting_url());
        assert!(!EventModality::InPerson.needs_meeting_url());
    }

    #[test]
    fn test_filter_by_window() {
        let e = event();
        let filter = EventFilter {
            search: Some("feria".to_string()),
            event_type: None,
            modality: None,
            status: None,
            from: Some(base() + Duration::hours(1)),
            to: Some(base() + Duration::days(1)),
            now: base(),
        };
        assert!(filter.matches(&e));

        let later = EventFilter {
            from: Some(base() + Duration::days(1)),
            ..filter
        };
        assert!(!later.matches(&e));
    }
}
