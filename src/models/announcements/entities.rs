use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::filter::{ListFilter, any_field_matches, matches_eq};

/// 公告受众
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub enum Audience {
    Students,
    Teachers,
    Parents,
}

/// 公告状态（由发布与过期时间派生）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub enum AnnouncementStatus {
    Scheduled,
    Active,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub image_url: Option<String>,
    pub publish_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub for_students: bool,
    pub for_teachers: bool,
    pub for_parents: bool,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Announcement {
    /// 计算指定时刻的状态
    pub fn status_at(&self, now: DateTime<Utc>) -> AnnouncementStatus {
        if self.publish_at > now {
            AnnouncementStatus::Scheduled
        } else if self.expires_at.is_some_and(|exp| exp <= now) {
            AnnouncementStatus::Expired
        } else {
            AnnouncementStatus::Active
        }
    }

    pub fn targets(&self, audience: Audience) -> bool {
        match audience {
            Audience::Students => self.for_students,
            Audience::Teachers => self.for_teachers,
            Audience::Parents => self.for_parents,
        }
    }

    pub fn audiences(&self) -> Vec<Audience> {
        [Audience::Students, Audience::Teachers, Audience::Parents]
            .into_iter()
            .filter(|a| self.targets(*a))
            .collect()
    }
}

/// 公告列表过滤条件
#[derive(Debug, Clone)]
pub struct AnnouncementFilter {
    pub search: Option<String>,
    pub audience: Option<Audience>,
    pub status: Option<AnnouncementStatus>,
    pub author_id: Option<i64>,
    pub now: DateTime<Utc>,
}

impl ListFilter<Announcement> for AnnouncementFilter {
    fn matches(&self, item: &Announcement) -> bool {
        any_field_matches(
            [Some(item.title.as_str()), Some(item.content.as_str())],
            self.search.as_deref(),
        ) && self.audience.is_none_or(|a| item.targets(a))
            && matches_eq(self.status.as_ref(), &item.status_at(self.now))
            && matches_eq(self.author_id.as_ref(), &item.author_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::apply_filter;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 8, 0, 0).unwrap()
    }

    fn announcement(id: i64, title: &str, publish: u32, expires: Option<u32>) -> Announcement {
        Announcement {
            id,
            title: title.to_string(),
            content: format!("contenido {id}"),
            summary: String::new(),
            image_url: None,
            publish_at: at(publish),
            expires_at: expires.map(at),
            for_students: id % 2 == 0,
            for_teachers: true,
            for_parents: false,
            author_id: 1,
            created_at: at(1),
            updated_at: at(1),
        }
    }

    #[test]
    fn test_status_boundaries() {
        let a = announcement(1, "Matrícula", 10, Some(20));
        assert_eq!(a.status_at(at(9)), AnnouncementStatus::Scheduled);
        assert_eq!(a.status_at(at(10)), AnnouncementStatus::Active);
        assert_eq!(a.status_at(at(19)), AnnouncementStatus::Active);
        assert_eq!(a.status_at(at(20)), AnnouncementStatus::Expired);

        let open = announcement(2, "Horario", 10, None);
        assert_eq!(open.status_at(at(28)), AnnouncementStatus::Active);
    }

    #[test]
    fn test_audiences() {
        let a = announcement(2, "Uniforme", 1, None);
        assert_eq!(a.audiences(), vec![Audience::Students, Audience::Teachers]);
        assert!(!a.targets(Audience::Parents));
    }

    #[test]
    fn test_filter_by_status_and_audience() {
        let items = vec![
            announcement(1, "Vacaciones", 1, Some(5)),
            announcement(2, "Simulacro", 1, None),
            announcement(4, "Feria", 25, None),
        ];
        let filter = AnnouncementFilter {
            search: None,
            audience: Some(Audience::Students),
            status: Some(AnnouncementStatus::Active),
            author_id: None,
            now: at(10),
        };
        let result = apply_filter(items.clone(), &filter);
        assert_eq!(result.iter().map(|a| a.id).collect::<Vec<_>>(), vec![2]);

        let twice = apply_filter(result.clone(), &filter);
        assert_eq!(
            twice.iter().map(|a| a.id).collect::<Vec<_>>(),
            result.iter().map(|a| a.id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_filter_search_matches_content() {
        let items = vec![announcement(1, "Aviso", 1, None), announcement(2, "Otro", 1, None)];
        let filter = AnnouncementFilter {
            search: Some("CONTENIDO 2".to_string()),
            audience: None,
            status: None,
            author_id: None,
            now: at(10),
        };
        assert_eq!(apply_filter(items, &filter).len(), 1);
    }
}
