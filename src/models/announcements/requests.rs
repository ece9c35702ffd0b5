use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use ts_rs::TS;

use super::entities::{Audience, AnnouncementStatus};
use crate::models::common::PaginationQuery;
use crate::utils::validate::{validate_length, validate_max_length, validate_url};

/// 自动生成摘要时截取的字符数
pub const SUMMARY_CHARS: usize = 160;

/// 创建公告请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    /// 缺省为立即发布
    pub publish_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub for_students: bool,
    #[serde(default)]
    pub for_teachers: bool,
    #[serde(default)]
    pub for_parents: bool,
}

impl CreateAnnouncementRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_length("标题", &self.title, 3, 200)?;
        validate_length("内容", &self.content, 1, 10000)?;
        validate_max_length("摘要", self.summary.as_deref(), 300)?;
        if let Some(ref url) = self.image_url {
            validate_url("图片地址", url)?;
        }
        if !(self.for_students || self.for_teachers || self.for_parents) {
            return Err("至少需要选择一个受众".to_string());
        }
        if let Some(expires_at) = self.expires_at {
            let publish_at = self.publish_at.unwrap_or_else(Utc::now);
            if expires_at <= publish_at {
                return Err("过期时间必须晚于发布时间".to_string());
            }
        }
        Ok(())
    }

    /// 最终摘要：显式给出的摘要优先，否则由内容截取
    pub fn resolved_summary(&self) -> String {
        match self.summary.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => summarize(&self.content),
        }
    }
}

/// 更新公告请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct UpdateAnnouncementRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub publish_at: Option<DateTime<Utc>>,
    /// 缺省表示不修改，`null` 表示清除过期时间
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[ts(optional)]
    pub expires_at: Option<Option<DateTime<Utc>>>,
    pub for_students: Option<bool>,
    pub for_teachers: Option<bool>,
    pub for_parents: Option<bool>,
}

impl UpdateAnnouncementRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref title) = self.title {
            validate_length("标题", title, 3, 200)?;
        }
        if let Some(ref content) = self.content {
            validate_length("内容", content, 1, 10000)?;
        }
        validate_max_length("摘要", self.summary.as_deref(), 300)?;
        if let Some(ref url) = self.image_url {
            validate_url("图片地址", url)?;
        }
        Ok(())
    }
}

// 区分字段缺省（外层 None）与显式 null（Some(None)）
fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// 公告列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct AnnouncementListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    pub audience: Option<Audience>,
    pub status: Option<AnnouncementStatus>,
    pub author_id: Option<i64>,
}

// 用于存储层的内部查询参数（只包含可下推到 SQL 的条件）
#[derive(Debug, Clone, Default)]
pub struct AnnouncementListQuery {
    pub audience: Option<Audience>,
    pub author_id: Option<i64>,
}

/// 按字符截取内容生成摘要
pub fn summarize(content: &str) -> String {
    let content = content.trim();
    if content.chars().count() <= SUMMARY_CHARS {
        return content.to_string();
    }
    let mut summary: String = content.chars().take(SUMMARY_CHARS).collect();
    summary = summary.trim_end().to_string();
    summary.push('…');
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn request() -> CreateAnnouncementRequest {
        CreateAnnouncementRequest {
            title: "Inicio de clases".to_string(),
            content: "Las clases inician el lunes.".to_string(),
            summary: None,
            image_url: None,
            publish_at: None,
            expires_at: None,
            for_students: true,
            for_teachers: false,
            for_parents: true,
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_requires_audience() {
        let mut req = request();
        req.for_students = false;
        req.for_parents = false;
        assert_eq!(req.validate().unwrap_err(), "至少需要选择一个受众");
    }

    #[test]
    fn test_expiry_must_follow_publish() {
        let mut req = request();
        let now = Utc::now();
        req.publish_at = Some(now);
        req.expires_at = Some(now);
        assert!(req.validate().is_err());
        req.expires_at = Some(now + Duration::days(1));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_title_too_short() {
        let mut req = request();
        req.title = "Hi".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_summary_defaults_to_content() {
        let req = request();
        assert_eq!(req.resolved_summary(), "Las clases inician el lunes.");

        let mut explicit = request();
        explicit.summary = Some("  Resumen  ".to_string());
        assert_eq!(explicit.resolved_summary(), "Resumen");
    }

    #[test]
    fn test_summarize_truncates_on_char_boundary() {
        let long = "ñ".repeat(SUMMARY_CHARS + 10);
        let summary = summarize(&long);
        assert_eq!(summary.chars().count(), SUMMARY_CHARS + 1);
        assert!(summary.ends_with('…'));
    }

    #[test]
    fn test_update_expiry_absent_null_or_set() {
        let absent: UpdateAnnouncementRequest =
            serde_json::from_str(r#"{"title":"Aviso"}"#).unwrap();
        assert_eq!(absent.expires_at, None);

        let cleared: UpdateAnnouncementRequest =
            serde_json::from_str(r#"{"expires_at":null}"#).unwrap();
        assert_eq!(cleared.expires_at, Some(None));

        let set: UpdateAnnouncementRequest =
            serde_json::from_str(r#"{"expires_at":"2025-03-01T00:00:00Z"}"#).unwrap();
        assert!(matches!(set.expires_at, Some(Some(_))));
    }
}
