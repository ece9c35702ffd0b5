//! 公告存储操作

use super::SeaOrmStorage;
use crate::entity::announcements::{ActiveModel, Column, Entity as Announcements};
use crate::errors::{Result, SchoolHubError};
use crate::models::announcements::{
    entities::{Announcement, Audience},
    requests::{
        AnnouncementListQuery, CreateAnnouncementRequest, UpdateAnnouncementRequest, summarize,
    },
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建公告
    pub async fn create_announcement_impl(
        &self,
        author_id: i64,
        req: CreateAnnouncementRequest,
    ) -> Result<Announcement> {
        let now = chrono::Utc::now().timestamp();
        let summary = req.resolved_summary();

        let model = ActiveModel {
            title: Set(req.title.trim().to_string()),
            content: Set(req.content),
            summary: Set(summary),
            image_url: Set(req.image_url),
            publish_at: Set(req.publish_at.map(|t| t.timestamp()).unwrap_or(now)),
            expires_at: Set(req.expires_at.map(|t| t.timestamp())),
            for_students: Set(req.for_students),
            for_teachers: Set(req.for_teachers),
            for_parents: Set(req.for_parents),
            author_id: Set(author_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("创建公告失败: {e}")))?;

        Ok(result.into_announcement())
    }

    pub async fn get_announcement_by_id_impl(&self, id: i64) -> Result<Option<Announcement>> {
        let result = Announcements::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询公告失败: {e}")))?;

        Ok(result.map(|m| m.into_announcement()))
    }

    /// 按受众、作者查询公告，发布时间倒序
    ///
    /// 关键词由调用方在内存中匹配（SQL 的 LIKE 不能可靠地忽略非 ASCII 大小写）
    pub async fn list_announcements_impl(
        &self,
        query: AnnouncementListQuery,
    ) -> Result<Vec<Announcement>> {
        let mut select = Announcements::find();

        if let Some(audience) = query.audience {
            let column = match audience {
                Audience::Students => Column::ForStudents,
                Audience::Teachers => Column::ForTeachers,
                Audience::Parents => Column::ForParents,
            };
            select = select.filter(column.eq(true));
        }

        if let Some(author_id) = query.author_id {
            select = select.filter(Column::AuthorId.eq(author_id));
        }

        let announcements = select
            .order_by_desc(Column::PublishAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询公告列表失败: {e}")))?;

        Ok(announcements
            .into_iter()
            .map(|m| m.into_announcement())
            .collect())
    }

    /// 更新公告；摘要显式置空时由内容重新生成
    pub async fn update_announcement_impl(
        &self,
        id: i64,
        update: UpdateAnnouncementRequest,
    ) -> Result<Option<Announcement>> {
        let Some(existing) = self.get_announcement_by_id_impl(id).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title.trim().to_string());
        }

        if let Some(summary) = update.summary {
            let summary = match summary.trim() {
                "" => summarize(update.content.as_deref().unwrap_or(&existing.content)),
                s => s.to_string(),
            };
            model.summary = Set(summary);
        }

        if let Some(content) = update.content {
            model.content = Set(content);
        }

        if let Some(image_url) = update.image_url {
            model.image_url = Set(Some(image_url));
        }

        if let Some(publish_at) = update.publish_at {
            model.publish_at = Set(publish_at.timestamp());
        }

        if let Some(expires_at) = update.expires_at {
            model.expires_at = Set(expires_at.map(|t| t.timestamp()));
        }

        if let Some(v) = update.for_students {
            model.for_students = Set(v);
        }

        if let Some(v) = update.for_teachers {
            model.for_teachers = Set(v);
        }

        if let Some(v) = update.for_parents {
            model.for_parents = Set(v);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新公告失败: {e}")))?;

        self.get_announcement_by_id_impl(id).await
    }

    pub async fn delete_announcement_impl(&self, id: i64) -> Result<bool> {
        let result = Announcements::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除公告失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
