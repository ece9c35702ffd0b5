//! 活动与报名存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::event_registrations::{
    ActiveModel as RegistrationActiveModel, Column as RegistrationColumn,
    Entity as EventRegistrations,
};
use crate::entity::events::{ActiveModel, Column, Entity as Events};
use crate::entity::users::Entity as Users;
use crate::errors::{Result, SchoolHubError};
use crate::models::events::{
    entities::{Event, RegistrationRejection},
    requests::{CreateEventRequest, EventListQuery, UpdateEventRequest},
    responses::{EventAttendee, EventRegistration},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建活动
    pub async fn create_event_impl(
        &self,
        organizer_id: i64,
        req: CreateEventRequest,
    ) -> Result<Event> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            title: Set(req.title.trim().to_string()),
            description: Set(req.description),
            event_type: Set(req.event_type.to_string()),
            start_at: Set(req.start_at.timestamp()),
            end_at: Set(req.end_at.timestamp()),
            all_day: Set(req.all_day),
            location: Set(req.location),
            modality: Set(req.modality.to_string()),
            meeting_url: Set(req.meeting_url),
            requires_registration: Set(req.requires_registration),
            capacity: Set(req.capacity),
            registration_deadline: Set(req.registration_deadline.map(|t| t.timestamp())),
            cancelled: Set(false),
            organizer_id: Set(organizer_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("创建活动失败: {e}")))?;

        Ok(result.into_event())
    }

    pub async fn get_event_by_id_impl(&self, id: i64) -> Result<Option<Event>> {
        let result = Events::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询活动失败: {e}")))?;

        Ok(result.map(|m| m.into_event()))
    }

    /// 按类型、形式和时间窗口查询活动，开始时间升序；关键词在内存中匹配
    pub async fn list_events_impl(&self, query: EventListQuery) -> Result<Vec<Event>> {
        let mut select = Events::find();

        if let Some(event_type) = query.event_type {
            select = select.filter(Column::EventType.eq(event_type.to_string()));
        }

        if let Some(modality) = query.modality {
            select = select.filter(Column::Modality.eq(modality.to_string()));
        }

        // 与 [from, to] 有交集
        if let Some(from) = query.from {
            select = select.filter(Column::EndAt.gte(from.timestamp()));
        }
        if let Some(to) = query.to {
            select = select.filter(Column::StartAt.lte(to.timestamp()));
        }

        let events = select
            .order_by_asc(Column::StartAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询活动列表失败: {e}")))?;

        Ok(events.into_iter().map(|m| m.into_event()).collect())
    }

    /// 更新活动
    pub async fn update_event_impl(
        &self,
        id: i64,
        update: UpdateEventRequest,
    ) -> Result<Option<Event>> {
        let existing = self.get_event_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title.trim().to_string());
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(event_type) = update.event_type {
            model.event_type = Set(event_type.to_string());
        }
        if let Some(start_at) = update.start_at {
            model.start_at = Set(start_at.timestamp());
        }
        if let Some(end_at) = update.end_at {
            model.end_at = Set(end_at.timestamp());
        }
        if let Some(all_day) = update.all_day {
            model.all_day = Set(all_day);
        }
        if let Some(location) = update.location {
            model.location = Set(Some(location));
        }
        if let Some(modality) = update.modality {
            model.modality = Set(modality.to_string());
        }
        if let Some(meeting_url) = update.meeting_url {
            model.meeting_url = Set(Some(meeting_url));
        }
        if let Some(requires_registration) = update.requires_registration {
            model.requires_registration = Set(requires_registration);
        }
        if let Some(capacity) = update.capacity {
            model.capacity = Set(Some(capacity));
        }
        if let Some(deadline) = update.registration_deadline {
            model.registration_deadline = Set(Some(deadline.timestamp()));
        }
        if let Some(cancelled) = update.cancelled {
            model.cancelled = Set(cancelled);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新活动失败: {e}")))?;

        self.get_event_by_id_impl(id).await
    }

    pub async fn delete_event_impl(&self, id: i64) -> Result<bool> {
        let result = Events::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除活动失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 各活动的报名人数；没有报名的活动不出现在结果中
    pub async fn count_event_registrations_impl(
        &self,
        event_ids: &[i64],
    ) -> Result<HashMap<i64, i64>> {
        if event_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, i64)> = EventRegistrations::find()
            .select_only()
            .column(RegistrationColumn::EventId)
            .column_as(RegistrationColumn::Id.count(), "count")
            .filter(RegistrationColumn::EventId.is_in(event_ids.to_vec()))
            .group_by(RegistrationColumn::EventId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("统计报名人数失败: {e}")))?;

        Ok(rows.into_iter().collect())
    }

    /// 报名：在同一事务内检查名额、截止时间和重复报名
    pub async fn register_for_event_impl(
        &self,
        event_id: i64,
        user_id: i64,
    ) -> Result<std::result::Result<EventRegistration, RegistrationRejection>> {
        let now = chrono::Utc::now();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let event = Events::find_by_id(event_id)
            .one(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询活动失败: {e}")))?
            .ok_or_else(|| SchoolHubError::not_found(format!("活动 {event_id} 不存在")))?
            .into_event();

        let registered = EventRegistrations::find()
            .filter(RegistrationColumn::EventId.eq(event_id))
            .count(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("统计报名人数失败: {e}")))?;

        let already = EventRegistrations::find()
            .filter(RegistrationColumn::EventId.eq(event_id))
            .filter(RegistrationColumn::UserId.eq(user_id))
            .count(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询报名记录失败: {e}")))?
            > 0;

        if let Err(rejection) = event.check_registration(now, registered as i64, already) {
            txn.rollback()
                .await
                .map_err(|e| SchoolHubError::database_operation(format!("回滚事务失败: {e}")))?;
            return Ok(Err(rejection));
        }

        let model = RegistrationActiveModel {
            event_id: Set(event_id),
            user_id: Set(user_id),
            registered_at: Set(now.timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("报名失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Ok(result.into_registration()))
    }

    pub async fn cancel_event_registration_impl(&self, event_id: i64, user_id: i64) -> Result<bool> {
        let result = EventRegistrations::delete_many()
            .filter(RegistrationColumn::EventId.eq(event_id))
            .filter(RegistrationColumn::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("取消报名失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 活动报名名单（按报名先后）
    pub async fn list_event_attendees_impl(&self, event_id: i64) -> Result<Vec<EventAttendee>> {
        let rows = EventRegistrations::find()
            .filter(RegistrationColumn::EventId.eq(event_id))
            .order_by_asc(RegistrationColumn::Id)
            .find_also_related(Users)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询报名名单失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(registration, user)| {
                user.map(|user| EventAttendee {
                    registration_id: registration.id,
                    user: user.into_summary(),
                    registered_at: crate::entity::to_datetime(registration.registered_at),
                })
            })
            .collect())
    }
}
