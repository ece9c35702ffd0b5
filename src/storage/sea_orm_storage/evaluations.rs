//! 评估存储操作

use super::SeaOrmStorage;
use crate::entity::evaluations::{ActiveModel, Column, Entity as Evaluations};
use crate::errors::{Result, SchoolHubError};
use crate::models::common::normalize_page;
use crate::models::{
    PaginationInfo,
    evaluations::{
        entities::Evaluation,
        requests::{CreateEvaluationRequest, EvaluationListQuery, UpdateEvaluationRequest},
        responses::EvaluationListResponse,
    },
};
use crate::utils::contains_ignore_case;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建评估
    pub async fn create_evaluation_impl(
        &self,
        created_by: i64,
        req: CreateEvaluationRequest,
    ) -> Result<Evaluation> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name.trim().to_string()),
            description: Set(req.description),
            evaluation_type: Set(req.evaluation_type.to_string()),
            scale: Set(req.scale.to_string()),
            weight: Set(req.weight),
            scheduled_at: Set(req.scheduled_at.map(|t| t.timestamp())),
            course_id: Set(req.course_id),
            period_id: Set(req.period_id),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("创建评估失败: {e}")))?;

        Ok(result.into_evaluation())
    }

    pub async fn get_evaluation_by_id_impl(&self, id: i64) -> Result<Option<Evaluation>> {
        let result = Evaluations::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询评估失败: {e}")))?;

        Ok(result.map(|m| m.into_evaluation()))
    }

    /// 分页列出评估
    pub async fn list_evaluations_with_pagination_impl(
        &self,
        query: EvaluationListQuery,
    ) -> Result<EvaluationListResponse> {
        let (page, size) = normalize_page(query.page, query.size, 10);
        let (page, size) = (page as u64, size as u64);

        let mut select = Evaluations::find();

        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }
        if let Some(period_id) = query.period_id {
            select = select.filter(Column::PeriodId.eq(period_id));
        }
        if let Some(evaluation_type) = query.evaluation_type {
            select = select.filter(Column::EvaluationType.eq(evaluation_type.to_string()));
        }
        if let Some(scale) = query.scale {
            select = select.filter(Column::Scale.eq(scale.to_string()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(contains_ignore_case(Column::Name, search));
        }

        select = select
            .order_by_asc(Column::CourseId)
            .order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询评估总数失败: {e}")))?;

        let evaluations = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询评估列表失败: {e}")))?;

        Ok(EvaluationListResponse {
            items: evaluations.into_iter().map(|m| m.into_evaluation()).collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    pub async fn list_evaluations_for_courses_impl(
        &self,
        course_ids: &[i64],
        period_id: i64,
    ) -> Result<Vec<Evaluation>> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let evaluations = Evaluations::find()
            .filter(Column::CourseId.is_in(course_ids.to_vec()))
            .filter(Column::PeriodId.eq(period_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课程评估失败: {e}")))?;

        Ok(evaluations.into_iter().map(|m| m.into_evaluation()).collect())
    }

    /// 课程学期内已占用的权重
    pub async fn total_evaluation_weight_impl(
        &self,
        course_id: i64,
        period_id: i64,
        exclude_id: Option<i64>,
    ) -> Result<f64> {
        let mut select = Evaluations::find()
            .select_only()
            .column(Column::Weight)
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::PeriodId.eq(period_id));

        if let Some(exclude_id) = exclude_id {
            select = select.filter(Column::Id.ne(exclude_id));
        }

        let weights: Vec<f64> = select
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("统计评估权重失败: {e}")))?;

        Ok(weights.into_iter().sum())
    }

    /// 更新评估
    pub async fn update_evaluation_impl(
        &self,
        id: i64,
        update: UpdateEvaluationRequest,
    ) -> Result<Option<Evaluation>> {
        let existing = self.get_evaluation_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(evaluation_type) = update.evaluation_type {
            model.evaluation_type = Set(evaluation_type.to_string());
        }
        if let Some(scale) = update.scale {
            model.scale = Set(scale.to_string());
        }
        if let Some(weight) = update.weight {
            model.weight = Set(weight);
        }
        if let Some(scheduled_at) = update.scheduled_at {
            model.scheduled_at = Set(Some(scheduled_at.timestamp()));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新评估失败: {e}")))?;

        self.get_evaluation_by_id_impl(id).await
    }

    /// 删除评估（成绩级联删除）
    pub async fn delete_evaluation_impl(&self, id: i64) -> Result<bool> {
        let result = Evaluations::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除评估失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
