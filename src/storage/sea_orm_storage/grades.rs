//! 成绩存储操作

use super::SeaOrmStorage;
use crate::entity::grades::{ActiveModel, Column, Entity as Grades};
use crate::errors::{Result, SchoolHubError};
use crate::models::common::normalize_page;
use crate::models::{
    PaginationInfo,
    grades::{
        entities::Grade,
        responses::{GradeItem, GradeListResponse},
    },
};
use crate::storage::GradeWrite;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 批量录入成绩：同一学生同一评估只保留一条，已有则覆盖
    pub async fn upsert_grades_impl(
        &self,
        evaluation_id: i64,
        graded_by: i64,
        grades: Vec<GradeWrite>,
    ) -> Result<Vec<Grade>> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let mut saved = Vec::with_capacity(grades.len());
        for write in grades {
            let existing = Grades::find()
                .filter(Column::StudentId.eq(write.student_id))
                .filter(Column::EvaluationId.eq(evaluation_id))
                .one(&txn)
                .await
                .map_err(|e| SchoolHubError::database_operation(format!("查询成绩失败: {e}")))?;

            let model = match existing {
                Some(existing) => {
                    let mut model: ActiveModel = existing.into();
                    model.value = Set(write.value);
                    model.comment = Set(write.comment);
                    model.graded_by = Set(graded_by);
                    model.updated_at = Set(now);
                    model.update(&txn).await.map_err(|e| {
                        SchoolHubError::database_operation(format!("更新成绩失败: {e}"))
                    })?
                }
                None => ActiveModel {
                    student_id: Set(write.student_id),
                    evaluation_id: Set(evaluation_id),
                    value: Set(write.value),
                    comment: Set(write.comment),
                    graded_by: Set(graded_by),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(|e| SchoolHubError::database_operation(format!("录入成绩失败: {e}")))?,
            };

            saved.push(model.into_grade());
        }

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(saved)
    }

    /// 通过 ID 获取成绩
    pub async fn get_grade_by_id_impl(&self, id: i64) -> Result<Option<Grade>> {
        let result = Grades::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    /// 分页列出某评估的成绩
    pub async fn list_grades_by_evaluation_impl(
        &self,
        evaluation_id: i64,
        page: i64,
        size: i64,
    ) -> Result<GradeListResponse> {
        let (page, size) = normalize_page(Some(page), Some(size), 10);
        let (page, size) = (page as u64, size as u64);

        let paginator = Grades::find()
            .filter(Column::EvaluationId.eq(evaluation_id))
            .order_by_asc(Column::StudentId)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询成绩总数失败: {e}")))?;

        let grades = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询成绩列表失败: {e}")))?;

        Ok(GradeListResponse {
            items: grades
                .into_iter()
                .map(|m| GradeItem::from(m.into_grade()))
                .collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    pub async fn list_grades_for_evaluations_impl(
        &self,
        evaluation_ids: &[i64],
        student_id: Option<i64>,
    ) -> Result<Vec<Grade>> {
        if evaluation_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut select = Grades::find().filter(Column::EvaluationId.is_in(evaluation_ids.to_vec()));
        if let Some(student_id) = student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        let grades = select
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(grades.into_iter().map(|m| m.into_grade()).collect())
    }

    /// 更新成绩
    pub async fn update_grade_impl(
        &self,
        id: i64,
        value: Option<f64>,
        comment: Option<String>,
        graded_by: i64,
    ) -> Result<Option<Grade>> {
        let existing = self.get_grade_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            graded_by: Set(graded_by),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(value) = value {
            model.value = Set(value);
        }
        if let Some(comment) = comment {
            model.comment = Set(Some(comment));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新成绩失败: {e}")))?;

        self.get_grade_by_id_impl(id).await
    }

    pub async fn delete_grade_impl(&self, id: i64) -> Result<bool> {
        let result = Grades::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除成绩失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
