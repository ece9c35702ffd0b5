//! 学期、课程与选课存储操作

use super::SeaOrmStorage;
use crate::entity::courses::{
    ActiveModel as CourseActiveModel, Column as CourseColumn, Entity as Courses,
};
use crate::entity::enrollments::{
    ActiveModel as EnrollmentActiveModel, Column as EnrollmentColumn, Entity as Enrollments,
};
use crate::entity::periods::{
    ActiveModel as PeriodActiveModel, Column as PeriodColumn, Entity as Periods,
};
use crate::entity::users::Entity as Users;
use crate::errors::{Result, SchoolHubError};
use crate::models::common::normalize_page;
use crate::models::{
    PaginationInfo,
    academic::{
        entities::{Course, EnrolledStudent, Enrollment, Period},
        requests::{CourseListQuery, CreateCourseRequest, CreatePeriodRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
};
use crate::utils::contains_ignore_case;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建学期；设为当前学期时取消其他学期的当前标记
    pub async fn create_period_impl(&self, req: CreatePeriodRequest) -> Result<Period> {
        let now = chrono::Utc::now().timestamp();
        let is_current = req.is_current.unwrap_or(false);

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        if is_current {
            Periods::update_many()
                .col_expr(PeriodColumn::IsCurrent, Expr::value(false))
                .filter(PeriodColumn::IsCurrent.eq(true))
                .exec(&txn)
                .await
                .map_err(|e| {
                    SchoolHubError::database_operation(format!("更新当前学期失败: {e}"))
                })?;
        }

        let model = PeriodActiveModel {
            name: Set(req.name.trim().to_string()),
            starts_on: Set(req.starts_on.timestamp()),
            ends_on: Set(req.ends_on.timestamp()),
            is_current: Set(is_current),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("创建学期失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_period())
    }

    pub async fn get_period_by_id_impl(&self, id: i64) -> Result<Option<Period>> {
        let result = Periods::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学期失败: {e}")))?;

        Ok(result.map(|m| m.into_period()))
    }

    pub async fn get_period_by_name_impl(&self, name: &str) -> Result<Option<Period>> {
        let result = Periods::find()
            .filter(PeriodColumn::Name.eq(name.trim()))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学期失败: {e}")))?;

        Ok(result.map(|m| m.into_period()))
    }

    /// 列出全部学期，最近开始的在前
    pub async fn list_periods_impl(&self) -> Result<Vec<Period>> {
        let periods = Periods::find()
            .order_by_desc(PeriodColumn::StartsOn)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学期列表失败: {e}")))?;

        Ok(periods.into_iter().map(|m| m.into_period()).collect())
    }

    pub async fn delete_period_impl(&self, id: i64) -> Result<bool> {
        let result = Periods::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除学期失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 创建课程
    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = CourseActiveModel {
            code: Set(req.code),
            name: Set(req.name.trim().to_string()),
            description: Set(req.description),
            teacher_id: Set(req.teacher_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("创建课程失败: {e}")))?;

        Ok(result.into_course())
    }

    pub async fn get_course_by_id_impl(&self, id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    pub async fn get_course_by_code_impl(&self, code: &str) -> Result<Option<Course>> {
        let result = Courses::find()
            .filter(CourseColumn::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 分页列出课程
    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let (page, size) = normalize_page(query.page, query.size, 10);
        let (page, size) = (page as u64, size as u64);

        let mut select = Courses::find();

        // 教师筛选
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(CourseColumn::TeacherId.eq(teacher_id));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(
                Condition::any()
                    .add(contains_ignore_case(CourseColumn::Code, search))
                    .add(contains_ignore_case(CourseColumn::Name, search)),
            );
        }

        select = select.order_by_asc(CourseColumn::Code);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课程总数失败: {e}")))?;

        let courses = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(CourseListResponse {
            items: courses.into_iter().map(|m| m.into_course()).collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    /// 更新课程信息
    pub async fn update_course_impl(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        let existing = self.get_course_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = CourseActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }

        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        if let Some(teacher_id) = update.teacher_id {
            model.teacher_id = Set(teacher_id);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新课程失败: {e}")))?;

        self.get_course_by_id_impl(id).await
    }

    pub async fn delete_course_impl(&self, id: i64) -> Result<bool> {
        let result = Courses::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除课程失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 学生选课
    pub async fn enroll_student_impl(&self, course_id: i64, student_id: i64) -> Result<Enrollment> {
        let model = EnrollmentActiveModel {
            course_id: Set(course_id),
            student_id: Set(student_id),
            enrolled_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("选课失败: {e}")))?;

        Ok(result.into_enrollment())
    }

    pub async fn unenroll_student_impl(&self, course_id: i64, student_id: i64) -> Result<bool> {
        let result = Enrollments::delete_many()
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("退课失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn is_student_enrolled_impl(&self, course_id: i64, student_id: i64) -> Result<bool> {
        let count = Enrollments::find()
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .count(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(count > 0)
    }

    /// 课程学生列表（按选课先后）
    pub async fn list_course_students_impl(&self, course_id: i64) -> Result<Vec<EnrolledStudent>> {
        let rows = Enrollments::find()
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .order_by_asc(EnrollmentColumn::Id)
            .find_also_related(Users)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课程学生失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(enrollment, user)| {
                user.map(|user| EnrolledStudent {
                    enrollment_id: enrollment.id,
                    student: user.into_summary(),
                    enrolled_at: crate::entity::to_datetime(enrollment.enrolled_at),
                })
            })
            .collect())
    }

    /// 学生所选的全部课程
    pub async fn list_student_courses_impl(&self, student_id: i64) -> Result<Vec<Course>> {
        let course_ids: Vec<i64> = Enrollments::find()
            .select_only()
            .column(EnrollmentColumn::CourseId)
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询选课记录失败: {e}")))?;

        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let courses = Courses::find()
            .filter(CourseColumn::Id.is_in(course_ids))
            .order_by_asc(CourseColumn::Code)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(courses.into_iter().map(|m| m.into_course()).collect())
    }
}
