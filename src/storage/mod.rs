use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{
    academic::{
        entities::{Course, EnrolledStudent, Enrollment, Period},
        requests::{CourseListQuery, CreateCourseRequest, CreatePeriodRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
    announcements::{
        entities::Announcement,
        requests::{AnnouncementListQuery, CreateAnnouncementRequest, UpdateAnnouncementRequest},
    },
    evaluations::{
        entities::Evaluation,
        requests::{CreateEvaluationRequest, EvaluationListQuery, UpdateEvaluationRequest},
        responses::EvaluationListResponse,
    },
    events::{
        entities::{Event, RegistrationRejection},
        requests::{CreateEventRequest, EventListQuery, UpdateEventRequest},
        responses::{EventAttendee, EventRegistration},
    },
    grades::{entities::Grade, responses::GradeListResponse},
    permissions::{
        entities::{
            Permission, PermissionSources, Role, UserPermissionGrant, UserRoleAssignment,
            ValidityWindow,
        },
        requests::{
            CreatePermissionRequest, CreateRoleRequest, PermissionListQuery,
            UpdatePermissionRequest,
        },
        responses::PermissionListResponse,
    },
    users::{
        entities::{User, UserSummary},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

/// 待写入的一条成绩（已解析为二十分制分数）
#[derive(Debug, Clone)]
pub struct GradeWrite {
    pub student_id: i64,
    pub value: f64,
    pub comment: Option<String>,
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 批量获取用户摘要
    async fn get_user_summaries(&self, ids: &[i64]) -> Result<Vec<UserSummary>>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;

    /// 学期管理方法
    async fn create_period(&self, period: CreatePeriodRequest) -> Result<Period>;
    async fn get_period_by_id(&self, id: i64) -> Result<Option<Period>>;
    async fn get_period_by_name(&self, name: &str) -> Result<Option<Period>>;
    async fn list_periods(&self) -> Result<Vec<Period>>;
    async fn delete_period(&self, id: i64) -> Result<bool>;

    /// 课程管理方法
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course>;
    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>>;
    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>>;
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;
    async fn update_course(&self, id: i64, update: UpdateCourseRequest)
    -> Result<Option<Course>>;
    async fn delete_course(&self, id: i64) -> Result<bool>;

    /// 选课管理方法
    async fn enroll_student(&self, course_id: i64, student_id: i64) -> Result<Enrollment>;
    async fn unenroll_student(&self, course_id: i64, student_id: i64) -> Result<bool>;
    async fn is_student_enrolled(&self, course_id: i64, student_id: i64) -> Result<bool>;
    async fn list_course_students(&self, course_id: i64) -> Result<Vec<EnrolledStudent>>;
    async fn list_student_courses(&self, student_id: i64) -> Result<Vec<Course>>;

    /// 公告管理方法
    async fn create_announcement(
        &self,
        author_id: i64,
        announcement: CreateAnnouncementRequest,
    ) -> Result<Announcement>;
    async fn get_announcement_by_id(&self, id: i64) -> Result<Option<Announcement>>;
    // 按可下推条件查询，按发布时间倒序
    async fn list_announcements(&self, query: AnnouncementListQuery) -> Result<Vec<Announcement>>;
    async fn update_announcement(
        &self,
        id: i64,
        update: UpdateAnnouncementRequest,
    ) -> Result<Option<Announcement>>;
    async fn delete_announcement(&self, id: i64) -> Result<bool>;

    /// 活动管理方法
    async fn create_event(&self, organizer_id: i64, event: CreateEventRequest) -> Result<Event>;
    async fn get_event_by_id(&self, id: i64) -> Result<Option<Event>>;
    // 按可下推条件查询，按开始时间升序
    async fn list_events(&self, query: EventListQuery) -> Result<Vec<Event>>;
    async fn update_event(&self, id: i64, update: UpdateEventRequest) -> Result<Option<Event>>;
    async fn delete_event(&self, id: i64) -> Result<bool>;
    // 各活动的报名人数
    async fn count_event_registrations(&self, event_ids: &[i64]) -> Result<HashMap<i64, i64>>;
    // 在事务内检查报名条件并写入报名记录
    async fn register_for_event(
        &self,
        event_id: i64,
        user_id: i64,
    ) -> Result<std::result::Result<EventRegistration, RegistrationRejection>>;
    async fn cancel_event_registration(&self, event_id: i64, user_id: i64) -> Result<bool>;
    async fn list_event_attendees(&self, event_id: i64) -> Result<Vec<EventAttendee>>;

    /// 评估管理方法
    async fn create_evaluation(
        &self,
        created_by: i64,
        evaluation: CreateEvaluationRequest,
    ) -> Result<Evaluation>;
    async fn get_evaluation_by_id(&self, id: i64) -> Result<Option<Evaluation>>;
    async fn list_evaluations_with_pagination(
        &self,
        query: EvaluationListQuery,
    ) -> Result<EvaluationListResponse>;
    // 某学期内若干课程的全部评估
    async fn list_evaluations_for_courses(
        &self,
        course_ids: &[i64],
        period_id: i64,
    ) -> Result<Vec<Evaluation>>;
    // 同一课程同一学期的权重总和，可排除指定评估
    async fn total_evaluation_weight(
        &self,
        course_id: i64,
        period_id: i64,
        exclude_id: Option<i64>,
    ) -> Result<f64>;
    async fn update_evaluation(
        &self,
        id: i64,
        update: UpdateEvaluationRequest,
    ) -> Result<Option<Evaluation>>;
    async fn delete_evaluation(&self, id: i64) -> Result<bool>;

    /// 成绩管理方法
    // 按学生 + 评估新增或覆盖成绩（事务内批量执行）
    async fn upsert_grades(
        &self,
        evaluation_id: i64,
        graded_by: i64,
        grades: Vec<GradeWrite>,
    ) -> Result<Vec<Grade>>;
    async fn get_grade_by_id(&self, id: i64) -> Result<Option<Grade>>;
    async fn list_grades_by_evaluation(
        &self,
        evaluation_id: i64,
        page: i64,
        size: i64,
    ) -> Result<GradeListResponse>;
    // 若干评估的全部成绩，可限定学生
    async fn list_grades_for_evaluations(
        &self,
        evaluation_ids: &[i64],
        student_id: Option<i64>,
    ) -> Result<Vec<Grade>>;
    async fn update_grade(
        &self,
        id: i64,
        value: Option<f64>,
        comment: Option<String>,
        graded_by: i64,
    ) -> Result<Option<Grade>>;
    async fn delete_grade(&self, id: i64) -> Result<bool>;

    /// 权限管理方法
    async fn create_permission(&self, permission: CreatePermissionRequest) -> Result<Permission>;
    async fn get_permission_by_id(&self, id: i64) -> Result<Option<Permission>>;
    async fn get_permission_by_code(&self, code: &str) -> Result<Option<Permission>>;
    async fn list_permissions_with_pagination(
        &self,
        query: PermissionListQuery,
    ) -> Result<PermissionListResponse>;
    async fn update_permission(
        &self,
        id: i64,
        update: UpdatePermissionRequest,
    ) -> Result<Option<Permission>>;
    async fn delete_permission(&self, id: i64) -> Result<bool>;

    /// 角色管理方法
    async fn create_role(&self, role: CreateRoleRequest) -> Result<Role>;
    async fn get_role_by_id(&self, id: i64) -> Result<Option<Role>>;
    async fn get_role_by_code(&self, code: &str) -> Result<Option<Role>>;
    async fn list_roles(&self) -> Result<Vec<Role>>;
    async fn delete_role(&self, id: i64) -> Result<bool>;
    async fn list_role_permissions(&self, role_id: i64) -> Result<Vec<Permission>>;
    // 已存在时返回 false
    async fn add_role_permission(&self, role_id: i64, permission_id: i64) -> Result<bool>;
    async fn remove_role_permission(&self, role_id: i64, permission_id: i64) -> Result<bool>;

    /// 用户授权方法
    async fn assign_user_role(
        &self,
        user_id: i64,
        role_id: i64,
        window: ValidityWindow,
    ) -> Result<UserRoleAssignment>;
    async fn revoke_user_role(&self, user_id: i64, assignment_id: i64) -> Result<bool>;
    async fn grant_user_permission(
        &self,
        user_id: i64,
        permission_id: i64,
        window: ValidityWindow,
    ) -> Result<UserPermissionGrant>;
    async fn revoke_user_permission(&self, user_id: i64, grant_id: i64) -> Result<bool>;
    async fn list_user_role_assignments(&self, user_id: i64) -> Result<Vec<UserRoleAssignment>>;
    async fn list_user_permission_grants(&self, user_id: i64)
    -> Result<Vec<UserPermissionGrant>>;
    // 计算有效权限所需的全部来源
    async fn load_permission_sources(&self, user: &User) -> Result<PermissionSources>;
    // 权限表为空时写入默认权限和内置角色，返回是否写入
    async fn seed_default_permissions(&self) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
