//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod academic;
mod announcements;
mod evaluations;
mod events;
mod grades;
mod permissions;
mod users;

use crate::config::AppConfig;
use crate::errors::{SchoolHubError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| SchoolHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 单连接的内存 SQLite，供测试使用
    #[cfg(test)]
    pub(crate) async fn new_in_memory() -> Result<Self> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| SchoolHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .foreign_keys(true);

        // 内存库随连接销毁，连接池只保留一个永不过期的连接
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .map_err(|e| SchoolHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}


// Storage trait 实现
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
use crate::storage::{GradeWrite, Storage};
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn get_user_summaries(&self, ids: &[i64]) -> Result<Vec<UserSummary>> {
        self.get_user_summaries_impl(ids).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    // 学期模块
    async fn create_period(&self, period: CreatePeriodRequest) -> Result<Period> {
        self.create_period_impl(period).await
    }

    async fn get_period_by_id(&self, id: i64) -> Result<Option<Period>> {
        self.get_period_by_id_impl(id).await
    }

    async fn get_period_by_name(&self, name: &str) -> Result<Option<Period>> {
        self.get_period_by_name_impl(name).await
    }

    async fn list_periods(&self) -> Result<Vec<Period>> {
        self.list_periods_impl().await
    }

    async fn delete_period(&self, id: i64) -> Result<bool> {
        self.delete_period_impl(id).await
    }

    // 课程模块
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(id).await
    }

    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>> {
        self.get_course_by_code_impl(code).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn update_course(&self, id: i64, update: UpdateCourseRequest) -> Result<Option<Course>> {
        self.update_course_impl(id, update).await
    }

    async fn delete_course(&self, id: i64) -> Result<bool> {
        self.delete_course_impl(id).await
    }

    // 选课模块
    async fn enroll_student(&self, course_id: i64, student_id: i64) -> Result<Enrollment> {
        self.enroll_student_impl(course_id, student_id).await
    }

    async fn unenroll_student(&self, course_id: i64, student_id: i64) -> Result<bool> {
        self.unenroll_student_impl(course_id, student_id).await
    }

    async fn is_student_enrolled(&self, course_id: i64, student_id: i64) -> Result<bool> {
        self.is_student_enrolled_impl(course_id, student_id).await
    }

    async fn list_course_students(&self, course_id: i64) -> Result<Vec<EnrolledStudent>> {
        self.list_course_students_impl(course_id).await
    }

    async fn list_student_courses(&self, student_id: i64) -> Result<Vec<Course>> {
        self.list_student_courses_impl(student_id).await
    }

    // 公告模块
    async fn create_announcement(
        &self,
        author_id: i64,
        announcement: CreateAnnouncementRequest,
    ) -> Result<Announcement> {
        self.create_announcement_impl(author_id, announcement).await
    }

    async fn get_announcement_by_id(&self, id: i64) -> Result<Option<Announcement>> {
        self.get_announcement_by_id_impl(id).await
    }

    async fn list_announcements(&self, query: AnnouncementListQuery) -> Result<Vec<Announcement>> {
        self.list_announcements_impl(query).await
    }

    async fn update_announcement(
        &self,
        id: i64,
        update: UpdateAnnouncementRequest,
    ) -> Result<Option<Announcement>> {
        self.update_announcement_impl(id, update).await
    }

    async fn delete_announcement(&self, id: i64) -> Result<bool> {
        self.delete_announcement_impl(id).await
    }

    // 活动模块
    async fn create_event(&self, organizer_id: i64, event: CreateEventRequest) -> Result<Event> {
        self.create_event_impl(organizer_id, event).await
    }

    async fn get_event_by_id(&self, id: i64) -> Result<Option<Event>> {
        self.get_event_by_id_impl(id).await
    }

    async fn list_events(&self, query: EventListQuery) -> Result<Vec<Event>> {
        self.list_events_impl(query).await
    }

    async fn update_event(&self, id: i64, update: UpdateEventRequest) -> Result<Option<Event>> {
        self.update_event_impl(id, update).await
    }

    async fn delete_event(&self, id: i64) -> Result<bool> {
        self.delete_event_impl(id).await
    }

    async fn count_event_registrations(&self, event_ids: &[i64]) -> Result<HashMap<i64, i64>> {
        self.count_event_registrations_impl(event_ids).await
    }

    async fn register_for_event(
        &self,
        event_id: i64,
        user_id: i64,
    ) -> Result<std::result::Result<EventRegistration, RegistrationRejection>> {
        self.register_for_event_impl(event_id, user_id).await
    }

    async fn cancel_event_registration(&self, event_id: i64, user_id: i64) -> Result<bool> {
        self.cancel_event_registration_impl(event_id, user_id).await
    }

    async fn list_event_attendees(&self, event_id: i64) -> Result<Vec<EventAttendee>> {
        self.list_event_attendees_impl(event_id).await
    }

    // 评估模块
    async fn create_evaluation(
        &self,
        created_by: i64,
        evaluation: CreateEvaluationRequest,
    ) -> Result<Evaluation> {
        self.create_evaluation_impl(created_by, evaluation).await
    }

    async fn get_evaluation_by_id(&self, id: i64) -> Result<Option<Evaluation>> {
        self.get_evaluation_by_id_impl(id).await
    }

    async fn list_evaluations_with_pagination(
        &self,
        query: EvaluationListQuery,
    ) -> Result<EvaluationListResponse> {
        self.list_evaluations_with_pagination_impl(query).await
    }

    async fn list_evaluations_for_courses(
        &self,
        course_ids: &[i64],
        period_id: i64,
    ) -> Result<Vec<Evaluation>> {
        self.list_evaluations_for_courses_impl(course_ids, period_id).await
    }

    async fn total_evaluation_weight(
        &self,
        course_id: i64,
        period_id: i64,
        exclude_id: Option<i64>,
    ) -> Result<f64> {
        self.total_evaluation_weight_impl(course_id, period_id, exclude_id).await
    }

    async fn update_evaluation(
        &self,
        id: i64,
        update: UpdateEvaluationRequest,
    ) -> Result<Option<Evaluation>> {
        self.update_evaluation_impl(id, update).await
    }

    async fn delete_evaluation(&self, id: i64) -> Result<bool> {
        self.delete_evaluation_impl(id).await
    }

    // 成绩模块
    async fn upsert_grades(
        &self,
        evaluation_id: i64,
        graded_by: i64,
        grades: Vec<GradeWrite>,
    ) -> Result<Vec<Grade>> {
        self.upsert_grades_impl(evaluation_id, graded_by, grades).await
    }

    async fn get_grade_by_id(&self, id: i64) -> Result<Option<Grade>> {
        self.get_grade_by_id_impl(id).await
    }

    async fn list_grades_by_evaluation(
        &self,
        evaluation_id: i64,
        page: i64,
        size: i64,
    ) -> Result<GradeListResponse> {
        self.list_grades_by_evaluation_impl(evaluation_id, page, size).await
    }

    async fn list_grades_for_evaluations(
        &self,
        evaluation_ids: &[i64],
        student_id: Option<i64>,
    ) -> Result<Vec<Grade>> {
        self.list_grades_for_evaluations_impl(evaluation_ids, student_id).await
    }

    async fn update_grade(
        &self,
        id: i64,
        value: Option<f64>,
        comment: Option<String>,
        graded_by: i64,
    ) -> Result<Option<Grade>> {
        self.update_grade_impl(id, value, comment, graded_by).await
    }

    async fn delete_grade(&self, id: i64) -> Result<bool> {
        self.delete_grade_impl(id).await
    }

    // 权限模块
    async fn create_permission(&self, permission: CreatePermissionRequest) -> Result<Permission> {
        self.create_permission_impl(permission).await
    }

    async fn get_permission_by_id(&self, id: i64) -> Result<Option<Permission>> {
        self.get_permission_by_id_impl(id).await
    }

    async fn get_permission_by_code(&self, code: &str) -> Result<Option<Permission>> {
        self.get_permission_by_code_impl(code).await
    }

    async fn list_permissions_with_pagination(
        &self,
        query: PermissionListQuery,
    ) -> Result<PermissionListResponse> {
        self.list_permissions_with_pagination_impl(query).await
    }

    async fn update_permission(
        &self,
        id: i64,
        update: UpdatePermissionRequest,
    ) -> Result<Option<Permission>> {
        self.update_permission_impl(id, update).await
    }

    async fn delete_permission(&self, id: i64) -> Result<bool> {
        self.delete_permission_impl(id).await
    }

    // 角色模块
    async fn create_role(&self, role: CreateRoleRequest) -> Result<Role> {
        self.create_role_impl(role).await
    }

    async fn get_role_by_id(&self, id: i64) -> Result<Option<Role>> {
        self.get_role_by_id_impl(id).await
    }

    async fn get_role_by_code(&self, code: &str) -> Result<Option<Role>> {
        self.get_role_by_code_impl(code).await
    }

    async fn list_roles(&self) -> Result<Vec<Role>> {
        self.list_roles_impl().await
    }

    async fn delete_role(&self, id: i64) -> Result<bool> {
        self.delete_role_impl(id).await
    }

    async fn list_role_permissions(&self, role_id: i64) -> Result<Vec<Permission>> {
        self.list_role_permissions_impl(role_id).await
    }

    async fn add_role_permission(&self, role_id: i64, permission_id: i64) -> Result<bool> {
        self.add_role_permission_impl(role_id, permission_id).await
    }

    async fn remove_role_permission(&self, role_id: i64, permission_id: i64) -> Result<bool> {
        self.remove_role_permission_impl(role_id, permission_id).await
    }

    // 用户授权模块
    async fn assign_user_role(
        &self,
        user_id: i64,
        role_id: i64,
        window: ValidityWindow,
    ) -> Result<UserRoleAssignment> {
        self.assign_user_role_impl(user_id, role_id, window).await
    }

    async fn revoke_user_role(&self, user_id: i64, assignment_id: i64) -> Result<bool> {
        self.revoke_user_role_impl(user_id, assignment_id).await
    }

    async fn grant_user_permission(
        &self,
        user_id: i64,
        permission_id: i64,
        window: ValidityWindow,
    ) -> Result<UserPermissionGrant> {
        self.grant_user_permission_impl(user_id, permission_id, window).await
    }

    async fn revoke_user_permission(&self, user_id: i64, grant_id: i64) -> Result<bool> {
        self.revoke_user_permission_impl(user_id, grant_id).await
    }

    async fn list_user_role_assignments(&self, user_id: i64) -> Result<Vec<UserRoleAssignment>> {
        self.list_user_role_assignments_impl(user_id).await
    }

    async fn list_user_permission_grants(&self, user_id: i64) -> Result<Vec<UserPermissionGrant>> {
        self.list_user_permission_grants_impl(user_id).await
    }

    async fn load_permission_sources(&self, user: &User) -> Result<PermissionSources> {
        self.load_permission_sources_impl(user).await
    }

    async fn seed_default_permissions(&self) -> Result<bool> {
        self.seed_default_permissions_impl().await
    }
}

#[cfg(test)]
mod tests;
