//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

use chrono::{DateTime, Utc};

pub mod prelude;

pub mod announcements;
pub mod courses;
pub mod enrollments;
pub mod evaluations;
pub mod event_registrations;
pub mod events;
pub mod grades;
pub mod periods;
pub mod permissions;
pub mod role_permissions;
pub mod roles;
pub mod user_permissions;
pub mod user_roles;
pub mod users;

/// 数据库中的 unix 秒转换为 UTC 时间
pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
