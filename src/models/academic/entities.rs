use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::UserSummary;

/// 学期
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academic.ts")]
pub struct Period {
    pub id: i64,
    pub name: String,
    pub starts_on: DateTime<Utc>,
    pub ends_on: DateTime<Utc>,
    pub is_current: bool,
    pub created_at: DateTime<Utc>,
}

/// 课程
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academic.ts")]
pub struct Course {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub teacher_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 选课记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academic.ts")]
pub struct Enrollment {
    pub id: i64,
    pub course_id: i64,
    pub student_id: i64,
    pub enrolled_at: DateTime<Utc>,
}

/// 课程学生（带用户摘要）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academic.ts")]
pub struct EnrolledStudent {
    pub enrollment_id: i64,
    pub student: UserSummary,
    pub enrolled_at: DateTime<Utc>,
}
