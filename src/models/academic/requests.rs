use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;

/// 创建学期请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academic.ts")]
pub struct CreatePeriodRequest {
    pub name: String,
    pub starts_on: DateTime<Utc>,
    pub ends_on: DateTime<Utc>,
    pub is_current: Option<bool>,
}

impl CreatePeriodRequest {
    pub fn validate(&self) -> Result<(), String> {
        let name = self.name.trim();
        if name.is_empty() || name.chars().count() > 50 {
            return Err("学期名称长度必须在 1-50 个字符之间".to_string());
        }
        if self.ends_on <= self.starts_on {
            return Err("学期结束日期必须晚于开始日期".to_string());
        }
        Ok(())
    }
}

/// 创建课程请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academic.ts")]
pub struct CreateCourseRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub teacher_id: i64,
}

impl CreateCourseRequest {
    pub fn validate(&self) -> Result<(), String> {
        crate::utils::validate::validate_course_code(&self.code)?;
        crate::utils::validate::validate_length("课程名称", &self.name, 3, 100)?;
        Ok(())
    }
}

/// 更新课程请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academic.ts")]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub teacher_id: Option<i64>,
}

impl UpdateCourseRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref name) = self.name {
            crate::utils::validate::validate_length("课程名称", name, 3, 100)?;
        }
        Ok(())
    }
}

/// 课程列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academic.ts")]
pub struct CourseListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub teacher_id: Option<i64>,
    pub search: Option<String>,
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone)]
pub struct CourseListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub teacher_id: Option<i64>,
    pub search: Option<String>,
}

impl From<CourseListParams> for CourseListQuery {
    fn from(params: CourseListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            teacher_id: params.teacher_id,
            search: params.search,
        }
    }
}

/// 选课请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academic.ts")]
pub struct EnrollStudentRequest {
    pub student_id: i64,
}
