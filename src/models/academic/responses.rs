use serde::Serialize;
use ts_rs::TS;

use super::entities::{Course, EnrolledStudent, Period};
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academic.ts")]
pub struct PeriodListResponse {
    pub items: Vec<Period>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academic.ts")]
pub struct CourseListResponse {
    pub items: Vec<Course>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academic.ts")]
pub struct EnrolledStudentListResponse {
    pub course_id: i64,
    pub items: Vec<EnrolledStudent>,
}
