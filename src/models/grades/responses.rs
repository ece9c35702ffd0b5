use serde::Serialize;
use ts_rs::TS;

use super::entities::{Grade, GradeLevel, GradeLiteral};
use crate::models::common::PaginationInfo;
use crate::models::users::entities::UserSummary;

/// 成绩视图（附带等级）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub grade: Grade,
    pub classification: GradeLevel,
    pub literal: GradeLiteral,
}

impl From<Grade> for GradeItem {
    fn from(grade: Grade) -> Self {
        let classification = GradeLevel::from_score(grade.value);
        Self {
            grade,
            classification,
            literal: classification.literal(),
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeListResponse {
    pub items: Vec<GradeItem>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct BulkGradeResponse {
    pub evaluation_id: i64,
    pub saved: i64,
    pub items: Vec<GradeItem>,
}

/// 汇总统计
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeSummary {
    pub count: i64,
    pub average: f64,
    pub max: f64,
    pub min: f64,
    pub approved_count: i64,
    /// 百分比，保留两位小数
    pub approval_rate: f64,
}

/// 分布区间
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct DistributionBucket {
    pub range: String,
    pub classification: GradeLevel,
    pub count: i64,
}

/// 课程结果中的一行（每个学生一行）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct StudentResult {
    pub student: UserSummary,
    pub average: f64,
    pub classification: GradeLevel,
    pub literal: GradeLiteral,
    pub graded_count: i64,
    pub total_evaluations: i64,
    pub rank: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct CourseResultsResponse {
    pub course_id: i64,
    pub period_id: i64,
    pub items: Vec<StudentResult>,
    pub summary: GradeSummary,
    pub distribution: Vec<DistributionBucket>,
}

/// 成绩单中的一门课程
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct ReportCourseRow {
    pub course_id: i64,
    pub course_code: String,
    pub course_name: String,
    pub average: f64,
    pub classification: GradeLevel,
    pub literal: GradeLiteral,
    pub graded_count: i64,
    pub total_evaluations: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct StudentReportResponse {
    pub student: UserSummary,
    pub period_id: i64,
    pub items: Vec<ReportCourseRow>,
    /// 各课程平均分的算术平均
    pub overall_average: f64,
    pub overall_classification: GradeLevel,
}
