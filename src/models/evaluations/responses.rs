use serde::Serialize;
use ts_rs::TS;

use super::entities::Evaluation;
use crate::models::common::PaginationInfo;
use crate::models::grades::responses::{DistributionBucket, GradeSummary};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationListResponse {
    pub items: Vec<Evaluation>,
    pub pagination: PaginationInfo,
}

/// 评估成绩统计
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationStatsResponse {
    pub evaluation_id: i64,
    pub enrolled_count: i64,
    pub graded_count: i64,
    pub summary: GradeSummary,
    pub distribution: Vec<DistributionBucket>,
}
