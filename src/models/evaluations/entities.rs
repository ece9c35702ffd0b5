use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::events::entities::string_enum;

string_enum!(EvaluationType, "../frontend/src/types/generated/evaluation.ts", {
    Exam => "exam",
    Practice => "practice",
    Homework => "homework",
    Project => "project",
    Presentation => "presentation",
    Participation => "participation",
});

string_enum!(EvaluationScale, "../frontend/src/types/generated/evaluation.ts", {
    Numeric => "numeric",
    Literal => "literal",
    Descriptive => "descriptive",
});

/// 单门课程在同一学期内的评估权重上限
pub const MAX_TOTAL_WEIGHT: f64 = 100.0;

/// 评估
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct Evaluation {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub evaluation_type: EvaluationType,
    pub scale: EvaluationScale,
    pub weight: f64,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub course_id: i64,
    pub period_id: i64,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 在已有权重基础上加入新权重后是否超过上限
pub fn exceeds_weight_limit(existing_total: f64, weight: f64) -> bool {
    // 容忍浮点累加误差
    existing_total + weight > MAX_TOTAL_WEIGHT + 1e-9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_parse() {
        assert_eq!("literal".parse::<EvaluationScale>(), Ok(EvaluationScale::Literal));
        assert!("letters".parse::<EvaluationScale>().is_err());
        assert_eq!(EvaluationType::Participation.to_string(), "participation");
    }

    #[test]
    fn test_weight_limit() {
        assert!(!exceeds_weight_limit(70.0, 30.0));
        assert!(exceeds_weight_limit(70.0, 30.5));
        assert!(!exceeds_weight_limit(0.1 + 0.2, 99.7));
    }
}
